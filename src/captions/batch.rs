/*!
 * Concurrent retrieval of several caption tracks of one video.
 *
 * One task per requested language runs through a bounded pool; a failing
 * language is recorded in `errors` and never aborts the other fetches.
 */

use futures::stream::{self, StreamExt};
use log::{debug, error};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;

use super::{CaptionSegment, TranscriptSource};

/// Outcome of a multi-language fetch, partitioned by language
#[derive(Debug, Default, Serialize)]
pub struct BatchFetch {
    /// Tracks that were fetched successfully
    pub transcripts: BTreeMap<String, Vec<CaptionSegment>>,

    /// Failure message for each language that could not be fetched
    pub errors: BTreeMap<String, String>,
}

impl BatchFetch {
    /// True when at least one language was fetched
    pub fn has_results(&self) -> bool {
        !self.transcripts.is_empty()
    }
}

/// Fetch `languages` for `video_id` with at most `max_workers` requests in flight
pub async fn fetch_many(
    source: Arc<dyn TranscriptSource>,
    video_id: &str,
    languages: &[String],
    max_workers: usize,
) -> BatchFetch {
    let max_workers = max_workers.max(1);
    let semaphore = Arc::new(Semaphore::new(max_workers));

    let results = stream::iter(languages.iter().cloned())
        .map(|language| {
            let source = source.clone();
            let semaphore = semaphore.clone();
            let video_id = video_id.to_string();

            async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => source.fetch(&video_id, &language).await.map_err(|e| e.to_string()),
                    Err(e) => Err(format!("worker pool closed: {}", e)),
                };
                (language, result)
            }
        })
        .buffer_unordered(max_workers)
        .collect::<Vec<_>>()
        .await;

    let mut batch = BatchFetch::default();
    for (language, result) in results {
        match result {
            Ok(segments) => {
                debug!("Fetched {} segments for language {}", segments.len(), language);
                batch.transcripts.insert(language, segments);
            }
            Err(message) => {
                error!("Failed to fetch {} transcript for {}: {}", language, video_id, message);
                batch.errors.insert(language, message);
            }
        }
    }

    batch
}
