/*!
 * Transcript retrieval capability.
 *
 * `TranscriptSource` is the seam between the alignment core and whatever
 * service actually hosts caption tracks. `JsonDirectorySource` serves tracks
 * saved on disk in the common `[{"text", "start", "duration"}]` layout.
 */

use async_trait::async_trait;
use log::debug;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use super::{CaptionSegment, TranscriptInfo};
use crate::errors::TranscriptError;
use crate::language_utils;

/// Provider of caption tracks for a video
#[async_trait]
pub trait TranscriptSource: Send + Sync + Debug {
    /// Fetch the full ordered track of a video in one language
    async fn fetch(&self, video_id: &str, language: &str) -> Result<Vec<CaptionSegment>, TranscriptError>;

    /// List every track available for a video
    async fn list_available(&self, video_id: &str) -> Result<Vec<TranscriptInfo>, TranscriptError>;
}

const GENERATED_SUFFIX: &str = ".auto";
const TRACK_EXTENSION: &str = ".json";
const DISABLED_EXTENSION: &str = "disabled";

/// A track file found on disk
#[derive(Debug, Clone)]
struct TrackFile {
    path: PathBuf,
    language: String,
    is_generated: bool,
}

/// Caption tracks stored as `<video_id>.<lang>.json` files.
///
/// Speech-recognition tracks use `<video_id>.<lang>.auto.json`; manual tracks
/// win when both exist. A `<video_id>.disabled` file marks a video whose
/// captions are turned off.
#[derive(Debug, Clone)]
pub struct JsonDirectorySource {
    root: PathBuf,
}

impl JsonDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_disabled(&self, video_id: &str) -> bool {
        self.root.join(format!("{}.{}", video_id, DISABLED_EXTENSION)).is_file()
    }

    /// Scan the directory for the tracks of one video, manual tracks first
    async fn track_files(&self, video_id: &str) -> Result<Vec<TrackFile>, TranscriptError> {
        let prefix = format!("{}.", video_id);
        let mut tracks = Vec::new();

        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name().to_string_lossy().to_string();
            let Some(rest) = file_name.strip_prefix(&prefix) else {
                continue;
            };
            let Some(stem) = rest.strip_suffix(TRACK_EXTENSION) else {
                continue;
            };

            let (language, is_generated) = match stem.strip_suffix(GENERATED_SUFFIX) {
                Some(language) => (language, true),
                None => (stem, false),
            };
            if language.is_empty() || language.contains('.') {
                continue;
            }

            tracks.push(TrackFile {
                path: entry.path(),
                language: language.to_string(),
                is_generated,
            });
        }

        tracks.sort_by(|a, b| a.is_generated.cmp(&b.is_generated).then(a.language.cmp(&b.language)));
        Ok(tracks)
    }

    async fn read_track(&self, track: &TrackFile) -> Result<Vec<CaptionSegment>, TranscriptError> {
        let content = tokio::fs::read_to_string(&track.path).await?;
        let mut segments: Vec<CaptionSegment> = serde_json::from_str(&content)
            .map_err(|e| TranscriptError::Parse(format!("{}: {}", track.path.display(), e)))?;

        for segment in &mut segments {
            segment.language = track.language.clone();
        }

        debug!("Loaded {} segments from {}", segments.len(), track.path.display());
        Ok(segments)
    }
}

#[async_trait]
impl TranscriptSource for JsonDirectorySource {
    async fn fetch(&self, video_id: &str, language: &str) -> Result<Vec<CaptionSegment>, TranscriptError> {
        if self.is_disabled(video_id) {
            return Err(TranscriptError::Disabled { video_id: video_id.to_string() });
        }

        let tracks = self.track_files(video_id).await?;
        let requested = language.trim().to_lowercase();

        // Exact code first, then any code naming the same language (en / eng / en-US)
        let track = tracks
            .iter()
            .find(|t| t.language.to_lowercase() == requested)
            .or_else(|| tracks.iter().find(|t| language_utils::language_codes_match(&t.language, &requested)))
            .ok_or_else(|| TranscriptError::NotFound {
                video_id: video_id.to_string(),
                language: language.to_string(),
            })?;

        self.read_track(track).await
    }

    async fn list_available(&self, video_id: &str) -> Result<Vec<TranscriptInfo>, TranscriptError> {
        if self.is_disabled(video_id) {
            return Err(TranscriptError::Disabled { video_id: video_id.to_string() });
        }

        let tracks = self.track_files(video_id).await?;
        if tracks.is_empty() {
            return Err(TranscriptError::NotFound {
                video_id: video_id.to_string(),
                language: "any".to_string(),
            });
        }

        Ok(tracks
            .into_iter()
            .map(|track| TranscriptInfo {
                display_name: language_utils::get_language_name(&track.language)
                    .unwrap_or_else(|_| track.language.clone()),
                language_code: track.language,
                is_generated: track.is_generated,
                is_translatable: false,
                translation_languages: Vec::new(),
            })
            .collect())
    }
}
