/*!
 * Provider implementations behind the keyword translator.
 *
 * - Ollama: local LLM server, used by `OllamaTranslator`
 * - Mock: offline dictionary translator for tests and dry runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

pub use self::mock::{MockBehavior, MockTranslator};
pub use self::ollama::{Ollama, OllamaTranslator};

/// Common trait for all LLM providers
///
/// Each provider exposes a typed request/response pair; translators built on
/// top of a provider only need `complete` and `extract_text`.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;
}

pub mod mock;
pub mod ollama;
