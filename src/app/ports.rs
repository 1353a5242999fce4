use crate::error::Result;
use async_trait::async_trait;

/// Outbound HTTP used by every network-facing stage.
///
/// `Err` is reserved for transport failures; a non-success status is still an
/// `Ok` response so callers can decide how to degrade.
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}
