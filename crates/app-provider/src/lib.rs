pub use common::{
    provider_error::ProviderError,
    provider_result::{
        is_truthy, DownloadLinks, ErrorDetails, ProviderContent, ProviderOutcome, ProviderPost,
        ProviderResult, VideoLinks,
    },
};

mod common;
pub mod handlers;

/// Turns a TikTok post URL into a [`ProviderResult`].
///
/// A provider reports "could not handle this post" through a falsy `status`
/// in the returned result. `Err` is reserved for failures of the provider
/// itself (transport, malformed upstream data, ...).
#[async_trait::async_trait]
pub trait ExtractionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    async fn download(&self, url: &str) -> Result<ProviderResult, ProviderError>;
}
