pub mod tiktokio;

use std::sync::Arc;

use app_config::provider::ProviderConfig;

use crate::{ExtractionProvider, ProviderError};

pub type ProviderEntry = Arc<dyn ExtractionProvider>;

/// The provider used when nothing else is configured
pub fn default_provider(config: &ProviderConfig) -> Result<ProviderEntry, ProviderError> {
    Ok(Arc::new(tiktokio::Tiktokio::from_config(config)?))
}
