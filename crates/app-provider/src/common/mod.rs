pub mod provider_error;
pub mod provider_result;
pub mod request;
