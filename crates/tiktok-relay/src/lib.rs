pub mod normalizer;
pub mod server;

pub use server::{build_router, run, AppState};
