//! CMS boundary for `receptar`.
//!
//! Everything that touches the backend lives here: endpoint construction,
//! payload normalization across the two schema generations, the background
//! fetch worker feeding the suggestion controller, and the authorized
//! engagement writes (view counter, rating).

mod client;
mod config;
mod error;
mod payload;
mod worker;

pub use client::CmsClient;
pub use config::{BackendConfig, DEFAULT_TIMEOUT};
pub use error::CmsError;
pub use worker::{spawn_fetch_worker, spawn_index_bootstrap};
