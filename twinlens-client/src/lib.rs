//! twinlens client - the remote twin API surface
//!
//! The [`TwinClient`] trait is the seam the engine works against; this
//! crate provides the reqwest-backed implementation, the settings
//! model and the TTL response cache decorator.

pub mod api;
pub mod cache;
pub mod caching;
pub mod http;
pub mod settings;

pub use api::TwinClient;
pub use cache::TtlCache;
pub use caching::CachingClient;
pub use http::HttpTwinClient;
pub use settings::TwinSettings;
