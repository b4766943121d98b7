//! twinlens engine
//!
//! History resolution and identity reconciliation over a [`TwinClient`].
//! The engine merges paginated time-series history by identity key,
//! reconciles externally-keyed rows back to entity and component
//! identities with a lookup-join, and collects latest alarm state
//! across every derived alarm component type.
//!
//! [`TwinClient`]: twinlens_client::TwinClient

mod alarms;
mod engine;
mod history;
mod key;
mod resolve;

pub use engine::{HistoryEngine, ResolvedHistory};
pub use history::AggregationMode;
pub use key::reference_key;
