//! twinlens core - data types
//!
//! Pure data structures shared by the client and engine crates:
//! queries, the typed value union, history rows and references, remote
//! schema shapes, notices, alarm configuration and the error taxonomy.
//! No I/O lives here.

pub mod config;
pub mod error;
pub mod notice;
pub mod query;
pub mod reference;
pub mod schema;
pub mod time;
pub mod value;

pub use config::AlarmConfig;
pub use error::{
    ClientError, ConfigError, QueryError, ResolutionError, TimeParseError, TwinError, TwinResult,
};
pub use notice::{Notice, NoticeSeverity};
pub use query::{
    EntityFilter, FilterOperator, PropertyFilter, PropertySelection, ResultOrder, TimeRange,
    TwinQuery,
};
pub use reference::{
    EntityPropertyReference, PropertyValueEntry, PropertyValueHistory, PropertyValueSample,
    ResolvedPropertyValue,
};
pub use schema::{
    BatchPutError, BatchPutOutput, ComponentDetail, ComponentTypeDetail, ComponentTypePage,
    ComponentTypeSummary, EntityDetail, EntityPage, EntitySummary, HistoryPage,
    LatestPropertyValue, PropertyDefinition, PropertyDefinitions, PropertyEntry,
    PropertyValueOutput, ScenePage, SceneSummary, WorkspacePage, WorkspaceSummary,
};
pub use time::{format_history_time, parse_history_time};
pub use value::DataValue;
