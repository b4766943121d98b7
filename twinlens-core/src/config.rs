//! Alarm collector configuration
//!
//! The component-type ids and property names the alarm collector fans
//! out over are configuration, not literals scattered through the
//! collector, so the base-type set stays testable and extensible.

use serde::{Deserialize, Serialize};

/// Well-known identifiers used by the cross-type alarm collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlarmConfig {
    /// Base type every alarm component type directly extends.
    pub base_component_type: String,
    /// Secondary alarm base type. Types extending it are collected too,
    /// but the base itself carries no data and is skipped.
    pub sitewise_component_type: String,
    /// Time-series property holding the alarm status.
    pub alarm_property: String,
    /// Key of the external-id entry in an alarm row's reference.
    pub external_id_key: String,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            base_component_type: "com.amazon.iottwinmaker.alarm.basic".to_string(),
            sitewise_component_type: "com.amazon.iotsitewise.alarm".to_string(),
            alarm_property: "alarm_status".to_string(),
            external_id_key: "alarm_key".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alarm_config() {
        let config = AlarmConfig::default();
        assert_eq!(config.alarm_property, "alarm_status");
        assert!(config.base_component_type.ends_with("alarm.basic"));
    }
}
