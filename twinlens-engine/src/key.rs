//! Identity keys for history rows
//!
//! Two rows with the same key are the same logical series and must be
//! merged during pagination, never duplicated.

use twinlens_core::{EntityPropertyReference, PropertyDefinitions};

/// Derive the stable dedup key for a history row's reference:
/// `entityId_componentName_externalId_propertyName`, with absent parts
/// omitted. Total and deterministic - missing fields never fail.
///
/// With `definitions`, the external-id component is the value of
/// whichever `external_id_property` entry is flagged `is_external_id`
/// in the schema. Without definitions the first entry is used; a
/// reference legitimately carrying several external-id entries and no
/// definitions is a known limitation, not handled here.
pub fn reference_key(
    reference: &EntityPropertyReference,
    definitions: Option<&PropertyDefinitions>,
) -> String {
    let external_id = match definitions {
        Some(defs) => reference
            .external_id_property
            .iter()
            .find(|(name, _)| defs.get(*name).is_some_and(|d| d.is_external_id))
            .map(|(_, value)| value.as_str())
            .unwrap_or(""),
        None => reference
            .external_id_property
            .values()
            .next()
            .map(String::as_str)
            .unwrap_or(""),
    };

    let mut key = String::new();
    if let Some(entity_id) = &reference.entity_id {
        key.push_str(entity_id);
        key.push('_');
    }
    if let Some(component_name) = &reference.component_name {
        key.push_str(component_name);
        key.push('_');
    }
    key.push_str(external_id);
    key.push('_');
    if let Some(property_name) = &reference.property_name {
        key.push_str(property_name);
    }
    key
}
