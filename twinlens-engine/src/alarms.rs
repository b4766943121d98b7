//! Cross-type alarm collection
//!
//! Alarms are not one component type but a family: every type derived
//! from the basic alarm base, plus every type derived from the
//! sitewise alarm base. The collector enumerates the family and runs a
//! latest-only resolved query per type, sharing one row budget across
//! all of them.

use crate::engine::{HistoryEngine, ResolvedHistory};
use crate::history::AggregationMode;
use tracing::debug;
use twinlens_core::{PropertySelection, ResultOrder, TwinQuery, TwinResult};

impl HistoryEngine {
    /// Latest alarm status per alarm component, across every derived
    /// alarm type in the workspace.
    ///
    /// Types are queried in listing order and `max_results` caps the
    /// total row count, not the per-type count: each type gets the
    /// budget left over by its predecessors, and enumeration stops as
    /// soon as the budget is spent. Property filters on the caller's
    /// query are forwarded to every per-type history read.
    pub async fn alarms(&self, query: &TwinQuery) -> TwinResult<ResolvedHistory> {
        let row_limit = query.max_results;

        let mut type_ids = self
            .list_derived_component_types(query, &self.alarms.base_component_type)
            .await?;
        // The sitewise base extends the basic base but is itself
        // abstract; its concrete derivations are enumerated separately.
        type_ids.retain(|id| id != &self.alarms.sitewise_component_type);
        type_ids.extend(
            self.list_derived_component_types(query, &self.alarms.sitewise_component_type)
                .await?,
        );

        let mut rows = Vec::new();
        let mut warnings = Vec::new();

        for type_id in type_ids {
            let mut type_query = query.clone();
            type_query.entity_id = None;
            type_query.component_name = None;
            type_query.component_type_id = Some(type_id);
            type_query.properties = vec![PropertySelection::named(&self.alarms.alarm_property)];
            type_query.order = ResultOrder::Descending;
            type_query.next_token = None;
            if row_limit > 0 {
                type_query.max_results = row_limit - rows.len();
            }

            let resolved = self
                .component_history_with_lookup(&type_query, AggregationMode::LatestOnly)
                .await?;
            rows.extend(resolved.rows);
            warnings.extend(resolved.warnings);

            if row_limit > 0 && rows.len() >= row_limit {
                rows.truncate(row_limit);
                debug!(limit = row_limit, "alarm row budget spent");
                break;
            }
        }

        Ok(ResolvedHistory {
            rows,
            warnings,
            next_token: None,
        })
    }

    /// Every component type extending `base`, across all listing pages.
    async fn list_derived_component_types(
        &self,
        query: &TwinQuery,
        base: &str,
    ) -> TwinResult<Vec<String>> {
        let mut list_query = query.clone();
        list_query.entity_id = None;
        list_query.component_type_id = Some(base.to_string());
        list_query.next_token = None;
        list_query.max_results = 0;

        let mut ids = Vec::new();
        loop {
            let page = self.client.list_component_types(&list_query).await?;
            ids.extend(
                page.component_type_summaries
                    .into_iter()
                    .map(|summary| summary.component_type_id),
            );
            match page.next_token {
                Some(token) if !token.is_empty() => list_query.next_token = Some(token),
                _ => break,
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::HistoryEngine;
    use std::sync::Arc;
    use twinlens_core::{AlarmConfig, PropertyFilter};
    use twinlens_test_utils::{
        alarm_component_type, component_type_page, entity_page, entity_with_component,
        external_row, history_page, sample, MockTwinClient,
    };

    const SITEWISE_BASE: &str = "com.amazon.iotsitewise.alarm";

    fn engine_with(mock: MockTwinClient) -> (HistoryEngine, Arc<MockTwinClient>) {
        let mock = Arc::new(mock);
        (HistoryEngine::new(mock.clone()), mock)
    }

    fn query() -> TwinQuery {
        TwinQuery::new("factory")
    }

    /// Script the type schema, an entity, and its lookup for one alarm.
    fn script_alarm_entity(mock: &MockTwinClient, type_id: &str, external_id: &str, n: usize) {
        let entity_id = format!("{external_id}-entity");
        let entity_name = format!("Entity {n}");
        mock.insert_entity_lookup(external_id, entity_page(&[(&entity_id, &entity_name)]));
        mock.insert_entity_detail(entity_with_component(
            &entity_id,
            &entity_name,
            "Alarm",
            type_id,
            "alarm_key",
            external_id,
        ));
    }

    #[tokio::test]
    async fn test_collects_across_types_in_listing_order() {
        let mock = MockTwinClient::new();
        mock.push_component_type_page(component_type_page(&["alarm.mixer", "alarm.oven"], None));
        mock.push_component_type_page(component_type_page(&[], None));

        for type_id in ["alarm.mixer", "alarm.oven"] {
            mock.insert_component_type(alarm_component_type(type_id, "alarm_key", "alarm_status"));
        }
        mock.push_history_page(history_page(
            vec![external_row(
                "alarm_key",
                "mixer-7",
                "alarm_status",
                vec![sample("2022-04-27T18:00:00Z", "ACTIVE")],
            )],
            None,
        ));
        mock.push_history_page(history_page(
            vec![external_row(
                "alarm_key",
                "oven-2",
                "alarm_status",
                vec![sample("2022-04-27T18:00:00Z", "NORMAL")],
            )],
            None,
        ));
        script_alarm_entity(&mock, "alarm.mixer", "mixer-7", 1);
        script_alarm_entity(&mock, "alarm.oven", "oven-2", 2);
        let (engine, _) = engine_with(mock);

        let result = engine.alarms(&query()).await.unwrap();

        assert!(result.warnings.is_empty());
        assert!(result.next_token.is_none());
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0].entity_id, "mixer-7-entity");
        assert_eq!(result.rows[1].entity_id, "oven-2-entity");
        assert_eq!(result.rows[0].values[0].value.as_str(), Some("ACTIVE"));
    }

    #[tokio::test]
    async fn test_row_budget_is_shared_across_types() {
        // 3 types x 3 alarms each, limit 5: all 3 from the first type,
        // 2 from the second, and the third type is never queried.
        let mock = MockTwinClient::new();
        mock.push_component_type_page(component_type_page(
            &["alarm.a", "alarm.b", "alarm.c"],
            None,
        ));
        mock.push_component_type_page(component_type_page(&[], None));

        for (t, type_id) in ["alarm.a", "alarm.b", "alarm.c"].iter().enumerate() {
            mock.insert_component_type(alarm_component_type(type_id, "alarm_key", "alarm_status"));
            let rows = (0..3)
                .map(|i| {
                    let ext = format!("{type_id}-{i}");
                    script_alarm_entity(&mock, type_id, &ext, t * 3 + i);
                    external_row(
                        "alarm_key",
                        &ext,
                        "alarm_status",
                        vec![sample("2022-04-27T18:00:00Z", "ACTIVE")],
                    )
                })
                .collect();
            mock.push_history_page(history_page(rows, None));
        }
        let (engine, mock) = engine_with(mock);

        let mut q = query();
        q.max_results = 5;
        let result = engine.alarms(&q).await.unwrap();

        assert_eq!(result.rows.len(), 5);
        assert!(result.rows[..3].iter().all(|r| r.entity_id.starts_with("alarm.a")));
        assert!(result.rows[3..].iter().all(|r| r.entity_id.starts_with("alarm.b")));
        assert_eq!(mock.call_count("GetPropertyValueHistory"), 2);

        let budgets: Vec<usize> = mock
            .queries_for("GetPropertyValueHistory")
            .iter()
            .map(|q| q.max_results)
            .collect();
        // aggregate_history clears the upstream limit; the budget is
        // visible on the per-type component type fetch instead.
        assert_eq!(budgets, vec![0, 0]);
        let type_budgets: Vec<usize> = mock
            .queries_for("GetComponentType")
            .iter()
            .map(|q| q.max_results)
            .collect();
        assert_eq!(type_budgets, vec![5, 2]);
    }

    #[tokio::test]
    async fn test_sitewise_base_is_replaced_by_its_derivations() {
        let mock = MockTwinClient::new();
        // Basic listing includes the abstract sitewise base.
        mock.push_component_type_page(component_type_page(
            &["alarm.custom", SITEWISE_BASE],
            None,
        ));
        mock.push_component_type_page(component_type_page(&["alarm.sitewise.derived"], None));

        for type_id in ["alarm.custom", "alarm.sitewise.derived"] {
            mock.insert_component_type(alarm_component_type(type_id, "alarm_key", "alarm_status"));
        }
        let (engine, mock) = engine_with(mock);

        let result = engine.alarms(&query()).await.unwrap();
        assert!(result.rows.is_empty());

        let queried: Vec<Option<String>> = mock
            .queries_for("GetPropertyValueHistory")
            .into_iter()
            .map(|q| q.component_type_id)
            .collect();
        assert_eq!(
            queried,
            vec![
                Some("alarm.custom".to_string()),
                Some("alarm.sitewise.derived".to_string()),
            ]
        );

        let listed: Vec<Option<String>> = mock
            .queries_for("ListComponentTypes")
            .into_iter()
            .map(|q| q.component_type_id)
            .collect();
        assert_eq!(
            listed,
            vec![
                Some(AlarmConfig::default().base_component_type),
                Some(SITEWISE_BASE.to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_per_type_query_shape() {
        let mock = MockTwinClient::new();
        mock.push_component_type_page(component_type_page(&["alarm.mixer"], None));
        mock.push_component_type_page(component_type_page(&[], None));
        mock.insert_component_type(alarm_component_type("alarm.mixer", "alarm_key", "alarm_status"));
        let (engine, mock) = engine_with(mock);

        let mut q = query();
        q.entity_id = Some("ignored".to_string());
        q.property_filter = vec![PropertyFilter::eq("alarm_status", "ACTIVE")];
        engine.alarms(&q).await.unwrap();

        let history = mock.queries_for("GetPropertyValueHistory");
        assert_eq!(history.len(), 1);
        let hq = &history[0];
        assert_eq!(hq.entity_id, None);
        assert_eq!(hq.order, ResultOrder::Descending);
        assert_eq!(hq.properties, vec![PropertySelection::named("alarm_status")]);
        assert_eq!(hq.property_filter, vec![PropertyFilter::eq("alarm_status", "ACTIVE")]);
    }

    #[tokio::test]
    async fn test_type_listing_walks_pages() {
        let mock = MockTwinClient::new();
        mock.push_component_type_page(component_type_page(&["alarm.a"], Some("page-2")));
        mock.push_component_type_page(component_type_page(&["alarm.b"], None));
        mock.push_component_type_page(component_type_page(&[], None));
        for type_id in ["alarm.a", "alarm.b"] {
            mock.insert_component_type(alarm_component_type(type_id, "alarm_key", "alarm_status"));
        }
        let (engine, mock) = engine_with(mock);

        engine.alarms(&query()).await.unwrap();
        assert_eq!(mock.call_count("ListComponentTypes"), 3);
        assert_eq!(mock.call_count("GetPropertyValueHistory"), 2);
    }
}
