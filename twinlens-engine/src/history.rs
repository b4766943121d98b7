//! Paginated history aggregation
//!
//! Walks the history endpoint's continuation tokens with an explicit
//! loop and an index-map accumulator, merging rows by identity key.
//! Rows arriving on later pages for a series seen earlier are merged
//! into it, never appended as duplicates.

use crate::engine::HistoryEngine;
use crate::key::reference_key;
use std::collections::HashMap;
use tracing::debug;
use twinlens_core::{HistoryPage, PropertyDefinitions, PropertyValueHistory, TwinQuery, TwinResult};

/// How pages are accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationMode {
    /// Accumulate every value of every series across all pages.
    Full,
    /// Keep only the newest value per series. The endpoint is assumed
    /// to return values newest-first, so each row is truncated to its
    /// first sample and page walking stops once the query's
    /// `max_results` distinct series have been seen.
    LatestOnly,
}

impl HistoryEngine {
    /// Walk the history endpoint and merge rows by identity key.
    ///
    /// Any transport error aborts immediately; pages merged so far are
    /// discarded rather than returned as a silently-incomplete result.
    /// A `max_results` of 0 (or `Full` mode) walks every page. On a
    /// capped `LatestOnly` return the remaining continuation token is
    /// discarded - the capped result is complete by definition.
    pub async fn aggregate_history(
        &self,
        query: &TwinQuery,
        mode: AggregationMode,
        definitions: Option<&PropertyDefinitions>,
    ) -> TwinResult<HistoryPage> {
        let mut query = query.clone();
        query.next_token = None;

        // The cap applies to distinct series, not to what the server
        // counts, so the upstream limit is cleared to avoid the server
        // capping individual pages short.
        let limit = match mode {
            AggregationMode::LatestOnly if query.max_results > 0 => Some(query.max_results),
            _ => None,
        };
        query.max_results = 0;

        let mut merged: Vec<PropertyValueHistory> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut pages = 0usize;

        loop {
            let page = self.client.get_property_value_history(&query).await?;
            pages += 1;

            for mut row in page.property_values {
                let key = reference_key(&row.entity_property_reference, definitions);
                match mode {
                    AggregationMode::Full => {
                        if let Some(&i) = index.get(&key) {
                            merged[i].values.append(&mut row.values);
                        } else {
                            index.insert(key, merged.len());
                            merged.push(row);
                        }
                    }
                    AggregationMode::LatestOnly => {
                        if index.contains_key(&key) {
                            continue;
                        }
                        row.values.truncate(1);
                        index.insert(key, merged.len());
                        merged.push(row);

                        if limit.is_some_and(|max| merged.len() >= max) {
                            debug!(pages, series = merged.len(), "history cap reached mid-page");
                            return Ok(HistoryPage {
                                property_values: merged,
                                next_token: None,
                            });
                        }
                    }
                }
            }

            match page.next_token {
                Some(token) if !token.is_empty() => query.next_token = Some(token),
                _ => break,
            }
        }

        debug!(pages, series = merged.len(), "history aggregation complete");
        Ok(HistoryPage {
            property_values: merged,
            next_token: None,
        })
    }
}
