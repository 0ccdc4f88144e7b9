//! Facet handlers for the search engine backend.
//!
//! `handle` adds the facet's aggregations; the backend wraps them in a
//! filter aggregation over the facet's reverted user conditions. `hydrate`
//! receives the unwrapped aggregations and turns them into a facet result.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use storefront_model::{Criteria, Facet, FacetResult, ShopContext};

use super::dsl::Search;
use crate::error::Result;
use crate::handler::Supports;
use crate::hydrator::json_i64;
use crate::reversion::RevertedCriteria;

mod boolean;
mod category;
mod manufacturer;
mod price;
mod property;

pub use boolean::BooleanFacetHandler;
pub use category::CategoryFacetHandler;
pub use manufacturer::ManufacturerFacetHandler;
pub use price::PriceFacetHandler;
pub use property::PropertyFacetHandler;

#[async_trait]
pub trait EsFacetHandler: Supports<Facet> + Send + Sync {
    fn handle(
        &self,
        facet: &Facet,
        criteria: &Criteria,
        search: &mut Search,
        context: &ShopContext,
    ) -> Result<()>;

    /// `None` omits the facet from the result
    async fn hydrate(
        &self,
        facet: &Facet,
        aggregations: &Map<String, JsonValue>,
        reverted: &RevertedCriteria,
        criteria: &Criteria,
        context: &ShopContext,
    ) -> Result<Option<FacetResult>>;
}

/// Keys of a terms aggregation's buckets, in bucket order
pub(crate) fn bucket_ids(aggregations: &Map<String, JsonValue>, name: &str) -> Vec<i64> {
    aggregations
        .get(name)
        .and_then(|agg| agg.get("buckets"))
        .and_then(JsonValue::as_array)
        .map(|buckets| {
            buckets
                .iter()
                .filter_map(|bucket| bucket.get("key").and_then(json_i64))
                .collect()
        })
        .unwrap_or_default()
}

/// Shared by every handler that needs a label
pub type Labels = Arc<crate::config::FacetLabels>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bucket_keys_accept_numbers_and_strings() {
        let aggs = json!({
            "manufacturer": {"buckets": [{"key": 3, "doc_count": 2}, {"key": "7", "doc_count": 1}]}
        });
        let aggs = aggs.as_object().unwrap();
        assert_eq!(bucket_ids(aggs, "manufacturer"), vec![3, 7]);
        assert!(bucket_ids(aggs, "category").is_empty());
    }
}
