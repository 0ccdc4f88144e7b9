//! Search engine backend.
//!
//! Compiles criteria into an Elasticsearch search body over product
//! documents shaped like:
//!
//! ```json
//! {
//!   "id": 1, "variantId": 10, "number": "SW10001",
//!   "name": "...", "keywords": "...",
//!   "manufacturer": { "id": 42, "name": "..." },
//!   "categoryIds": [5, 3, 1],
//!   "properties": [{ "id": 7, "groupId": 2 }],
//!   "calculatedPrices": { "EK_1": { "calculatedPrice": 19.99 } },
//!   "blockedCustomerGroupIds": [],
//!   "shippingFree": false, "isAvailable": true, "hasAvailableVariant": true,
//!   "voteAverage": { "average": 4.5 }, "sales": 12, "releaseDate": "2024-01-01"
//! }
//! ```
//!
//! Base conditions filter the query, user conditions go to `post_filter`.
//! Each facet's aggregations are wrapped in a filter aggregation holding the
//! facet's reverted user conditions, so one request answers hits and facets.

use std::sync::Arc;

use serde_json::{json, Map, Value as JsonValue};
use storefront_model::{
    Criteria, Facet, ProductNumberSearchResult, SearchProduct, ShopContext, SortDirection,
};

pub mod client;
pub mod condition;
pub mod dsl;
pub mod facet;
pub mod field_mapping;
pub mod sorting;

pub use client::{EsClient, EsTransport};
pub use condition::EsConditionHandler;
pub use dsl::Search;
pub use facet::EsFacetHandler;
pub use field_mapping::FieldMapping;
pub use sorting::EsSortingHandler;

use crate::config::{Config, FacetLabels};
use crate::error::{Error, Result};
use crate::handler::{HandlerProvider, HandlerRegistry};
use crate::hydrator::StructHydrator;
use crate::metrics;
use crate::reversion::revert;
use crate::services::StorefrontServices;
use dsl::bool_filter;
use facet::{
    BooleanFacetHandler, CategoryFacetHandler, ManufacturerFacetHandler, PriceFacetHandler,
    PropertyFacetHandler,
};

pub const BACKEND: &str = "elasticsearch";

/// Extension handlers, placed ahead of the core handlers
#[derive(Default)]
pub struct EsHandlerProviders {
    pub conditions: Vec<HandlerProvider<dyn EsConditionHandler>>,
    pub sortings: Vec<HandlerProvider<dyn EsSortingHandler>>,
    pub facets: Vec<HandlerProvider<dyn EsFacetHandler>>,
}

pub struct EsProductNumberSearch {
    transport: Arc<dyn EsTransport>,
    index: String,
    max_result_window: usize,
    conditions: HandlerRegistry<dyn EsConditionHandler>,
    sortings: HandlerRegistry<dyn EsSortingHandler>,
    facets: HandlerRegistry<dyn EsFacetHandler>,
    hydrator: StructHydrator,
}

impl EsProductNumberSearch {
    pub fn new(
        transport: Arc<dyn EsTransport>,
        index: impl Into<String>,
        max_result_window: usize,
        conditions: HandlerRegistry<dyn EsConditionHandler>,
        sortings: HandlerRegistry<dyn EsSortingHandler>,
        facets: HandlerRegistry<dyn EsFacetHandler>,
    ) -> Self {
        Self {
            transport,
            index: index.into(),
            max_result_window,
            conditions,
            sortings,
            facets,
            hydrator: StructHydrator::new(),
        }
    }

    pub fn with_core_handlers(
        transport: Arc<dyn EsTransport>,
        config: &Config,
        services: &StorefrontServices,
        providers: &EsHandlerProviders,
    ) -> Self {
        let mapping = FieldMapping::new();
        let labels = Arc::new(config.labels.clone());
        Self::new(
            transport,
            config.elasticsearch.index.clone(),
            config.elasticsearch.max_result_window,
            HandlerRegistry::with_providers(
                condition::core_condition_handlers(mapping),
                &providers.conditions,
            ),
            HandlerRegistry::with_providers(
                sorting::core_sorting_handlers(mapping),
                &providers.sortings,
            ),
            HandlerRegistry::with_providers(
                core_facet_handlers(mapping, services, labels, config.search.aggregation_size),
                &providers.facets,
            ),
        )
    }

    /// Request body for `criteria`
    pub fn build_search(&self, criteria: &Criteria, context: &ShopContext) -> Result<Search> {
        let mut search = Search::new();

        for condition in criteria.base_conditions() {
            match self.conditions.find(condition) {
                Some(handler) => handler.handle_filter(condition, criteria, &mut search, context)?,
                None => skip_condition(condition.kind(), &condition.name()),
            }
        }
        for condition in criteria.user_conditions() {
            match self.conditions.find(condition) {
                Some(handler) => {
                    handler.handle_post_filter(condition, criteria, &mut search, context)?
                }
                None => skip_condition(condition.kind(), &condition.name()),
            }
        }

        for sorting in criteria.sortings() {
            match self.sortings.find(sorting) {
                Some(handler) => handler.handle(sorting, &mut search, context)?,
                None => {
                    tracing::debug!(sorting = %sorting.name(), "No sorting handler, skipping");
                    metrics::record_skipped(BACKEND, "sorting", sorting.kind_tag());
                }
            }
        }
        search.add_sort("id", SortDirection::Asc);

        // from + size must stay inside the index's result window
        let offset = criteria.get_offset();
        let size = criteria
            .get_limit()
            .unwrap_or_else(|| self.max_result_window.saturating_sub(offset));
        search.set_from(offset).set_size(size);

        for facet in criteria.facets() {
            let Some(handler) = self.facets.find(facet) else {
                continue;
            };
            let mut facet_search = Search::new();
            handler.handle(facet, criteria, &mut facet_search, context)?;

            let reverted = revert(criteria, facet);
            let mut filters = Search::new();
            for condition in reverted.criteria.user_conditions() {
                if let Some(handler) = self.conditions.find(condition) {
                    handler.handle_filter(condition, &reverted.criteria, &mut filters, context)?;
                }
            }

            search.add_aggregation(
                facet_aggregation_name(facet),
                json!({
                    "filter": bool_filter(filters.filters().to_vec()),
                    "aggs": facet_search.take_aggregations(),
                }),
            );
        }

        Ok(search)
    }

    pub async fn search(
        &self,
        criteria: &Criteria,
        context: &ShopContext,
    ) -> Result<ProductNumberSearchResult> {
        let body = self.build_search(criteria, context)?.to_json();
        let response = self.transport.search(&self.index, &body).await?;

        let hits = response.get("hits").ok_or_else(|| malformed("missing hits"))?;
        let products = self.hydrate_products(hits)?;
        let total = match hits.get("total") {
            Some(JsonValue::Number(n)) => n.as_u64(),
            Some(total) => total.get("value").and_then(JsonValue::as_u64),
            None => None,
        }
        .unwrap_or(products.len() as u64);

        let empty = Map::new();
        let aggregations = response
            .get("aggregations")
            .and_then(JsonValue::as_object)
            .unwrap_or(&empty);

        let mut result = ProductNumberSearchResult::new(products, total);
        for facet in criteria.facets() {
            let Some(handler) = self.facets.find(facet) else {
                tracing::debug!(facet = %facet.name(), kind = facet.kind(), "No facet handler, skipping");
                metrics::record_skipped(BACKEND, "facet", facet.kind());
                continue;
            };

            let facet_aggregations = aggregations
                .get(&facet_aggregation_name(facet))
                .and_then(JsonValue::as_object)
                .unwrap_or(&empty);
            let reverted = revert(criteria, facet);
            let generated = handler
                .hydrate(facet, facet_aggregations, &reverted, criteria, context)
                .await?;
            metrics::record_facet(BACKEND, facet.name(), generated.is_some());
            if let Some(facet_result) = generated {
                result.add_facet(facet_result);
            }
        }

        Ok(result)
    }

    fn hydrate_products(&self, hits: &JsonValue) -> Result<Vec<SearchProduct>> {
        let Some(hits) = hits.get("hits").and_then(JsonValue::as_array) else {
            return Err(malformed("missing hits.hits"));
        };
        hits.iter()
            .map(|hit| {
                let source = hit.get("_source").unwrap_or(hit);
                self.hydrator
                    .create_search_product(source)
                    .map_err(Error::from)
            })
            .collect()
    }
}

/// Name of the filter aggregation wrapping a facet's own aggregations
pub fn facet_aggregation_name(facet: &Facet) -> String {
    format!("facet_{}", facet.name())
}

pub fn core_facet_handlers(
    mapping: FieldMapping,
    services: &StorefrontServices,
    labels: Arc<FacetLabels>,
    aggregation_size: usize,
) -> Vec<Arc<dyn EsFacetHandler>> {
    vec![
        Arc::new(CategoryFacetHandler::new(
            services.categories.clone(),
            labels.clone(),
            aggregation_size,
        )),
        Arc::new(ManufacturerFacetHandler::new(
            services.manufacturers.clone(),
            labels.clone(),
            aggregation_size,
        )),
        Arc::new(PropertyFacetHandler::new(
            services.properties.clone(),
            labels.clone(),
            aggregation_size,
        )),
        Arc::new(PriceFacetHandler::new(mapping, labels.clone())),
        Arc::new(BooleanFacetHandler::shipping_free(labels.clone())),
        Arc::new(BooleanFacetHandler::immediate_delivery(labels)),
    ]
}

fn skip_condition(kind: &str, name: &str) {
    tracing::debug!(condition = %name, kind, "No condition handler, skipping");
    metrics::record_skipped(BACKEND, "condition", kind);
}

fn malformed(message: &str) -> Error {
    Error::ElasticsearchResponse {
        status: 200,
        message: message.to_string(),
    }
}
