//! Relational search backend.
//!
//! Compiles criteria into SQL over the storefront schema:
//!
//! - `product` (`id`, `main_variant_id`, `manufacturer_id`, `name`,
//!   `keywords`, `active`, `last_stock`, `sales`, `release_date`)
//! - `product_variant` (`id`, `product_id`, `number`, `active`, `in_stock`,
//!   `min_purchase`, `shipping_free`)
//! - `product_price` (`variant_id`, `customer_group_key`, `from_quantity`,
//!   `price`)
//! - `product_category_ro` (`product_id`, `category_id`): one row per
//!   assigned category and each of its ancestors
//! - `product_property_value`, `product_avoid_customer_group`, `product_vote`
//! - `category`, `manufacturer`, `property_group`, `property_option`, `media`
//!
//! Products are read with one query, the total with a count query, and each
//! facet with a query of its own over the facet's reverted criteria.

use std::sync::Arc;

use storefront_model::{Criteria, ProductNumberSearchResult, SearchProduct, ShopContext};

mod bind;
pub mod condition;
pub mod connection;
pub mod facet;
pub mod factory;
pub mod price;
pub mod query;
pub mod sorting;

pub use condition::ConditionHandler;
pub use connection::{DbalConnection, PgDbalConnection};
pub use facet::{FacetQuerySource, PartialFacetHandler};
pub use factory::{QueryBuilderFactory, BACKEND};
pub use query::{BindValue, SqlQuery};
pub use sorting::SortingHandler;

use crate::config::FacetLabels;
use crate::error::Result;
use crate::handler::{HandlerProvider, HandlerRegistry};
use crate::hydrator::{json_i64, StructHydrator};
use crate::metrics;
use crate::reversion::revert;
use crate::services::StorefrontServices;
use facet::{
    BooleanFacetHandler, CategoryFacetHandler, ManufacturerFacetHandler, PriceFacetHandler,
    PropertyFacetHandler,
};

pub struct DbalProductNumberSearch {
    factory: Arc<QueryBuilderFactory>,
    connection: Arc<dyn DbalConnection>,
    facets: HandlerRegistry<dyn PartialFacetHandler>,
    hydrator: StructHydrator,
}

impl DbalProductNumberSearch {
    pub fn new(
        factory: Arc<QueryBuilderFactory>,
        connection: Arc<dyn DbalConnection>,
        facets: HandlerRegistry<dyn PartialFacetHandler>,
    ) -> Self {
        Self {
            factory,
            connection,
            facets,
            hydrator: StructHydrator::new(),
        }
    }

    /// Backend with the core handlers, extended by `facet_providers`
    pub fn with_core_handlers(
        factory: Arc<QueryBuilderFactory>,
        connection: Arc<dyn DbalConnection>,
        services: &StorefrontServices,
        labels: Arc<FacetLabels>,
        facet_providers: &[HandlerProvider<dyn PartialFacetHandler>],
    ) -> Self {
        // Facet handlers share the factory and connection of the main query
        let source = FacetQuerySource::new(factory.clone(), connection.clone(), labels);
        let core = core_facet_handlers(&source, services);
        Self::new(
            factory,
            connection,
            HandlerRegistry::with_providers(core, facet_providers),
        )
    }

    pub async fn search(
        &self,
        criteria: &Criteria,
        context: &ShopContext,
    ) -> Result<ProductNumberSearchResult> {
        // Page of products, then the total over every matching product
        let products = self.fetch_products(criteria, context).await?;
        let total = self.fetch_total(criteria, context, products.len()).await?;

        // One secondary query per facet, run in declared order
        let mut result = ProductNumberSearchResult::new(products, total);
        for facet in criteria.facets() {
            let Some(handler) = self.facets.find(facet) else {
                tracing::debug!(facet = %facet.name(), kind = facet.kind(), "No facet handler, skipping");
                metrics::record_skipped(BACKEND, "facet", facet.kind());
                continue;
            };

            let reverted = revert(criteria, facet);
            let generated = handler
                .generate_partial_facet(facet, &reverted, criteria, context)
                .await?;
            metrics::record_facet(BACKEND, facet.name(), generated.is_some());
            if let Some(facet_result) = generated {
                result.add_facet(facet_result);
            }
        }

        Ok(result)
    }

    async fn fetch_products(
        &self,
        criteria: &Criteria,
        context: &ShopContext,
    ) -> Result<Vec<SearchProduct>> {
        let query = self.factory.create_product_query(criteria, context)?;
        let rows = self.connection.fetch_rows(&query).await?;
        let products = rows
            .iter()
            .map(|row| self.hydrator.create_search_product(row))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(products)
    }

    /// An unpaged result already holds every product
    async fn fetch_total(
        &self,
        criteria: &Criteria,
        context: &ShopContext,
        fetched: usize,
    ) -> Result<u64> {
        if criteria.get_limit().is_none() && criteria.get_offset() == 0 {
            return Ok(fetched as u64);
        }

        let query = self.factory.create_count_query(criteria, context)?;
        let rows = self.connection.fetch_rows(&query).await?;
        let total = rows
            .first()
            .and_then(|row| row.get("total"))
            .and_then(json_i64)
            .unwrap_or(0);
        // COUNT is never negative
        Ok(total.max(0) as u64)
    }
}

/// Handlers for every core facet variant
pub fn core_facet_handlers(
    source: &FacetQuerySource,
    services: &StorefrontServices,
) -> Vec<Arc<dyn PartialFacetHandler>> {
    vec![
        Arc::new(CategoryFacetHandler::new(
            source.clone(),
            services.categories.clone(),
        )),
        Arc::new(ManufacturerFacetHandler::new(
            source.clone(),
            services.manufacturers.clone(),
        )),
        Arc::new(PropertyFacetHandler::new(
            source.clone(),
            services.properties.clone(),
        )),
        Arc::new(PriceFacetHandler::new(source.clone())),
        Arc::new(BooleanFacetHandler::shipping_free(source.clone())),
        Arc::new(BooleanFacetHandler::immediate_delivery(source.clone())),
    ]
}
