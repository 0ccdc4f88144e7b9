//! Partial facet handlers for the relational backend.
//!
//! Each facet runs its own query over the facet's reverted criteria, so the
//! values it offers ignore the shopper's selection along that same facet.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use storefront_model::{Criteria, Facet, FacetResult, ShopContext};

use super::connection::DbalConnection;
use super::factory::QueryBuilderFactory;
use super::query::SqlQuery;
use crate::config::FacetLabels;
use crate::error::Result;
use crate::handler::Supports;
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
pub trait PartialFacetHandler: Supports<Facet> + Send + Sync {
    /// `None` omits the facet from the result
    async fn generate_partial_facet(
        &self,
        facet: &Facet,
        reverted: &RevertedCriteria,
        criteria: &Criteria,
        context: &ShopContext,
    ) -> Result<Option<FacetResult>>;
}

/// Builds and runs facet queries
#[derive(Clone)]
pub struct FacetQuerySource {
    factory: Arc<QueryBuilderFactory>,
    connection: Arc<dyn DbalConnection>,
    labels: Arc<FacetLabels>,
}

impl FacetQuerySource {
    pub fn new(
        factory: Arc<QueryBuilderFactory>,
        connection: Arc<dyn DbalConnection>,
        labels: Arc<FacetLabels>,
    ) -> Self {
        Self {
            factory,
            connection,
            labels,
        }
    }

    /// Unordered, unpaged product query for `criteria`
    pub fn query(&self, criteria: &Criteria, context: &ShopContext) -> Result<SqlQuery> {
        let mut query = self.factory.create_query(criteria, context)?;
        query.reset_order_by().set_limit(None).set_offset(0);
        Ok(query)
    }

    pub async fn fetch(&self, query: &SqlQuery) -> Result<Vec<JsonValue>> {
        self.connection.fetch_rows(query).await
    }

    pub fn label(&self, facet: &Facet) -> String {
        self.labels.resolve(facet)
    }
}
