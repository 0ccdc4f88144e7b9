//! Builds SQL queries from criteria

use storefront_model::{Criteria, ShopContext, SortDirection};

use super::condition::{core_condition_handlers, ConditionHandler};
use super::query::SqlQuery;
use super::sorting::{core_sorting_handlers, SortingHandler};
use crate::error::Result;
use crate::handler::{HandlerProvider, HandlerRegistry};
use crate::metrics;

pub const BACKEND: &str = "dbal";

pub struct QueryBuilderFactory {
    conditions: HandlerRegistry<dyn ConditionHandler>,
    sortings: HandlerRegistry<dyn SortingHandler>,
}

impl Default for QueryBuilderFactory {
    fn default() -> Self {
        Self::new(&[], &[])
    }
}

impl QueryBuilderFactory {
    /// Core handlers, preceded by handlers from the providers
    pub fn new(
        condition_providers: &[HandlerProvider<dyn ConditionHandler>],
        sorting_providers: &[HandlerProvider<dyn SortingHandler>],
    ) -> Self {
        Self {
            conditions: HandlerRegistry::with_providers(
                core_condition_handlers(),
                condition_providers,
            ),
            sortings: HandlerRegistry::with_providers(core_sorting_handlers(), sorting_providers),
        }
    }

    /// Active products joined to their main variant, narrowed by every base
    /// and user condition.
    ///
    /// Selects nothing and is neither ordered nor paged; callers add that.
    pub fn create_query(&self, criteria: &Criteria, context: &ShopContext) -> Result<SqlQuery> {
        let mut query = SqlQuery::new("product", "product");
        query
            .inner_join(
                "product_variant",
                "variant",
                "variant.id = product.main_variant_id AND variant.active = TRUE",
            )
            .and_where("product.active = TRUE");

        for condition in criteria.conditions() {
            match self.conditions.find(condition) {
                Some(handler) => handler.generate_condition(condition, &mut query, context)?,
                None => {
                    tracing::debug!(
                        condition = %condition.name(),
                        kind = condition.kind(),
                        "No condition handler, skipping"
                    );
                    metrics::record_skipped(BACKEND, "condition", condition.kind());
                }
            }
        }

        Ok(query)
    }

    /// One row per product (`id`, `variantId`, `number`) in sorting order,
    /// paged by the criteria
    pub fn create_product_query(
        &self,
        criteria: &Criteria,
        context: &ShopContext,
    ) -> Result<SqlQuery> {
        let mut query = self.create_query(criteria, context)?;
        query.select([
            ("id", "product.id"),
            ("variantId", "variant.id"),
            ("number", "variant.number"),
        ]);

        for sorting in criteria.sortings() {
            match self.sortings.find(sorting) {
                Some(handler) => handler.generate_sorting(sorting, &mut query, context)?,
                None => {
                    tracing::debug!(sorting = %sorting.name(), "No sorting handler, skipping");
                    metrics::record_skipped(BACKEND, "sorting", sorting.kind_tag());
                }
            }
        }
        query.add_order_by("product.id", SortDirection::Asc);

        query
            .set_offset(criteria.get_offset())
            .set_limit(criteria.get_limit());
        Ok(query)
    }

    /// Number of distinct products matching the criteria, as `total`
    pub fn create_count_query(&self, criteria: &Criteria, context: &ShopContext) -> Result<SqlQuery> {
        let mut query = self.create_query(criteria, context)?;
        query.select([("total", "COUNT(DISTINCT product.id)")]);
        Ok(query)
    }
}
