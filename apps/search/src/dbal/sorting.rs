//! Sorting handlers for the relational backend

use std::sync::Arc;

use storefront_model::{ShopContext, Sorting, SortingKind};

use super::condition::SEARCH_RANKING;
use super::price::join_prices;
use super::query::SqlQuery;
use crate::error::Result;
use crate::handler::Supports;

pub trait SortingHandler: Supports<Sorting> + Send + Sync {
    fn generate_sorting(
        &self,
        sorting: &Sorting,
        query: &mut SqlQuery,
        context: &ShopContext,
    ) -> Result<()>;
}

pub fn core_sorting_handlers() -> Vec<Arc<dyn SortingHandler>> {
    vec![
        Arc::new(ColumnSortingHandler::new(SortingKind::ReleaseDate, "product.release_date")),
        Arc::new(ColumnSortingHandler::new(SortingKind::Popularity, "product.sales")),
        Arc::new(ColumnSortingHandler::new(SortingKind::ProductName, "product.name")),
        Arc::new(PriceSortingHandler),
        Arc::new(SearchRankingSortingHandler),
    ]
}

/// Orders by a plain product column
pub struct ColumnSortingHandler {
    kind: SortingKind,
    column: &'static str,
}

impl ColumnSortingHandler {
    pub fn new(kind: SortingKind, column: &'static str) -> Self {
        Self { kind, column }
    }
}

impl Supports<Sorting> for ColumnSortingHandler {
    fn supports(&self, part: &Sorting) -> bool {
        part.kind == self.kind
    }
}

impl SortingHandler for ColumnSortingHandler {
    fn generate_sorting(
        &self,
        sorting: &Sorting,
        query: &mut SqlQuery,
        _context: &ShopContext,
    ) -> Result<()> {
        query.add_order_by(self.column, sorting.direction);
        Ok(())
    }
}

pub struct PriceSortingHandler;

impl Supports<Sorting> for PriceSortingHandler {
    fn supports(&self, part: &Sorting) -> bool {
        part.kind == SortingKind::Price
    }
}

impl SortingHandler for PriceSortingHandler {
    fn generate_sorting(
        &self,
        sorting: &Sorting,
        query: &mut SqlQuery,
        context: &ShopContext,
    ) -> Result<()> {
        let price = join_prices(query, context);
        query.add_order_by(price, sorting.direction);
        Ok(())
    }
}

/// Relevance of the search term; a no-op when the query has no term
pub struct SearchRankingSortingHandler;

impl Supports<Sorting> for SearchRankingSortingHandler {
    fn supports(&self, part: &Sorting) -> bool {
        part.kind == SortingKind::SearchRanking
    }
}

impl SortingHandler for SearchRankingSortingHandler {
    fn generate_sorting(
        &self,
        sorting: &Sorting,
        query: &mut SqlQuery,
        _context: &ShopContext,
    ) -> Result<()> {
        if let Some(ranking) = query.value(SEARCH_RANKING).map(str::to_string) {
            query.add_order_by(ranking, sorting.direction);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::HandlerRegistry;
    use crate::test_fixtures::shop_context;

    fn apply(sorting: Sorting, query: &mut SqlQuery) {
        let registry = HandlerRegistry::new(core_sorting_handlers());
        registry
            .find(&sorting)
            .unwrap()
            .generate_sorting(&sorting, query, &shop_context())
            .unwrap();
    }

    #[test]
    fn column_sortings_keep_direction() {
        let mut query = SqlQuery::new("product", "product");
        apply(Sorting::desc(SortingKind::ProductName), &mut query);
        assert!(query.to_sql().ends_with("ORDER BY product.name DESC"));
    }

    #[test]
    fn search_ranking_without_term_adds_nothing() {
        let mut query = SqlQuery::new("product", "product");
        apply(Sorting::desc(SortingKind::SearchRanking), &mut query);
        assert!(!query.has_order_by());
    }

    #[test]
    fn price_sorting_joins_prices() {
        let mut query = SqlQuery::new("product", "product");
        apply(Sorting::asc(SortingKind::Price), &mut query);
        assert!(query.to_sql().contains("LEFT JOIN product_price price_current"));
        assert!(query.to_sql().contains("ORDER BY (COALESCE("));
    }
}
