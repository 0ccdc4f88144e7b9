//! Sorting handlers for the search engine backend

use std::sync::Arc;

use storefront_model::{ShopContext, Sorting, SortingKind};

use super::dsl::Search;
use super::field_mapping::FieldMapping;
use crate::error::Result;
use crate::handler::Supports;

pub trait EsSortingHandler: Supports<Sorting> + Send + Sync {
    fn handle(&self, sorting: &Sorting, search: &mut Search, context: &ShopContext) -> Result<()>;
}

pub fn core_sorting_handlers(mapping: FieldMapping) -> Vec<Arc<dyn EsSortingHandler>> {
    vec![
        Arc::new(FieldSortingHandler::new(SortingKind::ReleaseDate, "releaseDate")),
        Arc::new(FieldSortingHandler::new(SortingKind::Popularity, "sales")),
        Arc::new(FieldSortingHandler::new(SortingKind::ProductName, "name.keyword")),
        Arc::new(FieldSortingHandler::new(SortingKind::SearchRanking, "_score")),
        Arc::new(PriceSortingHandler::new(mapping)),
    ]
}

/// Orders by a fixed index field
pub struct FieldSortingHandler {
    kind: SortingKind,
    field: &'static str,
}

impl FieldSortingHandler {
    pub fn new(kind: SortingKind, field: &'static str) -> Self {
        Self { kind, field }
    }
}

impl Supports<Sorting> for FieldSortingHandler {
    fn supports(&self, part: &Sorting) -> bool {
        part.kind == self.kind
    }
}

impl EsSortingHandler for FieldSortingHandler {
    fn handle(&self, sorting: &Sorting, search: &mut Search, _context: &ShopContext) -> Result<()> {
        search.add_sort(self.field, sorting.direction);
        Ok(())
    }
}

pub struct PriceSortingHandler {
    mapping: FieldMapping,
}

impl PriceSortingHandler {
    pub fn new(mapping: FieldMapping) -> Self {
        Self { mapping }
    }
}

impl Supports<Sorting> for PriceSortingHandler {
    fn supports(&self, part: &Sorting) -> bool {
        part.kind == SortingKind::Price
    }
}

impl EsSortingHandler for PriceSortingHandler {
    fn handle(&self, sorting: &Sorting, search: &mut Search, context: &ShopContext) -> Result<()> {
        search.add_sort(&self.mapping.price_field(context), sorting.direction);
        Ok(())
    }
}
