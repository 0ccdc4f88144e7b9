//! Product search result

use crate::facet_result::FacetResult;
use crate::structs::SearchProduct;
use serde::{Deserialize, Serialize};

/// Page of products, the total number of matches and the computed facets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNumberSearchResult {
    pub products: Vec<SearchProduct>,
    pub total: u64,
    pub facets: Vec<FacetResult>,
}

impl ProductNumberSearchResult {
    pub fn new(products: Vec<SearchProduct>, total: u64) -> Self {
        Self {
            products,
            total,
            facets: Vec::new(),
        }
    }

    pub fn add_facet(&mut self, facet: FacetResult) {
        self.facets.push(facet);
    }

    pub fn facet(&self, name: &str) -> Option<&FacetResult> {
        self.facets.iter().find(|f| f.facet_name() == name)
    }

    pub fn has_facet(&self, name: &str) -> bool {
        self.facet(name).is_some()
    }
}
