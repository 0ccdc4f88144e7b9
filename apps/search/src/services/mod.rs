//! Storefront data services
//!
//! Facet handlers resolve ids found by a search into displayable structs
//! through these traits. The `Dbal*` implementations read the relational
//! store; tests and other deployments can provide their own.

use std::sync::Arc;

use async_trait::async_trait;
use storefront_model::{Category, Manufacturer, PropertyGroup, ShopContext};

use crate::dbal::DbalConnection;
use crate::error::Result;

mod category_tree;
mod dbal;

pub use category_tree::{CategoryDepth, CategoryTreeBuilder};
pub use dbal::{DbalCategoryService, DbalManufacturerService, DbalPropertyService};

#[async_trait]
pub trait CategoryService: Send + Sync {
    /// Active categories among `ids`, ordered by position. Unknown ids are
    /// left out.
    async fn get_list(&self, ids: &[i64], context: &ShopContext) -> Result<Vec<Category>>;
}

#[async_trait]
pub trait ManufacturerService: Send + Sync {
    async fn get_list(&self, ids: &[i64], context: &ShopContext) -> Result<Vec<Manufacturer>>;
}

#[async_trait]
pub trait PropertyService: Send + Sync {
    /// Filterable groups owning any of the option ids, each holding only
    /// the requested options
    async fn get_list(&self, option_ids: &[i64], context: &ShopContext)
        -> Result<Vec<PropertyGroup>>;
}

/// The lookup services facet handlers resolve ids with
#[derive(Clone)]
pub struct StorefrontServices {
    pub categories: Arc<dyn CategoryService>,
    pub manufacturers: Arc<dyn ManufacturerService>,
    pub properties: Arc<dyn PropertyService>,
}

impl StorefrontServices {
    /// Services reading the relational store through `connection`
    pub fn dbal(connection: Arc<dyn DbalConnection>) -> Self {
        Self {
            categories: Arc::new(DbalCategoryService::new(connection.clone())),
            manufacturers: Arc::new(DbalManufacturerService::new(connection.clone())),
            properties: Arc::new(DbalPropertyService::new(connection)),
        }
    }
}
