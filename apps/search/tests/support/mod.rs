pub mod fixtures;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use storefront_model::{Category, Manufacturer, PropertyGroup, ShopContext};
use storefront_search::dbal::{BindValue, DbalConnection, SqlQuery};
use storefront_search::es::EsTransport;
use storefront_search::services::{
    CategoryService, ManufacturerService, PropertyService, StorefrontServices,
};
use storefront_search::Result;

pub use fixtures::*;

/// A query as it reached the connection
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

impl RecordedQuery {
    pub fn selects(&self, alias: &str) -> bool {
        self.sql.contains(&format!("AS \"{alias}\""))
    }
}

type Responder = Box<dyn Fn(&RecordedQuery) -> Vec<JsonValue> + Send + Sync>;

/// `DbalConnection` answering from a closure and recording every query
pub struct RecordingConnection {
    queries: Mutex<Vec<RecordedQuery>>,
    respond: Responder,
}

impl RecordingConnection {
    pub fn new(
        respond: impl Fn(&RecordedQuery) -> Vec<JsonValue> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            queries: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        })
    }

    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.queries.lock().unwrap().clone()
    }

    /// First recorded query selecting `alias`
    pub fn query_selecting(&self, alias: &str) -> Option<RecordedQuery> {
        self.queries().into_iter().find(|q| q.selects(alias))
    }
}

#[async_trait]
impl DbalConnection for RecordingConnection {
    async fn fetch_rows(&self, query: &SqlQuery) -> Result<Vec<JsonValue>> {
        let recorded = RecordedQuery {
            sql: query.to_sql(),
            binds: query.binds().to_vec(),
        };
        let rows = (self.respond)(&recorded);
        self.queries.lock().unwrap().push(recorded);
        Ok(rows)
    }
}

/// `EsTransport` returning one canned response and recording request bodies
pub struct FakeTransport {
    response: JsonValue,
    requests: Mutex<Vec<(String, JsonValue)>>,
}

impl FakeTransport {
    pub fn new(response: JsonValue) -> Arc<Self> {
        Arc::new(Self {
            response,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Body of the only request sent so far
    pub fn last_body(&self) -> JsonValue {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|(_, body)| body.clone())
            .expect("no request sent")
    }

    pub fn indices(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(index, _)| index.clone())
            .collect()
    }
}

#[async_trait]
impl EsTransport for FakeTransport {
    async fn search(&self, index: &str, body: &JsonValue) -> Result<JsonValue> {
        self.requests
            .lock()
            .unwrap()
            .push((index.to_string(), body.clone()));
        Ok(self.response.clone())
    }
}

/// Lookup services over fixed lists
#[derive(Default)]
pub struct MemoryCatalog {
    pub categories: Vec<Category>,
    pub manufacturers: Vec<Manufacturer>,
    pub property_groups: Vec<PropertyGroup>,
}

impl MemoryCatalog {
    pub fn into_services(self) -> StorefrontServices {
        let catalog = Arc::new(self);
        StorefrontServices {
            categories: catalog.clone(),
            manufacturers: catalog.clone(),
            properties: catalog,
        }
    }
}

#[async_trait]
impl CategoryService for MemoryCatalog {
    async fn get_list(&self, ids: &[i64], _context: &ShopContext) -> Result<Vec<Category>> {
        Ok(self
            .categories
            .iter()
            .filter(|c| ids.contains(&c.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ManufacturerService for MemoryCatalog {
    async fn get_list(&self, ids: &[i64], _context: &ShopContext) -> Result<Vec<Manufacturer>> {
        Ok(self
            .manufacturers
            .iter()
            .filter(|m| ids.contains(&m.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PropertyService for MemoryCatalog {
    async fn get_list(
        &self,
        option_ids: &[i64],
        _context: &ShopContext,
    ) -> Result<Vec<PropertyGroup>> {
        Ok(self
            .property_groups
            .iter()
            .filter_map(|group| {
                let options: Vec<_> = group
                    .options
                    .iter()
                    .filter(|o| option_ids.contains(&o.id))
                    .cloned()
                    .collect();
                (!options.is_empty()).then(|| PropertyGroup {
                    options,
                    ..group.clone()
                })
            })
            .collect())
    }
}

pub fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
