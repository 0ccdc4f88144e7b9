//! Search service
//!
//! Picks the configured backend, builds it with the core handlers and runs
//! searches with tracing and metrics around them.

use std::sync::Arc;
use std::time::Instant;

use storefront_model::{Criteria, ProductNumberSearchResult, ShopContext};
use tracing::Instrument;

use crate::config::{Config, SearchBackend};
use crate::criteria_factory::StoreFrontCriteriaFactory;
use crate::dbal::{
    self, DbalConnection, DbalProductNumberSearch, PgDbalConnection, QueryBuilderFactory,
};
use crate::error::Result;
use crate::es::{self, EsClient, EsHandlerProviders, EsProductNumberSearch, EsTransport};
use crate::metrics;
use crate::services::StorefrontServices;

/// One of the interchangeable search backends
pub enum ProductNumberSearch {
    Dbal(DbalProductNumberSearch),
    Elasticsearch(EsProductNumberSearch),
}

impl ProductNumberSearch {
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Dbal(_) => dbal::BACKEND,
            Self::Elasticsearch(_) => es::BACKEND,
        }
    }

    pub async fn search(
        &self,
        criteria: &Criteria,
        context: &ShopContext,
    ) -> Result<ProductNumberSearchResult> {
        match self {
            Self::Dbal(search) => search.search(criteria, context).await,
            Self::Elasticsearch(search) => search.search(criteria, context).await,
        }
    }
}

pub struct SearchService {
    search: ProductNumberSearch,
    criteria_factory: StoreFrontCriteriaFactory,
}

impl SearchService {
    pub fn new(search: ProductNumberSearch, criteria_factory: StoreFrontCriteriaFactory) -> Self {
        Self {
            search,
            criteria_factory,
        }
    }

    /// Service for the configured backend, with core handlers only.
    ///
    /// Lookup services always read the relational store, so a database pool
    /// is opened for either backend.
    pub async fn connect(config: &Config) -> Result<Self> {
        let connection: Arc<dyn DbalConnection> =
            Arc::new(PgDbalConnection::connect(&config.database).await?);
        let services = StorefrontServices::dbal(connection.clone());

        let search = match config.search.backend {
            SearchBackend::Dbal => Self::dbal_search(connection, &services, config),
            SearchBackend::Elasticsearch => {
                let transport: Arc<dyn EsTransport> =
                    Arc::new(EsClient::new(&config.elasticsearch)?);
                ProductNumberSearch::Elasticsearch(EsProductNumberSearch::with_core_handlers(
                    transport,
                    config,
                    &services,
                    &EsHandlerProviders::default(),
                ))
            }
        };

        tracing::info!(backend = search.backend(), "Search backend ready");
        Ok(Self::new(
            search,
            StoreFrontCriteriaFactory::new(config.search.clone(), Vec::new(), Vec::new()),
        ))
    }

    /// Relational backend with core handlers
    pub fn dbal_search(
        connection: Arc<dyn DbalConnection>,
        services: &StorefrontServices,
        config: &Config,
    ) -> ProductNumberSearch {
        ProductNumberSearch::Dbal(DbalProductNumberSearch::with_core_handlers(
            Arc::new(QueryBuilderFactory::default()),
            connection,
            services,
            Arc::new(config.labels.clone()),
            &[],
        ))
    }

    pub fn criteria_factory(&self) -> &StoreFrontCriteriaFactory {
        &self.criteria_factory
    }

    pub fn backend(&self) -> &'static str {
        self.search.backend()
    }

    pub async fn search(
        &self,
        criteria: &Criteria,
        context: &ShopContext,
    ) -> Result<ProductNumberSearchResult> {
        let backend = self.search.backend();
        let span = tracing::info_span!(
            "product_search",
            backend,
            shop_id = context.shop.id,
            conditions = criteria.conditions().count(),
            facets = criteria.facets().len(),
        );

        let started = Instant::now();
        let result = self.search.search(criteria, context).instrument(span).await;
        let elapsed = started.elapsed().as_secs_f64();

        match &result {
            Ok(found) => {
                metrics::record_search(backend, "ok", elapsed);
                tracing::debug!(
                    backend,
                    total = found.total,
                    products = found.products.len(),
                    facets = found.facets.len(),
                    "Search finished"
                );
            }
            Err(e) => {
                metrics::record_search(backend, e.kind(), elapsed);
                tracing::warn!(backend, error = %e, "Search failed");
            }
        }

        result
    }
}
