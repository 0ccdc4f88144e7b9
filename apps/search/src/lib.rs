//! Storefront search
//!
//! Turns storefront requests into product searches with facets:
//! - criteria built from request parameters (`criteria_factory`)
//! - two interchangeable backends compiling criteria into SQL (`dbal`) or an
//!   Elasticsearch request (`es`), each dispatching to registered handlers
//! - facet values computed from reverted criteria (`reversion`)
//! - raw rows and documents hydrated into storefront structs (`hydrator`)

#![allow(
    clippy::too_many_arguments,      // Handler constructors take their collaborators explicitly
    clippy::large_enum_variant,      // Backends are built once per process
)]

pub mod config;
pub mod criteria_factory;
pub mod dbal;
pub mod error;
pub mod es;
pub mod facet_results;
pub mod handler;
pub mod hydrator;
pub mod logging;
pub mod metrics;
pub mod request;
pub mod reversion;
pub mod search;
pub mod services;

#[cfg(test)]
mod test_fixtures;

pub use config::Config;
pub use criteria_factory::{CriteriaExtension, CriteriaRequestHandler, StoreFrontCriteriaFactory};
pub use error::{Error, Result};
pub use handler::{HandlerProvider, HandlerRegistry, Supports};
pub use hydrator::StructHydrator;
pub use request::RequestParams;
pub use reversion::{revert, RevertedCriteria};
pub use search::{ProductNumberSearch, SearchService};
