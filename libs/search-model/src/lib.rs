//! Storefront search model
//!
//! Backend-agnostic types shared by every search backend:
//!
//! - `criteria`: conditions, facets, sortings and paging of a search
//! - `facet_result`: typed facet responses (value lists, trees, ranges)
//! - `structs`: hydrated storefront structs (media, properties, categories)
//! - `context`: the read-only shop snapshot a search runs in
//!
//! # Example
//!
//! ```rust
//! use storefront_model::{Condition, Criteria, Facet};
//!
//! let mut criteria = Criteria::new();
//! criteria
//!     .add_base_condition(Condition::category([5]))
//!     .unwrap()
//!     .add_condition(Condition::manufacturer([42]))
//!     .unwrap()
//!     .add_facet(Facet::manufacturer())
//!     .unwrap()
//!     .limit(Some(12));
//!
//! assert!(criteria.has_condition("manufacturer"));
//! assert!(criteria.has_base_condition("category"));
//! ```

pub mod condition;
pub mod context;
pub mod criteria;
pub mod error;
pub mod facet;
pub mod facet_result;
pub mod search_result;
pub mod sorting;
pub mod structs;

pub use condition::Condition;
pub use context::{Currency, CustomerGroup, Shop, ShopContext, SystemCategory};
pub use criteria::Criteria;
pub use error::{HydrationError, ModelError, Partition};
pub use facet::Facet;
pub use facet_result::{
    BooleanFacetResult, FacetResult, FacetResultGroup, RangeFacetResult, TreeFacetResult,
    TreeItem, ValueListFacetResult, ValueListItem, ValueListStyle,
};
pub use search_result::ProductNumberSearchResult;
pub use sorting::{SortDirection, Sorting, SortingKind};
pub use structs::{
    Attribute, Attributes, Category, Manufacturer, Media, MediaThumbnail, PropertyGroup,
    PropertyOption, SearchProduct,
};
