//! Facet results
//!
//! Typed responses rendered as filter UI: value lists, category trees,
//! price ranges, boolean toggles and groups of nested results.

use crate::structs::{Attributes, Media};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueListItem {
    pub id: i64,
    pub label: String,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
}

impl ValueListItem {
    pub fn new(id: i64, label: impl Into<String>, active: bool, attributes: Attributes) -> Self {
        Self {
            id,
            label: label.into(),
            active,
            attributes,
            media: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueListStyle {
    #[default]
    Text,
    /// Items carry media (e.g. color swatches)
    Media,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueListFacetResult {
    pub facet_name: String,
    pub active: bool,
    pub label: String,
    pub values: Vec<ValueListItem>,
    /// Request parameter that selects values of this facet
    pub field_name: String,
    #[serde(default)]
    pub style: ValueListStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeItem {
    pub id: i64,
    pub label: String,
    pub active: bool,
    pub values: Vec<TreeItem>,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeFacetResult {
    pub facet_name: String,
    pub field_name: String,
    pub active: bool,
    pub label: String,
    pub values: Vec<TreeItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeFacetResult {
    pub facet_name: String,
    pub active: bool,
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub active_min: f64,
    pub active_max: f64,
    pub min_field_name: String,
    pub max_field_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanFacetResult {
    pub facet_name: String,
    pub field_name: String,
    pub active: bool,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetResultGroup {
    pub facet_name: String,
    pub active: bool,
    pub label: String,
    pub facet_results: Vec<FacetResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FacetResult {
    ValueList(ValueListFacetResult),
    Tree(TreeFacetResult),
    Range(RangeFacetResult),
    Boolean(BooleanFacetResult),
    Group(FacetResultGroup),
}

impl FacetResult {
    pub fn facet_name(&self) -> &str {
        match self {
            Self::ValueList(r) => &r.facet_name,
            Self::Tree(r) => &r.facet_name,
            Self::Range(r) => &r.facet_name,
            Self::Boolean(r) => &r.facet_name,
            Self::Group(r) => &r.facet_name,
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Self::ValueList(r) => r.active,
            Self::Tree(r) => r.active,
            Self::Range(r) => r.active,
            Self::Boolean(r) => r.active,
            Self::Group(r) => r.active,
        }
    }

    pub fn as_value_list(&self) -> Option<&ValueListFacetResult> {
        match self {
            Self::ValueList(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&TreeFacetResult> {
        match self {
            Self::Tree(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_range(&self) -> Option<&RangeFacetResult> {
        match self {
            Self::Range(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&FacetResultGroup> {
        match self {
            Self::Group(r) => Some(r),
            _ => None,
        }
    }
}
