//! Result orderings

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    pub fn as_es(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SortingKind {
    ReleaseDate,
    Popularity,
    Price,
    ProductName,
    SearchRanking,
    Custom {
        #[serde(rename = "type")]
        kind: String,
        name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sorting {
    #[serde(flatten)]
    pub kind: SortingKind,
    #[serde(default)]
    pub direction: SortDirection,
}

impl Sorting {
    pub fn new(kind: SortingKind, direction: SortDirection) -> Self {
        Self { kind, direction }
    }

    pub fn asc(kind: SortingKind) -> Self {
        Self::new(kind, SortDirection::Asc)
    }

    pub fn desc(kind: SortingKind) -> Self {
        Self::new(kind, SortDirection::Desc)
    }

    pub fn name(&self) -> &str {
        match &self.kind {
            SortingKind::ReleaseDate => "release_date",
            SortingKind::Popularity => "popularity",
            SortingKind::Price => "price",
            SortingKind::ProductName => "product_name",
            SortingKind::SearchRanking => "search_ranking",
            SortingKind::Custom { name, .. } => name,
        }
    }

    pub fn kind_tag(&self) -> &str {
        match &self.kind {
            SortingKind::Custom { kind, .. } => kind,
            _ => self.name(),
        }
    }
}
