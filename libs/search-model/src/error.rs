//! Error types for the storefront model

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ModelError>;

/// Which collection of a criteria a name collision happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    BaseConditions,
    UserConditions,
    Facets,
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Partition::BaseConditions => "base conditions",
            Partition::UserConditions => "user conditions",
            Partition::Facets => "facets",
        };
        f.write_str(s)
    }
}

/// Errors raised while configuring criteria or hydrating structs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Duplicate name '{name}' in {partition}")]
    DuplicateName { partition: Partition, name: String },

    #[error(transparent)]
    Hydration(#[from] HydrationError),
}

/// Raw payload could not be turned into a struct
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HydrationError {
    #[error("Missing required field '{field}' while hydrating {entity}")]
    MissingField {
        entity: &'static str,
        field: String,
    },

    #[error("Field '{field}' of {entity} has an unexpected type: expected {expected}")]
    InvalidType {
        entity: &'static str,
        field: String,
        expected: &'static str,
    },

    #[error("Payload for {entity} is not an object")]
    NotAnObject { entity: &'static str },
}
