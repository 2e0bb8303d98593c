//! Errors raised while loading content.
use thiserror::Error;

/// Content catalog could not be loaded or is structurally unusable.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: String },
    #[error("skill {skill} depends on unknown skill {dependency}")]
    UnknownDependency { skill: String, dependency: String },
}
