//! Errors raised at the scene boundary.

use thiserror::Error;

use crate::material::MaterialId;

/// Errors that can occur when resolving the material of a hit.
///
/// The tracer recovers from these locally by rendering a diagnostic color.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    #[error("Hit surface carries no material")]
    Missing,

    #[error("Material {0:?} is not in the catalog")]
    Unknown(MaterialId),
}
