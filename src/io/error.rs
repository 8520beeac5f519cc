//! Errors raised by the mesh-format encoders.

use crate::io::mesh::CellKind;
use thiserror::Error;

/// Failure while encoding a mesh to a file format.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The format tag or file extension is not recognized.
    #[error("unknown mesh format '{0}'")]
    UnknownFormat(String),
    /// The format cannot represent cells of this kind.
    #[error("{format} cannot store '{kind}' cells")]
    UnsupportedCellKind {
        format: &'static str,
        kind: CellKind,
    },
    /// An option key is not recognized by the format, or its value has the wrong type.
    #[error("invalid {format} option '{key}': {reason}")]
    InvalidOption {
        format: &'static str,
        key: String,
        reason: String,
    },
    /// A field name cannot be written by the format.
    #[error("{format} field name '{name}' is not allowed: {reason}")]
    InvalidFieldName {
        format: &'static str,
        name: String,
        reason: &'static str,
    },
    /// A field's value count is not a multiple of the entity count it belongs to.
    #[error("field '{name}' has {values} values, not a multiple of {entities} entities")]
    FieldLength {
        name: String,
        values: usize,
        entities: usize,
    },
    /// A field's component count is not representable by the format.
    #[error("{format} cannot store field '{name}' with {components} components")]
    UnsupportedComponents {
        format: &'static str,
        name: String,
        components: usize,
    },
    /// The XML document could not be emitted.
    #[error("xml encoding failed: {0}")]
    Xml(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
