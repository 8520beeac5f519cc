//! MeshExportError: Unified error type for mesh-export public APIs
//!
//! Validation failures are raised locally with stable negative codes so
//! callers can tell diagnostic classes apart. Failures of the mesh-format
//! layer are carried through unchanged.

use crate::data::array::DataType;
use crate::data::structure::DataPath;
use crate::io::error::FormatError;
use thiserror::Error;

/// Unified error type for mesh-export operations.
#[derive(Debug, Error)]
pub enum MeshExportError {
    /// A cell attribute array does not match the geometry's cell tuple shape.
    #[error(
        "Cell data array '{path}' has tuple dimensions {found:?} but the input geometry requires tuple dimensions {expected:?}."
    )]
    CellTupleShapeMismatch {
        path: DataPath,
        found: Vec<usize>,
        expected: Vec<usize>,
    },
    /// A point attribute array does not match the geometry's vertex tuple shape.
    #[error(
        "Point data array '{path}' has tuple dimensions {found:?} but the input geometry point data requires tuple dimensions {expected:?}."
    )]
    PointTupleShapeMismatch {
        path: DataPath,
        found: Vec<usize>,
        expected: Vec<usize>,
    },
    /// No object is stored at the requested path.
    #[error("no object found at path '{0}'")]
    ObjectNotFound(DataPath),
    /// The object at `path` exists but is not of the requested kind.
    #[error("object at path '{path}' is not a {expected}")]
    WrongObjectType {
        path: DataPath,
        expected: &'static str,
    },
    /// A path string could not be parsed.
    #[error("invalid data path '{0}'")]
    InvalidDataPath(String),
    /// Buffer length does not match the declared tuple and component shapes.
    #[error("array '{name}' declares {expected} values but holds {found}")]
    ArrayLengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    /// The element count implied by the shapes does not fit in `usize`.
    #[error(
        "array '{name}' shape {tuple_shape:?} x {component_shape:?} overflows the addressable element count"
    )]
    ShapeOverflow {
        name: String,
        tuple_shape: Vec<usize>,
        component_shape: Vec<usize>,
    },
    /// A geometry was built from arrays that violate its layout rules.
    #[error("invalid {geometry} geometry: {reason}")]
    InvalidGeometry {
        geometry: &'static str,
        reason: String,
    },
    /// Values of `data_type` cannot be converted to the requested element type.
    #[error("cannot convert {data_type:?} values to {target}")]
    UnsupportedConversion {
        data_type: DataType,
        target: &'static str,
    },
    /// A connectivity index does not fit in a signed 64-bit integer.
    #[error("connectivity index {0} does not fit in i64")]
    IndexOverflow(u64),
    /// The requested file format tag is not known, or could not be inferred.
    #[error("unknown mesh file format '{0}'")]
    UnknownFileFormat(String),
    /// Execution was canceled before the file was written.
    #[error("mesh export canceled before writing")]
    Canceled,
    /// Failure raised by a mesh-format encoder.
    #[error(transparent)]
    Format(#[from] FormatError),
}

impl MeshExportError {
    /// Stable numeric code for this error class.
    pub fn code(&self) -> i32 {
        match self {
            MeshExportError::ObjectNotFound(_) => -4001,
            MeshExportError::WrongObjectType { .. } => -4002,
            MeshExportError::InvalidDataPath(_) => -4003,
            MeshExportError::ArrayLengthMismatch { .. } => -4004,
            MeshExportError::InvalidGeometry { .. } => -4005,
            MeshExportError::UnsupportedConversion { .. } => -4006,
            MeshExportError::IndexOverflow(_) => -4007,
            MeshExportError::ShapeOverflow { .. } => -4008,
            MeshExportError::CellTupleShapeMismatch { .. } => CELL_SHAPE_ERROR_CODE,
            MeshExportError::PointTupleShapeMismatch { .. } => POINT_SHAPE_ERROR_CODE,
            MeshExportError::UnknownFileFormat(_) => -4020,
            MeshExportError::Canceled => -4030,
            MeshExportError::Format(_) => -4050,
        }
    }
}

/// Error code for a cell array whose tuple shape differs from the geometry's cells.
pub const CELL_SHAPE_ERROR_CODE: i32 = -4010;
/// Error code for a point array whose tuple shape differs from the geometry's vertices.
pub const POINT_SHAPE_ERROR_CODE: i32 = -4011;
/// Warning code for a cell array shape mismatch found during preflight.
pub const CELL_SHAPE_WARNING_CODE: i32 = -3010;
/// Warning code for a point array shape mismatch found during preflight.
pub const POINT_SHAPE_WARNING_CODE: i32 = -3011;
