//! Tuple-shape validation of attribute arrays against a geometry.
//!
//! Preflight reports every mismatch as a warning, since upstream stages may
//! not have sized their arrays yet. Execution stops at the first mismatch.

use crate::data::geometry::NodeGeometry;
use crate::export::AttributeArray;
use crate::export::classify::cell_tuple_shape;
use crate::mesh_error::{
    CELL_SHAPE_WARNING_CODE, MeshExportError, POINT_SHAPE_WARNING_CODE,
};
use std::fmt;

/// Whether a diagnostic blocks execution.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Severity {
    Warning,
    Error,
}

/// A coded message produced by validation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: i32,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(code: i32, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }
}

impl From<&MeshExportError> for Diagnostic {
    fn from(err: &MeshExportError) -> Self {
        Diagnostic::error(err.code(), err.to_string())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{level} {}: {}", self.code, self.message)
    }
}

/// Collect advisory warnings for every array whose tuple shape differs from
/// the geometry's. Cell arrays are skipped for vertex-only geometry.
pub fn preflight_diagnostics(
    geometry: &NodeGeometry,
    cell_arrays: &[AttributeArray<'_>],
    point_arrays: &[AttributeArray<'_>],
) -> Vec<Diagnostic> {
    let mut warnings = Vec::new();

    match cell_tuple_shape(geometry) {
        Some(expected) => {
            for attr in cell_arrays {
                let found = attr.array.tuple_shape();
                if found != expected {
                    warnings.push(Diagnostic::warning(
                        CELL_SHAPE_WARNING_CODE,
                        format!(
                            "Cell data array '{}' has tuple dimensions {found:?} but the input geometry requires tuple dimensions {expected:?}.  This MAY still work if the pipeline does not know the actual number of cells yet.  This can happen if the geometry was created earlier in the pipeline.",
                            attr.path
                        ),
                    ));
                }
            }
        }
        None => ignore_cell_arrays(cell_arrays),
    }

    let expected = geometry.vertices().tuple_shape();
    for attr in point_arrays {
        let found = attr.array.tuple_shape();
        if found != expected {
            warnings.push(Diagnostic::warning(
                POINT_SHAPE_WARNING_CODE,
                format!(
                    "Point data array '{}' has tuple dimensions {found:?} but the input geometry point data requires tuple dimensions {expected:?}.  This MAY still work if the pipeline does not know the actual number of vertices yet.  This can happen if the geometry was created earlier in the pipeline.",
                    attr.path
                ),
            ));
        }
    }

    warnings
}

/// Fail on the first cell array, then the first point array, whose tuple
/// shape differs from the geometry's.
pub fn validate_for_execution(
    geometry: &NodeGeometry,
    cell_arrays: &[AttributeArray<'_>],
    point_arrays: &[AttributeArray<'_>],
) -> Result<(), MeshExportError> {
    match cell_tuple_shape(geometry) {
        Some(expected) => {
            if let Some(attr) = cell_arrays
                .iter()
                .find(|attr| attr.array.tuple_shape() != expected)
            {
                return Err(MeshExportError::CellTupleShapeMismatch {
                    path: attr.path.clone(),
                    found: attr.array.tuple_shape().to_vec(),
                    expected: expected.to_vec(),
                });
            }
        }
        None => ignore_cell_arrays(cell_arrays),
    }

    let expected = geometry.vertices().tuple_shape();
    if let Some(attr) = point_arrays
        .iter()
        .find(|attr| attr.array.tuple_shape() != expected)
    {
        return Err(MeshExportError::PointTupleShapeMismatch {
            path: attr.path.clone(),
            found: attr.array.tuple_shape().to_vec(),
            expected: expected.to_vec(),
        });
    }
    Ok(())
}

pub(crate) fn ignore_cell_arrays(cell_arrays: &[AttributeArray<'_>]) {
    if !cell_arrays.is_empty() {
        log::warn!(
            "vertex geometry has no cells; ignoring {} cell data array(s)",
            cell_arrays.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::array::{ArrayValues, DataArray};
    use crate::data::geometry::{TriangleGeom, VertexGeom};
    use crate::data::structure::DataPath;
    use crate::mesh_error::{CELL_SHAPE_ERROR_CODE, POINT_SHAPE_ERROR_CODE};

    fn scalar(name: &str, n: usize) -> DataArray {
        DataArray::try_new(name, vec![n], vec![1], ArrayValues::Float32(vec![0.0; n])).unwrap()
    }

    fn triangle() -> NodeGeometry {
        let verts =
            DataArray::try_new("V", vec![4], vec![3], ArrayValues::Float32(vec![0.0; 12])).unwrap();
        let faces = DataArray::try_new(
            "F",
            vec![2],
            vec![3],
            ArrayValues::UInt64(vec![0, 1, 2, 1, 3, 2]),
        )
        .unwrap();
        TriangleGeom::try_new(verts, faces).unwrap().into()
    }

    fn path(s: &str) -> DataPath {
        s.parse().unwrap()
    }

    #[test]
    fn matching_shapes_are_clean() {
        let geom = triangle();
        let (cp, pp) = (path("T/Cell/A"), path("T/Vertex/B"));
        let (ca, pa) = (scalar("A", 2), scalar("B", 4));
        let cells = [AttributeArray::new(&cp, &ca)];
        let points = [AttributeArray::new(&pp, &pa)];
        assert!(preflight_diagnostics(&geom, &cells, &points).is_empty());
        assert!(validate_for_execution(&geom, &cells, &points).is_ok());
    }

    #[test]
    fn preflight_accumulates_execution_stops_early() {
        let geom = triangle();
        let (p1, p2, p3) = (path("T/Cell/A"), path("T/Cell/B"), path("T/Vertex/C"));
        let (a, b, c) = (scalar("A", 3), scalar("B", 5), scalar("C", 1));
        let cells = [AttributeArray::new(&p1, &a), AttributeArray::new(&p2, &b)];
        let points = [AttributeArray::new(&p3, &c)];

        let warnings = preflight_diagnostics(&geom, &cells, &points);
        let codes: Vec<i32> = warnings.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![CELL_SHAPE_WARNING_CODE, CELL_SHAPE_WARNING_CODE, POINT_SHAPE_WARNING_CODE]
        );
        assert!(warnings.iter().all(|d| d.severity == Severity::Warning));
        assert!(warnings[0].message.contains("'T/Cell/A' has tuple dimensions [3]"));

        let err = validate_for_execution(&geom, &cells, &points).unwrap_err();
        assert_eq!(err.code(), CELL_SHAPE_ERROR_CODE);
        assert!(matches!(err, MeshExportError::CellTupleShapeMismatch { ref path, .. } if path.to_string() == "T/Cell/A"));

        let err = validate_for_execution(&geom, &[], &points).unwrap_err();
        assert_eq!(err.code(), POINT_SHAPE_ERROR_CODE);
        let diag = Diagnostic::from(&err);
        assert_eq!(diag.severity, Severity::Error);
        assert!(diag.to_string().starts_with("error -4011: Point data array 'T/Vertex/C'"));
    }

    #[test]
    fn vertex_geometry_skips_cell_checks() {
        let verts =
            DataArray::try_new("V", vec![3], vec![3], ArrayValues::Float64(vec![0.0; 9])).unwrap();
        let geom: NodeGeometry = VertexGeom::try_new(verts).unwrap().into();
        let p = path("P/Cell/X");
        let bogus = scalar("X", 17);
        let cells = [AttributeArray::new(&p, &bogus)];
        assert!(preflight_diagnostics(&geom, &cells, &[]).is_empty());
        assert!(validate_for_execution(&geom, &cells, &[]).is_ok());
    }
}
