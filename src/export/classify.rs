//! Geometry classifier: maps a geometry kind to its cell table and schema tag.

use crate::data::array::DataArray;
use crate::data::geometry::NodeGeometry;
use crate::io::mesh::{CellBlock, CellKind, Connectivity};
use crate::mesh_error::MeshExportError;

/// The cell kind and connectivity table of a geometry.
///
/// Returns `None` for vertex-only geometry, which has no cell space.
pub fn cell_table(geometry: &NodeGeometry) -> Option<(CellKind, &DataArray)> {
    match geometry {
        NodeGeometry::Vertex(_) => None,
        NodeGeometry::Edge(g) => Some((CellKind::Line, g.edges())),
        NodeGeometry::Triangle(g) => Some((CellKind::Triangle, g.faces())),
        NodeGeometry::Quad(g) => Some((CellKind::Quad, g.faces())),
        NodeGeometry::Tetrahedral(g) => Some((CellKind::Tetra, g.polyhedra())),
        NodeGeometry::Hexahedral(g) => Some((CellKind::Hexahedron, g.polyhedra())),
    }
}

/// Tuple shape of the geometry's cell space.
pub fn cell_tuple_shape(geometry: &NodeGeometry) -> Option<&[usize]> {
    cell_table(geometry).map(|(_, table)| table.tuple_shape())
}

/// Build the single cell block of a geometry, with indices widened to `i64`.
pub fn classify_cells(geometry: &NodeGeometry) -> Result<Option<CellBlock>, MeshExportError> {
    let Some((kind, table)) = cell_table(geometry) else {
        return Ok(None);
    };
    let indices = table.values().to_i64_vec()?;
    let connectivity = Connectivity::new(kind.nodes_per_cell(), indices).ok_or_else(|| {
        MeshExportError::InvalidGeometry {
            geometry: geometry.geometry_type().name(),
            reason: format!(
                "connectivity array '{}' does not hold whole {kind} cells",
                table.name()
            ),
        }
    })?;
    Ok(Some(CellBlock { kind, connectivity }))
}
