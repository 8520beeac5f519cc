//! Node-based geometries: vertex coordinates plus one connectivity table.
//!
//! Each geometry kind has its own struct and [`NodeGeometry`] closes over
//! them, so code dispatching on the kind is checked for exhaustiveness.

use crate::data::array::DataArray;
use crate::mesh_error::MeshExportError;

/// Declared type of a node geometry.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum GeometryType {
    Vertex,
    Edge,
    Triangle,
    Quad,
    Tetrahedral,
    Hexahedral,
}

impl GeometryType {
    pub fn name(self) -> &'static str {
        match self {
            GeometryType::Vertex => "vertex",
            GeometryType::Edge => "edge",
            GeometryType::Triangle => "triangle",
            GeometryType::Quad => "quad",
            GeometryType::Tetrahedral => "tetrahedral",
            GeometryType::Hexahedral => "hexahedral",
        }
    }

    /// Nodes per cell of the connectivity table; `None` for vertex-only geometry.
    pub fn nodes_per_cell(self) -> Option<usize> {
        match self {
            GeometryType::Vertex => None,
            GeometryType::Edge => Some(2),
            GeometryType::Triangle => Some(3),
            GeometryType::Quad | GeometryType::Tetrahedral => Some(4),
            GeometryType::Hexahedral => Some(8),
        }
    }
}

fn check_vertices(geometry: GeometryType, vertices: &DataArray) -> Result<(), MeshExportError> {
    if vertices.component_shape() != [3] {
        return Err(MeshExportError::InvalidGeometry {
            geometry: geometry.name(),
            reason: format!(
                "vertex array '{}' must have component shape [3], found {:?}",
                vertices.name(),
                vertices.component_shape()
            ),
        });
    }
    Ok(())
}

fn check_cells(geometry: GeometryType, cells: &DataArray) -> Result<(), MeshExportError> {
    let nodes = geometry.nodes_per_cell().unwrap_or(0);
    if cells.component_shape() != [nodes] {
        return Err(MeshExportError::InvalidGeometry {
            geometry: geometry.name(),
            reason: format!(
                "connectivity array '{}' must have component shape [{nodes}], found {:?}",
                cells.name(),
                cells.component_shape()
            ),
        });
    }
    if !cells.data_type().is_integer() {
        return Err(MeshExportError::InvalidGeometry {
            geometry: geometry.name(),
            reason: format!(
                "connectivity array '{}' must hold integers, found {:?}",
                cells.name(),
                cells.data_type()
            ),
        });
    }
    Ok(())
}

/// Point cloud: vertices only, no cell space.
#[derive(Clone, Debug, PartialEq)]
pub struct VertexGeom {
    vertices: DataArray,
}

impl VertexGeom {
    pub fn try_new(vertices: DataArray) -> Result<Self, MeshExportError> {
        check_vertices(GeometryType::Vertex, &vertices)?;
        Ok(Self { vertices })
    }

    #[inline]
    pub fn vertices(&self) -> &DataArray {
        &self.vertices
    }
}

/// Line segments between pairs of vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeGeom {
    vertices: DataArray,
    edges: DataArray,
}

impl EdgeGeom {
    pub fn try_new(vertices: DataArray, edges: DataArray) -> Result<Self, MeshExportError> {
        check_vertices(GeometryType::Edge, &vertices)?;
        check_cells(GeometryType::Edge, &edges)?;
        Ok(Self { vertices, edges })
    }

    #[inline]
    pub fn vertices(&self) -> &DataArray {
        &self.vertices
    }

    #[inline]
    pub fn edges(&self) -> &DataArray {
        &self.edges
    }
}

/// Triangulated surface.
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleGeom {
    vertices: DataArray,
    faces: DataArray,
}

impl TriangleGeom {
    pub fn try_new(vertices: DataArray, faces: DataArray) -> Result<Self, MeshExportError> {
        check_vertices(GeometryType::Triangle, &vertices)?;
        check_cells(GeometryType::Triangle, &faces)?;
        Ok(Self { vertices, faces })
    }

    #[inline]
    pub fn vertices(&self) -> &DataArray {
        &self.vertices
    }

    #[inline]
    pub fn faces(&self) -> &DataArray {
        &self.faces
    }
}

/// Quadrilateral surface.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadGeom {
    vertices: DataArray,
    faces: DataArray,
}

impl QuadGeom {
    pub fn try_new(vertices: DataArray, faces: DataArray) -> Result<Self, MeshExportError> {
        check_vertices(GeometryType::Quad, &vertices)?;
        check_cells(GeometryType::Quad, &faces)?;
        Ok(Self { vertices, faces })
    }

    #[inline]
    pub fn vertices(&self) -> &DataArray {
        &self.vertices
    }

    #[inline]
    pub fn faces(&self) -> &DataArray {
        &self.faces
    }
}

/// Tetrahedral volume mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct TetrahedralGeom {
    vertices: DataArray,
    polyhedra: DataArray,
}

impl TetrahedralGeom {
    pub fn try_new(vertices: DataArray, polyhedra: DataArray) -> Result<Self, MeshExportError> {
        check_vertices(GeometryType::Tetrahedral, &vertices)?;
        check_cells(GeometryType::Tetrahedral, &polyhedra)?;
        Ok(Self {
            vertices,
            polyhedra,
        })
    }

    #[inline]
    pub fn vertices(&self) -> &DataArray {
        &self.vertices
    }

    #[inline]
    pub fn polyhedra(&self) -> &DataArray {
        &self.polyhedra
    }
}

/// Hexahedral volume mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct HexahedralGeom {
    vertices: DataArray,
    polyhedra: DataArray,
}

impl HexahedralGeom {
    pub fn try_new(vertices: DataArray, polyhedra: DataArray) -> Result<Self, MeshExportError> {
        check_vertices(GeometryType::Hexahedral, &vertices)?;
        check_cells(GeometryType::Hexahedral, &polyhedra)?;
        Ok(Self {
            vertices,
            polyhedra,
        })
    }

    #[inline]
    pub fn vertices(&self) -> &DataArray {
        &self.vertices
    }

    #[inline]
    pub fn polyhedra(&self) -> &DataArray {
        &self.polyhedra
    }
}

/// Any node-based geometry held by the data store.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeGeometry {
    Vertex(VertexGeom),
    Edge(EdgeGeom),
    Triangle(TriangleGeom),
    Quad(QuadGeom),
    Tetrahedral(TetrahedralGeom),
    Hexahedral(HexahedralGeom),
}

impl NodeGeometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            NodeGeometry::Vertex(_) => GeometryType::Vertex,
            NodeGeometry::Edge(_) => GeometryType::Edge,
            NodeGeometry::Triangle(_) => GeometryType::Triangle,
            NodeGeometry::Quad(_) => GeometryType::Quad,
            NodeGeometry::Tetrahedral(_) => GeometryType::Tetrahedral,
            NodeGeometry::Hexahedral(_) => GeometryType::Hexahedral,
        }
    }

    /// Vertex coordinates, shared by every geometry kind.
    pub fn vertices(&self) -> &DataArray {
        match self {
            NodeGeometry::Vertex(g) => g.vertices(),
            NodeGeometry::Edge(g) => g.vertices(),
            NodeGeometry::Triangle(g) => g.vertices(),
            NodeGeometry::Quad(g) => g.vertices(),
            NodeGeometry::Tetrahedral(g) => g.vertices(),
            NodeGeometry::Hexahedral(g) => g.vertices(),
        }
    }

    #[inline]
    pub fn is_vertex_only(&self) -> bool {
        matches!(self, NodeGeometry::Vertex(_))
    }
}

impl From<VertexGeom> for NodeGeometry {
    fn from(g: VertexGeom) -> Self {
        NodeGeometry::Vertex(g)
    }
}

impl From<EdgeGeom> for NodeGeometry {
    fn from(g: EdgeGeom) -> Self {
        NodeGeometry::Edge(g)
    }
}

impl From<TriangleGeom> for NodeGeometry {
    fn from(g: TriangleGeom) -> Self {
        NodeGeometry::Triangle(g)
    }
}

impl From<QuadGeom> for NodeGeometry {
    fn from(g: QuadGeom) -> Self {
        NodeGeometry::Quad(g)
    }
}

impl From<TetrahedralGeom> for NodeGeometry {
    fn from(g: TetrahedralGeom) -> Self {
        NodeGeometry::Tetrahedral(g)
    }
}

impl From<HexahedralGeom> for NodeGeometry {
    fn from(g: HexahedralGeom) -> Self {
        NodeGeometry::Hexahedral(g)
    }
}
