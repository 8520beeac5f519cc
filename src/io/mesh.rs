//! Format-neutral mesh handed to the encoders.
//!
//! A [`Mesh`] holds float64 points, at most one homogeneous cell block, and
//! named per-cell and per-point fields. Encoders only read it.

use crate::data::array::ArrayValues;
use crate::io::error::FormatError;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Homogeneous element topology of a cell block.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CellKind {
    Line,
    Triangle,
    Quad,
    Tetra,
    Hexahedron,
}

impl CellKind {
    /// Schema tag of the kind (`"line"`, `"triangle"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            CellKind::Line => "line",
            CellKind::Triangle => "triangle",
            CellKind::Quad => "quad",
            CellKind::Tetra => "tetra",
            CellKind::Hexahedron => "hexahedron",
        }
    }

    pub fn nodes_per_cell(self) -> usize {
        match self {
            CellKind::Line => 2,
            CellKind::Triangle => 3,
            CellKind::Quad | CellKind::Tetra => 4,
            CellKind::Hexahedron => 8,
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(CellKind::Line),
            "triangle" => Ok(CellKind::Triangle),
            "quad" => Ok(CellKind::Quad),
            "tetra" => Ok(CellKind::Tetra),
            "hexahedron" => Ok(CellKind::Hexahedron),
            other => Err(format!("unknown cell kind '{other}'")),
        }
    }
}

/// Row-major 2D table of node indices, one row per cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connectivity {
    nodes_per_cell: usize,
    indices: Vec<i64>,
}

impl Connectivity {
    /// Wrap a flat index buffer. `indices.len()` must be a multiple of `nodes_per_cell`.
    pub fn new(nodes_per_cell: usize, indices: Vec<i64>) -> Option<Self> {
        if nodes_per_cell == 0 || indices.len() % nodes_per_cell != 0 {
            return None;
        }
        Some(Self {
            nodes_per_cell,
            indices,
        })
    }

    #[inline]
    pub fn nodes_per_cell(&self) -> usize {
        self.nodes_per_cell
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.indices.len() / self.nodes_per_cell
    }

    /// `[rows, columns]` of the table.
    pub fn shape(&self) -> [usize; 2] {
        [self.num_cells(), self.nodes_per_cell]
    }

    #[inline]
    pub fn as_slice(&self) -> &[i64] {
        &self.indices
    }

    /// Iterate over the node indices of each cell.
    pub fn rows(&self) -> impl Iterator<Item = &[i64]> {
        self.indices.chunks_exact(self.nodes_per_cell)
    }
}

/// One `(kind, connectivity)` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellBlock {
    pub kind: CellKind,
    pub connectivity: Connectivity,
}

impl CellBlock {
    #[inline]
    pub fn len(&self) -> usize {
        self.connectivity.num_cells()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A field attached to points or cells, with degenerate axes already removed.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldArray {
    pub shape: Vec<usize>,
    pub values: ArrayValues,
}

impl FieldArray {
    /// Components per entity when this field spans `entities` points or cells.
    pub fn components_for(&self, name: &str, entities: usize) -> Result<usize, FormatError> {
        let values = self.values.len();
        if entities == 0 {
            if values == 0 {
                return Ok(self.shape.get(1..).map(|s| s.iter().product()).unwrap_or(1));
            }
        } else if values % entities == 0 && values > 0 {
            return Ok(values / entities);
        }
        Err(FormatError::FieldLength {
            name: name.to_string(),
            values,
            entities,
        })
    }
}

/// Mesh assembled for a single write call.
///
/// Field maps are keyed by output name and iterate in name order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub points: Vec<[f64; 3]>,
    pub cells: Vec<CellBlock>,
    pub cell_data: BTreeMap<String, FieldArray>,
    pub point_data: BTreeMap<String, FieldArray>,
}

impl Mesh {
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Total cells over all blocks.
    pub fn num_cells(&self) -> usize {
        self.cells.iter().map(CellBlock::len).sum()
    }

    /// All cell and point field names in one iterator.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.point_data
            .keys()
            .chain(self.cell_data.keys())
            .map(String::as_str)
    }
}

static_assertions::assert_impl_all!(Mesh: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_kind_tags_round_trip() {
        for kind in [
            CellKind::Line,
            CellKind::Triangle,
            CellKind::Quad,
            CellKind::Tetra,
            CellKind::Hexahedron,
        ] {
            assert_eq!(kind.as_str().parse::<CellKind>(), Ok(kind));
        }
        assert!("wedge".parse::<CellKind>().is_err());
    }

    #[test]
    fn connectivity_requires_whole_rows() {
        assert!(Connectivity::new(3, vec![0, 1]).is_none());
        assert!(Connectivity::new(0, vec![]).is_none());
        let conn = Connectivity::new(2, vec![0, 1, 1, 2]).unwrap();
        assert_eq!(conn.shape(), [2, 2]);
        assert_eq!(conn.rows().collect::<Vec<_>>(), vec![&[0, 1][..], &[1, 2][..]]);
    }

    #[test]
    fn component_count_follows_entity_count() {
        let field = FieldArray {
            shape: vec![2, 3],
            values: ArrayValues::Float32(vec![0.0; 6]),
        };
        assert_eq!(field.components_for("f", 2).unwrap(), 3);
        assert!(matches!(
            field.components_for("f", 4),
            Err(FormatError::FieldLength { values: 6, entities: 4, .. })
        ));
    }
}
