//! Wavefront OBJ writer.
//!
//! Writes `v` records for points, `l` records for line cells and `f`
//! records for triangle and quad cells. Indices are 1-based. Volume cells
//! cannot be stored and attribute fields are not written.

use crate::io::MeshFileWriter;
use crate::io::error::FormatError;
use crate::io::mesh::{CellKind, Mesh};
use crate::io::options::WriteOptions;
use itertools::Itertools;
use std::io::Write;

const FORMAT: &str = "obj";

/// Wavefront OBJ encoder.
#[derive(Debug, Default, Clone)]
pub struct ObjWriter;

impl ObjWriter {
    fn record(kind: CellKind) -> Option<&'static str> {
        match kind {
            CellKind::Line => Some("l"),
            CellKind::Triangle | CellKind::Quad => Some("f"),
            CellKind::Tetra | CellKind::Hexahedron => None,
        }
    }
}

impl MeshFileWriter for ObjWriter {
    const FORMAT: &'static str = FORMAT;

    fn from_options(options: &WriteOptions) -> Result<Self, FormatError> {
        options.ensure_known(FORMAT, &[])?;
        Ok(Self)
    }

    fn check(&self, mesh: &Mesh) -> Result<(), FormatError> {
        for block in &mesh.cells {
            if Self::record(block.kind).is_none() {
                return Err(FormatError::UnsupportedCellKind {
                    format: FORMAT,
                    kind: block.kind,
                });
            }
        }
        if !mesh.point_data.is_empty() || !mesh.cell_data.is_empty() {
            log::warn!("obj output drops {} attribute field(s)", mesh.field_names().count());
        }
        Ok(())
    }

    fn write<W: Write>(&self, mut writer: W, mesh: &Mesh) -> Result<(), FormatError> {
        writeln!(writer, "# written by mesh-export")?;
        for [x, y, z] in &mesh.points {
            writeln!(writer, "v {x} {y} {z}")?;
        }
        for block in &mesh.cells {
            let record = Self::record(block.kind).ok_or(FormatError::UnsupportedCellKind {
                format: FORMAT,
                kind: block.kind,
            })?;
            for row in block.connectivity.rows() {
                writeln!(writer, "{record} {}", row.iter().map(|idx| idx + 1).join(" "))?;
            }
        }
        Ok(())
    }
}
