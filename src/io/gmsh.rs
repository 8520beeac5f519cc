//! Gmsh `.msh` writer.
//!
//! # Supported format
//! - ASCII `.msh` version **2.2**.
//! - Element types: 1 (line), 2 (triangle), 3 (quad), 4 (tet), 5 (hex).
//! - Point fields go to `$NodeData`, cell fields to `$ElementData`.
//!
//! # Limitations
//! - Binary files are not written.
//! - Field component counts must be 1 (scalar), 3 (vector) or 9 (tensor).
//! - Every element is tagged with physical and elementary entity `1`.

use crate::io::MeshFileWriter;
use crate::io::error::FormatError;
use crate::io::mesh::{CellKind, FieldArray, Mesh};
use crate::io::options::WriteOptions;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::io::Write;

const FORMAT: &str = "gmsh";

/// Gmsh ASCII v2.2 encoder.
#[derive(Debug, Default, Clone)]
pub struct GmshWriter;

impl GmshWriter {
    fn element_type(kind: CellKind) -> u32 {
        match kind {
            CellKind::Line => 1,
            CellKind::Triangle => 2,
            CellKind::Quad => 3,
            CellKind::Tetra => 4,
            CellKind::Hexahedron => 5,
        }
    }

    fn check_fields(fields: &BTreeMap<String, FieldArray>, entities: usize) -> Result<(), FormatError> {
        for (name, field) in fields {
            if name.contains('"') || name.contains('\n') {
                return Err(FormatError::InvalidFieldName {
                    format: FORMAT,
                    name: name.clone(),
                    reason: "view names cannot contain quotes or line breaks",
                });
            }
            let components = field.components_for(name, entities)?;
            if !matches!(components, 1 | 3 | 9) {
                return Err(FormatError::UnsupportedComponents {
                    format: FORMAT,
                    name: name.clone(),
                    components,
                });
            }
        }
        Ok(())
    }

    fn write_data_section<W: Write>(
        writer: &mut W,
        section: &str,
        fields: &BTreeMap<String, FieldArray>,
        entities: usize,
    ) -> Result<(), FormatError> {
        for (name, field) in fields {
            let components = field.components_for(name, entities)?;
            writeln!(writer, "${section}")?;
            // string tags: view name
            writeln!(writer, "1")?;
            writeln!(writer, "\"{name}\"")?;
            // real tags: time value
            writeln!(writer, "1")?;
            writeln!(writer, "0.0")?;
            // integer tags: time step, components, entity count
            writeln!(writer, "3")?;
            writeln!(writer, "0")?;
            writeln!(writer, "{components}")?;
            writeln!(writer, "{entities}")?;
            let values = field.values.to_string_vec();
            for (idx, row) in values.chunks(components.max(1)).enumerate() {
                writeln!(writer, "{} {}", idx + 1, row.join(" "))?;
            }
            writeln!(writer, "$End{section}")?;
        }
        Ok(())
    }
}

impl MeshFileWriter for GmshWriter {
    const FORMAT: &'static str = FORMAT;

    fn from_options(options: &WriteOptions) -> Result<Self, FormatError> {
        options.ensure_known(FORMAT, &[])?;
        Ok(Self)
    }

    fn check(&self, mesh: &Mesh) -> Result<(), FormatError> {
        Self::check_fields(&mesh.point_data, mesh.num_points())?;
        Self::check_fields(&mesh.cell_data, mesh.num_cells())
    }

    fn write<W: Write>(&self, mut writer: W, mesh: &Mesh) -> Result<(), FormatError> {
        writeln!(writer, "$MeshFormat")?;
        writeln!(writer, "2.2 0 8")?;
        writeln!(writer, "$EndMeshFormat")?;

        writeln!(writer, "$Nodes")?;
        writeln!(writer, "{}", mesh.num_points())?;
        for (idx, [x, y, z]) in mesh.points.iter().enumerate() {
            writeln!(writer, "{} {x} {y} {z}", idx + 1)?;
        }
        writeln!(writer, "$EndNodes")?;

        writeln!(writer, "$Elements")?;
        writeln!(writer, "{}", mesh.num_cells())?;
        let mut elem_id = 0usize;
        for block in &mesh.cells {
            let elem_type = Self::element_type(block.kind);
            for row in block.connectivity.rows() {
                elem_id += 1;
                writeln!(
                    writer,
                    "{elem_id} {elem_type} 2 1 1 {}",
                    row.iter().map(|idx| idx + 1).join(" ")
                )?;
            }
        }
        writeln!(writer, "$EndElements")?;

        Self::write_data_section(&mut writer, "NodeData", &mesh.point_data, mesh.num_points())?;
        Self::write_data_section(&mut writer, "ElementData", &mesh.cell_data, mesh.num_cells())?;
        Ok(())
    }
}
