//! Legacy VTK (`.vtk`) writer for unstructured grids.
//!
//! Writes version 4.2 `UNSTRUCTURED_GRID` datasets. Point and cell fields
//! are stored as `FIELD` arrays under `POINT_DATA` / `CELL_DATA`, which keeps
//! multi-component and integer fields intact.
//!
//! # Options
//! - `binary` (bool, default `true`): big-endian binary payloads instead of ASCII.
//! - `title` (string): header comment line, at most 255 characters.
//!
//! # Limitations
//! - Connectivity indices must fit in `i32`.
//! - Field names may not contain whitespace; collapse them upstream.

use crate::data::array::{ArrayValues, DataType};
use crate::io::MeshFileWriter;
use crate::io::error::FormatError;
use crate::io::mesh::{CellKind, FieldArray, Mesh};
use crate::io::options::WriteOptions;
use bytes::{BufMut, BytesMut};
use itertools::Itertools;
use std::collections::BTreeMap;
use std::io::Write;

const FORMAT: &str = "vtk";
const DEFAULT_TITLE: &str = "written by mesh-export";

/// Legacy VTK encoder.
#[derive(Debug, Clone)]
pub struct VtkWriter {
    binary: bool,
    title: String,
}

impl Default for VtkWriter {
    fn default() -> Self {
        Self {
            binary: true,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl VtkWriter {
    /// Encoder producing ASCII payloads.
    pub fn ascii() -> Self {
        Self {
            binary: false,
            ..Self::default()
        }
    }

    pub fn is_binary(&self) -> bool {
        self.binary
    }

    fn vtk_cell_type(kind: CellKind) -> i32 {
        match kind {
            CellKind::Line => 3,
            CellKind::Triangle => 5,
            CellKind::Quad => 9,
            CellKind::Tetra => 10,
            CellKind::Hexahedron => 12,
        }
    }

    fn vtk_data_type(data_type: DataType) -> &'static str {
        match data_type {
            DataType::Int8 => "char",
            DataType::UInt8 | DataType::Boolean => "unsigned_char",
            DataType::Int16 => "short",
            DataType::UInt16 => "unsigned_short",
            DataType::Int32 => "int",
            DataType::UInt32 => "unsigned_int",
            DataType::Int64 => "vtktypeint64",
            DataType::UInt64 => "vtktypeuint64",
            DataType::Float32 => "float",
            DataType::Float64 => "double",
        }
    }

    fn connectivity_index(idx: i64) -> Result<i32, FormatError> {
        i32::try_from(idx).map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("connectivity index {idx} does not fit in a legacy VTK cell list"),
            )
            .into()
        })
    }

    fn encode_be(values: &ArrayValues) -> BytesMut {
        let mut buf = BytesMut::with_capacity(values.len() * 8);
        match values {
            ArrayValues::Int8(v) => v.iter().for_each(|&x| buf.put_i8(x)),
            ArrayValues::UInt8(v) => v.iter().for_each(|&x| buf.put_u8(x)),
            ArrayValues::Int16(v) => v.iter().for_each(|&x| buf.put_i16(x)),
            ArrayValues::UInt16(v) => v.iter().for_each(|&x| buf.put_u16(x)),
            ArrayValues::Int32(v) => v.iter().for_each(|&x| buf.put_i32(x)),
            ArrayValues::UInt32(v) => v.iter().for_each(|&x| buf.put_u32(x)),
            ArrayValues::Int64(v) => v.iter().for_each(|&x| buf.put_i64(x)),
            ArrayValues::UInt64(v) => v.iter().for_each(|&x| buf.put_u64(x)),
            ArrayValues::Float32(v) => v.iter().for_each(|&x| buf.put_f32(x)),
            ArrayValues::Float64(v) => v.iter().for_each(|&x| buf.put_f64(x)),
            ArrayValues::Boolean(v) => v.iter().for_each(|&x| buf.put_u8(u8::from(x))),
        }
        buf
    }

    fn write_wrapped<W: Write>(writer: &mut W, values: &[String]) -> Result<(), FormatError> {
        let mut line_len = 0usize;
        for value in values {
            if line_len > 0 && line_len + value.len() + 1 > 70 {
                writeln!(writer)?;
                line_len = 0;
            }
            if line_len > 0 {
                write!(writer, " ")?;
                line_len += 1;
            }
            write!(writer, "{value}")?;
            line_len += value.len();
        }
        writeln!(writer)?;
        Ok(())
    }

    fn write_values<W: Write>(&self, writer: &mut W, values: &ArrayValues) -> Result<(), FormatError> {
        if self.binary {
            writer.write_all(&Self::encode_be(values))?;
            writeln!(writer)?;
            Ok(())
        } else {
            Self::write_wrapped(writer, &values.to_string_vec())
        }
    }

    fn write_fields<W: Write>(
        &self,
        writer: &mut W,
        section: &str,
        fields: &BTreeMap<String, FieldArray>,
        entities: usize,
    ) -> Result<(), FormatError> {
        if fields.is_empty() {
            return Ok(());
        }
        writeln!(writer, "{section} {entities}")?;
        writeln!(writer, "FIELD FieldData {}", fields.len())?;
        for (name, field) in fields {
            let components = field.components_for(name, entities)?;
            let tuples = if components == 0 {
                0
            } else {
                field.values.len() / components
            };
            writeln!(
                writer,
                "{name} {components} {tuples} {}",
                Self::vtk_data_type(field.values.data_type())
            )?;
            self.write_values(writer, &field.values)?;
        }
        Ok(())
    }

    fn check_field_name(name: &str) -> Result<(), FormatError> {
        if name.is_empty() {
            return Err(FormatError::InvalidFieldName {
                format: FORMAT,
                name: name.to_string(),
                reason: "name is empty",
            });
        }
        if name.chars().any(char::is_whitespace) {
            return Err(FormatError::InvalidFieldName {
                format: FORMAT,
                name: name.to_string(),
                reason: "legacy VTK field names cannot contain whitespace",
            });
        }
        Ok(())
    }
}

impl MeshFileWriter for VtkWriter {
    const FORMAT: &'static str = FORMAT;

    fn from_options(options: &WriteOptions) -> Result<Self, FormatError> {
        options.ensure_known(FORMAT, &["binary", "title"])?;
        let binary = options.bool_or(FORMAT, "binary", true)?;
        let title = options.str_or(FORMAT, "title", DEFAULT_TITLE)?;
        if title.contains('\n') || title.len() > 255 {
            return Err(FormatError::InvalidOption {
                format: FORMAT,
                key: "title".to_string(),
                reason: "title must be a single line of at most 255 characters".to_string(),
            });
        }
        Ok(Self {
            binary,
            title: title.to_string(),
        })
    }

    fn check(&self, mesh: &Mesh) -> Result<(), FormatError> {
        for (name, field) in &mesh.point_data {
            Self::check_field_name(name)?;
            field.components_for(name, mesh.num_points())?;
        }
        for (name, field) in &mesh.cell_data {
            Self::check_field_name(name)?;
            field.components_for(name, mesh.num_cells())?;
        }
        for block in &mesh.cells {
            for &idx in block.connectivity.as_slice() {
                Self::connectivity_index(idx)?;
            }
        }
        Ok(())
    }

    fn write<W: Write>(&self, mut writer: W, mesh: &Mesh) -> Result<(), FormatError> {
        writeln!(writer, "# vtk DataFile Version 4.2")?;
        writeln!(writer, "{}", self.title)?;
        writeln!(writer, "{}", if self.binary { "BINARY" } else { "ASCII" })?;
        writeln!(writer, "DATASET UNSTRUCTURED_GRID")?;

        writeln!(writer, "POINTS {} double", mesh.num_points())?;
        if self.binary {
            let coords: Vec<f64> = mesh.points.iter().flatten().copied().collect();
            self.write_values(&mut writer, &ArrayValues::Float64(coords))?;
        } else {
            for [x, y, z] in &mesh.points {
                writeln!(writer, "{x} {y} {z}")?;
            }
        }

        let num_cells = mesh.num_cells();
        let total_size: usize = mesh
            .cells
            .iter()
            .map(|block| block.len() * (block.connectivity.nodes_per_cell() + 1))
            .sum();
        writeln!(writer, "CELLS {num_cells} {total_size}")?;
        if self.binary {
            let mut list = Vec::with_capacity(total_size);
            for block in &mesh.cells {
                for row in block.connectivity.rows() {
                    list.push(row.len() as i32);
                    for &idx in row {
                        list.push(Self::connectivity_index(idx)?);
                    }
                }
            }
            self.write_values(&mut writer, &ArrayValues::Int32(list))?;
        } else {
            for block in &mesh.cells {
                for row in block.connectivity.rows() {
                    writeln!(writer, "{} {}", row.len(), row.iter().join(" "))?;
                }
            }
        }

        writeln!(writer, "CELL_TYPES {num_cells}")?;
        let types: Vec<i32> = mesh
            .cells
            .iter()
            .flat_map(|block| std::iter::repeat_n(Self::vtk_cell_type(block.kind), block.len()))
            .collect();
        if self.binary {
            self.write_values(&mut writer, &ArrayValues::Int32(types))?;
        } else {
            for vtk_type in &types {
                writeln!(writer, "{vtk_type}")?;
            }
        }

        self.write_fields(&mut writer, "POINT_DATA", &mesh.point_data, mesh.num_points())?;
        self.write_fields(&mut writer, "CELL_DATA", &mesh.cell_data, num_cells)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::mesh::{CellBlock, Connectivity};

    fn segment_mesh() -> Mesh {
        let mut mesh = Mesh {
            points: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.5, 0.0]],
            cells: vec![CellBlock {
                kind: CellKind::Line,
                connectivity: Connectivity::new(2, vec![0, 1, 1, 2]).unwrap(),
            }],
            ..Mesh::default()
        };
        mesh.point_data.insert(
            "Temperature".into(),
            FieldArray {
                shape: vec![3],
                values: ArrayValues::Float32(vec![1.5, 2.0, 2.5]),
            },
        );
        mesh.cell_data.insert(
            "Ids".into(),
            FieldArray {
                shape: vec![2],
                values: ArrayValues::Int32(vec![7, 8]),
            },
        );
        mesh
    }

    #[test]
    fn ascii_layout() {
        let mut out = Vec::new();
        VtkWriter::ascii().write(&mut out, &segment_mesh()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# vtk DataFile Version 4.2");
        assert_eq!(lines[2], "ASCII");
        assert_eq!(lines[4], "POINTS 3 double");
        assert_eq!(lines[6], "1 0 0");
        assert!(text.contains("CELLS 2 6\n2 0 1\n2 1 2\n"));
        assert!(text.contains("CELL_TYPES 2\n3\n3\n"));
        assert!(text.contains("POINT_DATA 3\nFIELD FieldData 1\nTemperature 1 3 float\n1.5 2 2.5\n"));
        assert!(text.contains("CELL_DATA 2\nFIELD FieldData 1\nIds 1 2 int\n7 8\n"));
    }

    #[test]
    fn binary_payload_is_big_endian() {
        let mut out = Vec::new();
        VtkWriter::default().write(&mut out, &segment_mesh()).unwrap();
        let header = b"POINTS 3 double\n";
        let start = out
            .windows(header.len())
            .position(|w| w == header)
            .unwrap()
            + header.len();
        // second point, x coordinate
        let x = f64::from_be_bytes(out[start + 24..start + 32].try_into().unwrap());
        assert_eq!(x, 1.0);
    }

    #[test]
    fn whitespace_in_field_names_is_rejected() {
        let mut mesh = segment_mesh();
        let field = mesh.point_data.remove("Temperature").unwrap();
        mesh.point_data.insert("Euler Angles".into(), field);
        let err = VtkWriter::ascii().check(&mesh).unwrap_err();
        assert!(matches!(err, FormatError::InvalidFieldName { .. }));
    }

    #[test]
    fn options_are_validated() {
        let opts = WriteOptions::new().with("binary", false).with("title", "demo");
        let writer = VtkWriter::from_options(&opts).unwrap();
        assert!(!writer.is_binary());
        assert!(VtkWriter::from_options(&WriteOptions::new().with("compression", 3i64)).is_err());
        assert!(VtkWriter::from_options(&WriteOptions::new().with("title", "a\nb")).is_err());
    }
}
