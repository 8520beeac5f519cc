//! VTK XML unstructured grid (`.vtu`) writer.
//!
//! The document is produced with `quick_xml`, which escapes attribute
//! values such as field names. All `DataArray` payloads are written inline
//! in `ascii` format. The encoder takes no options.

use crate::data::array::{ArrayValues, DataType};
use crate::io::MeshFileWriter;
use crate::io::error::FormatError;
use crate::io::mesh::{CellKind, FieldArray, Mesh};
use crate::io::options::WriteOptions;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::collections::BTreeMap;
use std::io::Write;

const FORMAT: &str = "vtu";

/// VTK XML encoder.
#[derive(Debug, Default, Clone)]
pub struct VtuWriter;

fn xml_error(err: impl std::fmt::Display) -> FormatError {
    FormatError::Xml(err.to_string())
}

fn open<W: Write>(xml: &mut Writer<W>, elem: BytesStart<'_>) -> Result<(), FormatError> {
    xml.write_event(Event::Start(elem)).map_err(xml_error)
}

fn close<W: Write>(xml: &mut Writer<W>, name: &str) -> Result<(), FormatError> {
    xml.write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)
}

impl VtuWriter {
    fn vtk_cell_type(kind: CellKind) -> u8 {
        match kind {
            CellKind::Line => 3,
            CellKind::Triangle => 5,
            CellKind::Quad => 9,
            CellKind::Tetra => 10,
            CellKind::Hexahedron => 12,
        }
    }

    fn xml_type(data_type: DataType) -> &'static str {
        match data_type {
            DataType::Int8 => "Int8",
            DataType::UInt8 | DataType::Boolean => "UInt8",
            DataType::Int16 => "Int16",
            DataType::UInt16 => "UInt16",
            DataType::Int32 => "Int32",
            DataType::UInt32 => "UInt32",
            DataType::Int64 => "Int64",
            DataType::UInt64 => "UInt64",
            DataType::Float32 => "Float32",
            DataType::Float64 => "Float64",
        }
    }

    fn write_data_array<W: Write>(
        xml: &mut Writer<W>,
        name: Option<&str>,
        components: usize,
        values: &ArrayValues,
    ) -> Result<(), FormatError> {
        let mut elem = BytesStart::new("DataArray");
        elem.push_attribute(("type", Self::xml_type(values.data_type())));
        if let Some(name) = name {
            elem.push_attribute(("Name", name));
        }
        if components > 1 {
            elem.push_attribute(("NumberOfComponents", components.to_string().as_str()));
        }
        elem.push_attribute(("format", "ascii"));
        open(xml, elem)?;
        let text = values.to_string_vec().join(" ");
        xml.write_event(Event::Text(BytesText::new(&text)))
            .map_err(xml_error)?;
        close(xml, "DataArray")
    }

    fn write_fields<W: Write>(
        xml: &mut Writer<W>,
        tag: &str,
        fields: &BTreeMap<String, FieldArray>,
        entities: usize,
    ) -> Result<(), FormatError> {
        if fields.is_empty() {
            return Ok(());
        }
        open(xml, BytesStart::new(tag))?;
        for (name, field) in fields {
            let components = field.components_for(name, entities)?;
            Self::write_data_array(xml, Some(name.as_str()), components, &field.values)?;
        }
        close(xml, tag)
    }
}

impl MeshFileWriter for VtuWriter {
    const FORMAT: &'static str = FORMAT;

    fn from_options(options: &WriteOptions) -> Result<Self, FormatError> {
        options.ensure_known(FORMAT, &[])?;
        Ok(Self)
    }

    fn check(&self, mesh: &Mesh) -> Result<(), FormatError> {
        for (name, field) in &mesh.point_data {
            field.components_for(name, mesh.num_points())?;
        }
        for (name, field) in &mesh.cell_data {
            field.components_for(name, mesh.num_cells())?;
        }
        Ok(())
    }

    fn write<W: Write>(&self, writer: W, mesh: &Mesh) -> Result<(), FormatError> {
        let num_cells = mesh.num_cells();
        let mut xml = Writer::new_with_indent(writer, b' ', 2);
        xml.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))
            .map_err(xml_error)?;

        let mut root = BytesStart::new("VTKFile");
        root.push_attribute(("type", "UnstructuredGrid"));
        root.push_attribute(("version", "1.0"));
        root.push_attribute(("byte_order", "LittleEndian"));
        open(&mut xml, root)?;
        open(&mut xml, BytesStart::new("UnstructuredGrid"))?;

        let mut piece = BytesStart::new("Piece");
        piece.push_attribute(("NumberOfPoints", mesh.num_points().to_string().as_str()));
        piece.push_attribute(("NumberOfCells", num_cells.to_string().as_str()));
        open(&mut xml, piece)?;

        open(&mut xml, BytesStart::new("Points"))?;
        let coords: Vec<f64> = mesh.points.iter().flatten().copied().collect();
        Self::write_data_array(&mut xml, None, 3, &ArrayValues::Float64(coords))?;
        close(&mut xml, "Points")?;

        let mut connectivity = Vec::new();
        let mut offsets = Vec::with_capacity(num_cells);
        let mut types = Vec::with_capacity(num_cells);
        for block in &mesh.cells {
            for row in block.connectivity.rows() {
                connectivity.extend_from_slice(row);
                offsets.push(connectivity.len() as i64);
                types.push(Self::vtk_cell_type(block.kind));
            }
        }
        open(&mut xml, BytesStart::new("Cells"))?;
        for (name, values) in [
            ("connectivity", ArrayValues::Int64(connectivity)),
            ("offsets", ArrayValues::Int64(offsets)),
            ("types", ArrayValues::UInt8(types)),
        ] {
            Self::write_data_array(&mut xml, Some(name), 1, &values)?;
        }
        close(&mut xml, "Cells")?;

        Self::write_fields(&mut xml, "PointData", &mesh.point_data, mesh.num_points())?;
        Self::write_fields(&mut xml, "CellData", &mesh.cell_data, num_cells)?;

        close(&mut xml, "Piece")?;
        close(&mut xml, "UnstructuredGrid")?;
        close(&mut xml, "VTKFile")?;
        xml.into_inner().write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::mesh::{CellBlock, Connectivity};

    fn tetra_mesh() -> Mesh {
        Mesh {
            points: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ],
            cells: vec![CellBlock {
                kind: CellKind::Tetra,
                connectivity: Connectivity::new(4, vec![0, 1, 2, 3]).unwrap(),
            }],
            ..Mesh::default()
        }
    }

    fn render(mesh: &Mesh) -> String {
        let mut out = Vec::new();
        VtuWriter.write(&mut out, mesh).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn writes_cells_offsets_and_types() {
        let text = render(&tetra_mesh());
        assert!(text.starts_with("<?xml version=\"1.0\"?>"));
        assert!(text.contains("<Piece NumberOfPoints=\"4\" NumberOfCells=\"1\">"));
        assert!(text.contains(
            "<DataArray type=\"Float64\" NumberOfComponents=\"3\" format=\"ascii\">0 0 0 1 0 0 0 1 0 0 0 1</DataArray>"
        ));
        assert!(text.contains("Name=\"connectivity\" format=\"ascii\">0 1 2 3</DataArray>"));
        assert!(text.contains("Name=\"offsets\" format=\"ascii\">4</DataArray>"));
        assert!(text.contains("Name=\"types\" format=\"ascii\">10</DataArray>"));
        assert!(text.trim_end().ends_with("</VTKFile>"));
    }

    #[test]
    fn field_names_are_escaped() {
        let mut mesh = tetra_mesh();
        mesh.cell_data.insert(
            "Grain <Id> & \"phase\"".into(),
            FieldArray {
                shape: vec![],
                values: ArrayValues::Int32(vec![9]),
            },
        );
        let text = render(&mesh);
        assert!(text.contains("<CellData>"));
        assert!(text.contains("Name=\"Grain &lt;Id&gt; &amp; &quot;phase&quot;\""));
        assert!(text.contains("format=\"ascii\">9</DataArray>"));
        assert!(!text.contains("<Id>"));
    }

    #[test]
    fn takes_no_options() {
        assert!(VtuWriter::from_options(&WriteOptions::new()).is_ok());
        assert!(VtuWriter::from_options(&WriteOptions::new().with("binary", true)).is_err());
    }
}
