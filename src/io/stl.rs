//! STL writer for triangle surfaces.
//!
//! # Options
//! - `binary` (bool, default `false`): little-endian binary STL with an
//!   80-byte header instead of ASCII.
//!
//! Facet normals are recomputed from vertex winding. Only triangle cells
//! can be stored; attribute fields are dropped.

use crate::io::MeshFileWriter;
use crate::io::error::FormatError;
use crate::io::mesh::{CellKind, Mesh};
use crate::io::options::WriteOptions;
use bytes::{BufMut, BytesMut};
use std::io::Write;

const FORMAT: &str = "stl";
const SOLID_NAME: &str = "mesh-export";

/// STL encoder.
#[derive(Debug, Default, Clone)]
pub struct StlWriter {
    binary: bool,
}

type Facet = ([f64; 3], [[f64; 3]; 3]);

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn unit_normal(tri: &[[f64; 3]; 3]) -> [f64; 3] {
    let n = cross(sub(tri[1], tri[0]), sub(tri[2], tri[0]));
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > 0.0 {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0; 3]
    }
}

impl StlWriter {
    pub fn binary() -> Self {
        Self { binary: true }
    }

    fn point(mesh: &Mesh, idx: i64) -> Result<[f64; 3], FormatError> {
        usize::try_from(idx)
            .ok()
            .and_then(|i| mesh.points.get(i))
            .copied()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("triangle references missing point {idx}"),
                )
                .into()
            })
    }

    fn ensure_triangles(mesh: &Mesh) -> Result<(), FormatError> {
        match mesh.cells.iter().find(|b| b.kind != CellKind::Triangle) {
            Some(block) => Err(FormatError::UnsupportedCellKind {
                format: FORMAT,
                kind: block.kind,
            }),
            None => Ok(()),
        }
    }

    fn facets(mesh: &Mesh) -> Result<Vec<Facet>, FormatError> {
        Self::ensure_triangles(mesh)?;
        let mut facets = Vec::with_capacity(mesh.num_cells());
        for block in &mesh.cells {
            for row in block.connectivity.rows() {
                let mut tri = [[0.0; 3]; 3];
                for (corner, &idx) in tri.iter_mut().zip(row) {
                    *corner = Self::point(mesh, idx)?;
                }
                facets.push((unit_normal(&tri), tri));
            }
        }
        Ok(facets)
    }

    fn encode_binary(facets: &[Facet]) -> Result<BytesMut, FormatError> {
        let count = u32::try_from(facets.len()).map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, "too many facets for binary STL")
        })?;
        let mut buf = BytesMut::with_capacity(84 + facets.len() * 50);
        let mut header = [0u8; 80];
        header[..SOLID_NAME.len()].copy_from_slice(SOLID_NAME.as_bytes());
        buf.put_slice(&header);
        buf.put_u32_le(count);
        for (normal, tri) in facets {
            for v in std::iter::once(normal).chain(tri.iter()) {
                for &c in v {
                    buf.put_f32_le(c as f32);
                }
            }
            buf.put_u16_le(0);
        }
        Ok(buf)
    }
}

impl MeshFileWriter for StlWriter {
    const FORMAT: &'static str = FORMAT;

    fn from_options(options: &WriteOptions) -> Result<Self, FormatError> {
        options.ensure_known(FORMAT, &["binary"])?;
        Ok(Self {
            binary: options.bool_or(FORMAT, "binary", false)?,
        })
    }

    fn check(&self, mesh: &Mesh) -> Result<(), FormatError> {
        Self::ensure_triangles(mesh)?;
        for block in &mesh.cells {
            for &idx in block.connectivity.as_slice() {
                Self::point(mesh, idx)?;
            }
        }
        Ok(())
    }

    fn write<W: Write>(&self, mut writer: W, mesh: &Mesh) -> Result<(), FormatError> {
        let facets = Self::facets(mesh)?;
        if self.binary {
            writer.write_all(&Self::encode_binary(&facets)?)?;
            return Ok(());
        }
        writeln!(writer, "solid {SOLID_NAME}")?;
        for ([nx, ny, nz], tri) in &facets {
            writeln!(writer, "  facet normal {nx} {ny} {nz}")?;
            writeln!(writer, "    outer loop")?;
            for [x, y, z] in tri {
                writeln!(writer, "      vertex {x} {y} {z}")?;
            }
            writeln!(writer, "    endloop")?;
            writeln!(writer, "  endfacet")?;
        }
        writeln!(writer, "endsolid {SOLID_NAME}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::mesh::{CellBlock, Connectivity};

    fn triangle() -> Mesh {
        Mesh {
            points: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            cells: vec![CellBlock {
                kind: CellKind::Triangle,
                connectivity: Connectivity::new(3, vec![0, 1, 2]).unwrap(),
            }],
            ..Mesh::default()
        }
    }

    #[test]
    fn ascii_facet_has_unit_normal() {
        let mut out = Vec::new();
        StlWriter::default().write(&mut out, &triangle()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("solid mesh-export\n  facet normal 0 0 1\n"));
        assert!(text.contains("      vertex 0 1 0\n"));
        assert!(text.ends_with("endsolid mesh-export\n"));
    }

    #[test]
    fn binary_layout() {
        let mut out = Vec::new();
        StlWriter::binary().write(&mut out, &triangle()).unwrap();
        assert_eq!(out.len(), 84 + 50);
        assert_eq!(u32::from_le_bytes(out[80..84].try_into().unwrap()), 1);
        let nz = f32::from_le_bytes(out[92..96].try_into().unwrap());
        assert_eq!(nz, 1.0);
    }

    #[test]
    fn only_triangles() {
        let mut mesh = triangle();
        mesh.cells[0].kind = CellKind::Line;
        mesh.cells[0].connectivity = Connectivity::new(2, vec![0, 1]).unwrap();
        assert!(matches!(
            StlWriter::default().check(&mesh),
            Err(FormatError::UnsupportedCellKind { kind: CellKind::Line, .. })
        ));
    }

    #[test]
    fn dangling_indices_are_reported() {
        let mut mesh = triangle();
        mesh.cells[0].connectivity = Connectivity::new(3, vec![0, 1, 7]).unwrap();
        assert!(matches!(
            StlWriter::default().check(&mesh),
            Err(FormatError::Io(_))
        ));
        let mut out = Vec::new();
        assert!(matches!(
            StlWriter::default().write(&mut out, &mesh),
            Err(FormatError::Io(_))
        ));
        assert!(out.is_empty(), "nothing is emitted before the facets are built");
    }

    #[test]
    fn write_rejects_other_kinds_without_check() {
        let mut mesh = triangle();
        mesh.cells[0].kind = CellKind::Quad;
        mesh.cells[0].connectivity = Connectivity::new(4, vec![0, 1, 2, 0]).unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            StlWriter::binary().write(&mut out, &mesh),
            Err(FormatError::UnsupportedCellKind { kind: CellKind::Quad, .. })
        ));
        assert!(out.is_empty());
    }
}
