//! Mesh file encoders.
//!
//! This module turns a format-neutral [`Mesh`] into one of several on-disk
//! formats. Encoders are selected by a format tag or inferred from the file
//! extension, and take a [`WriteOptions`] bag whose keys each encoder
//! validates for itself.

pub mod error;
pub mod gmsh;
pub mod mesh;
pub mod obj;
pub mod options;
pub mod stl;
pub mod vtk;
pub mod vtu;

use crate::io::error::FormatError;
use crate::io::mesh::Mesh;
use crate::io::options::WriteOptions;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

/// Supported output formats.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MeshFormat {
    /// Legacy VTK `UNSTRUCTURED_GRID`.
    Vtk,
    /// VTK XML unstructured grid.
    Vtu,
    /// Gmsh `.msh` version 2.2.
    Gmsh,
    /// Wavefront OBJ.
    Obj,
    /// Stereolithography.
    Stl,
}

impl MeshFormat {
    pub const ALL: [MeshFormat; 5] = [
        MeshFormat::Vtk,
        MeshFormat::Vtu,
        MeshFormat::Gmsh,
        MeshFormat::Obj,
        MeshFormat::Stl,
    ];

    /// Canonical tag of the format.
    pub fn tag(self) -> &'static str {
        match self {
            MeshFormat::Vtk => "vtk",
            MeshFormat::Vtu => "vtu",
            MeshFormat::Gmsh => "gmsh",
            MeshFormat::Obj => "obj",
            MeshFormat::Stl => "stl",
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            MeshFormat::Gmsh => "msh",
            other => other.tag(),
        }
    }

    /// Infer the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, FormatError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| FormatError::UnknownFormat(path.display().to_string()))?;
        Self::ALL
            .into_iter()
            .find(|f| f.extension() == ext)
            .ok_or(FormatError::UnknownFormat(ext))
    }
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for MeshFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vtk" => Ok(MeshFormat::Vtk),
            "vtu" => Ok(MeshFormat::Vtu),
            "gmsh" | "gmsh22" | "msh" => Ok(MeshFormat::Gmsh),
            "obj" => Ok(MeshFormat::Obj),
            "stl" => Ok(MeshFormat::Stl),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Trait for encoders that serialize a [`Mesh`].
pub trait MeshFileWriter: Sized {
    /// Tag used in diagnostics.
    const FORMAT: &'static str;

    /// Build the encoder from an option bag, rejecting unknown keys.
    fn from_options(options: &WriteOptions) -> Result<Self, FormatError>;

    /// Check that the mesh can be represented before any output is produced.
    fn check(&self, _mesh: &Mesh) -> Result<(), FormatError> {
        Ok(())
    }

    /// Write mesh data to a writer.
    fn write<W: Write>(&self, writer: W, mesh: &Mesh) -> Result<(), FormatError>;
}

fn write_with<E: MeshFileWriter>(
    path: &Path,
    mesh: &Mesh,
    options: &WriteOptions,
) -> Result<(), FormatError> {
    let encoder = E::from_options(options)?;
    encoder.check(mesh)?;
    log::debug!(
        "encoding {} points / {} cells as {} to {}",
        mesh.num_points(),
        mesh.num_cells(),
        E::FORMAT,
        path.display()
    );
    let mut file = BufWriter::new(File::create(path)?);
    encoder.write(&mut file, mesh)?;
    file.flush()?;
    Ok(())
}

/// Encode `mesh` as `format` into the file at `path`.
///
/// Options and format support are checked before the file is created.
pub fn write_mesh(
    path: &Path,
    mesh: &Mesh,
    format: MeshFormat,
    options: &WriteOptions,
) -> Result<(), FormatError> {
    match format {
        MeshFormat::Vtk => write_with::<vtk::VtkWriter>(path, mesh, options),
        MeshFormat::Vtu => write_with::<vtu::VtuWriter>(path, mesh, options),
        MeshFormat::Gmsh => write_with::<gmsh::GmshWriter>(path, mesh, options),
        MeshFormat::Obj => write_with::<obj::ObjWriter>(path, mesh, options),
        MeshFormat::Stl => write_with::<stl::StlWriter>(path, mesh, options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn tags_and_extensions_resolve() {
        assert_eq!("VTK".parse::<MeshFormat>().unwrap(), MeshFormat::Vtk);
        assert_eq!("gmsh22".parse::<MeshFormat>().unwrap(), MeshFormat::Gmsh);
        assert!("exodus".parse::<MeshFormat>().is_err());
        assert_eq!(
            MeshFormat::from_path(&PathBuf::from("out/mesh.MSH")).unwrap(),
            MeshFormat::Gmsh
        );
        assert!(MeshFormat::from_path(&PathBuf::from("out/mesh")).is_err());
        assert!(MeshFormat::from_path(&PathBuf::from("out/mesh.xyz")).is_err());
    }
}
