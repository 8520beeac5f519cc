//! Preflight / execute entry points for writing a geometry to a mesh file.
//!
//! A [`MeshWriterFilter`] is configured by [`MeshWriterArgs`] (which can be
//! loaded with serde) and runs against a [`DataStructure`]:
//!
//! - [`MeshWriterFilter::preflight`] resolves every path and the output
//!   format, and reports tuple-shape mismatches as warnings.
//! - [`MeshWriterFilter::execute`] re-validates with hard errors, assembles
//!   the mesh, checks for cancellation once, and writes the file.
//!
//! Nothing is written when validation fails.

use crate::data::geometry::NodeGeometry;
use crate::data::structure::{DataPath, DataStructure};
use crate::export::AttributeArray;
use crate::export::assemble::{AssembleOptions, assemble};
use crate::export::validate::{Diagnostic, preflight_diagnostics};
use crate::io::options::WriteOptions;
use crate::io::{MeshFormat, write_mesh};
use crate::mesh_error::MeshExportError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Receives human-readable progress messages.
pub trait MessageHandler {
    fn message(&self, text: &str);
}

impl<F: Fn(&str)> MessageHandler for F {
    fn message(&self, text: &str) {
        self(text)
    }
}

/// Discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullMessageHandler;

impl MessageHandler for NullMessageHandler {
    fn message(&self, _text: &str) {}
}

/// Configuration of one mesh export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshWriterArgs {
    pub input_geometry_path: DataPath,
    #[serde(default)]
    pub cell_data_array_paths: Vec<DataPath>,
    #[serde(default)]
    pub point_data_array_paths: Vec<DataPath>,
    pub output_file_path: PathBuf,
    /// Format tag; inferred from `output_file_path` when absent.
    #[serde(default)]
    pub file_format: Option<String>,
    #[serde(default)]
    pub remove_array_name_spaces: bool,
    #[serde(default)]
    pub write_options: WriteOptions,
}

impl MeshWriterArgs {
    pub fn new(input_geometry_path: DataPath, output_file_path: impl Into<PathBuf>) -> Self {
        Self {
            input_geometry_path,
            cell_data_array_paths: Vec::new(),
            point_data_array_paths: Vec::new(),
            output_file_path: output_file_path.into(),
            file_format: None,
            remove_array_name_spaces: false,
            write_options: WriteOptions::default(),
        }
    }
}

/// Outcome of a successful preflight.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PreflightResult {
    pub warnings: Vec<Diagnostic>,
}

impl PreflightResult {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

struct Resolved<'a> {
    geometry: &'a NodeGeometry,
    cell_arrays: Vec<AttributeArray<'a>>,
    point_arrays: Vec<AttributeArray<'a>>,
}

fn resolve_arrays<'a>(
    data: &'a DataStructure,
    paths: &'a [DataPath],
) -> Result<Vec<AttributeArray<'a>>, MeshExportError> {
    paths
        .iter()
        .map(|path| -> Result<_, MeshExportError> {
            Ok(AttributeArray::new(path, data.array(path)?))
        })
        .collect()
}

/// Writes a node geometry and selected attribute arrays to a mesh file.
#[derive(Clone, Debug)]
pub struct MeshWriterFilter {
    args: MeshWriterArgs,
}

impl MeshWriterFilter {
    pub fn new(args: MeshWriterArgs) -> Self {
        Self { args }
    }

    pub fn args(&self) -> &MeshWriterArgs {
        &self.args
    }

    /// Output format, from the explicit tag or the output file extension.
    pub fn format(&self) -> Result<MeshFormat, MeshExportError> {
        match &self.args.file_format {
            Some(tag) => tag
                .parse()
                .map_err(|_| MeshExportError::UnknownFileFormat(tag.clone())),
            None => MeshFormat::from_path(&self.args.output_file_path).map_err(|_| {
                MeshExportError::UnknownFileFormat(self.args.output_file_path.display().to_string())
            }),
        }
    }

    fn assemble_options(&self) -> AssembleOptions {
        AssembleOptions {
            collapse_name_spaces: self.args.remove_array_name_spaces,
        }
    }

    fn resolve<'a>(&'a self, data: &'a DataStructure) -> Result<Resolved<'a>, MeshExportError> {
        Ok(Resolved {
            geometry: data.geometry(&self.args.input_geometry_path)?,
            cell_arrays: resolve_arrays(data, &self.args.cell_data_array_paths)?,
            point_arrays: resolve_arrays(data, &self.args.point_data_array_paths)?,
        })
    }

    /// Dry run: resolve inputs and collect advisory shape warnings.
    pub fn preflight(&self, data: &DataStructure) -> Result<PreflightResult, MeshExportError> {
        self.format()?;
        let resolved = self.resolve(data)?;
        let warnings =
            preflight_diagnostics(resolved.geometry, &resolved.cell_arrays, &resolved.point_arrays);
        for warning in &warnings {
            log::warn!("{warning}");
        }
        Ok(PreflightResult { warnings })
    }

    /// Validate, assemble and write the mesh file.
    pub fn execute(
        &self,
        data: &DataStructure,
        messages: &dyn MessageHandler,
        should_cancel: &AtomicBool,
    ) -> Result<(), MeshExportError> {
        let format = self.format()?;
        let resolved = self.resolve(data)?;
        messages.message(&format!(
            "Writing '{}' as {format} to {}",
            self.args.input_geometry_path,
            self.args.output_file_path.display()
        ));
        write_mesh_file(
            format,
            resolved.geometry,
            &resolved.cell_arrays,
            &resolved.point_arrays,
            &self.args.output_file_path,
            &self.assemble_options(),
            &self.args.write_options,
            should_cancel,
        )?;
        messages.message("Mesh file written");
        Ok(())
    }
}

/// Assemble and write in one call.
///
/// Validation errors are returned before the output path is touched. The
/// cancellation flag is read once, after assembly and before the write,
/// which itself cannot be interrupted.
#[allow(clippy::too_many_arguments)]
pub fn write_mesh_file(
    format: MeshFormat,
    geometry: &NodeGeometry,
    cell_arrays: &[AttributeArray<'_>],
    point_arrays: &[AttributeArray<'_>],
    output_path: &Path,
    assemble_options: &AssembleOptions,
    write_options: &WriteOptions,
    should_cancel: &AtomicBool,
) -> Result<(), MeshExportError> {
    let mesh = assemble(geometry, cell_arrays, point_arrays, assemble_options)?;
    if should_cancel.load(Ordering::Relaxed) {
        log::info!("mesh export canceled before writing {}", output_path.display());
        return Err(MeshExportError::Canceled);
    }
    write_mesh(output_path, &mesh, format, write_options)?;
    log::info!(
        "wrote {} points and {} cells to {}",
        mesh.num_points(),
        mesh.num_cells(),
        output_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(file: &str) -> MeshWriterArgs {
        MeshWriterArgs::new("Geom".parse().unwrap(), file)
    }

    #[test]
    fn format_from_tag_or_extension() {
        let mut a = args("out/mesh.vtu");
        assert_eq!(MeshWriterFilter::new(a.clone()).format().unwrap(), MeshFormat::Vtu);
        a.file_format = Some("stl".into());
        assert_eq!(MeshWriterFilter::new(a.clone()).format().unwrap(), MeshFormat::Stl);
        a.file_format = Some("abaqus".into());
        assert!(matches!(
            MeshWriterFilter::new(a).format(),
            Err(MeshExportError::UnknownFileFormat(ref t)) if t == "abaqus"
        ));
        assert!(MeshWriterFilter::new(args("out/mesh")).format().is_err());
    }

    #[test]
    fn closures_are_message_handlers() {
        let seen = std::cell::RefCell::new(Vec::new());
        let handler = |text: &str| seen.borrow_mut().push(text.to_string());
        handler.message("hello");
        NullMessageHandler.message("dropped");
        assert_eq!(seen.into_inner(), vec!["hello".to_string()]);
    }

    #[test]
    fn args_load_from_json() {
        let json = r#"{
            "input_geometry_path": "Triangle Geometry",
            "point_data_array_paths": ["Triangle Geometry/Vertex Data/Euler Angles"],
            "output_file_path": "/tmp/out.vtk",
            "remove_array_name_spaces": true,
            "write_options": {"binary": false}
        }"#;
        let args: MeshWriterArgs = serde_json::from_str(json).unwrap();
        assert_eq!(args.input_geometry_path.to_string(), "Triangle Geometry");
        assert!(args.cell_data_array_paths.is_empty());
        assert_eq!(args.point_data_array_paths[0].target_name(), "Euler Angles");
        assert!(args.remove_array_name_spaces);
        assert!(args.file_format.is_none());
        assert_eq!(
            args.write_options,
            WriteOptions::new().with("binary", false)
        );
    }
}
