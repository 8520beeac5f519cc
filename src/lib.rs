//! # mesh-export
//!
//! mesh-export writes node-based geometries and their attribute arrays to
//! standard unstructured mesh files (legacy VTK, VTU, Gmsh 2.2, OBJ, STL).
//!
//! ## Layout
//! - [`data`]: the host model. Typed [`DataArray`](data::array::DataArray)s,
//!   node geometries and a path-addressed [`DataStructure`](data::structure::DataStructure).
//! - [`export`]: classifies a geometry, validates attribute tuple shapes,
//!   assembles a format-neutral [`Mesh`](io::mesh::Mesh) and runs the
//!   preflight / execute pair.
//! - [`io`]: the mesh-format encoders and their option bags.
//! - [`mesh_error`]: the unified error type with stable numeric codes.
//!
//! ## Usage
//!
//! ```no_run
//! use mesh_export::prelude::*;
//! use std::sync::atomic::AtomicBool;
//!
//! # fn run(data: &DataStructure) -> Result<(), MeshExportError> {
//! let mut args = MeshWriterArgs::new("Triangle Geometry".parse()?, "out/mesh.vtu");
//! args.point_data_array_paths
//!     .push("Triangle Geometry/Vertex Data/Euler Angles".parse()?);
//! args.remove_array_name_spaces = true;
//!
//! let filter = MeshWriterFilter::new(args);
//! for warning in filter.preflight(data)?.warnings {
//!     eprintln!("{warning}");
//! }
//! filter.execute(data, &NullMessageHandler, &AtomicBool::new(false))?;
//! # Ok(())
//! # }
//! ```

pub mod data;
pub mod export;
pub mod io;
pub mod mesh_error;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::data::array::{ArrayValues, DataArray, DataType};
    pub use crate::data::geometry::{
        EdgeGeom, GeometryType, HexahedralGeom, NodeGeometry, QuadGeom, TetrahedralGeom,
        TriangleGeom, VertexGeom,
    };
    pub use crate::data::structure::{DataObject, DataPath, DataStructure};
    pub use crate::export::AttributeArray;
    pub use crate::export::assemble::{AssembleOptions, assemble};
    pub use crate::export::filter::{
        MeshWriterArgs, MeshWriterFilter, MessageHandler, NullMessageHandler, PreflightResult,
        write_mesh_file,
    };
    pub use crate::export::validate::{Diagnostic, Severity};
    pub use crate::io::error::FormatError;
    pub use crate::io::mesh::{CellBlock, CellKind, Connectivity, FieldArray, Mesh};
    pub use crate::io::options::{OptionValue, WriteOptions};
    pub use crate::io::{MeshFileWriter, MeshFormat, write_mesh};
    pub use crate::mesh_error::MeshExportError;
}
