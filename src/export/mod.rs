//! Export of node geometries and their attribute arrays to mesh files.
//!
//! The pipeline is: [`classify`] the geometry, [`validate`] attribute tuple
//! shapes, [`assemble`] a format-neutral mesh, then hand it to
//! [`crate::io::write_mesh`]. [`filter`] wires these steps to a
//! [`DataStructure`](crate::data::structure::DataStructure) as a preflight /
//! execute pair.

pub mod assemble;
pub mod classify;
pub mod filter;
pub mod validate;

use crate::data::array::DataArray;
use crate::data::structure::DataPath;

/// Borrowed attribute array together with the path it was found at.
///
/// The path is only used to label diagnostics.
#[derive(Clone, Copy, Debug)]
pub struct AttributeArray<'a> {
    pub path: &'a DataPath,
    pub array: &'a DataArray,
}

impl<'a> AttributeArray<'a> {
    pub fn new(path: &'a DataPath, array: &'a DataArray) -> Self {
        Self { path, array }
    }
}
