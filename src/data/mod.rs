//! Host data model: typed arrays, node geometries, and the store that owns them.
//!
//! The export layer only ever borrows from these types.

pub mod array;
pub mod geometry;
pub mod structure;
