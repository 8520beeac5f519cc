//! Mesh assembler: validated host data in, format-neutral [`Mesh`] out.

use crate::data::array::DataArray;
use crate::data::geometry::NodeGeometry;
use crate::export::AttributeArray;
use crate::export::classify::classify_cells;
use crate::export::validate::validate_for_execution;
use crate::io::mesh::{FieldArray, Mesh};
use crate::mesh_error::MeshExportError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Knobs for [`assemble`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct AssembleOptions {
    /// Strip every space from field names. Several formats reject names with spaces.
    #[serde(default)]
    pub collapse_name_spaces: bool,
}

/// Drop every size-1 axis.
pub fn squeeze_shape(shape: &[usize]) -> Vec<usize> {
    shape.iter().copied().filter(|&n| n != 1).collect()
}

/// Output key for an attribute array.
pub fn field_key(name: &str, collapse_name_spaces: bool) -> String {
    if collapse_name_spaces {
        name.replace(' ', "")
    } else {
        name.to_string()
    }
}

fn squeezed(array: &DataArray) -> FieldArray {
    FieldArray {
        shape: squeeze_shape(&array.shape()),
        values: array.values().clone(),
    }
}

fn collect_fields(
    arrays: &[AttributeArray<'_>],
    options: &AssembleOptions,
) -> BTreeMap<String, FieldArray> {
    let mut fields = BTreeMap::new();
    for attr in arrays {
        let key = field_key(attr.array.name(), options.collapse_name_spaces);
        // duplicate keys after collapsing are the caller's problem; last one wins
        fields.insert(key, squeezed(attr.array));
    }
    fields
}

/// Build the mesh for `geometry` and its attribute arrays.
///
/// Runs [`validate_for_execution`] first; any shape mismatch is returned
/// before a mesh is built.
pub fn assemble(
    geometry: &NodeGeometry,
    cell_arrays: &[AttributeArray<'_>],
    point_arrays: &[AttributeArray<'_>],
    options: &AssembleOptions,
) -> Result<Mesh, MeshExportError> {
    validate_for_execution(geometry, cell_arrays, point_arrays)?;

    let coords = geometry.vertices().values().to_f64_vec();
    let points: Vec<[f64; 3]> = coords
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();

    let (cells, cell_data) = match classify_cells(geometry)? {
        Some(block) => (vec![block], collect_fields(cell_arrays, options)),
        None => (Vec::new(), BTreeMap::new()),
    };
    let point_data = collect_fields(point_arrays, options);

    let mesh = Mesh {
        points,
        cells,
        cell_data,
        point_data,
    };
    log::debug!(
        "assembled {} mesh: {} points, {} cells, {} cell fields, {} point fields",
        geometry.geometry_type().name(),
        mesh.num_points(),
        mesh.num_cells(),
        mesh.cell_data.len(),
        mesh.point_data.len()
    );
    Ok(mesh)
}
