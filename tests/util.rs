#![allow(dead_code)]
use mesh_export::prelude::*;

pub const GEOMETRY: &str = "Triangle Geometry";
pub const EULER: &str = "Triangle Geometry/Vertex Data/Euler Angles";
pub const PHASES: &str = "Triangle Geometry/Face Data/Phase Ids";

pub fn path(s: &str) -> DataPath {
    s.parse().unwrap()
}

pub fn scalar_f32(name: &str, values: Vec<f32>) -> DataArray {
    let n = values.len();
    DataArray::try_new(name, vec![n], vec![1], ArrayValues::Float32(values)).unwrap()
}

/// Unit square split into two triangles: 4 vertices, 2 faces.
pub fn square_triangles() -> TriangleGeom {
    let vertices = DataArray::try_new(
        "Shared Vertex List",
        vec![4],
        vec![3],
        ArrayValues::Float32(vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            1.0, 1.0, 0.0,
        ]),
    )
    .unwrap();
    let faces = DataArray::try_new(
        "Shared Triangle List",
        vec![2],
        vec![3],
        ArrayValues::UInt64(vec![0, 1, 2, 1, 3, 2]),
    )
    .unwrap();
    TriangleGeom::try_new(vertices, faces).unwrap()
}

/// Store holding the triangle geometry, one point array and one cell array.
pub fn triangle_structure() -> DataStructure {
    let mut data = DataStructure::new();
    data.insert_geometry(path(GEOMETRY), square_triangles());
    data.insert_array(
        path(EULER),
        scalar_f32("Euler Angles", vec![0.5, 1.5, 2.5, 3.5]),
    );
    data.insert_array(
        path(PHASES),
        DataArray::try_new("Phase Ids", vec![2], vec![1], ArrayValues::Int32(vec![1, 2])).unwrap(),
    );
    data
}

/// Arguments selecting both attribute arrays of [`triangle_structure`].
pub fn triangle_args(output: impl Into<std::path::PathBuf>) -> MeshWriterArgs {
    let mut args = MeshWriterArgs::new(path(GEOMETRY), output);
    args.point_data_array_paths.push(path(EULER));
    args.cell_data_array_paths.push(path(PHASES));
    args.remove_array_name_spaces = true;
    args
}
