mod util;

use mesh_export::export::assemble::{field_key, squeeze_shape};
use mesh_export::export::validate::{preflight_diagnostics, validate_for_execution};
use mesh_export::prelude::*;
use proptest::prelude::*;
use util::*;

proptest! {
    #[test]
    fn squeeze_keeps_non_unit_axes_in_order(shape in prop::collection::vec(0usize..5, 0..6)) {
        let squeezed = squeeze_shape(&shape);
        prop_assert!(squeezed.iter().all(|&n| n != 1));
        let expected: Vec<usize> = shape.iter().copied().filter(|&n| n != 1).collect();
        prop_assert_eq!(&squeezed, &expected);
        prop_assert_eq!(
            squeezed.iter().product::<usize>(),
            shape.iter().product::<usize>()
        );
    }

    #[test]
    fn collapsed_names_lose_only_spaces(name in "[ a-zA-Z0-9_]{0,24}") {
        let key = field_key(&name, true);
        prop_assert!(!key.contains(' '));
        prop_assert_eq!(key.len(), name.len() - name.matches(' ').count());
        prop_assert_eq!(field_key(&name, false), name.clone());
        prop_assert_eq!(field_key(&key, true), key.clone());
    }

    #[test]
    fn one_warning_per_mismatched_array(
        cell_tuples in prop::collection::vec(1usize..5, 0..4),
        point_tuples in prop::collection::vec(2usize..7, 0..4),
    ) {
        let geom: NodeGeometry = square_triangles().into();
        let cell_arrays: Vec<DataArray> = cell_tuples
            .iter()
            .map(|&n| scalar_f32("c", vec![0.0; n]))
            .collect();
        let point_arrays: Vec<DataArray> = point_tuples
            .iter()
            .map(|&n| scalar_f32("p", vec![0.0; n]))
            .collect();
        let cp = path("T/Cell/c");
        let pp = path("T/Vertex/p");
        let cells: Vec<AttributeArray<'_>> =
            cell_arrays.iter().map(|a| AttributeArray::new(&cp, a)).collect();
        let points: Vec<AttributeArray<'_>> =
            point_arrays.iter().map(|a| AttributeArray::new(&pp, a)).collect();

        let warnings = preflight_diagnostics(&geom, &cells, &points);
        let bad_cells = cell_tuples.iter().filter(|&&n| n != 2).count();
        let bad_points = point_tuples.iter().filter(|&&n| n != 4).count();
        prop_assert_eq!(warnings.len(), bad_cells + bad_points);
        prop_assert!(warnings.iter().all(|w| w.severity == Severity::Warning));

        let executed = validate_for_execution(&geom, &cells, &points);
        prop_assert_eq!(executed.is_ok(), warnings.is_empty());
    }
}
