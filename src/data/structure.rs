//! Path-addressed store of geometries and attribute arrays.

use crate::data::array::DataArray;
use crate::data::geometry::NodeGeometry;
use crate::mesh_error::MeshExportError;
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// `/`-separated location of an object in a [`DataStructure`].
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DataPath(Vec<String>);

impl DataPath {
    /// Build a path from its segments. Empty paths and segments are rejected.
    pub fn try_from_segments<I, S>(segments: I) -> Result<Self, MeshExportError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(|s| s.is_empty() || s.contains('/')) {
            return Err(MeshExportError::InvalidDataPath(segments.join("/")));
        }
        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Last path segment, i.e. the object's own name.
    pub fn target_name(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or_default()
    }

    /// Append a child segment.
    pub fn try_join(&self, child: &str) -> Result<Self, MeshExportError> {
        Self::try_from_segments(self.0.iter().map(String::as_str).chain([child]))
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("/"))
    }
}

impl FromStr for DataPath {
    type Err = MeshExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(MeshExportError::InvalidDataPath(s.to_string()));
        }
        Self::try_from_segments(s.split('/')).map_err(|_| MeshExportError::InvalidDataPath(s.to_string()))
    }
}

impl Serialize for DataPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DataPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Object stored in a [`DataStructure`].
#[derive(Clone, Debug, PartialEq)]
pub enum DataObject {
    Geometry(NodeGeometry),
    Array(DataArray),
}

/// Flat store of geometries and arrays keyed by [`DataPath`].
#[derive(Clone, Debug, Default)]
pub struct DataStructure {
    objects: BTreeMap<DataPath, DataObject>,
}

impl DataStructure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a geometry, returning whatever previously lived at `path`.
    pub fn insert_geometry(
        &mut self,
        path: DataPath,
        geometry: impl Into<NodeGeometry>,
    ) -> Option<DataObject> {
        self.objects
            .insert(path, DataObject::Geometry(geometry.into()))
    }

    /// Store an array, returning whatever previously lived at `path`.
    pub fn insert_array(&mut self, path: DataPath, array: DataArray) -> Option<DataObject> {
        self.objects.insert(path, DataObject::Array(array))
    }

    pub fn get(&self, path: &DataPath) -> Option<&DataObject> {
        self.objects.get(path)
    }

    pub fn contains(&self, path: &DataPath) -> bool {
        self.objects.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Look up a geometry by path.
    pub fn geometry(&self, path: &DataPath) -> Result<&NodeGeometry, MeshExportError> {
        match self.get(path) {
            Some(DataObject::Geometry(geometry)) => Ok(geometry),
            Some(DataObject::Array(_)) => Err(MeshExportError::WrongObjectType {
                path: path.clone(),
                expected: "geometry",
            }),
            None => Err(MeshExportError::ObjectNotFound(path.clone())),
        }
    }

    /// Look up an array by path.
    pub fn array(&self, path: &DataPath) -> Result<&DataArray, MeshExportError> {
        match self.get(path) {
            Some(DataObject::Array(array)) => Ok(array),
            Some(DataObject::Geometry(_)) => Err(MeshExportError::WrongObjectType {
                path: path.clone(),
                expected: "data array",
            }),
            None => Err(MeshExportError::ObjectNotFound(path.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::array::ArrayValues;
    use crate::data::geometry::VertexGeom;

    #[test]
    fn path_parses_and_displays() {
        let path: DataPath = "Mesh/Vertex Data/Euler Angles".parse().unwrap();
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.target_name(), "Euler Angles");
        assert_eq!(path.to_string(), "Mesh/Vertex Data/Euler Angles");
    }

    #[test]
    fn empty_segments_are_rejected() {
        assert!("".parse::<DataPath>().is_err());
        assert!("a//b".parse::<DataPath>().is_err());
        assert!("a/".parse::<DataPath>().is_err());
        let root: DataPath = "a".parse().unwrap();
        assert!(root.try_join("b/c").is_err());
        assert_eq!(root.try_join("b").unwrap().to_string(), "a/b");
    }

    #[test]
    fn typed_lookups_report_kind_errors() {
        let mut ds = DataStructure::new();
        let geom_path: DataPath = "Geom".parse().unwrap();
        let arr_path: DataPath = "Geom/Ids".parse().unwrap();
        let verts =
            DataArray::try_new("V", vec![1], vec![3], ArrayValues::Float32(vec![0.0; 3])).unwrap();
        ds.insert_geometry(geom_path.clone(), VertexGeom::try_new(verts).unwrap());
        ds.insert_array(
            arr_path.clone(),
            DataArray::try_new("Ids", vec![1], vec![1], ArrayValues::Int32(vec![4])).unwrap(),
        );

        assert_eq!(ds.len(), 2);
        assert!(!ds.is_empty());
        assert!(ds.contains(&arr_path));
        assert!(matches!(ds.get(&geom_path), Some(DataObject::Geometry(_))));

        assert!(ds.geometry(&geom_path).is_ok());
        assert!(ds.array(&arr_path).is_ok());
        assert!(matches!(
            ds.array(&geom_path),
            Err(MeshExportError::WrongObjectType { expected: "data array", .. })
        ));
        let missing: DataPath = "Nope".parse().unwrap();
        assert!(!ds.contains(&missing));
        assert!(ds.get(&missing).is_none());
        assert!(matches!(
            ds.geometry(&missing),
            Err(MeshExportError::ObjectNotFound(_))
        ));
    }

    #[test]
    fn path_serializes_as_string() {
        let path: DataPath = "A/B".parse().unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"A/B\"");
        let back: DataPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
        assert!(serde_json::from_str::<DataPath>("\"\"").is_err());
    }
}
