use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One regular file as seen during a scan. Build-time only, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub name: String,
    pub path: String,
    /// Lowercased extension including the dot, or empty.
    pub ext: String,
    pub mtime: i64,
    pub size: u64,
}

/// Catalogued document derived from the canonical record of one dedup group.
/// Field names are the snapshot compatibility contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub category: String,
    pub project_name: String,
    /// Legacy duplicate of industry_primary kept for older consumers.
    pub industry_type: String,
    pub industry_primary: String,
    pub industry_secondary: String,
    pub time: String,
    pub presale_name: String,
    pub updated_at: String,
    pub timestamp_fallback: bool,
    pub history_versions: Vec<String>,
    pub file_path: String,
    pub size: u64,
    pub ext: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// The single persisted artifact of a full rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub generated_at: String,
    pub root: String,
    pub total_raw_files: usize,
    pub total_indexed_latest: usize,
    pub categories: Vec<CategoryCount>,
    pub tag_tree: OrderedMap<Vec<String>>,
    pub by_category: OrderedMap<Vec<Document>>,
}

impl Catalog {
    /// Empty catalog used when the snapshot is missing or unreadable, so the
    /// serving side fails open to zero results instead of erroring.
    pub fn empty() -> Self {
        Catalog {
            generated_at: String::new(),
            root: String::new(),
            total_raw_files: 0,
            total_indexed_latest: 0,
            categories: Vec::new(),
            tag_tree: OrderedMap::new(),
            by_category: OrderedMap::new(),
        }
    }

    /// All documents across category buckets, in bucket order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.by_category.iter().flat_map(|(_, docs)| docs.iter())
    }
}

/// String-keyed map that keeps insertion order through JSON round-trips.
/// Category buckets and the tag taxonomy are ordered by a fixed priority
/// list, which a plain BTreeMap would scramble.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        OrderedMap(Vec::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.0.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for MapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(MapVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_map_round_trips_in_insertion_order() {
        let mut map = OrderedMap::new();
        map.insert("汇报PPT", vec![1, 2]);
        map.insert("解决方案文档", vec![]);
        map.insert("其他", vec![3]);

        let json = serde_json::to_string(&map).unwrap();
        assert!(json.find("汇报PPT").unwrap() < json.find("解决方案文档").unwrap());
        assert!(json.find("解决方案文档").unwrap() < json.find("其他").unwrap());

        let back: OrderedMap<Vec<i32>> = serde_json::from_str(&json).unwrap();
        let keys: Vec<&str> = back.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["汇报PPT", "解决方案文档", "其他"]);
    }

    #[test]
    fn ordered_map_insert_replaces_existing_key() {
        let mut map = OrderedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("a", 3);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&3));
    }
}
