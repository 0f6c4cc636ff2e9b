use std::{cmp::Ordering, fmt};

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

/// Mapping from a lower-cased name to a non-negative weight
///
/// Keys keep the order in which they were first assigned. That order is the
/// tie-break when ranking keys by weight and it survives a JSON round trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightMap {
    entries: Vec<(String, f64)>,
}

fn normalize_key(key: &str) -> String {
    key.to_lowercase()
}

fn sanitize(weight: f64) -> f64 {
    if weight.is_finite() {
        weight.max(0.0)
    } else {
        0.0
    }
}

impl WeightMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Weight for `key`, or 0 when absent
    pub fn get(&self, key: &str) -> f64 {
        let key = normalize_key(key);
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        let key = normalize_key(key);
        self.entries.iter().any(|(k, _)| *k == key)
    }

    /// Sets `key` to `weight`, clamped at 0. New keys go to the end.
    pub fn set(&mut self, key: &str, weight: f64) {
        let key = normalize_key(key);
        let weight = sanitize(weight);
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = weight,
            None => self.entries.push((key, weight)),
        }
    }

    /// Adds `delta` to the current weight (0 when absent); the result is clamped at 0
    pub fn add(&mut self, key: &str, delta: f64) {
        let current = self.get(key);
        self.set(key, current + delta);
    }

    pub fn max(&self) -> Option<f64> {
        self.entries.iter().map(|(_, w)| *w).reduce(f64::max)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, w)| (k.as_str(), *w))
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut f64> {
        self.entries.iter_mut().map(|(_, w)| w)
    }

    /// The `n` heaviest keys, heaviest first; equal weights keep insertion order
    pub fn top(&self, n: usize) -> Vec<&str> {
        let mut ranked: Vec<&(String, f64)> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        ranked.into_iter().take(n).map(|(k, _)| k.as_str()).collect()
    }
}

impl<K: AsRef<str>> FromIterator<(K, f64)> for WeightMap {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut map = WeightMap::new();
        for (key, weight) in iter {
            map.set(key.as_ref(), weight);
        }
        map
    }
}

impl Serialize for WeightMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, weight) in &self.entries {
            map.serialize_entry(key, weight)?;
        }
        map.end()
    }
}

struct WeightMapVisitor;

impl<'de> Visitor<'de> for WeightMapVisitor {
    type Value = WeightMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of names to weights")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = WeightMap::new();
        while let Some((key, weight)) = access.next_entry::<String, f64>()? {
            map.set(&key, weight);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for WeightMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(WeightMapVisitor)
    }
}
