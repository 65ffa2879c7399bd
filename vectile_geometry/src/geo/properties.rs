use super::GeoValue;
use std::{
	collections::{BTreeMap, btree_map},
	fmt::Debug,
};

/// Feature properties, ordered by key.
#[derive(Clone, Default, PartialEq)]
pub struct GeoProperties {
	properties: BTreeMap<String, GeoValue>,
}

impl GeoProperties {
	#[must_use]
	pub fn new() -> GeoProperties {
		GeoProperties {
			properties: BTreeMap::new(),
		}
	}

	/// Inserts a property. A repeated key overwrites the earlier value.
	pub fn insert(&mut self, key: String, value: GeoValue) {
		self.properties.insert(key, value);
	}

	pub fn get(&self, key: &str) -> Option<&GeoValue> {
		self.properties.get(key)
	}

	pub fn iter(&self) -> btree_map::Iter<'_, String, GeoValue> {
		self.properties.iter()
	}

	pub fn len(&self) -> usize {
		self.properties.len()
	}

	pub fn is_empty(&self) -> bool {
		self.properties.is_empty()
	}
}

impl IntoIterator for GeoProperties {
	type Item = (String, GeoValue);
	type IntoIter = btree_map::IntoIter<String, GeoValue>;
	fn into_iter(self) -> Self::IntoIter {
		self.properties.into_iter()
	}
}

impl<'a> IntoIterator for &'a GeoProperties {
	type Item = (&'a String, &'a GeoValue);
	type IntoIter = btree_map::Iter<'a, String, GeoValue>;
	fn into_iter(self) -> Self::IntoIter {
		self.properties.iter()
	}
}

impl From<Vec<(&str, GeoValue)>> for GeoProperties {
	fn from(value: Vec<(&str, GeoValue)>) -> Self {
		value.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
	}
}

impl From<Vec<(&str, &str)>> for GeoProperties {
	fn from(value: Vec<(&str, &str)>) -> Self {
		value
			.into_iter()
			.map(|(k, v)| (k.to_string(), GeoValue::from(v)))
			.collect()
	}
}

impl FromIterator<(String, GeoValue)> for GeoProperties {
	fn from_iter<T: IntoIterator<Item = (String, GeoValue)>>(iter: T) -> Self {
		GeoProperties {
			properties: BTreeMap::from_iter(iter),
		}
	}
}

impl Debug for GeoProperties {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_map().entries(self.properties.iter()).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keys_are_ordered() {
		let properties = GeoProperties::from(vec![("name", "Spree"), ("class", "river")]);
		let keys: Vec<&String> = properties.iter().map(|(k, _)| k).collect();
		assert_eq!(keys, ["class", "name"]);
		assert_eq!(format!("{properties:?}"), r#"{"class": String("river"), "name": String("Spree")}"#);
	}

	#[test]
	fn insert_overwrites() {
		let mut properties = GeoProperties::new();
		properties.insert("lanes".to_string(), GeoValue::from(2u32));
		properties.insert("lanes".to_string(), GeoValue::from(4u32));
		assert_eq!(properties.len(), 1);
		assert_eq!(properties.get("lanes"), Some(&GeoValue::UInt(4)));
		assert_eq!(properties.get("missing"), None);
	}
}
