use crate::{GeoProperties, GeoValue};
use anyhow::{Result, anyhow, ensure};
use std::{collections::HashMap, fmt::Debug, hash::Hash};

/// An append-only list with an index for reverse lookups.
#[derive(Clone, PartialEq)]
pub struct IndexedList<T>
where
	T: Clone + Eq + Hash,
{
	list: Vec<T>,
	map: HashMap<T, u32>,
}

impl<T> IndexedList<T>
where
	T: Clone + Debug + Eq + Hash,
{
	/// Appends `entry` unless it is already present, and returns its index.
	pub fn add(&mut self, entry: T) -> u32 {
		if let Some(index) = self.map.get(&entry) {
			return *index;
		}
		let index = self.list.len() as u32;
		self.map.insert(entry.clone(), index);
		self.list.push(entry);
		index
	}

	/// Appends `entry` even if an equal entry exists. Decoded dictionaries may repeat entries
	/// and indices into them must stay stable.
	pub fn push(&mut self, entry: T) {
		let index = self.list.len() as u32;
		self.map.entry(entry.clone()).or_insert(index);
		self.list.push(entry);
	}

	pub fn get(&self, id: u32) -> Result<&T> {
		self
			.list
			.get(id as usize)
			.ok_or_else(|| anyhow!("index {id} out of range (dictionary has {} entries)", self.list.len()))
	}

	pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
		self.list.iter()
	}

	pub fn len(&self) -> usize {
		self.list.len()
	}

	pub fn is_empty(&self) -> bool {
		self.list.is_empty()
	}
}

impl<T: Clone + Eq + Hash> Default for IndexedList<T> {
	fn default() -> Self {
		IndexedList {
			list: Vec::new(),
			map: HashMap::new(),
		}
	}
}

impl<T> Debug for IndexedList<T>
where
	T: Clone + Debug + Eq + Hash,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.list).finish()
	}
}

/// The key and value dictionaries of a layer. Features reference them by index pairs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyManager {
	pub key: IndexedList<String>,
	pub val: IndexedList<GeoValue>,
}

impl PropertyManager {
	pub fn new() -> Self {
		Self::default()
	}

	/// Encodes `properties` into `[key_index, value_index, …]`, extending the dictionaries.
	pub fn encode_tag_ids(&mut self, properties: &GeoProperties) -> Vec<u32> {
		let mut tag_ids = Vec::with_capacity(properties.len() * 2);
		for (key, val) in properties {
			tag_ids.push(self.key.add(key.clone()));
			tag_ids.push(self.val.add(val.clone()));
		}
		tag_ids
	}

	/// Resolves alternating key/value indices.
	///
	/// # Errors
	/// An odd number of indices, or any index outside its dictionary.
	pub fn decode_tag_ids(&self, tag_ids: &[u32]) -> Result<GeoProperties> {
		ensure!(tag_ids.len().is_multiple_of(2), "tag list has odd length {}", tag_ids.len());
		let mut properties = GeoProperties::new();

		for pair in tag_ids.chunks_exact(2) {
			let key = self
				.key
				.get(pair[0])
				.map_err(|e| e.context("Failed to resolve property key"))?;
			let val = self
				.val
				.get(pair[1])
				.map_err(|e| e.context("Failed to resolve property value"))?;
			properties.insert(key.clone(), val.clone());
		}
		Ok(properties)
	}
}
