use log::debug;

use rustc_hash::FxHashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefData
{
	pub name: Box<[u8]>,
	pub length: u32,
	pub has_alignments: bool,
}

impl RefData
{
	pub fn new(name: &str, length: u32) -> Self
	{
		RefData {
			name: Box::from(name.as_bytes()),
			length,
			has_alignments: false,
		}
	}

	pub fn name_as_str(&self) -> &str
	{
		std::str::from_utf8(&self.name).unwrap_or_default()
	}
}

/// Maps a record's reference index to the reference it names.
///
/// Records only hold indices; whatever owns the reference table implements
/// this so callers can render names without the record owning the table.
pub trait ResolveReference
{
	fn resolve(&self, ref_id: i32) -> Option<&RefData>;
}

/// Reference sequences in header order.
#[derive(Debug, Clone, Default)]
pub struct RefVector
{
	references: Vec<RefData>,
	by_name: FxHashMap<Box<[u8]>, usize>,
}

impl RefVector
{
	pub fn new(references: Vec<RefData>) -> Self
	{
		let mut by_name = FxHashMap::default();

		for (index, reference) in references.iter().enumerate()
		{
			// first definition of a duplicated name wins
			by_name.entry(reference.name.clone()).or_insert(index);
		}

		debug!("n_ref: {}", references.len());

		RefVector {
			references,
			by_name,
		}
	}

	pub fn push(&mut self, reference: RefData)
	{
		self.by_name
			.entry(reference.name.clone())
			.or_insert(self.references.len());
		self.references.push(reference);
	}

	pub fn index_of(&self, name: &str) -> Option<i32>
	{
		self.by_name
			.get(name.as_bytes())
			.map(|index| *index as i32)
	}

	pub fn len(&self) -> usize
	{
		self.references.len()
	}

	pub fn is_empty(&self) -> bool
	{
		self.references.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, RefData>
	{
		self.references.iter()
	}
}

impl ResolveReference for RefVector
{
	fn resolve(&self, ref_id: i32) -> Option<&RefData>
	{
		usize::try_from(ref_id)
			.ok()
			.and_then(|index| self.references.get(index))
	}
}

impl ResolveReference for [RefData]
{
	fn resolve(&self, ref_id: i32) -> Option<&RefData>
	{
		usize::try_from(ref_id).ok().and_then(|index| self.get(index))
	}
}

impl FromIterator<RefData> for RefVector
{
	fn from_iter<I: IntoIterator<Item = RefData>>(iter: I) -> Self
	{
		RefVector::new(iter.into_iter().collect())
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	fn references() -> RefVector
	{
		RefVector::new(vec![
			RefData::new("chr1", 248_956_422),
			RefData::new("chr2", 242_193_529),
			RefData::new("chrM", 16_569),
		])
	}

	#[test]
	fn test_resolve_by_id()
	{
		let refs = references();

		assert_eq!(refs.resolve(1).unwrap().name_as_str(), "chr2");
		assert_eq!(refs.resolve(2).unwrap().length, 16_569);
		assert!(refs.resolve(3).is_none());
		assert!(refs.resolve(-1).is_none());
	}

	#[test]
	fn test_index_of()
	{
		let mut refs = references();

		assert_eq!(refs.index_of("chrM"), Some(2));
		assert_eq!(refs.index_of("chrX"), None);

		refs.push(RefData::new("chrX", 156_040_895));
		assert_eq!(refs.index_of("chrX"), Some(3));
		assert_eq!(refs.len(), 4);
	}

	#[test]
	fn test_duplicate_names_keep_first()
	{
		let refs: RefVector = vec![RefData::new("contig", 10), RefData::new("contig", 20)]
			.into_iter()
			.collect();

		assert_eq!(refs.index_of("contig"), Some(0));
	}

	#[test]
	fn test_slice_resolves()
	{
		let refs = vec![RefData::new("chr1", 100)];
		assert_eq!(refs.as_slice().resolve(0).unwrap().length, 100);
		assert!(refs.as_slice().resolve(1).is_none());
	}
}
