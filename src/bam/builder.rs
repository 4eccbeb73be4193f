use log::debug;

use crate::bam::{
	expand_aligned_bases, AlignmentFlag, AlignmentRecord, CigarOp, TagName, TagValue, TagWriter,
};
use crate::error;

/// Assembles an [`AlignmentRecord`] field by field.
///
/// Unset coordinates default to `-1` (no reference / no position). On
/// `build` the query length is taken from the query bases, and the aligned
/// bases are expanded from the CIGAR, unless either was set explicitly.
#[derive(Debug, Clone)]
pub struct RecordBuilder
{
	name: Box<[u8]>,
	length: Option<u32>,
	query_bases: Box<[u8]>,
	aligned_bases: Option<Box<[u8]>>,
	qualities: Box<[u8]>,
	tags: TagWriter,
	ref_id: i32,
	position: i32,
	bin: u16,
	map_quality: u8,
	flag: AlignmentFlag,
	cigar: Vec<CigarOp>,
	mate_ref_id: i32,
	mate_position: i32,
	insert_size: i32,
}

impl Default for RecordBuilder
{
	fn default() -> Self
	{
		RecordBuilder::new()
	}
}

impl RecordBuilder
{
	pub fn new() -> Self
	{
		RecordBuilder {
			name: Box::from(&[][..]),
			length: None,
			query_bases: Box::from(&[][..]),
			aligned_bases: None,
			qualities: Box::from(&[][..]),
			tags: TagWriter::new(),
			ref_id: -1,
			position: -1,
			bin: 0,
			map_quality: 0,
			flag: AlignmentFlag::empty(),
			cigar: Vec::new(),
			mate_ref_id: -1,
			mate_position: -1,
			insert_size: 0,
		}
	}

	pub fn name(&mut self, name: &str) -> &mut Self
	{
		self.name = Box::from(name.as_bytes());
		self
	}

	pub fn length(&mut self, length: u32) -> &mut Self
	{
		self.length = Some(length);
		self
	}

	pub fn query_bases(&mut self, bases: &[u8]) -> &mut Self
	{
		self.query_bases = Box::from(bases);
		self
	}

	pub fn aligned_bases(&mut self, bases: &[u8]) -> &mut Self
	{
		self.aligned_bases = Some(Box::from(bases));
		self
	}

	pub fn qualities(&mut self, qualities: &[u8]) -> &mut Self
	{
		self.qualities = Box::from(qualities);
		self
	}

	/// Replaces the tag block with already encoded bytes.
	pub fn tag_data(&mut self, tag_data: Vec<u8>) -> &mut Self
	{
		self.tags = TagWriter::from_bytes(tag_data);
		self
	}

	/// Appends one encoded tag entry.
	pub fn push_tag(&mut self, name: TagName, value: TagValue) -> error::Result<&mut Self>
	{
		self.tags.push(name, &value)?;
		Ok(self)
	}

	pub fn ref_id(&mut self, ref_id: i32) -> &mut Self
	{
		self.ref_id = ref_id;
		self
	}

	pub fn position(&mut self, position: i32) -> &mut Self
	{
		self.position = position;
		self
	}

	pub fn bin(&mut self, bin: u16) -> &mut Self
	{
		self.bin = bin;
		self
	}

	pub fn map_quality(&mut self, map_quality: u8) -> &mut Self
	{
		self.map_quality = map_quality;
		self
	}

	pub fn flag<F>(&mut self, flag: F) -> &mut Self
	where
		F: Into<AlignmentFlag>,
	{
		self.flag = flag.into();
		self
	}

	pub fn cigar(&mut self, cigar: Vec<CigarOp>) -> &mut Self
	{
		self.cigar = cigar;
		self
	}

	pub fn mate_ref_id(&mut self, mate_ref_id: i32) -> &mut Self
	{
		self.mate_ref_id = mate_ref_id;
		self
	}

	pub fn mate_position(&mut self, mate_position: i32) -> &mut Self
	{
		self.mate_position = mate_position;
		self
	}

	pub fn insert_size(&mut self, insert_size: i32) -> &mut Self
	{
		self.insert_size = insert_size;
		self
	}

	pub fn build(&self) -> error::Result<AlignmentRecord>
	{
		let aligned_bases = match &self.aligned_bases
		{
			Some(bases) => bases.clone(),
			// no stored sequence, nothing to lay out
			None if self.query_bases.is_empty() => Box::from(&[][..]),
			None => expand_aligned_bases(&self.query_bases, &self.cigar)?.into_boxed_slice(),
		};

		let length = self.length.unwrap_or(self.query_bases.len() as u32);

		debug!(
			"built record {} (l_seq = {}, l_tags = {})",
			String::from_utf8_lossy(&self.name),
			length,
			self.tags.as_bytes().len()
		);

		Ok(AlignmentRecord {
			name: self.name.clone(),
			length,
			query_bases: self.query_bases.clone(),
			aligned_bases,
			qualities: self.qualities.clone(),
			tag_data: Box::from(self.tags.as_bytes()),
			ref_id: self.ref_id,
			position: self.position,
			bin: self.bin,
			map_quality: self.map_quality,
			flag: self.flag,
			cigar: self.cigar.clone(),
			mate_ref_id: self.mate_ref_id,
			mate_position: self.mate_position,
			insert_size: self.insert_size,
		})
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::bam::CigarKind;

	#[test]
	fn test_defaults()
	{
		let record = RecordBuilder::new().build().unwrap();

		assert_eq!(record.ref_id(), -1);
		assert_eq!(record.position(), -1);
		assert_eq!(record.mate_ref_id(), -1);
		assert_eq!(record.length(), 0);
		assert!(record.tag_data().is_empty());
		assert!(record.is_mapped());
	}

	#[test]
	fn test_derived_fields()
	{
		let record = RecordBuilder::new()
			.name("r1")
			.query_bases(b"AACGTT")
			.qualities(b"IIIIII")
			.cigar(vec![
				CigarOp::new(1, CigarKind::Softclip),
				CigarOp::new(2, CigarKind::Match),
				CigarOp::new(1, CigarKind::Deletion),
				CigarOp::new(3, CigarKind::Match),
			])
			.build()
			.unwrap();

		assert_eq!(record.length(), 6);
		assert_eq!(record.aligned_bases(), b"AC-GTT");
		assert_eq!(record.name_as_str(), Some("r1"));
	}

	#[test]
	fn test_explicit_fields_win()
	{
		let record = RecordBuilder::new()
			.query_bases(b"ACGT")
			.length(10)
			.aligned_bases(b"A-CGT")
			.build()
			.unwrap();

		assert_eq!(record.length(), 10);
		assert_eq!(record.aligned_bases(), b"A-CGT");
	}

	#[test]
	fn test_cigar_longer_than_query()
	{
		let result = RecordBuilder::new()
			.query_bases(b"ACGT")
			.cigar(vec![CigarOp::new(8, CigarKind::Match)])
			.build();

		assert!(matches!(result, Err(error::Error::CigarQueryOverrun { .. })));
	}

	#[test]
	fn test_push_tag_encodes_entries()
	{
		let mut builder = RecordBuilder::new();
		builder
			.push_tag(*b"RG", TagValue::string("sample1"))
			.unwrap()
			.push_tag(*b"NM", TagValue::U8(3))
			.unwrap();

		let record = builder.build().unwrap();
		assert_eq!(record.tag_data(), b"RGZsample1\0NMC\x03");
		assert_eq!(record.tag(*b"NM").unwrap(), Some(TagValue::U8(3)));
	}
}
