mod builder;
mod cigar;
mod flags;
mod header;
mod tags;

pub use crate::bam::builder::*;
pub use crate::bam::cigar::*;
pub use crate::bam::flags::*;
pub use crate::bam::header::*;
pub use crate::bam::tags::*;

use crate::error;

use log::debug;

/// One alignment of one read against a reference.
///
/// Built once through [`RecordBuilder`] and read-only afterwards. The tag
/// block is kept in its encoded form and only scanned on demand.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignmentRecord
{
	pub(crate) name: Box<[u8]>,
	pub(crate) length: u32,
	pub(crate) query_bases: Box<[u8]>,
	pub(crate) aligned_bases: Box<[u8]>,
	pub(crate) qualities: Box<[u8]>,
	pub(crate) tag_data: Box<[u8]>,
	pub(crate) ref_id: i32,
	pub(crate) position: i32,
	pub(crate) bin: u16,
	pub(crate) map_quality: u8,
	pub(crate) flag: AlignmentFlag,
	pub(crate) cigar: Vec<CigarOp>,
	pub(crate) mate_ref_id: i32,
	pub(crate) mate_position: i32,
	pub(crate) insert_size: i32,
}

impl AlignmentRecord
{
	pub fn builder() -> RecordBuilder
	{
		RecordBuilder::new()
	}

	pub fn name(&self) -> &[u8]
	{
		&self.name
	}

	pub fn name_as_str(&self) -> Option<&str>
	{
		std::str::from_utf8(&self.name).ok()
	}

	pub fn length(&self) -> u32
	{
		self.length
	}

	pub fn query_bases(&self) -> &[u8]
	{
		&self.query_bases
	}

	/// Query bases laid against the reference, gaps included.
	pub fn aligned_bases(&self) -> &[u8]
	{
		&self.aligned_bases
	}

	/// Phred+33 ASCII qualities.
	pub fn qualities(&self) -> &[u8]
	{
		&self.qualities
	}

	pub fn tag_data(&self) -> &[u8]
	{
		&self.tag_data
	}

	pub fn ref_id(&self) -> i32
	{
		self.ref_id
	}

	pub fn position(&self) -> i32
	{
		self.position
	}

	pub fn bin(&self) -> u16
	{
		self.bin
	}

	pub fn map_quality(&self) -> u8
	{
		self.map_quality
	}

	pub fn flag(&self) -> AlignmentFlag
	{
		self.flag
	}

	pub fn cigar(&self) -> &[CigarOp]
	{
		&self.cigar
	}

	pub fn mate_ref_id(&self) -> i32
	{
		self.mate_ref_id
	}

	pub fn mate_position(&self) -> i32
	{
		self.mate_position
	}

	pub fn insert_size(&self) -> i32
	{
		self.insert_size
	}

	pub fn is_paired(&self) -> bool
	{
		self.flag.is_paired()
	}

	pub fn is_proper_pair(&self) -> bool
	{
		self.flag.is_proper_pair()
	}

	pub fn is_mapped(&self) -> bool
	{
		self.flag.is_mapped()
	}

	pub fn is_mate_mapped(&self) -> bool
	{
		self.flag.is_mate_mapped()
	}

	pub fn is_reverse_strand(&self) -> bool
	{
		self.flag.is_reverse_strand()
	}

	pub fn is_mate_reverse_strand(&self) -> bool
	{
		self.flag.is_mate_reverse_strand()
	}

	pub fn is_first_mate(&self) -> bool
	{
		self.flag.is_first_mate()
	}

	pub fn is_second_mate(&self) -> bool
	{
		self.flag.is_second_mate()
	}

	pub fn is_primary_alignment(&self) -> bool
	{
		self.flag.is_primary_alignment()
	}

	pub fn is_failed_qc(&self) -> bool
	{
		self.flag.is_failed_qc()
	}

	pub fn is_duplicate(&self) -> bool
	{
		self.flag.is_duplicate()
	}

	/// Value of the first tag called `name`, `Ok(None)` when absent.
	pub fn tag(&self, name: TagName) -> error::Result<Option<TagValue>>
	{
		lookup(&self.tag_data, name)
	}

	pub fn tags(&self) -> TagScanner<'_>
	{
		TagScanner::new(&self.tag_data)
	}

	/// The `RG` tag as a string.
	pub fn read_group(&self) -> error::Result<Option<String>>
	{
		let read_group = match TagScanner::new(&self.tag_data).find(READ_GROUP_TAG)?
		{
			Some(tag) => tag,
			None => return Ok(None),
		};

		match read_group.tag_type
		{
			TagType::String | TagType::Hex =>
			{
				let read_group = String::from_utf8_lossy(read_group.value).into_owned();
				debug!("read group = {}", read_group);
				Ok(Some(read_group))
			}
			_ => Err(error::Error::TagTypeMismatch {
				tag: read_group.name_as_str().to_string(),
				expected: "string",
			}),
		}
	}

	/// Reference this record is aligned to, if any.
	pub fn reference<'r, R>(&self, refs: &'r R) -> Option<&'r RefData>
	where
		R: ResolveReference + ?Sized,
	{
		refs.resolve(self.ref_id)
	}

	pub fn mate_reference<'r, R>(&self, refs: &'r R) -> Option<&'r RefData>
	where
		R: ResolveReference + ?Sized,
	{
		refs.resolve(self.mate_ref_id)
	}

	/// Zero-based exclusive end on the reference.
	pub fn end_position(&self) -> i64
	{
		self.position as i64 + reference_span(&self.cigar) as i64
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	fn record_with_tags(tag_data: &[u8]) -> AlignmentRecord
	{
		AlignmentRecord::builder()
			.name("read1")
			.tag_data(tag_data.to_vec())
			.build()
			.unwrap()
	}

	#[test]
	fn test_read_group()
	{
		let record = record_with_tags(b"NMC\x02RGZsample1\0");
		assert_eq!(record.read_group().unwrap(), Some("sample1".to_string()));
	}

	#[test]
	fn test_read_group_missing()
	{
		let record = record_with_tags(b"NMC\x02");
		assert_eq!(record.read_group().unwrap(), None);

		let record = record_with_tags(b"");
		assert_eq!(record.read_group().unwrap(), None);
	}

	#[test]
	fn test_read_group_wrong_type()
	{
		let record = record_with_tags(b"RGC\x02");
		assert_eq!(
			record.read_group(),
			Err(error::Error::TagTypeMismatch {
				tag: "RG".to_string(),
				expected: "string",
			})
		);
	}

	#[test]
	fn test_read_group_malformed_block()
	{
		let record = record_with_tags(b"XX!\x00RGZa\0");
		assert!(matches!(
			record.read_group(),
			Err(error::Error::UnknownTagType { code: '!', .. })
		));
	}

	#[test]
	fn test_flag_predicates_delegate()
	{
		let record = AlignmentRecord::builder()
			.flag(AlignmentFlag::PAIRED | AlignmentFlag::READ_2 | AlignmentFlag::SECONDARY)
			.build()
			.unwrap();

		assert!(record.is_paired());
		assert!(record.is_second_mate());
		assert!(!record.is_first_mate());
		assert!(!record.is_primary_alignment());
		assert!(record.is_mapped());
		assert!(record.is_mate_mapped());
	}

	#[test]
	fn test_references()
	{
		let refs = RefVector::new(vec![RefData::new("chr1", 1000), RefData::new("chr2", 2000)]);
		let record = AlignmentRecord::builder()
			.ref_id(1)
			.mate_ref_id(-1)
			.build()
			.unwrap();

		assert_eq!(record.reference(&refs).unwrap().name_as_str(), "chr2");
		assert!(record.mate_reference(&refs).is_none());
	}

	#[test]
	fn test_end_position()
	{
		let record = AlignmentRecord::builder()
			.position(100)
			.cigar(vec![
				CigarOp::new(5, CigarKind::Softclip),
				CigarOp::new(20, CigarKind::Match),
				CigarOp::new(3, CigarKind::Deletion),
			])
			.build()
			.unwrap();

		assert_eq!(record.end_position(), 123);
	}
}
