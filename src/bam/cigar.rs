use log::debug;

use std::fmt;

use crate::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CigarKind
{
	Match,
	Insertion,
	Deletion,
	Skip,
	Softclip,
	Hardclip,
	Padding,
	SequenceMatch,
	SequenceMismatch,
}

// BAM packed op index -> kind
const CIGAR_OPS: [CigarKind; 9] = [
	CigarKind::Match,
	CigarKind::Insertion,
	CigarKind::Deletion,
	CigarKind::Skip,
	CigarKind::Softclip,
	CigarKind::Hardclip,
	CigarKind::Padding,
	CigarKind::SequenceMatch,
	CigarKind::SequenceMismatch,
];

impl CigarKind
{
	pub fn from_opcode(opcode: u8) -> Option<Self>
	{
		match opcode
		{
			b'M' => Some(CigarKind::Match),
			b'I' => Some(CigarKind::Insertion),
			b'D' => Some(CigarKind::Deletion),
			b'N' => Some(CigarKind::Skip),
			b'S' => Some(CigarKind::Softclip),
			b'H' => Some(CigarKind::Hardclip),
			b'P' => Some(CigarKind::Padding),
			b'=' => Some(CigarKind::SequenceMatch),
			b'X' => Some(CigarKind::SequenceMismatch),
			_ => None,
		}
	}

	pub fn opcode(self) -> u8
	{
		match self
		{
			CigarKind::Match => b'M',
			CigarKind::Insertion => b'I',
			CigarKind::Deletion => b'D',
			CigarKind::Skip => b'N',
			CigarKind::Softclip => b'S',
			CigarKind::Hardclip => b'H',
			CigarKind::Padding => b'P',
			CigarKind::SequenceMatch => b'=',
			CigarKind::SequenceMismatch => b'X',
		}
	}

	pub fn consumes_reference(self) -> bool
	{
		matches!(
			self,
			CigarKind::Match
				| CigarKind::Deletion
				| CigarKind::Skip
				| CigarKind::SequenceMatch
				| CigarKind::SequenceMismatch
		)
	}

	pub fn consumes_query(self) -> bool
	{
		matches!(
			self,
			CigarKind::Match
				| CigarKind::Insertion
				| CigarKind::Softclip
				| CigarKind::SequenceMatch
				| CigarKind::SequenceMismatch
		)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CigarOp
{
	pub length: u32,
	pub kind: CigarKind,
}

impl CigarOp
{
	pub fn new(length: u32, kind: CigarKind) -> Self
	{
		CigarOp { length, kind }
	}

	/// Decodes a BAM packed operation: low 4 bits op, high 28 bits length.
	pub fn from_packed(cigar_enc: u32) -> error::Result<Self>
	{
		let kind = CIGAR_OPS
			.get((cigar_enc & 0xF) as usize)
			.copied()
			.ok_or(error::Error::InvalidCigarOp(cigar_enc))?;

		Ok(CigarOp {
			length: cigar_enc >> 4,
			kind,
		})
	}

	pub fn to_packed(self) -> u32
	{
		let index = CIGAR_OPS
			.iter()
			.position(|kind| *kind == self.kind)
			.unwrap_or_default() as u32;

		(self.length << 4) | index
	}
}

impl fmt::Display for CigarOp
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		write!(f, "{}{}", self.length, self.kind.opcode() as char)
	}
}

/// Formats a CIGAR string such as `10M2I5S`, or `*` when empty.
pub fn cigar_to_string(cigar: &[CigarOp]) -> String
{
	if cigar.is_empty()
	{
		return "*".to_string();
	}

	cigar.iter().map(CigarOp::to_string).collect()
}

/// Decodes `n_cigar_op` little-endian packed operations.
pub fn decode_packed_cigar(bytes: &[u8]) -> error::Result<Vec<CigarOp>>
{
	bytes
		.chunks_exact(4)
		.map(|chunk| {
			CigarOp::from_packed(u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
		})
		.collect()
}

/// Number of reference bases covered by the alignment.
pub fn reference_span(cigar: &[CigarOp]) -> u64
{
	cigar
		.iter()
		.filter(|op| op.kind.consumes_reference())
		.map(|op| op.length as u64)
		.sum()
}

/// Number of query bases the CIGAR walks over, soft clips included.
pub fn query_span(cigar: &[CigarOp]) -> u64
{
	cigar
		.iter()
		.filter(|op| op.kind.consumes_query())
		.map(|op| op.length as u64)
		.sum()
}

/// Builds the aligned sequence: query bases laid against the reference
/// with `-` for deletions, `N` for skipped regions and `*` for padding.
/// Soft clipped bases are dropped.
pub fn expand_aligned_bases(query_bases: &[u8], cigar: &[CigarOp]) -> error::Result<Vec<u8>>
{
	let mut aligned = Vec::with_capacity(query_bases.len());
	let mut query_pos = 0usize;

	for op in cigar
	{
		let length = op.length as usize;

		if op.kind.consumes_query() && query_pos + length > query_bases.len()
		{
			return Err(error::Error::CigarQueryOverrun {
				needed: query_pos + length,
				available: query_bases.len(),
			});
		}

		match op.kind
		{
			CigarKind::Match
			| CigarKind::SequenceMatch
			| CigarKind::SequenceMismatch
			| CigarKind::Insertion =>
			{
				aligned.extend_from_slice(&query_bases[query_pos..query_pos + length]);
				query_pos += length;
			}
			CigarKind::Softclip => query_pos += length,
			CigarKind::Deletion => aligned.resize(aligned.len() + length, b'-'),
			CigarKind::Skip => aligned.resize(aligned.len() + length, b'N'),
			CigarKind::Padding => aligned.resize(aligned.len() + length, b'*'),
			CigarKind::Hardclip =>
			{}
		}
	}

	debug!("aligned bases = {}", String::from_utf8_lossy(&aligned));

	Ok(aligned)
}
