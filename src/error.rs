use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error
{
	#[error("Unable to open file {0}")]
	IOError(String),
	#[error("Unknown tag storage type '{code}' for tag {tag} at offset {offset}")]
	UnknownTagType
	{
		tag: String,
		code: char,
		offset: usize,
	},
	#[error("Tag {tag} truncated: needed {needed} bytes, {remaining} remaining")]
	TruncatedTag
	{
		tag: String,
		needed: usize,
		remaining: usize,
	},
	#[error("String value of tag {tag} is missing its NUL terminator")]
	UnterminatedString
	{
		tag: String,
	},
	#[error("Tag {tag} does not hold a {expected} value")]
	TagTypeMismatch
	{
		tag: String,
		expected: &'static str,
	},
	#[error("Invalid tag string {0:?}")]
	InvalidTagString(String),
	#[error("Unsupported CIGAR operation in packed value {0:#x}")]
	InvalidCigarOp(u32),
	#[error("CIGAR consumes {needed} query bases but only {available} are present")]
	CigarQueryOverrun
	{
		needed: usize,
		available: usize,
	},
}
