use log::debug;

use std::fmt;

use crate::error;

/// Two character tag identifier, e.g. `*b"RG"`.
pub type TagName = [u8; 2];

pub const READ_GROUP_TAG: TagName = *b"RG";

// name (2) + storage type (1)
const TAG_HEADER_SIZE: usize = 3;

/// Storage type code of a tag entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagType
{
	Char,
	I8,
	U8,
	I16,
	U16,
	Half,
	I32,
	U32,
	String,
	Hex,
}

/// Number of value bytes following the tag header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagWidth
{
	Fixed(usize),
	/// Value runs up to and including a NUL byte.
	NulTerminated,
}

impl TagType
{
	pub fn from_code(code: u8) -> Option<Self>
	{
		match code
		{
			b'A' => Some(TagType::Char),
			b'c' => Some(TagType::I8),
			b'C' => Some(TagType::U8),
			b's' => Some(TagType::I16),
			b'S' => Some(TagType::U16),
			b'f' => Some(TagType::Half),
			b'i' => Some(TagType::I32),
			b'I' => Some(TagType::U32),
			b'Z' => Some(TagType::String),
			b'H' => Some(TagType::Hex),
			_ => None,
		}
	}

	pub fn code(self) -> u8
	{
		match self
		{
			TagType::Char => b'A',
			TagType::I8 => b'c',
			TagType::U8 => b'C',
			TagType::I16 => b's',
			TagType::U16 => b'S',
			TagType::Half => b'f',
			TagType::I32 => b'i',
			TagType::U32 => b'I',
			TagType::String => b'Z',
			TagType::Hex => b'H',
		}
	}

	pub fn width(self) -> TagWidth
	{
		match self
		{
			TagType::Char | TagType::I8 | TagType::U8 => TagWidth::Fixed(1),
			// 'f' is stored in two bytes in this encoding
			TagType::I16 | TagType::U16 | TagType::Half => TagWidth::Fixed(2),
			TagType::I32 | TagType::U32 => TagWidth::Fixed(4),
			TagType::String | TagType::Hex => TagWidth::NulTerminated,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum TagValue
{
	Char(char),
	I8(i8),
	U8(u8),
	I16(i16),
	U16(u16),
	/// Raw IEEE-754 half precision bits, see [`TagValue::as_f32`].
	Half(u16),
	I32(i32),
	U32(u32),
	String(Box<[u8]>),
	Hex(Box<[u8]>),
}

impl TagValue
{
	pub fn tag_type(&self) -> TagType
	{
		match self
		{
			TagValue::Char(_) => TagType::Char,
			TagValue::I8(_) => TagType::I8,
			TagValue::U8(_) => TagType::U8,
			TagValue::I16(_) => TagType::I16,
			TagValue::U16(_) => TagType::U16,
			TagValue::Half(_) => TagType::Half,
			TagValue::I32(_) => TagType::I32,
			TagValue::U32(_) => TagType::U32,
			TagValue::String(_) => TagType::String,
			TagValue::Hex(_) => TagType::Hex,
		}
	}

	pub fn string(value: &str) -> Self
	{
		TagValue::String(Box::from(value.as_bytes()))
	}

	pub fn hex(value: &str) -> Self
	{
		TagValue::Hex(Box::from(value.as_bytes()))
	}

	/// String and hex string values as text.
	pub fn as_str(&self) -> Option<&str>
	{
		match self
		{
			TagValue::String(bytes) | TagValue::Hex(bytes) => std::str::from_utf8(bytes).ok(),
			_ => None,
		}
	}

	/// Any integer value widened to `i64`.
	pub fn as_int(&self) -> Option<i64>
	{
		match *self
		{
			TagValue::I8(v) => Some(v as i64),
			TagValue::U8(v) => Some(v as i64),
			TagValue::I16(v) => Some(v as i64),
			TagValue::U16(v) => Some(v as i64),
			TagValue::I32(v) => Some(v as i64),
			TagValue::U32(v) => Some(v as i64),
			_ => None,
		}
	}

	pub fn as_char(&self) -> Option<char>
	{
		match *self
		{
			TagValue::Char(c) => Some(c),
			_ => None,
		}
	}

	pub fn as_f32(&self) -> Option<f32>
	{
		match *self
		{
			TagValue::Half(bits) => Some(half_to_f32(bits)),
			_ => None,
		}
	}
}

impl fmt::Display for TagValue
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
	{
		match self
		{
			TagValue::Char(c) => write!(f, "{}", c),
			TagValue::Half(bits) => write!(f, "{}", half_to_f32(*bits)),
			TagValue::String(bytes) | TagValue::Hex(bytes) =>
			{
				write!(f, "{}", String::from_utf8_lossy(bytes))
			}
			other => match other.as_int()
			{
				Some(v) => write!(f, "{}", v),
				None => Ok(()),
			},
		}
	}
}

pub(crate) fn half_to_f32(bits: u16) -> f32
{
	let negative = bits & 0x8000 != 0;
	let exponent = ((bits >> 10) & 0x1F) as u32;
	let mantissa = (bits & 0x03FF) as u32;

	let magnitude = match exponent
	{
		0 => mantissa as f32 * f32::powi(2.0, -24),
		0x1F => f32::from_bits(0x7F80_0000 | (mantissa << 13)),
		_ => f32::from_bits(((exponent + 127 - 15) << 23) | (mantissa << 13)),
	};

	if negative
	{
		-magnitude
	}
	else
	{
		magnitude
	}
}

pub(crate) fn tag_name_lossy(name: &[u8]) -> String
{
	String::from_utf8_lossy(name).into_owned()
}

/// Bounds-checked read position over a tag block.
#[derive(Debug, Clone)]
pub(crate) struct TagCursor<'a>
{
	bytes: &'a [u8],
	offset: usize,
}

impl<'a> TagCursor<'a>
{
	pub(crate) fn new(bytes: &'a [u8]) -> Self
	{
		TagCursor { bytes, offset: 0 }
	}

	pub(crate) fn offset(&self) -> usize
	{
		self.offset
	}

	pub(crate) fn remaining(&self) -> usize
	{
		self.bytes.len() - self.offset
	}

	pub(crate) fn rest(&self) -> &'a [u8]
	{
		&self.bytes[self.offset..]
	}

	pub(crate) fn is_exhausted(&self) -> bool
	{
		self.offset >= self.bytes.len()
	}

	pub(crate) fn take(&mut self, tag: &[u8], size: usize) -> error::Result<&'a [u8]>
	{
		if size > self.remaining()
		{
			return Err(error::Error::TruncatedTag {
				tag: tag_name_lossy(tag),
				needed: size,
				remaining: self.remaining(),
			});
		}

		let chunk = &self.bytes[self.offset..self.offset + size];
		self.offset += size;
		Ok(chunk)
	}

	/// Returns the bytes before the next NUL and moves past the NUL.
	pub(crate) fn take_nul_terminated(&mut self, tag: &[u8]) -> error::Result<&'a [u8]>
	{
		let rest = &self.bytes[self.offset..];

		match memchr::memchr(0, rest)
		{
			Some(nul) =>
			{
				self.offset += nul + 1;
				Ok(&rest[..nul])
			}
			None => Err(error::Error::UnterminatedString {
				tag: tag_name_lossy(tag),
			}),
		}
	}
}

/// A tag entry borrowed from the block, value not yet decoded.
///
/// For `Z`/`H` entries `value` excludes the NUL terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTag<'a>
{
	pub name: TagName,
	pub tag_type: TagType,
	pub value: &'a [u8],
}

impl<'a> RawTag<'a>
{
	pub fn name_as_str(&self) -> &str
	{
		std::str::from_utf8(&self.name).unwrap_or("??")
	}

	pub fn decode(&self) -> TagValue
	{
		let v = self.value;

		match self.tag_type
		{
			TagType::Char => decode_fixed(v, |chunk| chunk[0] as char, TagValue::Char),
			TagType::I8 => decode_fixed(v, |chunk| chunk[0] as i8, TagValue::I8),
			TagType::U8 => decode_fixed(v, |chunk| chunk[0], TagValue::U8),
			TagType::I16 => decode_fixed(
				v,
				|chunk| i16::from_le_bytes([chunk[0], chunk[1]]),
				TagValue::I16,
			),
			TagType::U16 => decode_fixed(
				v,
				|chunk| u16::from_le_bytes([chunk[0], chunk[1]]),
				TagValue::U16,
			),
			TagType::Half => decode_fixed(
				v,
				|chunk| u16::from_le_bytes([chunk[0], chunk[1]]),
				TagValue::Half,
			),
			TagType::I32 => decode_fixed(
				v,
				|chunk| i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
				TagValue::I32,
			),
			TagType::U32 => decode_fixed(
				v,
				|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
				TagValue::U32,
			),
			TagType::String => TagValue::String(Box::from(v)),
			TagType::Hex => TagValue::Hex(Box::from(v)),
		}
	}
}

fn decode_fixed<T, F>(bytes: &[u8], convert: F, to_tag_value: fn(T) -> TagValue) -> TagValue
where
	F: Fn(&[u8]) -> T,
{
	to_tag_value(convert(bytes))
}

/// Walks a tag block one entry at a time without decoding values.
///
/// Each step either yields the next entry, reports the end of the block, or
/// fails on a malformed entry. After a failure the scanner yields nothing
/// further.
#[derive(Debug, Clone)]
pub struct TagScanner<'a>
{
	cursor: TagCursor<'a>,
	failed: bool,
}

impl<'a> TagScanner<'a>
{
	pub fn new(tag_data: &'a [u8]) -> Self
	{
		TagScanner {
			cursor: TagCursor::new(tag_data),
			failed: false,
		}
	}

	/// Byte offset of the next unread entry.
	pub fn offset(&self) -> usize
	{
		self.cursor.offset()
	}

	pub fn next_tag(&mut self) -> error::Result<Option<RawTag<'a>>>
	{
		if self.failed || self.cursor.is_exhausted()
		{
			return Ok(None);
		}

		let result = self.read_entry();
		if result.is_err()
		{
			self.failed = true;
		}

		result.map(Some)
	}

	fn read_entry(&mut self) -> error::Result<RawTag<'a>>
	{
		let start = self.cursor.offset();

		// partial name is all there is to report
		let header = self.cursor.take(self.cursor.rest(), TAG_HEADER_SIZE)?;

		let name: TagName = [header[0], header[1]];
		let code = header[2];

		let tag_type = match TagType::from_code(code)
		{
			Some(tag_type) => tag_type,
			None =>
			{
				debug!("tag error = {:?}:{}", tag_name_lossy(&name), code as char);
				return Err(error::Error::UnknownTagType {
					tag: tag_name_lossy(&name),
					code: code as char,
					offset: start + 2,
				});
			}
		};

		let value = match tag_type.width()
		{
			TagWidth::Fixed(size) => self.cursor.take(&name, size)?,
			TagWidth::NulTerminated => self.cursor.take_nul_terminated(&name)?,
		};

		debug!("tag = {}:{} at {}", tag_name_lossy(&name), code as char, start);

		Ok(RawTag {
			name,
			tag_type,
			value,
		})
	}

	/// Advances to the first entry called `name`.
	pub fn find(&mut self, name: TagName) -> error::Result<Option<RawTag<'a>>>
	{
		while let Some(tag) = self.next_tag()?
		{
			if tag.name == name
			{
				return Ok(Some(tag));
			}
		}

		Ok(None)
	}
}

impl<'a> Iterator for TagScanner<'a>
{
	type Item = error::Result<RawTag<'a>>;

	fn next(&mut self) -> Option<Self::Item>
	{
		self.next_tag().transpose()
	}
}

impl std::iter::FusedIterator for TagScanner<'_> {}

/// Looks up the first tag called `name` and decodes its value.
///
/// `Ok(None)` when the block holds no such tag. Malformed entries met before
/// the match are reported as errors.
pub fn lookup(tag_data: &[u8], name: TagName) -> error::Result<Option<TagValue>>
{
	Ok(TagScanner::new(tag_data).find(name)?.map(|tag| tag.decode()))
}

/// Appends encoded tag entries to a tag block.
#[derive(Debug, Clone, Default)]
pub struct TagWriter
{
	bytes: Vec<u8>,
}

impl TagWriter
{
	pub fn new() -> Self
	{
		TagWriter::default()
	}

	pub fn from_bytes(bytes: Vec<u8>) -> Self
	{
		TagWriter { bytes }
	}

	pub fn push(&mut self, name: TagName, value: &TagValue) -> error::Result<&mut Self>
	{
		let mut entry = Vec::with_capacity(TAG_HEADER_SIZE + 4);
		entry.extend_from_slice(&name);
		entry.push(value.tag_type().code());

		match value
		{
			TagValue::Char(c) =>
			{
				if !c.is_ascii()
				{
					return Err(error::Error::InvalidTagString(c.to_string()));
				}
				entry.push(*c as u8);
			}
			TagValue::I8(v) => entry.extend_from_slice(&v.to_le_bytes()),
			TagValue::U8(v) => entry.push(*v),
			TagValue::I16(v) => entry.extend_from_slice(&v.to_le_bytes()),
			TagValue::U16(v) | TagValue::Half(v) => entry.extend_from_slice(&v.to_le_bytes()),
			TagValue::I32(v) => entry.extend_from_slice(&v.to_le_bytes()),
			TagValue::U32(v) => entry.extend_from_slice(&v.to_le_bytes()),
			TagValue::String(s) =>
			{
				if s.contains(&0)
				{
					return Err(error::Error::InvalidTagString(tag_name_lossy(s)));
				}
				entry.extend_from_slice(s);
				entry.push(0);
			}
			TagValue::Hex(s) =>
			{
				if !s.iter().all(u8::is_ascii_hexdigit)
				{
					return Err(error::Error::InvalidTagString(tag_name_lossy(s)));
				}
				entry.extend_from_slice(s);
				entry.push(0);
			}
		}

		self.bytes.extend_from_slice(&entry);
		Ok(self)
	}

	pub fn as_bytes(&self) -> &[u8]
	{
		&self.bytes
	}

	pub fn into_inner(self) -> Vec<u8>
	{
		self.bytes
	}
}
