use bitflags::bitflags;

bitflags! {
	/// Alignment status bits as stored in the record's flag word.
	///
	/// Bits outside the named set are kept, so the word always round trips
	/// to the value it was built from.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct AlignmentFlag: u16 {
		/// Read comes from paired-end data
		const PAIRED = 1;
		/// Read passed paired-end resolution
		const PROPER_PAIR = 2;
		const UNMAPPED = 4;
		const MATE_UNMAPPED = 8;
		const REVERSE = 16;
		const MATE_REVERSE = 32;
		/// First mate of the pair
		const READ_1 = 64;
		/// Second mate of the pair
		const READ_2 = 128;
		/// Not the primary (best) alignment for the read
		const SECONDARY = 256;
		const QC_FAILED = 512;
		/// PCR or optical duplicate
		const DUPLICATE = 1024;

		const _ = !0;
	}
}

impl AlignmentFlag
{
	pub fn from_raw(flag: u16) -> Self
	{
		AlignmentFlag::from_bits_retain(flag)
	}

	pub fn is_paired(self) -> bool
	{
		self.contains(AlignmentFlag::PAIRED)
	}

	pub fn is_proper_pair(self) -> bool
	{
		self.contains(AlignmentFlag::PROPER_PAIR)
	}

	pub fn is_mapped(self) -> bool
	{
		!self.contains(AlignmentFlag::UNMAPPED)
	}

	pub fn is_mate_mapped(self) -> bool
	{
		!self.contains(AlignmentFlag::MATE_UNMAPPED)
	}

	pub fn is_reverse_strand(self) -> bool
	{
		self.contains(AlignmentFlag::REVERSE)
	}

	pub fn is_mate_reverse_strand(self) -> bool
	{
		self.contains(AlignmentFlag::MATE_REVERSE)
	}

	pub fn is_first_mate(self) -> bool
	{
		self.contains(AlignmentFlag::READ_1)
	}

	pub fn is_second_mate(self) -> bool
	{
		self.contains(AlignmentFlag::READ_2)
	}

	pub fn is_primary_alignment(self) -> bool
	{
		!self.contains(AlignmentFlag::SECONDARY)
	}

	pub fn is_failed_qc(self) -> bool
	{
		self.contains(AlignmentFlag::QC_FAILED)
	}

	pub fn is_duplicate(self) -> bool
	{
		self.contains(AlignmentFlag::DUPLICATE)
	}
}

impl From<u16> for AlignmentFlag
{
	fn from(flag: u16) -> Self
	{
		AlignmentFlag::from_raw(flag)
	}
}

impl From<AlignmentFlag> for u16
{
	fn from(flag: AlignmentFlag) -> Self
	{
		flag.bits()
	}
}
