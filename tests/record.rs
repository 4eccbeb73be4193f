use bamtag::bam::{
	lookup, AlignmentFlag, AlignmentRecord, RefData, RefVector, TagName, TagScanner, TagType,
	TagValue, TagWidth, TagWriter,
};
use bamtag::error::Error;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const RNG_SEED: u64 = 42;

fn random_value(rng: &mut StdRng) -> TagValue
{
	match rng.gen_range(0..10)
	{
		0 => TagValue::Char(rng.gen_range(b'!'..=b'~') as char),
		1 => TagValue::I8(rng.gen()),
		2 => TagValue::U8(rng.gen()),
		3 => TagValue::I16(rng.gen()),
		4 => TagValue::U16(rng.gen()),
		5 => TagValue::Half(rng.gen()),
		6 => TagValue::I32(rng.gen()),
		7 => TagValue::U32(rng.gen()),
		8 =>
		{
			let len = rng.gen_range(0..20);
			let s: String = (0..len)
				.map(|_| rng.gen_range(b' '..=b'~') as char)
				.collect();
			TagValue::string(&s)
		}
		_ =>
		{
			let len = rng.gen_range(0..8) * 2;
			let s: String = (0..len)
				.map(|_| b"0123456789ABCDEF"[rng.gen_range(0..16)] as char)
				.collect();
			TagValue::hex(&s)
		}
	}
}

fn encoded_width(value: &TagValue) -> usize
{
	match value.tag_type().width()
	{
		TagWidth::Fixed(size) => size,
		TagWidth::NulTerminated => value.as_str().map_or(0, str::len) + 1,
	}
}

#[test]
fn test_random_blocks_round_trip()
{
	let mut rng = StdRng::seed_from_u64(RNG_SEED);

	for _ in 0..200
	{
		let n_tags = rng.gen_range(0..12);
		let mut writer = TagWriter::new();
		let mut expected: Vec<(TagName, TagValue)> = Vec::new();

		for index in 0..n_tags
		{
			// unique names so first-match is unambiguous
			let name = [b'A' + (index as u8), b'0' + rng.gen_range(0..10)];
			let value = random_value(&mut rng);
			writer.push(name, &value).unwrap();
			expected.push((name, value));
		}

		let bytes = writer.into_inner();

		for (name, value) in &expected
		{
			assert_eq!(lookup(&bytes, *name).unwrap().as_ref(), Some(value));
		}
		assert_eq!(lookup(&bytes, *b"zz").unwrap(), None);

		let mut scanner = TagScanner::new(&bytes);
		let mut consumed = 0;
		for (name, value) in &expected
		{
			let tag = scanner.next_tag().unwrap().unwrap();
			assert_eq!(tag.name, *name);

			consumed += 3 + encoded_width(value);
			assert_eq!(scanner.offset(), consumed);
		}

		assert_eq!(scanner.next_tag().unwrap(), None);
		assert_eq!(scanner.offset(), bytes.len());
	}
}

#[test]
fn test_random_type_codes_never_panic()
{
	let mut rng = StdRng::seed_from_u64(RNG_SEED);

	for _ in 0..500
	{
		let len = rng.gen_range(0..64);
		let bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();

		// every outcome is fine as long as the scan terminates
		let _ = lookup(&bytes, *b"RG");
		assert!(TagScanner::new(&bytes).count() <= bytes.len());
	}
}

#[test]
fn test_bad_type_code_after_valid_entries()
{
	let mut writer = TagWriter::new();
	writer
		.push(*b"RG", &TagValue::string("sample1"))
		.unwrap()
		.push(*b"XX", &TagValue::I32(7))
		.unwrap();

	let mut bytes = writer.into_inner();
	let bad_offset = bytes.len() + 2;
	bytes.extend_from_slice(b"YYq\x00");

	assert_eq!(
		lookup(&bytes, *b"ZZ"),
		Err(Error::UnknownTagType {
			tag: "YY".to_string(),
			code: 'q',
			offset: bad_offset,
		})
	);
}

#[test]
fn test_read_group_scenario()
{
	let mut tag_data = b"RGZsample1\0".to_vec();
	tag_data.extend_from_slice(b"XXi");
	tag_data.extend_from_slice(&1_000_000i32.to_le_bytes());

	let record = AlignmentRecord::builder()
		.name("read/1")
		.tag_data(tag_data)
		.build()
		.unwrap();

	assert_eq!(record.read_group().unwrap().as_deref(), Some("sample1"));
	assert_eq!(record.tag(*b"XX").unwrap(), Some(TagValue::I32(1_000_000)));
	assert_eq!(record.tag(*b"YY").unwrap(), None);
	assert_eq!(record.tags().count(), 2);
}

#[test]
fn test_full_record()
{
	let refs: RefVector = vec![RefData::new("chr1", 5_000), RefData::new("chr7", 9_000)]
		.into_iter()
		.collect();

	let mut builder = AlignmentRecord::builder();
	builder
		.name("frag42")
		.query_bases(b"ACGTACGT")
		.qualities(b"IIIIHHHH")
		.ref_id(refs.index_of("chr7").unwrap())
		.position(1_200)
		.map_quality(60)
		.bin(4681)
		.flag(1u16 | 2 | 64 | 32)
		.cigar(bamtag::bam::decode_packed_cigar(&((8u32 << 4).to_le_bytes())).unwrap())
		.mate_ref_id(1)
		.mate_position(1_450)
		.insert_size(258);
	builder.push_tag(*b"NM", TagValue::U8(0)).unwrap();

	let record = builder.build().unwrap();

	assert_eq!(record.reference(&refs).unwrap().name_as_str(), "chr7");
	assert_eq!(record.mate_reference(&refs).unwrap().length, 9_000);
	assert_eq!(record.aligned_bases(), b"ACGTACGT");
	assert_eq!(record.length(), 8);
	assert_eq!(record.end_position(), 1_208);
	assert_eq!(record.map_quality(), 60);
	assert_eq!(record.bin(), 4681);
	assert_eq!(record.insert_size(), 258);
	assert_eq!(record.mate_position(), 1_450);
	assert_eq!(record.qualities(), b"IIIIHHHH");

	assert!(record.is_paired());
	assert!(record.is_proper_pair());
	assert!(record.is_first_mate());
	assert!(record.is_mate_reverse_strand());
	assert!(!record.is_reverse_strand());
	assert!(!record.is_duplicate());
	assert!(!record.is_failed_qc());
	assert_eq!(record.flag(), AlignmentFlag::from_raw(99));

	assert_eq!(record.read_group().unwrap(), None);
	assert_eq!(record.tag(*b"NM").unwrap().and_then(|v| v.as_int()), Some(0));
}

#[test]
fn test_tag_type_codes_match_wire()
{
	let value = TagValue::U32(0xDEADBEEF);
	let mut writer = TagWriter::new();
	writer.push(*b"XU", &value).unwrap();

	assert_eq!(writer.as_bytes(), b"XUI\xef\xbe\xad\xde");
	assert_eq!(TagType::from_code(writer.as_bytes()[2]), Some(TagType::U32));
}
