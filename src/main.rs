use bamtag::bam::{AlignmentRecord, TagName};
use bamtag::error;

use async_compression::tokio::bufread::GzipDecoder;

use tokio::fs::File as TokioFile;
use tokio::io::{AsyncReadExt, BufReader as TokioBufReader};

use log::debug;

use std::path::Path;

// Loads a raw tag block, gunzipping when the file name ends in .gz
async fn read_tag_block(path: &Path) -> error::Result<Vec<u8>>
{
	let file = TokioFile::open(path)
		.await
		.map_err(|_| error::Error::IOError(path.to_string_lossy().to_string()))?;

	let mut reader = TokioBufReader::new(file);
	let mut bytes = Vec::new();

	let read = if path.extension().map_or(false, |ext| ext == "gz")
	{
		debug!("decompressing {:?}", path);
		GzipDecoder::new(reader).read_to_end(&mut bytes).await
	}
	else
	{
		reader.read_to_end(&mut bytes).await
	};

	read.map_err(|_| error::Error::IOError(path.to_string_lossy().to_string()))?;

	debug!("l_tags = {}", bytes.len());

	Ok(bytes)
}

#[tokio::main]
async fn main() -> anyhow::Result<()>
{
	env_logger::init();

	let mut args = std::env::args().skip(1);

	let path = match args.next()
	{
		Some(path) => path,
		None => anyhow::bail!("usage: bamtag_example <tag-block[.gz]> [TAG]..."),
	};

	let tag_data = read_tag_block(Path::new(&path)).await?;

	let record = AlignmentRecord::builder()
		.name(&path)
		.tag_data(tag_data)
		.build()?;

	let names: Vec<String> = args.collect();

	if names.is_empty()
	{
		for tag in record.tags()
		{
			let tag = tag?;
			println!(
				"{}:{}:{}",
				tag.name_as_str(),
				tag.tag_type.code() as char,
				tag.decode()
			);
		}

		if let Some(read_group) = record.read_group()?
		{
			println!("read group = {}", read_group);
		}

		return Ok(());
	}

	for name in names
	{
		let tag: TagName = match name.as_bytes()
		{
			[a, b] => [*a, *b],
			_ => anyhow::bail!("tag names are two characters, got {:?}", name),
		};

		match record.tag(tag)?
		{
			Some(value) => println!("{}:{}:{}", name, value.tag_type().code() as char, value),
			None => println!("{} not found", name),
		}
	}

	Ok(())
}
