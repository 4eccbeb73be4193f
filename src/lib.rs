pub mod bam;

pub mod error;
