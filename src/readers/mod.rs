pub mod archive_reader;
pub mod block_tagger;
pub mod header_extractor;

pub use archive_reader::ArchiveReader;
pub use block_tagger::BlockTagger;
pub use header_extractor::HeaderExtractor;
