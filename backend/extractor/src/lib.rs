pub mod providers;
pub mod records;

pub use records::{parse_records, Extraction, ExtractionError, RecordExtractor, EXTRACTION_PROMPT};
