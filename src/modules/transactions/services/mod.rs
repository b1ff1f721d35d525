pub mod record_normalizer;
pub mod sort_key;

pub use record_normalizer::{NormalizedBatch, RecordNormalizer};
pub use sort_key::{extract_agent_number, SortKey, SortKeyGenerator, UNRANKED_LOCATION};
