// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Byte decoding, delimiter detection, and reader construction

mod reader;

pub use reader::{decode_bytes, CsvReader};
