// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Upload decoding and row tokenizing

mod csv_parser;
mod text_decoder;

pub use csv_parser::{tokenizer_for, CsvParser, RowTokenizer, SplitTokenizer};
pub use text_decoder::decode_upload;
