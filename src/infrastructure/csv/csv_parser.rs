// ============================================================
// ROW TOKENIZERS
// ============================================================
// Split raw upload text into a header row and data rows

use csv::{ReaderBuilder, Trim};

use crate::domain::error::{AppError, Result};
use crate::domain::requisition::{ImportConfig, RawRow, TokenizedText, TokenizerMode};

/// Turns raw file text into rows
pub trait RowTokenizer: Send + Sync {
    /// Fails with `ParseError` when the text has no non-blank line
    fn tokenize(&self, text: &str) -> Result<TokenizedText>;
}

fn empty_file() -> AppError {
    AppError::ParseError("File is empty".to_string())
}

/// Outer whitespace and any surrounding `"` characters removed
fn clean_cell(cell: &str) -> String {
    cell.trim().trim_matches('"').trim().to_string()
}

fn split_header(mut rows: Vec<RawRow>) -> Result<TokenizedText> {
    if rows.is_empty() {
        return Err(empty_file());
    }
    let header = rows.remove(0);
    Ok(TokenizedText { header, rows })
}

/// Build the tokenizer selected by `config`
pub fn tokenizer_for(config: &ImportConfig) -> Result<Box<dyn RowTokenizer>> {
    let delimiter = config.delimiter_byte()?;
    let tokenizer: Box<dyn RowTokenizer> = match config.tokenizer {
        TokenizerMode::Quoted => Box::new(
            CsvParser::new()
                .with_delimiter(delimiter)
                .with_delimiter_detection(config.detect_delimiter),
        ),
        TokenizerMode::Split => Box::new(SplitTokenizer::new(config.delimiter)),
    };
    Ok(tokenizer)
}

/// Quote-aware delimited parser; each record is one line
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Sniff the delimiter from the text before parsing
    detect: bool,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            detect: false,
        }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_delimiter_detection(mut self, detect: bool) -> Self {
        self.detect = detect;
        self
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];
        let sample_lines: Vec<_> = content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .take(10)
            .collect();

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        if sample_lines.is_empty() {
            return best_delimiter;
        }

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            // Score by consistency (low standard deviation) and frequency
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}

impl RowTokenizer for CsvParser {
    fn tokenize(&self, text: &str) -> Result<TokenizedText> {
        let delimiter = if self.detect {
            Self::detect_delimiter(text)
        } else {
            self.delimiter
        };

        let mut builder = ReaderBuilder::new();
        builder
            .delimiter(delimiter)
            .has_headers(false)
            .trim(Trim::All)
            .flexible(true); // Allow rows with different lengths

        // One record per non-blank line: a quoted field never spans lines,
        // so an unbalanced quote cannot swallow the rows after it
        let mut rows = Vec::new();
        for (index, line) in text.split('\n').enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match builder.from_reader(line.as_bytes()).records().next() {
                Some(Ok(record)) => rows.push(record.iter().map(clean_cell).collect()),
                Some(Err(e)) => {
                    return Err(AppError::ParseError(format!(
                        "Failed to parse line {}: {}",
                        index + 1,
                        e
                    )))
                }
                None => continue,
            }
        }

        split_header(rows)
    }
}

/// Plain splitter: newline, then delimiter, no quote awareness
pub struct SplitTokenizer {
    delimiter: char,
}

impl SplitTokenizer {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }
}

impl Default for SplitTokenizer {
    fn default() -> Self {
        Self::new(',')
    }
}

impl RowTokenizer for SplitTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenizedText> {
        let rows = text
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.split(self.delimiter).map(clean_cell).collect())
            .collect();

        split_header(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tokenizer_strips_quotes_and_blank_lines() {
        let text = "position_title, \"location\"\r\n\n  \nSWE , \"NYC\"\n";
        let tokenized = SplitTokenizer::default().tokenize(text).unwrap();

        assert_eq!(tokenized.header, vec!["position_title", "location"]);
        assert_eq!(tokenized.rows, vec![vec!["SWE".to_string(), "NYC".to_string()]]);
    }

    #[test]
    fn test_split_tokenizer_ignores_quoting() {
        let text = "a,b\n\"x, y\",z";
        let tokenized = SplitTokenizer::default().tokenize(text).unwrap();
        assert_eq!(tokenized.rows[0], vec!["x", "y", "z"]);
    }

    #[test]
    fn test_quoted_parser_keeps_embedded_delimiter() {
        let text = "a,b\n\"x, y\",z";
        let tokenized = CsvParser::new().tokenize(text).unwrap();
        assert_eq!(tokenized.rows[0], vec!["x, y", "z"]);
    }

    #[test]
    fn test_quoted_parser_skips_whitespace_lines() {
        let text = "a,b\n   \n1,2\n\n3,4\n";
        let tokenized = CsvParser::new().tokenize(text).unwrap();
        assert_eq!(tokenized.rows.len(), 2);
    }

    #[test]
    fn test_empty_text_fails() {
        assert!(matches!(
            CsvParser::new().tokenize("\n \n"),
            Err(AppError::ParseError(_))
        ));
        assert!(matches!(
            SplitTokenizer::default().tokenize(""),
            Err(AppError::ParseError(_))
        ));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(CsvParser::detect_delimiter("a,b,c\nd,e,f"), b',');
        assert_eq!(CsvParser::detect_delimiter("a;b;c\nd;e;f"), b';');
        assert_eq!(CsvParser::detect_delimiter("a\tb\nc\td"), b'\t');
    }

    #[test]
    fn test_detected_delimiter_is_used() {
        let parser = CsvParser::new().with_delimiter_detection(true);
        let tokenized = parser.tokenize("a;b\n1;2").unwrap();
        assert_eq!(tokenized.header, vec!["a", "b"]);
    }

    #[test]
    fn test_quoted_parser_strips_quotes_after_whitespace() {
        let text = "position_title, \"position_category\"\nSWE, \"Eng\"";
        let tokenized = CsvParser::new().tokenize(text).unwrap();
        assert_eq!(tokenized.header, vec!["position_title", "position_category"]);
        assert_eq!(tokenized.rows[0], vec!["SWE", "Eng"]);
    }

    #[test]
    fn test_unbalanced_quote_stays_on_its_line() {
        let text = "a,b,c,d\n\"SWE,Eng,NYC,2\nSRE,Ops,LA,1\n";
        let tokenized = CsvParser::new().tokenize(text).unwrap();
        assert_eq!(tokenized.rows.len(), 2);
        assert_eq!(tokenized.rows[1], vec!["SRE", "Ops", "LA", "1"]);
    }

    #[test]
    fn test_quoted_newline_does_not_merge_rows() {
        let text = "a,b\n\"first\nsecond\",x\n3,4";
        let tokenized = CsvParser::new().tokenize(text).unwrap();
        assert_eq!(tokenized.rows.len(), 3);
    }

    #[test]
    fn test_tokenizer_for_config() {
        let split = tokenizer_for(&ImportConfig::legacy()).unwrap();
        let tokenized = split.tokenize("a,b\n\"x, y\",z").unwrap();
        assert_eq!(tokenized.rows[0].len(), 3);

        let quoted = tokenizer_for(&ImportConfig::default()).unwrap();
        let tokenized = quoted.tokenize("a,b\n\"x, y\",z").unwrap();
        assert_eq!(tokenized.rows[0], vec!["x, y", "z"]);
    }
}
