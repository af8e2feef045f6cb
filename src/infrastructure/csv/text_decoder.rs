// ============================================================
// TEXT DECODER
// ============================================================
// Turn uploaded bytes into text before tokenizing

use crate::domain::error::{AppError, Result};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Decode upload bytes as UTF-8, falling back to Windows-1252
///
/// Spreadsheet binaries (`.xls`, `.xlsx`) are not parsed; anything with NUL
/// bytes is refused instead of being decoded into garbage.
pub fn decode_upload(bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    if bytes.is_empty() {
        return Err(AppError::ParseError("File is empty".to_string()));
    }

    if bytes.contains(&0) {
        return Err(AppError::ParseError(
            "File could not be read as text".to_string(),
        ));
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => {
            // Excel-exported CSVs are commonly Windows-1252
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            Ok(decoded.into_owned())
        }
    }
}
