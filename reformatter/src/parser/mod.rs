//! Input decoding and row reading.
//!
//! The input is decoded to UTF-8 (encoding auto-detected unless forced),
//! then tokenized with comma as delimiter and `|` as quote character.
//! Every field then has its stray quoting removed.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};
use crate::models::InputRow;

/// Field delimiter of the input.
pub const INPUT_DELIMITER: u8 = b',';

/// Quote character recognized by the CSV tokenizer.
pub const INPUT_QUOTE: u8 = b'|';

/// Characters treated as stray quoting around a field.
pub const STRAY_QUOTES: [char; 3] = ['"', '\'', '|'];

// =============================================================================
// Quote stripping
// =============================================================================

/// How stray quoting is removed from each field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStrip {
    /// Peel matching quote pairs off both ends, leaving unquoted fields alone.
    #[default]
    Matching,
    /// Drop exactly one character from each end, whatever it is.
    Positional,
}

/// Remove stray quoting from a field.
///
/// ```
/// use expression_reformat::{strip_quotes, QuoteStrip};
///
/// assert_eq!(strip_quotes("\"|12.5|\"", QuoteStrip::Matching), "12.5");
/// assert_eq!(strip_quotes("12.5", QuoteStrip::Matching), "12.5");
/// assert_eq!(strip_quotes("12.5", QuoteStrip::Positional), "2.");
/// ```
pub fn strip_quotes(field: &str, mode: QuoteStrip) -> &str {
    match mode {
        QuoteStrip::Matching => strip_matching(field),
        QuoteStrip::Positional => strip_positional(field),
    }
}

fn strip_matching(mut field: &str) -> &str {
    loop {
        let mut chars = field.chars();
        match (chars.next(), chars.next_back()) {
            (Some(first), Some(last)) if first == last && STRAY_QUOTES.contains(&first) => {
                field = chars.as_str();
            }
            _ => return field,
        }
    }
}

fn strip_positional(field: &str) -> &str {
    let mut chars = field.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

// =============================================================================
// Encoding
// =============================================================================

/// Decoded input text and the encoding it was decoded from.
#[derive(Debug, Clone)]
pub struct DecodedInput {
    pub content: String,
    pub encoding: String,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to a string using the named encoding.
///
/// UTF-8 input is decoded lossily. Labels unknown to `encoding_rs` are an
/// error.
pub fn decode_content(bytes: &[u8], encoding: &str) -> ParseResult<String> {
    let encoding = encoding_rs::Encoding::for_label(encoding.trim().as_bytes())
        .ok_or_else(|| ParseError::Encoding(encoding.to_string()))?;

    if encoding == encoding_rs::UTF_8 {
        return Ok(String::from_utf8_lossy(bytes).into_owned());
    }

    let (decoded, _, _) = encoding.decode(bytes);
    Ok(decoded.into_owned())
}

/// Read the whole input and decode it.
///
/// With `encoding == None` the encoding is detected; a detected label that
/// `encoding_rs` does not know falls back to UTF-8.
pub fn decode_input<R: Read>(mut reader: R, encoding: Option<&str>) -> ParseResult<DecodedInput> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let bytes = bytes
        .strip_prefix(b"\xEF\xBB\xBF".as_slice())
        .unwrap_or(bytes.as_slice());

    match encoding {
        Some(forced) => Ok(DecodedInput {
            content: decode_content(bytes, forced)?,
            encoding: forced.to_string(),
        }),
        None => {
            let detected = detect_encoding(bytes);
            match decode_content(bytes, &detected) {
                Ok(content) => Ok(DecodedInput {
                    content,
                    encoding: detected,
                }),
                Err(_) => Ok(DecodedInput {
                    content: String::from_utf8_lossy(bytes).into_owned(),
                    encoding: "utf-8".to_string(),
                }),
            }
        }
    }
}

// =============================================================================
// Rows
// =============================================================================

/// Iterator over the quote-stripped rows of decoded input text.
///
/// Records are tokenized one at a time as the iterator advances; the text
/// itself is already fully in memory (see [`decode_input`]).
///
/// A blank line is a row with no fields. The tokenizer skips blank lines, so
/// they are recovered from the line breaks between consecutive records.
pub struct Rows<'a> {
    content: &'a [u8],
    reader: csv::Reader<&'a [u8]>,
    record: csv::StringRecord,
    strip: QuoteStrip,
    row: usize,
    /// Bytes handed to the tokenizer so far.
    consumed: usize,
    /// End of the previous record's text, terminator excluded.
    record_end: Option<usize>,
    blank_lines: usize,
    pending: Option<Vec<String>>,
    finished: bool,
}

impl<'a> Rows<'a> {
    fn advance(&mut self) -> ParseResult<()> {
        let content = self.content;
        let start = self.consumed;
        let more = self.reader.read_record(&mut self.record)?;
        let end = if more {
            (self.reader.position().byte() as usize).clamp(start, content.len())
        } else {
            content.len()
        };
        self.consumed = end;

        let region = &content[start..end];
        let leading = region.iter().take_while(|b| is_line_break(**b)).count();
        let gap_start = self.record_end.unwrap_or(0).min(start + leading);
        let breaks = count_line_breaks(&content[gap_start..start + leading]);

        // The first break after a record terminates it; the rest are blank lines.
        self.blank_lines = match self.record_end {
            Some(_) => breaks.saturating_sub(1),
            None => breaks,
        };

        if more {
            let trailing = region.iter().rev().take_while(|b| is_line_break(**b)).count();
            self.record_end = Some(end - trailing.min(region.len() - leading));

            let strip = self.strip;
            self.pending = Some(
                self.record
                    .iter()
                    .map(|field| strip_quotes(field, strip).to_string())
                    .collect(),
            );
        } else {
            self.finished = true;
        }
        Ok(())
    }
}

impl<'a> Iterator for Rows<'a> {
    type Item = ParseResult<InputRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.blank_lines == 0 && self.pending.is_none() && !self.finished {
            if let Err(e) = self.advance() {
                self.finished = true;
                return Some(Err(e));
            }
        }

        let fields = if self.blank_lines > 0 {
            self.blank_lines -= 1;
            Vec::new()
        } else {
            self.pending.take()?
        };

        self.row += 1;
        Some(Ok(InputRow::new(self.row, fields)))
    }
}

fn is_line_break(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

/// Number of line breaks in a run of `\r`/`\n` bytes; `\r\n` counts once.
fn count_line_breaks(run: &[u8]) -> usize {
    let mut count = 0;
    let mut i = 0;
    while i < run.len() {
        i += if run[i] == b'\r' && run.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
        count += 1;
    }
    count
}

/// Tokenize decoded text into rows, header included.
///
/// Rows are numbered from 1 and may have any number of fields. Blank lines
/// are rows with no fields.
pub fn read_rows(content: &str, strip: QuoteStrip) -> Rows<'_> {
    let content = content.as_bytes();
    let reader = csv::ReaderBuilder::new()
        .delimiter(INPUT_DELIMITER)
        .quote(INPUT_QUOTE)
        .has_headers(false)
        .flexible(true)
        .from_reader(content);

    Rows {
        content,
        reader,
        record: csv::StringRecord::new(),
        strip,
        row: 0,
        consumed: 0,
        record_end: None,
        blank_lines: 0,
        pending: None,
        finished: false,
    }
}
