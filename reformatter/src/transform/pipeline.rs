//! High-level pipeline API: decode, read, derive, write.
//!
//! # Example
//!
//! ```rust,no_run
//! use expression_reformat::{reformat_file, ReformatOptions};
//!
//! let options = ReformatOptions::new("many_example.csv", "test_many.tsv");
//! let summary = reformat_file(&options).unwrap();
//! println!("Wrote {} rows", summary.rows_written);
//! ```

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ReformatError, ReformatResult};
use crate::logs::{log_debug, log_info, log_info_indent, log_success, log_warning};
use crate::models::{InputRow, OutputRow, OUTPUT_HEADER};
use crate::parser::{decode_input, read_rows, QuoteStrip};

/// Options for a reformat run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReformatOptions {
    /// Source dataset
    pub input: PathBuf,

    /// Destination file, overwritten on every run
    pub output: PathBuf,

    /// How stray quoting is removed from fields
    #[serde(default)]
    pub quote_strip: QuoteStrip,

    /// Force an input encoding instead of detecting it
    #[serde(default)]
    pub encoding: Option<String>,
}

impl ReformatOptions {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            ..Default::default()
        }
    }

    pub fn with_quote_strip(mut self, quote_strip: QuoteStrip) -> Self {
        self.quote_strip = quote_strip;
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }
}

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReformatSummary {
    /// Rows read from the input, header included
    pub rows_read: usize,

    /// Data rows written after the output header
    pub rows_written: usize,

    /// Encoding the input was decoded with
    pub encoding: String,

    /// Column names found in the input header (discarded)
    pub input_header: Vec<String>,
}

/// Reformat the file at `options.input` into `options.output`.
///
/// The output is created (truncated) before the input is opened. On a
/// malformed row the rows written so far are flushed and left in place.
pub fn reformat_file(options: &ReformatOptions) -> ReformatResult<ReformatSummary> {
    log_info(format!("📄 Reformatting: {}", options.input.display()));

    let output = File::create(&options.output).map_err(|source| ReformatError::Output {
        path: options.output.clone(),
        source,
    })?;
    let input = open_input(&options.input)?;

    let summary = reformat(input, output, options)?;

    log_success(format!(
        "Wrote {} rows to {}",
        summary.rows_written,
        options.output.display()
    ));
    Ok(summary)
}

/// Reformat delimited text from `reader` into `writer`.
///
/// The output header is always written, even for empty input. Rows end
/// in `\r\n`.
pub fn reformat<R: Read, W: Write>(
    reader: R,
    writer: W,
    options: &ReformatOptions,
) -> ReformatResult<ReformatSummary> {
    let decoded = decode_input(reader, options.encoding.as_deref())?;
    log_info_indent(format!("Encoding: {}", decoded.encoding), 1);

    let mut summary = ReformatSummary {
        encoding: decoded.encoding,
        ..Default::default()
    };

    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    let written = write_rows(
        &decoded.content,
        &mut out,
        options.quote_strip,
        &mut summary,
    );
    let flushed = out.flush();

    written?;
    flushed.map_err(ReformatError::Flush)?;

    if summary.rows_read == 0 {
        log_warning("Input is empty, wrote header only");
    }
    Ok(summary)
}

fn write_rows<W: Write>(
    content: &str,
    out: &mut csv::Writer<W>,
    strip: QuoteStrip,
    summary: &mut ReformatSummary,
) -> ReformatResult<()> {
    out.write_record(OUTPUT_HEADER).map_err(ReformatError::Write)?;

    for row in read_rows(content, strip) {
        let row = row?;
        summary.rows_read += 1;

        if row.row == 1 {
            log_info_indent(format!("Input columns: {}", row.fields.join(", ")), 1);
            summary.input_header = row.fields;
            continue;
        }

        let derived = OutputRow::from_input(&row)?;
        log_debug(derived.as_record().join(","));
        out.write_record(derived.as_record())
            .map_err(ReformatError::Write)?;
        summary.rows_written += 1;
    }

    Ok(())
}

/// Derive output rows from a file without writing anything.
///
/// At most `limit` data rows are derived; rows past the limit are not
/// inspected.
pub fn parse_file(
    path: &Path,
    options: &ReformatOptions,
    limit: Option<usize>,
) -> ReformatResult<Vec<OutputRow>> {
    let decoded = decode_input(open_input(path)?, options.encoding.as_deref())?;

    read_rows(&decoded.content, options.quote_strip)
        .skip(1)
        .take(limit.unwrap_or(usize::MAX))
        .map(|row| -> ReformatResult<OutputRow> {
            let row: InputRow = row?;
            Ok(OutputRow::from_input(&row)?)
        })
        .collect()
}

fn open_input(path: &Path) -> ReformatResult<File> {
    File::open(path).map_err(|source| ReformatError::Input {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IdentifierError, RowError};
    use std::fs;
    use tempfile::tempdir;

    const HEADER: &str = "Probe,Sample_Type,Disease_State,Sample_ID,Expression_Value\r\n";

    fn run(input: &str) -> (ReformatResult<ReformatSummary>, String) {
        run_with(input, &ReformatOptions::default())
    }

    fn run_with(input: &str, options: &ReformatOptions) -> (ReformatResult<ReformatSummary>, String) {
        let mut out = Vec::new();
        let result = reformat(input.as_bytes(), &mut out, options);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_example_row() {
        let input = "\"|ID|\",\"|Value|\"\n\"|P1 - TypeA_Disease1_S_001|\",\"|12.5|\"\n";
        let (result, output) = run(input);
        let summary = result.unwrap();

        assert_eq!(output, format!("{}P1,TypeA,Disease1,S 001,12.5\r\n", HEADER));
        assert_eq!(summary.rows_read, 2);
        assert_eq!(summary.rows_written, 1);
        assert_eq!(summary.input_header, vec!["ID", "Value"]);
    }

    #[test]
    fn test_header_ignores_input_header_content() {
        let (result, output) = run("whatever,columns,here\nP1 - T_D_S_1,3\n");
        result.unwrap();
        assert!(output.starts_with(HEADER));
    }

    #[test]
    fn test_header_only_input() {
        let (result, output) = run("\"|ID|\",\"|Value|\"\n");
        assert_eq!(result.unwrap().rows_written, 0);
        assert_eq!(output, HEADER);
    }

    #[test]
    fn test_empty_input_writes_header() {
        let (result, output) = run("");
        assert_eq!(result.unwrap().rows_read, 0);
        assert_eq!(output, HEADER);
    }

    #[test]
    fn test_row_count_is_input_minus_header() {
        let mut input = String::from("id,value\n");
        for i in 0..25 {
            input.push_str(&format!("\"|PR{i} - T_D_S_{i}|\",\"|{i}.0|\"\n"));
        }
        let (result, output) = run(&input);
        let summary = result.unwrap();

        assert_eq!(summary.rows_written, 25);
        assert_eq!(output.lines().count(), 26);
        assert!(output.contains("PR7,T,D,S 7,7.0\r\n"));
    }

    #[test]
    fn test_missing_separator_aborts() {
        let input = "id,value\n\"|P1 - T_D_S_1|\",\"|1|\"\n\"|P1_NoSeparator|\",\"|5|\"\n\"|P2 - T_D_S_2|\",\"|2|\"\n";
        let (result, output) = run(input);

        match result.unwrap_err() {
            ReformatError::Row(RowError::Identifier { row, source }) => {
                assert_eq!(row, 3);
                assert_eq!(source, IdentifierError::MissingSeparator("P1_NoSeparator".into()));
            }
            other => panic!("unexpected error: {other}"),
        }
        // Rows before the bad one are flushed, rows after it are not written.
        assert_eq!(output, format!("{}P1,T,D,S 1,1\r\n", HEADER));
    }

    #[test]
    fn test_blank_row_aborts() {
        let (result, output) = run("id,value\nP1 - T_D_S_1,1\n\nP2 - T_D_S_2,2\n");

        assert!(matches!(
            result.unwrap_err(),
            ReformatError::Row(RowError::TooFewFields { row: 3, found: 0 })
        ));
        assert_eq!(output, format!("{}P1,T,D,S 1,1\r\n", HEADER));
    }

    #[test]
    fn test_blank_first_line_is_consumed_as_header() {
        let (result, output) = run("\nid,value\nP1 - T_D_S_1,1\n");

        match result.unwrap_err() {
            ReformatError::Row(RowError::Identifier { row, source }) => {
                assert_eq!(row, 2);
                assert_eq!(source, IdentifierError::MissingSeparator("id".into()));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(output, HEADER);
    }

    #[test]
    fn test_short_descriptor_aborts() {
        let (result, _) = run("id,value\nP1 - T_D_S,1\n");
        assert!(matches!(
            result.unwrap_err(),
            ReformatError::Row(RowError::Identifier {
                source: IdentifierError::TooFewDescriptorParts { found: 3, .. },
                ..
            })
        ));
    }

    #[test]
    fn test_single_field_row_aborts() {
        let (result, _) = run("id,value\nP1 - T_D_S_1\n");
        assert!(matches!(
            result.unwrap_err(),
            ReformatError::Row(RowError::TooFewFields { row: 2, found: 1 })
        ));
    }

    #[test]
    fn test_field_with_comma_is_quoted_in_output() {
        let (result, output) = run("id,value\n|P1 - T_D_S_1|,|1,5|\n");
        result.unwrap();
        assert!(output.ends_with("P1,T,D,S 1,\"1,5\"\r\n"));
    }

    #[test]
    fn test_positional_strip_matches_legacy_behavior() {
        let options = ReformatOptions::default().with_quote_strip(QuoteStrip::Positional);
        let (result, output) = run_with("|\"id\"|,|\"v\"|\n|\"P1 - T_D_S_1\"|,|\"9\"|\n", &options);
        result.unwrap();
        assert_eq!(output, format!("{}P1,T,D,S 1,9\r\n", HEADER));
    }

    #[test]
    fn test_positional_strip_eats_unquoted_characters() {
        let options = ReformatOptions::default().with_quote_strip(QuoteStrip::Positional);
        let (result, output) = run_with("id,value\nXP1 - T_D_S_1Y,X9Y\n", &options);
        result.unwrap();
        assert!(output.ends_with("P1,T,D,S 1,9\r\n"));
    }

    #[test]
    fn test_forced_latin1_encoding() {
        let options = ReformatOptions::default().with_encoding("iso-8859-1");
        let mut input = b"id,value\nP1 - Soci".to_vec();
        input.extend_from_slice(&[0xE9, b't', 0xE9]);
        input.extend_from_slice(b"_D_S_1,2\n");

        let mut out = Vec::new();
        let summary = reformat(input.as_slice(), &mut out, &options).unwrap();
        assert_eq!(summary.encoding, "iso-8859-1");
        assert!(String::from_utf8(out).unwrap().contains("P1,Société,D,S 1,2"));
    }

    #[test]
    fn test_reformat_file_is_idempotent() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("many_example.csv");
        let output = dir.path().join("test_many.tsv");
        fs::write(
            &input,
            "\"|ID|\",\"|Value|\"\n\"|P1 - TypeA_Disease1_S_001|\",\"|12.5|\"\n\"|P2 - TypeB_Healthy_S_002|\",\"|0.3|\"\n",
        )
        .unwrap();

        let options = ReformatOptions::new(&input, &output);
        reformat_file(&options).unwrap();
        let first = fs::read(&output).unwrap();
        reformat_file(&options).unwrap();
        let second = fs::read(&output).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            String::from_utf8(first).unwrap(),
            format!("{}P1,TypeA,Disease1,S 001,12.5\r\nP2,TypeB,Healthy,S 002,0.3\r\n", HEADER)
        );
    }

    #[test]
    fn test_reformat_file_overwrites_existing_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.csv");
        let output = dir.path().join("out.csv");
        fs::write(&input, "id,value\n").unwrap();
        fs::write(&output, "stale content that is much longer than the header\n".repeat(10)).unwrap();

        reformat_file(&ReformatOptions::new(&input, &output)).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), HEADER);
    }

    #[test]
    fn test_missing_input_file() {
        let dir = tempdir().unwrap();
        let options = ReformatOptions::new(dir.path().join("nope.csv"), dir.path().join("out.csv"));

        match reformat_file(&options).unwrap_err() {
            ReformatError::Input { path, .. } => assert!(path.ends_with("nope.csv")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unwritable_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.csv");
        fs::write(&input, "id,value\n").unwrap();
        let options = ReformatOptions::new(&input, dir.path().join("no_such_dir").join("out.csv"));

        assert!(matches!(
            reformat_file(&options).unwrap_err(),
            ReformatError::Output { .. }
        ));
    }

    #[test]
    fn test_parse_file_with_limit() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.csv");
        fs::write(&input, "id,value\nP1 - T_D_S_1,1\nP2 - T_D_S_2,2\nbroken,3\n").unwrap();
        let options = ReformatOptions::default();

        let rows = parse_file(&input, &options, Some(2)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].probe, "P2");

        assert!(parse_file(&input, &options, None).is_err());
    }
}
