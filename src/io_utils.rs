//! I/O utilities for CSV reading, decoding, and serialization.
//!
//! All file I/O in sheet-merge flows through this module. It provides:
//!
//! - **Delimiter resolution**: extension-based auto-detection (`.csv` → comma,
//!   `.tsv` → tab) with manual override support.
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8.
//! - **Reader construction**: `open_csv_reader` and `open_csv_reader_from_path`.
//! - **Serialization**: [`to_csv`] renders header plus rows with
//!   `QuoteStyle::Always` for round-trip safety; output is always UTF-8.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8, has_headers: bool) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(has_headers)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false);
    builder.from_reader(reader)
}

pub fn open_csv_reader_from_path(
    path: &Path,
    delimiter: u8,
    has_headers: bool,
) -> Result<csv::Reader<BufReader<File>>> {
    let reader =
        BufReader::new(File::open(path).with_context(|| format!("Opening input file {path:?}"))?);
    Ok(open_csv_reader(reader, delimiter, has_headers))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

pub fn reader_headers<R>(
    reader: &mut csv::Reader<R>,
    encoding: &'static Encoding,
) -> Result<Vec<String>>
where
    R: Read,
{
    let headers = reader.byte_headers()?.clone();
    decode_headers(&headers, encoding)
}

pub fn decode_headers(
    record: &csv::ByteRecord,
    encoding: &'static Encoding,
) -> Result<Vec<String>> {
    decode_record(record, encoding)
}

/// Renders a header and rows as CSV text with every field double-quoted and
/// embedded quotes doubled, records separated by `\n`. Serialization happens
/// entirely in memory so the caller can persist the result in a single write.
pub fn to_csv(headers: &[String], rows: &[Vec<String>]) -> Result<String> {
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(DEFAULT_CSV_DELIMITER)
        .quote_style(QuoteStyle::Always)
        .double_quote(true)
        .terminator(csv::Terminator::Any(b'\n'));
    let mut writer = builder.from_writer(Vec::new());
    writer.write_record(headers).context("Writing CSV header")?;
    for (row_idx, row) in rows.iter().enumerate() {
        writer
            .write_record(row)
            .with_context(|| format!("Writing CSV row {}", row_idx + 2))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow!("Flushing CSV output buffer: {err}"))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_csv_quotes_every_field_and_doubles_embedded_quotes() {
        let headers = vec!["col".to_string()];
        let rows = vec![vec!["a\"b,c".to_string()]];
        let rendered = to_csv(&headers, &rows).expect("serialize");
        assert_eq!(rendered, "\"col\"\n\"a\"\"b,c\"\n");
    }

    #[test]
    fn to_csv_round_trips_through_a_reader() {
        let headers = vec!["name".to_string(), "note".to_string()];
        let rows = vec![vec!["LeBron James".to_string(), "a\"b,c".to_string()]];
        let rendered = to_csv(&headers, &rows).expect("serialize");

        let mut reader = open_csv_reader(rendered.as_bytes(), b',', true);
        let parsed = reader
            .records()
            .next()
            .expect("one record")
            .expect("valid record");
        assert_eq!(parsed.get(0), Some("LeBron James"));
        assert_eq!(parsed.get(1), Some("a\"b,c"));
    }

    #[test]
    fn resolve_input_delimiter_honors_extension_and_override() {
        assert_eq!(
            resolve_input_delimiter(Path::new("data.tsv"), None),
            DEFAULT_TSV_DELIMITER
        );
        assert_eq!(
            resolve_input_delimiter(Path::new("data.csv"), None),
            DEFAULT_CSV_DELIMITER
        );
        assert_eq!(resolve_input_delimiter(Path::new("data.tsv"), Some(b';')), b';');
    }
}
