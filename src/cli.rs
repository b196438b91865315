use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Merge spreadsheet-exported tables by name/team key", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Join a primary and secondary table and write the merged CSV
    Merge(MergeArgs),
}

#[derive(Debug, Args)]
pub struct MergeArgs {
    /// Workbook directory containing one CSV file per table
    #[arg(short = 'w', long = "workbook")]
    pub workbook: Option<PathBuf>,
    /// JSON source configuration file (workbook, delimiter, encoding)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Name of the primary table; its columns and row order anchor the output
    #[arg(long = "primary")]
    pub primary: String,
    /// Name of the secondary table whose extra columns are appended
    #[arg(long = "secondary")]
    pub secondary: String,
    /// Output CSV file
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// Zero-based position of the name column in both tables
    #[arg(long = "name-column", default_value_t = 0)]
    pub name_column: usize,
    /// Zero-based position of the team column in both tables
    #[arg(long = "team-column", default_value_t = 2)]
    pub team_column: usize,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
