//! Source configuration: where the workbook lives and how its files are read.
//!
//! Constructed once at startup from an optional JSON file plus CLI overrides,
//! then passed read-only into the table source.

use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::cli::MergeArgs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory containing one CSV file per named table.
    pub workbook: PathBuf,
    /// Delimiter for the workbook files; per-file extension detection applies
    /// when unset.
    #[serde(default)]
    pub delimiter: Option<char>,
    /// Character encoding label for the workbook files (defaults to utf-8).
    #[serde(default)]
    pub encoding: Option<String>,
}

impl SourceConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Reading source configuration {path:?}"))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Parsing source configuration {path:?}"))
    }

    /// Merges the JSON configuration (if any) with CLI overrides. CLI flags
    /// win over file values; a workbook directory must come from one of them.
    pub fn resolve(args: &MergeArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self {
                workbook: PathBuf::new(),
                delimiter: None,
                encoding: None,
            },
        };
        if let Some(dir) = &args.workbook {
            config.workbook = dir.clone();
        }
        if config.workbook.as_os_str().is_empty() {
            return Err(anyhow!(
                "A workbook directory is required; pass --workbook or set it in --config"
            ));
        }
        if let Some(delimiter) = args.delimiter {
            config.delimiter = Some(delimiter as char);
        }
        if let Some(encoding) = &args.input_encoding {
            config.encoding = Some(encoding.clone());
        }
        Ok(config)
    }

    pub fn delimiter_byte(&self) -> Result<Option<u8>> {
        match self.delimiter {
            None => Ok(None),
            Some(ch) if ch.is_ascii() => Ok(Some(ch as u8)),
            Some(ch) => Err(anyhow!("Configured delimiter '{ch}' must be ASCII")),
        }
    }
}
