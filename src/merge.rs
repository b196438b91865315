//! Key-based join of the primary and secondary tables.
//!
//! The secondary table is indexed once by join key; the primary table is then
//! walked in order, each row matched against the index and extended with the
//! secondary-only columns. Unmatched rows degrade to empty-string fill rather
//! than erroring, and an empty source table skips the whole run so a prior
//! output file is never clobbered by a blank export.

use std::{collections::HashMap, fs, path::PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::{
    cli::MergeArgs,
    config::SourceConfig,
    io_utils, key,
    source::{CsvWorkbook, Table, TableSource},
};

/// Outcome of one merge run. `Skipped` names the table that had no data rows.
#[derive(Debug)]
pub enum MergeOutcome {
    Written { rows: usize, path: PathBuf },
    Skipped { table: String },
}

pub fn execute(args: &MergeArgs) -> Result<MergeOutcome> {
    let config = SourceConfig::resolve(args)?;
    let workbook = CsvWorkbook::open(&config)?;

    let primary = workbook.fetch(&args.primary)?;
    let secondary = workbook.fetch(&args.secondary)?;

    for table in [&primary, &secondary] {
        if table.is_empty() {
            warn!(
                "Table '{}' has no data rows; skipping merge to preserve any existing output",
                table.name
            );
            return Ok(MergeOutcome::Skipped {
                table: table.name.clone(),
            });
        }
    }

    let (headers, rows) = merge_tables(&primary, &secondary, args.name_column, args.team_column);
    info!(
        "Merged {} primary row(s) against {} secondary row(s) into {} column(s)",
        primary.rows.len(),
        secondary.rows.len(),
        headers.len()
    );

    let rendered = io_utils::to_csv(&headers, &rows)?;
    fs::write(&args.output, rendered)
        .with_context(|| format!("Writing merged output to {:?}", args.output))?;

    Ok(MergeOutcome::Written {
        rows: rows.len(),
        path: args.output.clone(),
    })
}

/// Builds the join-key lookup over the secondary table's data rows. A later
/// row with a duplicate key overwrites the earlier entry.
pub fn build_index(
    table: &Table,
    name_column: usize,
    team_column: usize,
) -> HashMap<String, Vec<String>> {
    let mut index = HashMap::with_capacity(table.rows.len());
    for row in &table.rows {
        index.insert(key::row_key(row, name_column, team_column), row.clone());
    }
    index
}

/// Computes the merged header: primary columns first, then every secondary
/// column whose name (exact, case-sensitive match) is absent from the
/// primary header, in secondary order. The second element holds the added
/// columns' indices into the secondary header.
pub fn merged_header(primary: &[String], secondary: &[String]) -> (Vec<String>, Vec<usize>) {
    let mut headers = primary.to_vec();
    let mut added = Vec::new();
    for (idx, name) in secondary.iter().enumerate() {
        if !primary.contains(name) {
            headers.push(name.clone());
            added.push(idx);
        }
    }
    (headers, added)
}

/// Extends one primary row with the added secondary columns. A missing match
/// or a short secondary row fills with empty strings; the output is always
/// `primary_width + added.len()` cells.
pub fn merge_row(
    primary_row: &[String],
    primary_width: usize,
    index: &HashMap<String, Vec<String>>,
    added: &[usize],
    name_column: usize,
    team_column: usize,
) -> Vec<String> {
    let mut merged = primary_row.to_vec();
    merged.resize(primary_width, String::new());

    let matched = index.get(&key::row_key(primary_row, name_column, team_column));
    merged.extend(added.iter().map(|idx| {
        matched
            .and_then(|row| row.get(*idx))
            .cloned()
            .unwrap_or_default()
    }));
    merged
}

/// Joins the two tables; primary row order anchors the output.
pub fn merge_tables(
    primary: &Table,
    secondary: &Table,
    name_column: usize,
    team_column: usize,
) -> (Vec<String>, Vec<Vec<String>>) {
    let index = build_index(secondary, name_column, team_column);
    let (headers, added) = merged_header(&primary.headers, &secondary.headers);
    let rows = primary
        .rows
        .iter()
        .map(|row| {
            merge_row(
                row,
                primary.headers.len(),
                &index,
                &added,
                name_column,
                team_column,
            )
        })
        .collect();
    (headers, rows)
}
