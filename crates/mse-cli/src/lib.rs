// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Reusable pieces of the `mse` command-line front end: CSV series
//! parsing and the thin analysis entry point the binary drives.

pub mod plot;

use mse_core::{MseError, SignalView};
use mse_multiscale::{EvalHooks, MultiscaleConfig, MultiscaleResult, multiscale_entropy_with_hooks};

/// Executes a multiscale analysis against an input view.
pub fn run_analysis(
    view: &SignalView<'_>,
    config: &MultiscaleConfig,
    hooks: &EvalHooks<'_>,
) -> Result<MultiscaleResult, MseError> {
    multiscale_entropy_with_hooks(view, config, hooks)
}

/// Parses CSV text into a row-major value buffer plus its shape.
///
/// Rows must agree on their column count. A single leading non-numeric row
/// over numeric data is treated as a header and skipped.
pub fn parse_csv_data(raw: &str) -> Result<(Vec<f64>, usize, usize), MseError> {
    let rows: Vec<&str> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if rows.is_empty() {
        return Err(MseError::invalid_input("CSV input is empty"));
    }

    match parse_csv_rows(&rows) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            if rows.len() > 1 && first_row_looks_like_header(rows[0], rows[1]) {
                if let Ok(without_header) = parse_csv_rows(&rows[1..]) {
                    return Ok(without_header);
                }
            }
            Err(err)
        }
    }
}

fn parse_csv_rows(rows: &[&str]) -> Result<(Vec<f64>, usize, usize), MseError> {
    let mut values = Vec::<f64>::new();
    let mut expected_cols: Option<usize> = None;

    for (row_idx, row) in rows.iter().enumerate() {
        let cells: Vec<&str> = row.split(',').map(str::trim).collect();

        if let Some(cols) = expected_cols {
            if cells.len() != cols {
                return Err(MseError::invalid_input(format!(
                    "CSV row {} has {} columns but expected {cols}",
                    row_idx + 1,
                    cells.len()
                )));
            }
        } else {
            expected_cols = Some(cells.len());
        }

        for (col_idx, cell) in cells.iter().enumerate() {
            if cell.is_empty() {
                return Err(MseError::invalid_input(format!(
                    "CSV row {} column {} is empty",
                    row_idx + 1,
                    col_idx + 1
                )));
            }
            let value = cell.parse::<f64>().map_err(|_| {
                MseError::invalid_input(format!(
                    "CSV row {} column {} is not a valid float: '{cell}'",
                    row_idx + 1,
                    col_idx + 1
                ))
            })?;
            values.push(value);
        }
    }

    let d = expected_cols.unwrap_or(0);
    let n = rows.len();
    Ok((values, n, d))
}

fn first_row_looks_like_header(first_row: &str, second_row: &str) -> bool {
    let first_cells: Vec<&str> = first_row.split(',').map(str::trim).collect();
    let second_cells: Vec<&str> = second_row.split(',').map(str::trim).collect();

    if first_cells.is_empty()
        || first_cells.len() != second_cells.len()
        || first_cells.iter().any(|cell| cell.is_empty())
        || second_cells.iter().any(|cell| cell.is_empty())
    {
        return false;
    }

    let first_all_non_numeric = first_cells.iter().all(|cell| cell.parse::<f64>().is_err());
    let second_all_numeric = second_cells.iter().all(|cell| cell.parse::<f64>().is_ok());
    first_all_non_numeric && second_all_numeric
}
