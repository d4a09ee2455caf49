//! Rectangular numeric table ingest (the `np.loadtxt` equivalent).
//!
//! Rows are independent simulation trials; columns are lattice sites. The
//! loader enforces what the downstream reducer assumes: every row has the
//! same column count and every value is a finite float.

use std::fs;
use std::path::Path;

use crate::error::AppError;

/// Parse a whitespace-delimited numeric table.
///
/// Blank lines and `#` comment lines are skipped.
pub fn parse_table(text: &str) -> Result<Vec<Vec<f64>>, AppError> {
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut row = Vec::new();
        for token in line.split_whitespace() {
            let v = token.parse::<f64>().map_err(|_| {
                AppError::new(2, format!("Line {}: invalid float '{token}'.", idx + 1))
            })?;
            if !v.is_finite() {
                return Err(AppError::new(
                    3,
                    format!("Line {}: non-finite value '{token}'.", idx + 1),
                ));
            }
            row.push(v);
        }

        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(AppError::new(
                    3,
                    format!(
                        "Line {}: {} columns, expected {} (table must be rectangular).",
                        idx + 1,
                        row.len(),
                        first.len()
                    ),
                ));
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(AppError::new(3, "Table contains no data rows."));
    }
    Ok(rows)
}

/// Load and parse a table file.
pub fn load_table(path: &Path) -> Result<Vec<Vec<f64>>, AppError> {
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::new(2, format!("Failed to open table '{}': {e}", path.display()))
    })?;
    parse_table(&text).map_err(|e| AppError::new(e.exit_code(), format!("{}: {e}", path.display())))
}

/// Write a table in the same whitespace-delimited format the loader reads.
///
/// Used by the `synth` subcommand to produce demo inputs.
pub fn write_table(path: &Path, rows: &[Vec<f64>]) -> Result<(), AppError> {
    use std::io::Write;

    let mut file = fs::File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create table '{}': {e}", path.display()))
    })?;
    for row in rows {
        let line: Vec<String> = row.iter().map(|v| format!("{v:.6}")).collect();
        writeln!(file, "{}", line.join(" "))
            .map_err(|e| AppError::new(2, format!("Failed to write table row: {e}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_table_reads_rectangular_data() {
        let rows = parse_table("1 2 3\n4 5 6\n").unwrap();
        assert_eq!(rows, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    fn parse_table_skips_blanks_and_comments() {
        let rows = parse_table("# header\n1 2\n\n3 4\n").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn parse_table_rejects_ragged_rows() {
        let err = parse_table("1 2 3\n4 5\n").unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("rectangular"), "{err}");
    }

    #[test]
    fn parse_table_rejects_non_numeric() {
        let err = parse_table("1 x 3\n").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn parse_table_rejects_empty() {
        assert_eq!(parse_table("# nothing\n").unwrap_err().exit_code(), 3);
    }
}
