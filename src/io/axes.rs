//! Multi-axis offsets ingest.
//!
//! The simulation writes one line per Monte-Carlo sample. Each line holds
//! several axis specs joined by `" : "`; each spec is a label followed by
//! alternating `(state, offset)` float pairs:
//!
//! ```text
//! A3 -1 0.012 -1 0.034 0 1.871 ... : A1 -1 0.002 ... : A4 ...
//! ```
//!
//! Axes are written sorted ascending by total |offset|, so the last spec on
//! each line is the most-displaced ("best") measurement channel.
//!
//! Design goals:
//! - **Strict parsing** with line-numbered errors (exit code 2)
//! - **No recovery**: malformed input fails the whole run, matching the
//!   single-shot nature of the analysis
//! - **Separation of concerns**: no averaging or fitting logic here

use std::fs;
use std::path::Path;

use crate::domain::Axis;
use crate::error::AppError;

/// Axis-spec separator within a line.
const AXIS_SEP: &str = " : ";

/// Parse one axis spec: `"label s1 o1 s2 o2 ..."`.
///
/// Fails on an odd number of numeric tokens after the label or on any token
/// that is not a finite float.
pub fn parse_axis(spec: &str) -> Result<Axis, String> {
    let mut tokens = spec.split_whitespace();
    let label = tokens
        .next()
        .ok_or_else(|| "Empty axis spec.".to_string())?
        .to_string();

    let numeric: Vec<&str> = tokens.collect();
    if numeric.len() % 2 != 0 {
        return Err(format!(
            "Axis '{label}': odd number of numeric tokens ({}); expected (state, offset) pairs.",
            numeric.len()
        ));
    }

    let mut state = Vec::with_capacity(numeric.len() / 2);
    let mut offset = Vec::with_capacity(numeric.len() / 2);
    for pair in numeric.chunks_exact(2) {
        state.push(parse_float(pair[0], &label)?);
        offset.push(parse_float(pair[1], &label)?);
    }

    // Equal lengths hold by construction of the pair loop; keep the check as
    // a guard against future refactors of the tokenizer.
    if state.len() != offset.len() {
        return Err(format!(
            "Axis '{label}': state/offset length mismatch ({} vs {}).",
            state.len(),
            offset.len()
        ));
    }

    Ok(Axis { label, state, offset })
}

fn parse_float(token: &str, label: &str) -> Result<f64, String> {
    let v = token
        .parse::<f64>()
        .map_err(|_| format!("Axis '{label}': invalid float '{token}'."))?;
    if !v.is_finite() {
        return Err(format!("Axis '{label}': non-finite value '{token}'."));
    }
    Ok(v)
}

/// Parse one sample line into its ordered axis list.
pub fn parse_line(line: &str) -> Result<Vec<Axis>, String> {
    line.split(AXIS_SEP).map(parse_axis).collect()
}

/// Parse a whole offsets document (one sample line per text line).
///
/// Blank lines are skipped; anything else must parse.
pub fn parse_axis_document(text: &str) -> Result<Vec<Vec<Axis>>, AppError> {
    let mut lines = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        if raw.trim().is_empty() {
            continue;
        }
        let axes = parse_line(raw)
            .map_err(|e| AppError::new(2, format!("Line {}: {e}", idx + 1)))?;
        lines.push(axes);
    }
    Ok(lines)
}

/// Load and parse a multi-axis offsets file.
pub fn load_axis_lines(path: &Path) -> Result<Vec<Vec<Axis>>, AppError> {
    let text = fs::read_to_string(path).map_err(|e| {
        AppError::new(2, format!("Failed to open offsets file '{}': {e}", path.display()))
    })?;
    let lines = parse_axis_document(&text)
        .map_err(|e| AppError::new(e.exit_code(), format!("{}: {e}", path.display())))?;
    if lines.is_empty() {
        return Err(AppError::new(
            3,
            format!("Offsets file '{}' contains no sample lines.", path.display()),
        ));
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_axis_pairs_up_states_and_offsets() {
        let axis = parse_axis("x 1.0 2.0 3.0 4.0").unwrap();
        assert_eq!(axis.label, "x");
        assert_eq!(axis.state, vec![1.0, 3.0]);
        assert_eq!(axis.offset, vec![2.0, 4.0]);
    }

    #[test]
    fn parse_axis_rejects_odd_token_count() {
        let err = parse_axis("A1 1.0 2.0 3.0").unwrap_err();
        assert!(err.contains("odd number"), "{err}");
    }

    #[test]
    fn parse_axis_rejects_bad_float() {
        assert!(parse_axis("A1 1.0 oops").is_err());
        assert!(parse_axis("A1 nan 2.0").is_err());
    }

    #[test]
    fn parse_line_splits_on_colon_separator() {
        let axes = parse_line("A2 0 0.1 1 0.2 : A3 -1 0.3 0 0.4").unwrap();
        assert_eq!(axes.len(), 2);
        assert_eq!(axes[0].label, "A2");
        assert_eq!(axes[1].label, "A3");
        assert_eq!(axes[1].offset, vec![0.3, 0.4]);
    }

    #[test]
    fn parse_document_reports_line_numbers() {
        let err = parse_axis_document("A1 0 0.1\n\nA1 0 bad\n").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("Line 3"), "{err}");
    }

    #[test]
    fn parse_document_skips_blank_lines() {
        let lines = parse_axis_document("A1 0 0.1 1 0.2\n\nA1 0 0.3 1 0.4\n").unwrap();
        assert_eq!(lines.len(), 2);
    }
}
