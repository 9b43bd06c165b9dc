use std::collections::HashSet;

use polars::prelude::*;

use crate::error::RiskError;
use crate::schema::{header, oligo};

/// Role of a resolved column, decided once at load time.
///
/// All downstream logic switches on this tag instead of re-matching
/// name suffixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnClass {
    Metadata,
    OligoForward,
    OligoReverse,
}

impl ColumnClass {
    pub fn of(resolved_name: &str) -> Self {
        if resolved_name.ends_with(oligo::FORWARD_SUFFIX) {
            ColumnClass::OligoForward
        } else if resolved_name.ends_with(oligo::REVERSE_SUFFIX) {
            ColumnClass::OligoReverse
        } else {
            ColumnClass::Metadata
        }
    }

    pub fn is_oligo(&self) -> bool {
        matches!(self, ColumnClass::OligoForward | ColumnClass::OligoReverse)
    }
}

/// True when every character of `label` could come from a raw oligo
/// sequence, meaning the full label is a sequence rather than an
/// annotation.
fn is_sequence_label(label: &str) -> bool {
    label.chars().all(|c| oligo::NUCLEOTIDES.contains(&c))
}

/// True for short labels the source emits as placeholders for unnamed
/// columns.
fn is_unnamed(short: &str) -> bool {
    short.is_empty() || short.starts_with(header::UNNAMED_PREFIX)
}

/// Merge the two parallel label rows of a PLR sheet into final column
/// names.
///
/// Per position:
/// - placeholder short label: the full label names the column;
/// - full label is itself an oligo sequence: the short label names it;
/// - otherwise: `<short label stem>:<full label>`, where the stem is the
///   short label up to its first `.` (the source dedupes repeated short
///   labels with a `.N` suffix).
pub fn resolve_labels(short: &[String], full: &[String]) -> Result<Vec<String>, RiskError> {
    if short.len() != full.len() {
        return Err(RiskError::Configuration(format!(
            "label rows differ in length: {} short labels vs {} full labels",
            short.len(),
            full.len()
        )));
    }

    let mut resolved = Vec::with_capacity(short.len());
    for (i, (s, f)) in short.iter().zip(full.iter()).enumerate() {
        let name = if is_unnamed(s) {
            f.clone()
        } else if is_sequence_label(f) {
            s.clone()
        } else {
            let stem = s.split('.').next().unwrap_or(s);
            format!("{stem}{}{f}", header::MERGE_SEPARATOR)
        };
        if name.is_empty() {
            return Err(RiskError::Configuration(format!(
                "no usable column name at position {i}"
            )));
        }
        resolved.push(name);
    }

    let mut seen = HashSet::new();
    for name in &resolved {
        if !seen.insert(name.as_str()) {
            return Err(RiskError::Configuration(format!(
                "resolved column name '{name}' is not unique"
            )));
        }
    }

    Ok(resolved)
}

/// Apply the two-row header merge to a raw report frame.
///
/// Column names hold the short labels and the first data row holds the
/// full labels; the frame is relabeled with the merged names and the
/// label row is dropped from the body.
pub fn resolve_header(raw: &DataFrame) -> Result<DataFrame, RiskError> {
    if raw.height() == 0 {
        return Err(RiskError::Configuration(
            "report has no full-label row".to_string(),
        ));
    }

    let short: Vec<String> = raw
        .get_column_names_str()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut full = Vec::with_capacity(short.len());
    for name in &short {
        let val = raw.column(name)?.get(0)?;
        let label = match val {
            AnyValue::String(s) => s.to_string(),
            AnyValue::StringOwned(s) => s.to_string(),
            AnyValue::Null => String::new(),
            other => format!("{other}"),
        };
        full.push(label);
    }

    let resolved = resolve_labels(&short, &full)?;

    let mut body = raw.slice(1, raw.height() - 1);
    body.set_column_names(resolved.as_slice())?;
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn placeholder_short_label_takes_full_label() {
        let short = owned(&["Unnamed: 0", "Unnamed: 1"]);
        let full = owned(&["id", "/country"]);
        let resolved = resolve_labels(&short, &full).unwrap();
        assert_eq!(resolved, vec!["id", "/country"]);
    }

    #[test]
    fn sequence_full_label_keeps_short_label() {
        let short = owned(&["FluA_fwd(f)"]);
        let full = owned(&["acgtACGT-acgt"]);
        let resolved = resolve_labels(&short, &full).unwrap();
        assert_eq!(resolved, vec!["FluA_fwd(f)"]);
    }

    #[test]
    fn annotated_label_merges_short_stem_and_full_label() {
        let short = owned(&["primer.1"]);
        let full = owned(&["matrix gene (r)"]);
        let resolved = resolve_labels(&short, &full).unwrap();
        assert_eq!(resolved, vec!["primer:matrix gene (r)"]);
    }

    #[test]
    fn resolution_is_idempotent() {
        let short = owned(&["Unnamed: 0", "probe.2", "fwd(f)"]);
        let full = owned(&["id", "M segment (f)", "acgt"]);
        let first = resolve_labels(&short, &full).unwrap();
        let second = resolve_labels(&short, &full).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn mismatched_label_rows_fail() {
        let short = owned(&["a", "b"]);
        let full = owned(&["x"]);
        let err = resolve_labels(&short, &full).unwrap_err();
        assert!(matches!(err, RiskError::Configuration(_)));
    }

    #[test]
    fn colliding_resolved_names_fail() {
        let short = owned(&["Unnamed: 0", "Unnamed: 1"]);
        let full = owned(&["id", "id"]);
        let err = resolve_labels(&short, &full).unwrap_err();
        assert!(matches!(err, RiskError::Configuration(_)));
    }

    #[test]
    fn classification_by_suffix() {
        assert_eq!(ColumnClass::of("primer:M gene (f)"), ColumnClass::OligoForward);
        assert_eq!(ColumnClass::of("primer:M gene (r)"), ColumnClass::OligoReverse);
        assert_eq!(ColumnClass::of("/country"), ColumnClass::Metadata);
        assert!(ColumnClass::of("x(f)").is_oligo());
    }

    #[test]
    fn resolve_header_relabels_and_drops_label_row() {
        let raw = DataFrame::new(vec![
            Column::new("Unnamed: 0".into(), &["id", "iso1", "iso2"]),
            Column::new("fwd(f)".into(), &["acgt", "..A.", "...."]),
        ])
        .unwrap();

        let body = resolve_header(&raw).unwrap();
        assert_eq!(body.get_column_names_str(), &["id", "fwd(f)"]);
        assert_eq!(body.height(), 2);
        let ids = body.column("id").unwrap().str().unwrap();
        assert_eq!(ids.get(0), Some("iso1"));
    }

    #[test]
    fn resolve_header_fails_on_empty_frame() {
        let raw = DataFrame::new(vec![Column::new(
            "id".into(),
            Vec::<String>::new(),
        )])
        .unwrap();
        assert!(matches!(
            resolve_header(&raw),
            Err(RiskError::Configuration(_))
        ));
    }
}
