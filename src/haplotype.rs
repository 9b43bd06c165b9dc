use std::collections::HashMap;

use polars::prelude::*;

use crate::error::RiskError;

/// How often each distinct haplotype occurs in one oligo column.
///
/// Built in a single pass so per-row lookups never rescan the table.
pub struct HaplotypeCounts<'a> {
    counts: HashMap<&'a str, u32>,
    total_rows: usize,
}

impl<'a> HaplotypeCounts<'a> {
    /// Group the column by exact alignment-string value. Null cells fail:
    /// a partially scored column would make the ranking misleading.
    pub fn from_column(column: &str, values: &'a StringChunked) -> Result<Self, RiskError> {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for (i, value) in values.into_iter().enumerate() {
            let value = value.ok_or_else(|| {
                RiskError::Validation(format!(
                    "null value in oligo column '{column}' at row {i}"
                ))
            })?;
            *counts.entry(value).or_insert(0) += 1;
        }
        Ok(Self {
            counts,
            total_rows: values.len(),
        })
    }

    /// Occurrence count and relative abundance (count / total rows,
    /// rounded to 2 decimals) of one haplotype.
    pub fn frequency(&self, value: &str) -> Result<(u32, f64), RiskError> {
        let count = *self.counts.get(value).ok_or_else(|| {
            RiskError::Lookup(format!("haplotype '{value}' not present in its own column"))
        })?;
        let ratio = ((count as f64 / self.total_rows as f64) * 100.0).round() / 100.0;
        Ok((count, ratio))
    }

    /// Per-row counts and ratios, in row order.
    pub fn per_row(&self, values: &StringChunked) -> Result<(Vec<u32>, Vec<f64>), RiskError> {
        let mut counts = Vec::with_capacity(values.len());
        let mut ratios = Vec::with_capacity(values.len());
        for value in values.into_iter().flatten() {
            let (count, ratio) = self.frequency(value)?;
            counts.push(count);
            ratios.push(ratio);
        }
        Ok((counts, ratios))
    }
}

/// One-shot frequency of `value` within `column` of `df`.
pub fn haplotype_frequency(
    value: &str,
    column: &str,
    df: &DataFrame,
) -> Result<(u32, f64), RiskError> {
    let values = df.column(column)?.str()?;
    let counts = HaplotypeCounts::from_column(column, values)?;
    counts.frequency(value)
}
