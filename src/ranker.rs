use log::{debug, info};
use polars::prelude::*;

use crate::error::RiskError;
use crate::haplotype::HaplotypeCounts;
use crate::header::ColumnClass;
use crate::metrics::{count_mismatches, three_prime_mismatch, MismatchPolicy};
use crate::schema::{display, metric};

/// Parameters of one ranking request.
#[derive(Debug, Clone, Copy)]
pub struct RankParams {
    /// How many of the highest-risk isolates to return.
    pub top_n: usize,
    /// How many 3'-terminal positions to scan for mismatches.
    pub three_prime_window: usize,
    pub policy: MismatchPolicy,
}

impl RankParams {
    pub fn validate(&self) -> Result<(), RiskError> {
        if self.top_n < 1 {
            return Err(RiskError::Validation(format!(
                "top_n must be >= 1, got {}",
                self.top_n
            )));
        }
        if self.three_prime_window < 1 {
            return Err(RiskError::Validation(format!(
                "three_prime_window must be >= 1, got {}",
                self.three_prime_window
            )));
        }
        Ok(())
    }
}

/// Derived metric column names, one entry per oligo column in encounter
/// order.
#[derive(Debug, Default)]
pub struct MetricFamilies {
    pub three_prime: Vec<String>,
    pub mismatch_count: Vec<String>,
    pub mismatch_ratio: Vec<String>,
    pub relative_abundance: Vec<String>,
}

impl MetricFamilies {
    /// Composite sort key: every family, fixed family order, all levels
    /// descending. Empty when the report had no oligo columns.
    pub fn ranking_key(&self) -> Vec<String> {
        let mut key = Vec::new();
        key.extend(self.three_prime.iter().cloned());
        key.extend(self.mismatch_count.iter().cloned());
        key.extend(self.mismatch_ratio.iter().cloned());
        key.extend(self.relative_abundance.iter().cloned());
        key
    }

    /// Columns of the ranked view: present metadata columns, then
    /// relative abundance, 3'-mismatch and mismatch-ratio families. Raw
    /// oligo strings and absolute mismatch counts stay sort-only.
    pub fn projection(&self, df: &DataFrame) -> Vec<String> {
        let mut cols: Vec<String> = display::ALL
            .iter()
            .filter(|c| df.column(c).is_ok())
            .map(|c| c.to_string())
            .collect();
        cols.extend(self.relative_abundance.iter().cloned());
        cols.extend(self.three_prime.iter().cloned());
        cols.extend(self.mismatch_ratio.iter().cloned());
        cols
    }
}

/// A header-resolved report with all derived metric columns attached.
pub struct ScoredReport {
    pub frame: DataFrame,
    pub families: MetricFamilies,
}

/// Attach the five metric columns for every oligo-classified column of a
/// header-resolved report. Existing columns are never altered.
pub fn score_report(
    df: &DataFrame,
    three_prime_window: usize,
    policy: MismatchPolicy,
) -> Result<ScoredReport, RiskError> {
    if three_prime_window < 1 {
        return Err(RiskError::Validation(format!(
            "three_prime_window must be >= 1, got {three_prime_window}"
        )));
    }

    let names: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut scored = df.clone();
    let mut families = MetricFamilies::default();

    for name in &names {
        if !ColumnClass::of(name).is_oligo() {
            continue;
        }
        debug!("scoring oligo column '{name}'");

        let values = df.column(name)?.str()?;

        let mut three_prime = Vec::with_capacity(values.len());
        let mut counts = Vec::with_capacity(values.len());
        let mut ratios = Vec::with_capacity(values.len());
        for (i, value) in values.into_iter().enumerate() {
            let value = value.ok_or_else(|| {
                RiskError::Validation(format!("null value in oligo column '{name}' at row {i}"))
            })?;
            let (count, ratio) = count_mismatches(value, policy).map_err(|_| {
                RiskError::Validation(format!(
                    "empty oligo alignment string in column '{name}' at row {i}"
                ))
            })?;
            three_prime.push(three_prime_mismatch(value, three_prime_window, policy)?);
            counts.push(count);
            ratios.push(ratio);
        }

        let haplotypes = HaplotypeCounts::from_column(name, values)?;
        let (hap_counts, hap_ratios) = haplotypes.per_row(values)?;

        let three_prime_name = metric::three_prime_mismatch(name);
        let count_name = metric::mismatch_count(name);
        let ratio_name = metric::mismatch_ratio(name);
        let hap_count_name = metric::haplotype_count(name);
        let abundance_name = metric::relative_abundance(name);

        scored.with_column(Column::new(three_prime_name.as_str().into(), &three_prime))?;
        scored.with_column(Column::new(count_name.as_str().into(), &counts))?;
        scored.with_column(Column::new(ratio_name.as_str().into(), &ratios))?;
        scored.with_column(Column::new(hap_count_name.as_str().into(), &hap_counts))?;
        scored.with_column(Column::new(abundance_name.as_str().into(), &hap_ratios))?;

        families.three_prime.push(three_prime_name);
        families.mismatch_count.push(count_name);
        families.mismatch_ratio.push(ratio_name);
        families.relative_abundance.push(abundance_name);
    }

    Ok(ScoredReport {
        frame: scored,
        families,
    })
}

/// Rank a header-resolved report and return the projected top-N rows.
///
/// Sorting is stable, so tied rows keep their original order. With no
/// oligo columns the key is empty and the input order stands. `top_n`
/// beyond the row count returns every row.
pub fn rank(df: &DataFrame, params: &RankParams) -> Result<DataFrame, RiskError> {
    params.validate()?;

    let scored = score_report(df, params.three_prime_window, params.policy)?;
    let key = scored.families.ranking_key();
    info!(
        "ranking {} rows over a {}-column composite key",
        df.height(),
        key.len()
    );

    let ordered = if key.is_empty() {
        scored.frame.clone()
    } else {
        let by: Vec<PlSmallStr> = key.iter().map(|s| s.as_str().into()).collect();
        scored.frame.sort(
            by,
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )?
    };

    let top_n = params.top_n.min(ordered.height());
    let top = ordered.head(Some(top_n));

    let projection = scored.families.projection(&top);
    Ok(top.select(projection)?)
}
