use polars::prelude::*;

use pyo3::prelude::*;
use pyo3_polars::PyDataFrame;

use crate::error::RiskError;
use crate::header;
use crate::metrics::MismatchPolicy;
use crate::ranker::{self, RankParams};
use crate::source::{CsvSource, SheetRef, SourceCache};

/// Python-facing entry point: a CSV-backed report source plus an
/// explicit sheet cache, with the scoring and ranking engine behind it.
///
/// Spreadsheet parsing stays on the Python side; workbooks exported as
/// CSV directories are read here, anything else comes in through
/// `rank_frame` / `score_frame`.
#[pyclass]
pub struct RiskModel {
    source: CsvSource,
    cache: SourceCache,
}

#[pymethods]
impl RiskModel {
    #[new]
    fn new(base_path: String) -> Self {
        Self {
            source: CsvSource::new(base_path),
            cache: SourceCache::default(),
        }
    }

    // ── Data loading ────────────────────────────────────────────────────────

    /// Load (and cache) one sheet of a report, raw: short labels as
    /// column names, full labels still in the first row.
    fn load_report(&mut self, source: &str, sheet: &str) -> PyResult<PyDataFrame> {
        let df = self.fetch(source, sheet)?;
        Ok(PyDataFrame(df))
    }

    /// Drop one sheet from the cache. Returns whether it was cached.
    fn invalidate(&mut self, source: &str, sheet: &str) -> bool {
        self.cache.invalidate(&SheetRef::new(source, sheet))
    }

    fn clear_cache(&mut self) {
        self.cache.clear();
    }

    #[getter]
    fn cached_sheets(&self) -> usize {
        self.cache.len()
    }

    // ── Scoring and ranking ─────────────────────────────────────────────────

    /// Resolve headers and attach every derived metric column, without
    /// ranking. Useful for inspecting a full scored report.
    #[pyo3(signature = (source, sheet, three_prime_window, count_gaps=true))]
    fn score_report(
        &mut self,
        source: &str,
        sheet: &str,
        three_prime_window: usize,
        count_gaps: bool,
    ) -> PyResult<PyDataFrame> {
        let raw = self.fetch(source, sheet)?;
        let body = header::resolve_header(&raw)?;
        let scored = ranker::score_report(&body, three_prime_window, MismatchPolicy { count_gaps })?;
        Ok(PyDataFrame(scored.frame))
    }

    /// The ranking operation: load, resolve headers, score every oligo
    /// column, sort by the composite risk key and return the projected
    /// top-N isolates.
    #[pyo3(signature = (source, sheet, top_n, three_prime_window, count_gaps=true))]
    fn rank_risk(
        &mut self,
        source: &str,
        sheet: &str,
        top_n: usize,
        three_prime_window: usize,
        count_gaps: bool,
    ) -> PyResult<PyDataFrame> {
        let raw = self.fetch(source, sheet)?;
        let ranked = Self::rank_raw(raw, top_n, three_prime_window, count_gaps)?;
        Ok(PyDataFrame(ranked))
    }

    /// Rank a table the caller loaded themselves (e.g. via
    /// `pandas.read_excel`). Same two-row header contract as the CSV
    /// path.
    #[staticmethod]
    #[pyo3(signature = (df, top_n, three_prime_window, count_gaps=true))]
    fn rank_frame(
        df: PyDataFrame,
        top_n: usize,
        three_prime_window: usize,
        count_gaps: bool,
    ) -> PyResult<PyDataFrame> {
        let ranked = Self::rank_raw(df.0, top_n, three_prime_window, count_gaps)?;
        Ok(PyDataFrame(ranked))
    }
}

// ── Private helpers ─────────────────────────────────────────────────────────

impl RiskModel {
    fn fetch(&mut self, source: &str, sheet: &str) -> Result<DataFrame, RiskError> {
        self.cache
            .get_or_fetch(&self.source, &SheetRef::new(source, sheet))
    }

    fn rank_raw(
        raw: DataFrame,
        top_n: usize,
        three_prime_window: usize,
        count_gaps: bool,
    ) -> Result<DataFrame, RiskError> {
        let body = header::resolve_header(&raw)?;
        let params = RankParams {
            top_n,
            three_prime_window,
            policy: MismatchPolicy { count_gaps },
        };
        ranker::rank(&body, &params)
    }
}
