use std::collections::HashMap;
use std::path::PathBuf;

use log::info;
use polars::prelude::*;

use crate::error::RiskError;

/// Identifies one sheet of one report: the workbook (or export
/// directory) and the sheet within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SheetRef {
    pub source: String,
    pub sheet: String,
}

impl SheetRef {
    pub fn new(source: impl Into<String>, sheet: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            sheet: sheet.into(),
        }
    }
}

/// External collaborator that supplies the raw isolate table.
///
/// Implementations must preserve the source's column and row order.
pub trait ReportSource {
    fn fetch(&self, sheet: &SheetRef) -> Result<DataFrame, RiskError>;
}

/// Reads sheets exported as CSV: one directory per workbook, one
/// `<sheet>.csv` file per sheet, every column loaded as String.
pub struct CsvSource {
    base_path: PathBuf,
}

impl CsvSource {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn sheet_path(&self, sheet: &SheetRef) -> PathBuf {
        self.base_path
            .join(&sheet.source)
            .join(format!("{}.csv", sheet.sheet))
    }
}

impl ReportSource for CsvSource {
    fn fetch(&self, sheet: &SheetRef) -> Result<DataFrame, RiskError> {
        let path = self.sheet_path(sheet);
        let mut df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0)) // all columns as String
            .try_into_reader_with_file_path(Some(path.clone()))
            .map_err(|e| RiskError::DataSource(format!("{}: {e}", path.display())))?
            .finish()
            .map_err(|e| RiskError::DataSource(format!("{}: {e}", path.display())))?;

        // Trim whitespace from column names
        let trimmed: Vec<String> = df
            .get_column_names_str()
            .iter()
            .map(|c| c.trim().to_string())
            .collect();
        df.set_column_names(trimmed.as_slice())?;

        info!(
            "loaded {}: {} rows, {} columns",
            path.display(),
            df.height(),
            df.width()
        );
        Ok(df)
    }
}

/// Explicit memo of loaded sheets, keyed by (source, sheet).
///
/// Sources are treated as immutable for the process lifetime; a changed
/// file on disk needs an `invalidate` before it is seen.
#[derive(Default)]
pub struct SourceCache {
    frames: HashMap<SheetRef, DataFrame>,
}

impl SourceCache {
    pub fn get_or_fetch(
        &mut self,
        source: &dyn ReportSource,
        sheet: &SheetRef,
    ) -> Result<DataFrame, RiskError> {
        if let Some(df) = self.frames.get(sheet) {
            return Ok(df.clone());
        }
        let df = source.fetch(sheet)?;
        self.frames.insert(sheet.clone(), df.clone());
        Ok(df)
    }

    /// Drop one cached sheet. Returns whether it was cached.
    pub fn invalidate(&mut self, sheet: &SheetRef) -> bool {
        self.frames.remove(sheet).is_some()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingSource {
        fetches: Cell<usize>,
    }

    impl ReportSource for CountingSource {
        fn fetch(&self, _sheet: &SheetRef) -> Result<DataFrame, RiskError> {
            self.fetches.set(self.fetches.get() + 1);
            Ok(DataFrame::new(vec![Column::new("id".into(), &["iso1"])]).unwrap())
        }
    }

    #[test]
    fn cache_fetches_each_sheet_once() {
        let source = CountingSource {
            fetches: Cell::new(0),
        };
        let mut cache = SourceCache::default();
        let sheet = SheetRef::new("FluA_hackathon", "FluA_report");

        cache.get_or_fetch(&source, &sheet).unwrap();
        cache.get_or_fetch(&source, &sheet).unwrap();
        assert_eq!(source.fetches.get(), 1);

        let other = SheetRef::new("FluA_hackathon", "FluB_report");
        cache.get_or_fetch(&source, &other).unwrap();
        assert_eq!(source.fetches.get(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn invalidate_forces_a_refetch() {
        let source = CountingSource {
            fetches: Cell::new(0),
        };
        let mut cache = SourceCache::default();
        let sheet = SheetRef::new("wb", "sheet");

        cache.get_or_fetch(&source, &sheet).unwrap();
        assert!(cache.invalidate(&sheet));
        assert!(!cache.invalidate(&sheet));
        cache.get_or_fetch(&source, &sheet).unwrap();
        assert_eq!(source.fetches.get(), 2);
    }

    #[test]
    fn missing_file_is_a_data_source_error() {
        let source = CsvSource::new("/nonexistent");
        let err = source
            .fetch(&SheetRef::new("wb", "missing"))
            .unwrap_err();
        assert!(matches!(err, RiskError::DataSource(_)));
    }
}
