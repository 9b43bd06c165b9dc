use pyo3::prelude::*;
use pyo3::types::PyModule;

pub mod error;
pub mod haplotype;
pub mod header;
pub mod metrics;
pub mod ranker;
pub mod schema;
pub mod source;

mod model;

use model::RiskModel;

/// Export schema constants as Python submodules
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Oligo alignment conventions
    let oligo = PyModule::new(m.py(), "oligo")?;
    oligo.add("FORWARD_SUFFIX", schema::oligo::FORWARD_SUFFIX)?;
    oligo.add("REVERSE_SUFFIX", schema::oligo::REVERSE_SUFFIX)?;
    oligo.add("MATCH_SYMBOL", schema::oligo::MATCH_SYMBOL.to_string())?;
    oligo.add("GAP_SYMBOL", schema::oligo::GAP_SYMBOL.to_string())?;
    m.add_submodule(&oligo)?;

    // Derived metric column suffixes
    let metric = PyModule::new(m.py(), "metric")?;
    metric.add(
        "THREE_PRIME_MISMATCH",
        schema::metric::THREE_PRIME_MISMATCH,
    )?;
    metric.add("MISMATCH_COUNT", schema::metric::MISMATCH_COUNT)?;
    metric.add("MISMATCH_RATIO", schema::metric::MISMATCH_RATIO)?;
    metric.add("HAPLOTYPE_COUNT", schema::metric::HAPLOTYPE_COUNT)?;
    metric.add(
        "RELATIVE_ABUNDANCE",
        schema::metric::RELATIVE_ABUNDANCE,
    )?;
    m.add_submodule(&metric)?;

    // Display metadata columns
    let display = PyModule::new(m.py(), "display")?;
    display.add("ISOLATE_ID", schema::display::ISOLATE_ID)?;
    display.add("DESCRIPTION", schema::display::DESCRIPTION)?;
    display.add("COUNTRY", schema::display::COUNTRY)?;
    display.add("DATE", schema::display::DATE)?;
    m.add_submodule(&display)?;

    Ok(())
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<RiskModel>()?;
    add_schema_exports(m)?;
    Ok(())
}
