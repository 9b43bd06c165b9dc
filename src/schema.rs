/// Column-name constants for the PLR risk schema.
/// Single source of truth - exported to Python via PyO3.

// ── Oligo alignment conventions ─────────────────────────────────────────────
pub mod oligo {
    /// Resolved-name suffix marking a forward primer column.
    pub const FORWARD_SUFFIX: &str = "(f)";
    /// Resolved-name suffix marking a reverse primer column.
    pub const REVERSE_SUFFIX: &str = "(r)";

    /// Alignment symbol meaning "agrees with the reference".
    pub const MATCH_SYMBOL: char = '.';
    /// Alignment symbol for a gap.
    pub const GAP_SYMBOL: char = '-';

    /// Characters a raw oligo sequence label may consist of.
    pub const NUCLEOTIDES: [char; 9] = ['a', 'c', 'g', 't', 'A', 'C', 'G', 'T', '-'];
}

// ── Header-merge conventions ────────────────────────────────────────────────
pub mod header {
    /// Prefix the source places on short labels of unnamed columns.
    pub const UNNAMED_PREFIX: &str = "Unnamed";
    /// Separator between short label stem and full label in merged names.
    pub const MERGE_SEPARATOR: &str = ":";
}

// ── Derived metric column suffixes ──────────────────────────────────────────
pub mod metric {
    pub const THREE_PRIME_MISMATCH: &str = "_3_prime_mismatch";
    pub const MISMATCH_COUNT: &str = "_mismatch_count";
    pub const MISMATCH_RATIO: &str = "_mismatch_ratio";
    pub const HAPLOTYPE_COUNT: &str = "_haplotype_count";
    pub const RELATIVE_ABUNDANCE: &str = "_relative_abundance";

    pub fn three_prime_mismatch(oligo_col: &str) -> String {
        format!("{oligo_col}{THREE_PRIME_MISMATCH}")
    }

    pub fn mismatch_count(oligo_col: &str) -> String {
        format!("{oligo_col}{MISMATCH_COUNT}")
    }

    pub fn mismatch_ratio(oligo_col: &str) -> String {
        format!("{oligo_col}{MISMATCH_RATIO}")
    }

    pub fn haplotype_count(oligo_col: &str) -> String {
        format!("{oligo_col}{HAPLOTYPE_COUNT}")
    }

    pub fn relative_abundance(oligo_col: &str) -> String {
        format!("{oligo_col}{RELATIVE_ABUNDANCE}")
    }
}

// ── Metadata columns shown in the ranked view ───────────────────────────────
pub mod display {
    pub const ISOLATE_ID: &str = "id";
    pub const DESCRIPTION: &str = "description";
    pub const COUNTRY: &str = "/country";
    pub const DATE: &str = "/date";

    pub const ALL: [&str; 4] = [ISOLATE_ID, DESCRIPTION, COUNTRY, DATE];
}
