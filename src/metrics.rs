use crate::error::RiskError;
use crate::schema::oligo;

/// Which alignment symbols count as a mismatch.
///
/// The match symbol `.` never counts. Gap handling is explicit: the two
/// legacy report variants disagreed on whether `-` is a mismatch, so the
/// policy carries it as a flag. Default counts gaps as mismatches (match
/// set `{.}`).
#[derive(Debug, Clone, Copy)]
pub struct MismatchPolicy {
    pub count_gaps: bool,
}

impl Default for MismatchPolicy {
    fn default() -> Self {
        Self { count_gaps: true }
    }
}

impl MismatchPolicy {
    pub fn is_mismatch(&self, symbol: char) -> bool {
        if symbol == oligo::MATCH_SYMBOL {
            return false;
        }
        if !self.count_gaps && symbol == oligo::GAP_SYMBOL {
            return false;
        }
        true
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Count mismatching positions in an aligned oligo string and the
/// mismatch fraction over its full length, rounded to 2 decimals.
pub fn count_mismatches(
    oligo_string: &str,
    policy: MismatchPolicy,
) -> Result<(u32, f64), RiskError> {
    let len = oligo_string.chars().count();
    if len == 0 {
        return Err(RiskError::Validation(
            "empty oligo alignment string".to_string(),
        ));
    }

    let count = oligo_string
        .chars()
        .filter(|&c| policy.is_mismatch(c))
        .count() as u32;
    let fraction = round2(count as f64 / len as f64);
    Ok((count, fraction))
}

/// Count mismatches in the last `window` characters of the oligo, the
/// region nearest the 3' end. A window longer than the string covers the
/// whole string.
pub fn three_prime_mismatch(
    oligo_string: &str,
    window: usize,
    policy: MismatchPolicy,
) -> Result<u32, RiskError> {
    if window < 1 {
        return Err(RiskError::Validation(format!(
            "three-prime window must be >= 1, got {window}"
        )));
    }

    let chars: Vec<char> = oligo_string.chars().collect();
    let start = chars.len().saturating_sub(window);
    let count = chars[start..]
        .iter()
        .filter(|&&c| policy.is_mismatch(c))
        .count() as u32;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_non_match_symbols() {
        let (count, fraction) = count_mismatches("..A.GG..", MismatchPolicy::default()).unwrap();
        assert_eq!(count, 3);
        assert_eq!(fraction, 0.38);
    }

    #[test]
    fn gap_policy_is_explicit() {
        // The worked example from the legacy reports: "..A.--.."
        let strict = MismatchPolicy { count_gaps: true };
        let lenient = MismatchPolicy { count_gaps: false };

        assert_eq!(count_mismatches("..A.--..", strict).unwrap(), (3, 0.38));
        assert_eq!(count_mismatches("..A.--..", lenient).unwrap(), (1, 0.13));
    }

    #[test]
    fn all_match_string_scores_zero() {
        let (count, fraction) = count_mismatches("........", MismatchPolicy::default()).unwrap();
        assert_eq!(count, 0);
        assert_eq!(fraction, 0.0);
    }

    #[test]
    fn empty_oligo_is_rejected() {
        let err = count_mismatches("", MismatchPolicy::default()).unwrap_err();
        assert!(matches!(err, RiskError::Validation(_)));
    }

    #[test]
    fn three_prime_counts_only_the_window() {
        let policy = MismatchPolicy::default();
        // Mismatches at positions 2 and 7 (0-based); only the last lands
        // inside a 3-wide window.
        assert_eq!(three_prime_mismatch("..T....G", 3, policy).unwrap(), 1);
        assert_eq!(three_prime_mismatch("..T....G", 8, policy).unwrap(), 2);
    }

    #[test]
    fn three_prime_window_clamps_to_string_length() {
        let policy = MismatchPolicy::default();
        let full = count_mismatches("..T....G", policy).unwrap().0;
        assert_eq!(three_prime_mismatch("..T....G", 50, policy).unwrap(), full);
    }

    #[test]
    fn three_prime_matches_count_restricted_to_suffix() {
        let policy = MismatchPolicy::default();
        let s = "A.G.-.TC";
        for w in 1..=s.len() {
            let suffix: String = s.chars().skip(s.len() - w).collect();
            let expected = count_mismatches(&suffix, policy).unwrap().0;
            assert_eq!(three_prime_mismatch(s, w, policy).unwrap(), expected);
        }
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = three_prime_mismatch("....", 0, MismatchPolicy::default()).unwrap_err();
        assert!(matches!(err, RiskError::Validation(_)));
    }
}
