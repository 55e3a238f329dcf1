//! Diagnostic filtering before failure evaluation

use crate::diag::Diagnostics;

/// Drop "not yet implemented" diagnostics when the case tolerates them.
/// Retained diagnostics keep their order; the input is left untouched.
pub fn filter_diagnostics(diagnostics: &Diagnostics, tolerate_nyi: bool) -> Diagnostics {
    if !tolerate_nyi {
        return diagnostics.clone();
    }
    diagnostics
        .iter()
        .filter(|d| !d.is_not_yet_implemented())
        .cloned()
        .collect()
}
