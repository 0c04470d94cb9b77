use serde::Serialize;

use crate::constants::{CONFIDENCE_DECIMALS, DROWSY_THRESHOLD};

/// Single-frame drowsiness verdict as returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    pub drowsy: bool,
    pub confidence: f64,
}

/// Stateless threshold on the averaged EAR. The comparison uses the
/// unrounded value; only the reported confidence is rounded.
pub fn classify(average_ear: f64) -> Verdict {
    Verdict {
        drowsy: average_ear < DROWSY_THRESHOLD,
        confidence: round_to(average_ear, CONFIDENCE_DECIMALS),
    }
}

/// 银行家舍入：恰好一半时取偶数
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
