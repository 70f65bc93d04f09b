//! Domain Services

use crate::domain::repository::MinedAggregates;

/// Mined coins shown on dashboards and reports
///
/// The per-session sum and the per-user running totals are maintained
/// independently and may disagree. Neither is treated as authoritative; the
/// larger one is displayed.
pub fn displayed_total_mined(session_aggregate: u64, user_aggregate: u64) -> u64 {
    session_aggregate.max(user_aggregate)
}

impl MinedAggregates {
    pub fn displayed(&self) -> u64 {
        displayed_total_mined(self.session_total, self.user_total)
    }

    pub fn discrepancy(&self) -> u64 {
        self.session_total.abs_diff(self.user_total)
    }
}
