pub mod aggregate;
pub mod archetype;
pub mod matchup;

pub use aggregate::{AggregateReport, aggregate};
pub use archetype::{ArchetypeCategory, DerivedProfile, derive};
pub use matchup::{MatchupProfile, MetaArchetype, matchup};

/// A linear combination of label counts: `(label, coefficient)` terms.
pub type LabelWeights = &'static [(&'static str, i64)];

/// Rounds `value` to `decimals` places, half away from zero.
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Share of `part` in `total`, as a percentage rounded to `decimals`.
#[must_use]
pub fn percent_of(part: f64, total: u64, decimals: i32) -> f64 {
    round_to(part / total.max(1) as f64 * 100.0, decimals)
}
