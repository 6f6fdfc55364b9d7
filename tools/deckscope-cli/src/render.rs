//! Plain-text rendering of reports for the terminal.

use std::fmt::Write;

use deckscope::{AnalysisReport, CardReport};

/// Width of a 100% bar.
const BAR_WIDTH: usize = 40;

/// A bar of `#` proportional to `percent`.
pub fn bar(percent: f64) -> String {
    let filled = (percent.clamp(0.0, 100.0) / 100.0 * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled)
}

/// Deck header, category bars and matchup notes.
pub fn summary(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let total: u64 = report.cards.iter().map(|c| u64::from(c.quantity)).sum();

    let _ = writeln!(out, "Deck: {}", report.deck_name);
    let _ = writeln!(out, "Commander(s): {}", report.commanders.join(", "));
    let _ = writeln!(out, "Cards: {} unique, {} total", report.cards.len(), total);

    let failed = report.cards.iter().filter(|c| c.error.is_some()).count();
    if failed > 0 {
        let _ = writeln!(out, "Lookups failed: {failed}");
    }

    let _ = writeln!(out);
    for (category, percent) in report.derived.entries() {
        let _ = writeln!(
            out,
            "{category:<12} {:<width$} {percent:>5.1}%",
            bar(percent),
            width = BAR_WIDTH
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Strong against: {}", report.matchup.strongest);
    let _ = writeln!(out, "Weak against: {}", report.matchup.weakest);
    let _ = writeln!(out, "Notes: {}", report.matchup.rationale);
    out
}

/// One card with its labels, highest confidence first.
pub fn card(report: &CardReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", report.name);
    if let Some(type_line) = &report.card.type_line {
        let _ = writeln!(out, "  {type_line}");
    }
    if let Some(error) = &report.error {
        let _ = writeln!(out, "  lookup failed: {error}");
    }

    let mut labels: Vec<_> = report.labels.iter().collect();
    labels.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    for label in labels {
        let _ = writeln!(
            out,
            "  {:<28} {:.2}  {}",
            label.label, label.confidence, label.evidence
        );
    }
    out
}
