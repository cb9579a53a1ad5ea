use std::io::IsTerminal;

use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::model::Template;
use crate::scoring::{classify_award, evaluate, AwardDecision, ScoreResult};
use crate::store::Vendor;

/// A vendor with its derived result for display. `decision` is None when the
/// vendor has no scores at all (an undefined total is never classified).
pub struct RankedVendor<'a> {
    pub vendor: &'a Vendor,
    pub result: ScoreResult,
    pub decision: Option<AwardDecision>,
}

impl RankedVendor<'_> {
    fn coverage(&self) -> (usize, usize) {
        let scored = self.result.categories.iter().map(|c| c.scored_criteria).sum();
        let total = self.result.categories.iter().map(|c| c.total_criteria).sum();
        (scored, total)
    }
}

/// Evaluate and order vendors for the board: total descending, unevaluated
/// vendors (undefined total) last, name ascending on ties.
pub fn rank_vendors<'a>(
    vendors: &'a [Vendor],
    template: &Template,
    threshold: f64,
) -> Vec<RankedVendor<'a>> {
    let mut ranked: Vec<RankedVendor> = vendors
        .iter()
        .map(|vendor| {
            let result = evaluate(template, &vendor.id, &vendor.scores);
            let decision = result.total.map(|t| classify_award(t, threshold));
            RankedVendor {
                vendor,
                result,
                decision,
            }
        })
        .collect();

    ranked.sort_by(|a, b| match (a.result.total, b.result.total) {
        (Some(x), Some(y)) => y
            .partial_cmp(&x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.vendor.name.cmp(&b.vendor.name)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.vendor.name.cmp(&b.vendor.name),
    });

    ranked
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a percentage with one decimal; an undefined total renders as a
/// dash, never as 0%.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v),
        None => "-".to_string(),
    }
}

/// Format a raw score against its scale ("4/5", "3.5/5"), or a dash when the
/// criterion has not been evaluated yet.
pub fn format_raw(raw: Option<f64>, max_score: f64) -> String {
    match raw {
        Some(v) => format!("{}/{}", trim_number(v), trim_number(max_score)),
        None => "-".to_string(),
    }
}

fn trim_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{}", v)
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format vendors as a ranked board with columns: Index, Total, Award
/// marker, Name, Coverage. Callers pass vendors already sorted.
/// Index column: 3 chars, right-aligned. Total column: 6 chars (fits
/// "100.0%"), right-aligned. Qualified vendors get a "Q" marker.
pub fn format_board(vendors: &[RankedVendor], use_colors: bool) -> String {
    if vendors.is_empty() {
        return "No vendors registered. Run `rfp-bro vendor add <name>`.".to_string();
    }

    let term_width = get_terminal_width();

    let index_width = 3;
    let total_width = 6;
    let separator = "  ";

    vendors
        .iter()
        .enumerate()
        .map(|(idx, ranked)| {
            let index_str = format!("{:>2}.", idx + 1);
            let total_str = format!("{:>width$}", format_percent(ranked.result.total), width = total_width);
            let marker = match ranked.decision {
                Some(AwardDecision::Qualified) => "Q",
                _ => " ",
            };
            let (scored, total) = ranked.coverage();
            let coverage = format!("{}/{}", scored, total);

            // Fixed columns: index, total, marker, separators, coverage
            let fixed_width =
                index_width + 1 + total_width + 1 + separator.len() * 2 + coverage.len();
            let name = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_name(&ranked.vendor.name, width - fixed_width)
                } else {
                    // Very narrow terminal, show truncated
                    truncate_name(&ranked.vendor.name, 20)
                }
            } else {
                // No terminal (pipe), don't truncate
                ranked.vendor.name.clone()
            };

            if use_colors {
                let marker = if marker == "Q" {
                    marker.green().to_string()
                } else {
                    marker.to_string()
                };
                format!(
                    "{} {} {}{}{}{}{}",
                    index_str.dimmed(),
                    total_str.bold(),
                    marker,
                    separator,
                    name,
                    separator,
                    coverage.dimmed()
                )
            } else {
                format!(
                    "{} {} {}{}{}{}{}",
                    index_str, total_str, marker, separator, name, separator, coverage
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format one vendor as a multi-line category/criterion breakdown.
pub fn format_vendor_detail(
    ranked: &RankedVendor,
    template: &Template,
    threshold: f64,
    use_colors: bool,
) -> String {
    let mut lines = Vec::new();
    let vendor = ranked.vendor;

    let header = format!("{} ({})", vendor.name, vendor.id);
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    let verdict = match ranked.decision {
        Some(AwardDecision::Qualified) => "qualified for award",
        Some(AwardDecision::NotQualified) => "not qualified",
        None => "not yet evaluated",
    };
    lines.push(format!(
        "  Total: {}  (threshold {} -> {})",
        format_percent(ranked.result.total),
        trim_number(threshold),
        verdict
    ));

    for category in &template.categories {
        let derived = ranked
            .result
            .categories
            .iter()
            .find(|c| c.id == category.id);
        let (percentage, scored) = match derived {
            Some(c) => (
                if c.scored_criteria > 0 {
                    Some(c.percentage)
                } else {
                    None
                },
                c.scored_criteria,
            ),
            None => (None, 0),
        };
        lines.push(format!(
            "  {} (weight {}): {}  [{}/{} scored]",
            category.name,
            trim_number(category.weight),
            format_percent(percentage),
            scored,
            category.criteria.len()
        ));

        for criterion in &category.criteria {
            let raw = vendor.scores.get(&criterion.id).copied();
            let row = format!(
                "    {:<24} {:>7}   weight {:<5} {}",
                truncate_name(&criterion.name, 24),
                format_raw(raw, criterion.max_score),
                trim_number(criterion.weight),
                criterion.priority.label()
            );
            if use_colors && raw.is_none() {
                lines.push(row.dimmed().to_string());
            } else {
                lines.push(row);
            }
        }
    }

    lines.join("\n")
}

/// Format vendors as tab-separated values for scripting
/// Columns: total, decision, name, id, coverage (no headers, no colors)
pub fn format_tsv(vendors: &[RankedVendor]) -> String {
    if vendors.is_empty() {
        return String::new();
    }

    vendors
        .iter()
        .map(|ranked| {
            let decision = match ranked.decision {
                Some(AwardDecision::Qualified) => "qualified",
                Some(AwardDecision::NotQualified) => "not-qualified",
                None => "-",
            };
            let (scored, total) = ranked.coverage();
            format!(
                "{}\t{}\t{}\t{}\t{}/{}",
                format_percent(ranked.result.total),
                decision,
                ranked.vendor.name,
                ranked.vendor.id,
                scored,
                total
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
