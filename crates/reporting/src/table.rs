//! Plain-text tables for terminal output.

use mixsim_core::{CampaignResult, ChannelSummary};
use std::fmt::Write;

/// Render simulation rows as a fixed-width table. `NaN` metrics print as `-`.
pub fn render_results(results: &[CampaignResult]) -> String {
    let headers = [
        "Segment",
        "Message",
        "Channel",
        "Budget ($)",
        "Reach",
        "Impressions",
        "Clicks",
        "Conversions",
        "CPA ($)",
        "ROI (x)",
    ];
    let rows: Vec<Vec<String>> = results
        .iter()
        .map(|r| {
            vec![
                r.segment.clone(),
                r.message.clone(),
                r.channel.clone(),
                format!("{:.2}", r.channel_budget),
                r.reach.to_string(),
                r.impressions.to_string(),
                r.clicks.to_string(),
                r.conversions.to_string(),
                metric(r.cpa),
                metric(r.roi),
            ]
        })
        .collect();
    render(&headers, &rows, 3)
}

/// Render the per-channel rollup.
pub fn render_summary(summary: &[ChannelSummary]) -> String {
    let headers = ["Channel", "Conversions", "Budget ($)", "CPA ($)"];
    let rows: Vec<Vec<String>> = summary
        .iter()
        .map(|s| {
            vec![
                s.channel.clone(),
                s.total_conversions.to_string(),
                format!("{:.2}", s.total_budget_spent),
                metric(s.cpa),
            ]
        })
        .collect();
    render(&headers, &rows, 1)
}

fn metric(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        "-".to_string()
    }
}

/// The first `text_cols` columns are left-aligned, the rest right-aligned.
fn render(headers: &[&str], rows: &[Vec<String>], text_cols: usize) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    write_row(&mut out, &header_cells, &widths, text_cols);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_row(&mut out, &rule, &widths, text_cols);
    for row in rows {
        write_row(&mut out, row, &widths, text_cols);
    }
    out
}

fn write_row(out: &mut String, cells: &[String], widths: &[usize], text_cols: usize) {
    for (i, (cell, &width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        // Writing into a String cannot fail.
        let _ = if i < text_cols {
            write!(out, "{cell:<width$}")
        } else {
            write!(out, "{cell:>width$}")
        };
    }
    let trimmed = out.trim_end_matches(' ').len();
    out.truncate(trimmed);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_summary_alignment() {
        let summary = vec![
            ChannelSummary {
                channel: "YouTube".to_string(),
                total_conversions: 13_000,
                total_budget_spent: 100_000.0,
                cpa: 7.6923,
            },
            ChannelSummary {
                channel: "Podcast".to_string(),
                total_conversions: 0,
                total_budget_spent: 0.0,
                cpa: f64::NAN,
            },
        ];
        let text = render_summary(&summary);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Channel"));
        assert!(lines[2].starts_with("YouTube"));
        assert!(lines[2].ends_with("7.69"));
        assert!(lines[3].ends_with('-'));
        let widths: Vec<usize> = lines.iter().map(|l| l.len()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn test_render_results_empty() {
        let text = render_results(&[]);
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("Conversions"));
    }
}
