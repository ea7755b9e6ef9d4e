//! Channel-level rollup of simulation rows.

use mixsim_core::{CampaignResult, ChannelSummary};
use std::collections::BTreeMap;

/// Group `results` by channel, summing conversions and budget.
///
/// Output is ordered by channel name. Conversion totals saturate at
/// `u64::MAX`. CPA is `budget / conversions`, NaN when a channel has no
/// conversions.
pub fn summarize_by_channel(results: &[CampaignResult]) -> Vec<ChannelSummary> {
    let mut groups: BTreeMap<&str, (u64, f64)> = BTreeMap::new();
    for row in results {
        let entry = groups.entry(row.channel.as_str()).or_insert((0, 0.0));
        entry.0 = entry.0.saturating_add(row.conversions);
        entry.1 += row.channel_budget;
    }

    groups
        .into_iter()
        .map(|(channel, (total_conversions, total_budget_spent))| ChannelSummary {
            channel: channel.to_string(),
            total_conversions,
            total_budget_spent,
            cpa: if total_conversions > 0 {
                total_budget_spent / total_conversions as f64
            } else {
                f64::NAN
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(channel: &str, budget: f64, conversions: u64) -> CampaignResult {
        CampaignResult {
            segment: "Tech Moms".to_string(),
            message: "Planet First".to_string(),
            channel: channel.to_string(),
            channel_budget: budget,
            reach: 0,
            impressions: 0,
            clicks: 0,
            conversions,
            cpa: f64::NAN,
            roi: f64::NAN,
        }
    }

    #[test]
    fn test_groups_and_sorts_by_channel() {
        let rows = vec![
            row("YouTube", 1_000.0, 100),
            row("Instagram", 500.0, 20),
            row("YouTube", 1_000.0, 150),
        ];
        let summary = summarize_by_channel(&rows);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].channel, "Instagram");
        assert_eq!(summary[1].channel, "YouTube");
        assert_eq!(summary[1].total_conversions, 250);
        assert!((summary[1].total_budget_spent - 2_000.0).abs() < f64::EPSILON);
        assert!((summary[1].cpa - 8.0).abs() < f64::EPSILON);
        assert!((summary[0].cpa - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_conversions_gives_nan_cpa() {
        let summary = summarize_by_channel(&[row("Podcast", 0.0, 0), row("Podcast", 0.0, 0)]);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].total_conversions, 0);
        assert!(summary[0].cpa.is_nan());
    }

    #[test]
    fn test_conversion_total_saturates() {
        let rows = vec![
            row("YouTube", 1e30, u64::MAX),
            row("YouTube", 1e30, u64::MAX),
            row("YouTube", 1e30, 5),
        ];
        let summary = summarize_by_channel(&rows);
        assert_eq!(summary[0].total_conversions, u64::MAX);
        assert!((summary[0].total_budget_spent - 3e30).abs() < 1e16);
        assert!(summary[0].cpa.is_finite());
    }

    #[test]
    fn test_empty_results() {
        assert!(summarize_by_channel(&[]).is_empty());
    }
}
