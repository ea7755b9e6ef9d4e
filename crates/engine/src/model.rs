//! Funnel projection: channel budget → reach, impressions, clicks, conversions.
//!
//! Every formula here is total. Zero, negative, or non-finite inputs collapse
//! to a zero funnel instead of dividing by zero.

use mixsim_core::{BenchmarkEntry, MetricModel};

/// Fractional funnel counts before truncation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Funnel {
    pub reach: f64,
    pub impressions: f64,
    pub clicks: f64,
    pub conversions: f64,
}

/// A formula family that projects spend through the funnel.
pub trait FunnelModel {
    /// Project `budget` spent on a channel with `benchmark` rates, scaled by `lift`.
    fn project(&self, budget: f64, benchmark: &BenchmarkEntry, lift: f64) -> Funnel;

    /// Model name for logging.
    fn model_name(&self) -> &str;
}

impl FunnelModel for MetricModel {
    fn project(&self, budget: f64, benchmark: &BenchmarkEntry, lift: f64) -> Funnel {
        match *self {
            MetricModel::Cpm => project_cpm(budget, benchmark, lift),
            MetricModel::CostPerClick {
                ctr,
                cost_per_click,
                conversion_rate,
            } => project_cost_per_click(budget, ctr, cost_per_click, conversion_rate, lift),
        }
    }

    fn model_name(&self) -> &str {
        self.name()
    }
}

fn project_cpm(budget: f64, benchmark: &BenchmarkEntry, lift: f64) -> Funnel {
    let impressions = if positive(budget) && positive(benchmark.cpm) {
        (budget / benchmark.cpm) * 1000.0
    } else {
        0.0
    };
    let clicks = non_negative(impressions * benchmark.ctr);
    let conversions = non_negative(clicks * benchmark.cvr * lift);
    Funnel {
        reach: impressions,
        impressions,
        clicks,
        conversions,
    }
}

fn project_cost_per_click(
    budget: f64,
    ctr: f64,
    cost_per_click: f64,
    conversion_rate: f64,
    lift: f64,
) -> Funnel {
    let clicks = if positive(budget) && positive(cost_per_click) {
        budget / cost_per_click
    } else {
        0.0
    };
    let reach = if positive(ctr) { clicks / ctr } else { 0.0 };
    let conversions = non_negative(clicks * conversion_rate * lift);
    Funnel {
        reach,
        impressions: reach,
        clicks,
        conversions,
    }
}

/// `budget / conversions`, NaN when nothing converts.
pub fn cost_per_acquisition(budget: f64, conversions: f64) -> f64 {
    if conversions > 0.0 {
        budget / conversions
    } else {
        f64::NAN
    }
}

/// `conversions * 100 / budget`, NaN when nothing was spent.
pub fn return_on_investment(conversions: f64, budget: f64) -> f64 {
    if budget > 0.0 {
        (conversions * 100.0) / budget
    } else {
        f64::NAN
    }
}

/// Round to two decimals, ties to even; NaN stays NaN.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Truncate toward zero into a count; anything non-positive or NaN is 0 and
/// anything past `u64::MAX` saturates.
pub fn truncate_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.trunc() as u64
    } else {
        0
    }
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn youtube() -> BenchmarkEntry {
        BenchmarkEntry::new("YouTube", 12.0, 0.015, 0.08)
    }

    #[test]
    fn test_cpm_projection() {
        let funnel = MetricModel::Cpm.project(100_000.0, &youtube(), 1.3);
        assert_eq!(truncate_count(funnel.impressions), 8_333_333);
        assert_eq!(truncate_count(funnel.clicks), 125_000);
        assert_eq!(truncate_count(funnel.conversions), 13_000);
        assert_eq!(funnel.reach, funnel.impressions);
    }

    #[test]
    fn test_cpm_zero_budget() {
        let funnel = MetricModel::Cpm.project(0.0, &youtube(), 1.3);
        assert_eq!(funnel, Funnel::default());
    }

    #[test]
    fn test_cpm_negative_budget_collapses() {
        let funnel = MetricModel::Cpm.project(-500.0, &youtube(), 1.3);
        assert_eq!(funnel, Funnel::default());
    }

    #[test]
    fn test_cpm_non_positive_benchmark() {
        let bench = BenchmarkEntry::new("Broken", 0.0, 0.015, 0.08);
        let funnel = MetricModel::Cpm.project(1_000.0, &bench, 1.0);
        assert_eq!(funnel, Funnel::default());
    }

    #[test]
    fn test_cost_per_click_projection() {
        // 3 000 / 1.50 = 2 000 clicks; reach = 2 000 / 0.02 = 100 000
        let funnel = MetricModel::cost_per_click().project(3_000.0, &youtube(), 1.5);
        assert!((funnel.clicks - 2_000.0).abs() < 1e-9);
        assert!((funnel.reach - 100_000.0).abs() < 1e-6);
        assert!((funnel.conversions - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_cost_per_click_ignores_benchmarks() {
        let model = MetricModel::cost_per_click();
        let a = model.project(3_000.0, &youtube(), 1.0);
        let b = model.project(3_000.0, &BenchmarkEntry::fallback("Podcast"), 1.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_cpa_and_roi_guards() {
        assert!(cost_per_acquisition(100.0, 0.0).is_nan());
        assert!(return_on_investment(10.0, 0.0).is_nan());
        assert!((round2(cost_per_acquisition(100_000.0, 13_000.0)) - 7.69).abs() < 1e-12);
        assert!((round2(return_on_investment(13_000.0, 100_000.0)) - 13.0).abs() < 1e-12);
        assert!(round2(f64::NAN).is_nan());
    }

    #[test]
    fn test_round2_ties_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(2.5), 2.5);
        assert_eq!(round2(7.6923), 7.69);
    }

    #[test]
    fn test_truncate_count() {
        assert_eq!(truncate_count(2_166.9), 2_166);
        assert_eq!(truncate_count(0.99), 0);
        assert_eq!(truncate_count(-3.0), 0);
        assert_eq!(truncate_count(f64::NAN), 0);
        assert_eq!(truncate_count(5e27), u64::MAX);
    }
}
