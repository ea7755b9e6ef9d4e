use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// CPM applied to channels without a benchmark entry.
pub const DEFAULT_CPM: f64 = 10.0;
/// CTR applied to channels without a benchmark entry.
pub const DEFAULT_CTR: f64 = 0.01;
/// CVR applied to channels without a benchmark entry.
pub const DEFAULT_CVR: f64 = 0.05;
/// Lift applied to (segment, message) pairs missing from the lift table.
pub const DEFAULT_LIFT: f64 = 1.0;
/// Upper bound of a single channel's raw budget weight.
pub const MAX_BUDGET_WEIGHT: u32 = 100;

// ─── Benchmarks ─────────────────────────────────────────────────────────────

/// Media cost and funnel rates for one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    pub channel: String,
    /// Cost per one thousand impressions.
    pub cpm: f64,
    /// Fraction of impressions that become clicks.
    pub ctr: f64,
    /// Fraction of clicks that become conversions.
    pub cvr: f64,
}

impl BenchmarkEntry {
    pub fn new(channel: impl Into<String>, cpm: f64, ctr: f64, cvr: f64) -> Self {
        Self {
            channel: channel.into(),
            cpm,
            ctr,
            cvr,
        }
    }

    /// The entry used for channels nobody supplied benchmarks for.
    pub fn fallback(channel: impl Into<String>) -> Self {
        Self::new(channel, DEFAULT_CPM, DEFAULT_CTR, DEFAULT_CVR)
    }
}

/// Channel → benchmark snapshot handed to the engine for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BenchmarkTable {
    entries: BTreeMap<String, BenchmarkEntry>,
}

impl BenchmarkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry keyed by `entry.channel`.
    pub fn upsert(&mut self, entry: BenchmarkEntry) {
        self.entries.insert(entry.channel.clone(), entry);
    }

    /// Overlay every entry of `other` on top of this table.
    pub fn merge(&mut self, other: BenchmarkTable) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, channel: &str) -> Option<&BenchmarkEntry> {
        self.entries.get(channel)
    }

    pub fn get_or_default(&self, channel: &str) -> BenchmarkEntry {
        self.entries
            .get(channel)
            .cloned()
            .unwrap_or_else(|| BenchmarkEntry::fallback(channel))
    }

    pub fn entries(&self) -> impl Iterator<Item = &BenchmarkEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<BenchmarkEntry> for BenchmarkTable {
    fn from_iter<I: IntoIterator<Item = BenchmarkEntry>>(iter: I) -> Self {
        let mut table = BenchmarkTable::new();
        for entry in iter {
            table.upsert(entry);
        }
        table
    }
}

// ─── Lift ───────────────────────────────────────────────────────────────────

/// Message-segment affinity multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftEntry {
    pub segment: String,
    pub message: String,
    pub lift: f64,
}

impl LiftEntry {
    pub fn new(segment: impl Into<String>, message: impl Into<String>, lift: f64) -> Self {
        Self {
            segment: segment.into(),
            message: message.into(),
            lift,
        }
    }
}

/// (segment, message) → lift snapshot, stored segment → message → lift.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LiftTable {
    scores: BTreeMap<String, BTreeMap<String, f64>>,
}

impl LiftTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, entry: LiftEntry) {
        self.scores
            .entry(entry.segment)
            .or_default()
            .insert(entry.message, entry.lift);
    }

    pub fn merge(&mut self, other: LiftTable) {
        for (segment, messages) in other.scores {
            self.scores.entry(segment).or_default().extend(messages);
        }
    }

    pub fn get(&self, segment: &str, message: &str) -> Option<f64> {
        self.scores.get(segment)?.get(message).copied()
    }

    pub fn get_or_default(&self, segment: &str, message: &str) -> f64 {
        self.get(segment, message).unwrap_or(DEFAULT_LIFT)
    }

    pub fn entries(&self) -> impl Iterator<Item = LiftEntry> + '_ {
        self.scores.iter().flat_map(|(segment, messages)| {
            messages
                .iter()
                .map(move |(message, lift)| LiftEntry::new(segment.as_str(), message.as_str(), *lift))
        })
    }

    pub fn len(&self) -> usize {
        self.scores.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<LiftEntry> for LiftTable {
    fn from_iter<I: IntoIterator<Item = LiftEntry>>(iter: I) -> Self {
        let mut table = LiftTable::new();
        for entry in iter {
            table.upsert(entry);
        }
        table
    }
}

// ─── Budget split ───────────────────────────────────────────────────────────

/// Raw per-channel budget weights as entered (0–100 each, any total).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BudgetSplit {
    weights: BTreeMap<String, u32>,
}

impl BudgetSplit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a channel's weight, clamped to [`MAX_BUDGET_WEIGHT`].
    pub fn set(&mut self, channel: impl Into<String>, weight: u32) {
        self.weights
            .insert(channel.into(), weight.min(MAX_BUDGET_WEIGHT));
    }

    pub fn with(mut self, channel: impl Into<String>, weight: u32) -> Self {
        self.set(channel, weight);
        self
    }

    /// Weight for `channel`; channels never set weigh 0.
    pub fn weight(&self, channel: &str) -> u32 {
        self.weights.get(channel).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.weights.iter().map(|(c, w)| (c.as_str(), *w))
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for BudgetSplit {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut split = BudgetSplit::new();
        for (channel, weight) in iter {
            split.set(channel, weight);
        }
        split
    }
}

// ─── Metric models ──────────────────────────────────────────────────────────

/// Formula family used to turn channel budget into funnel counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricModel {
    /// Impressions bought at the channel's CPM, then CTR and CVR per channel.
    Cpm,
    /// Clicks bought at a flat price with global CTR and conversion rate.
    CostPerClick {
        ctr: f64,
        cost_per_click: f64,
        conversion_rate: f64,
    },
}

impl MetricModel {
    pub const COST_PER_CLICK_CTR: f64 = 0.02;
    pub const COST_PER_CLICK_PRICE: f64 = 1.50;
    pub const COST_PER_CLICK_CONVERSION_RATE: f64 = 0.10;

    /// Cost-per-click model with the stock constants.
    pub fn cost_per_click() -> Self {
        MetricModel::CostPerClick {
            ctr: Self::COST_PER_CLICK_CTR,
            cost_per_click: Self::COST_PER_CLICK_PRICE,
            conversion_rate: Self::COST_PER_CLICK_CONVERSION_RATE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MetricModel::Cpm => "cpm",
            MetricModel::CostPerClick { .. } => "cost_per_click",
        }
    }
}

#[allow(clippy::derivable_impls)]
impl Default for MetricModel {
    fn default() -> Self {
        MetricModel::Cpm
    }
}

// ─── Simulation input / output ──────────────────────────────────────────────

/// Everything one simulation run reads. Built fresh for each run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    pub segments: Vec<String>,
    pub messages: Vec<String>,
    pub channels: Vec<String>,
    pub total_budget: f64,
    pub split: BudgetSplit,
    pub lifts: LiftTable,
    pub benchmarks: BenchmarkTable,
    #[serde(default)]
    pub model: MetricModel,
}

impl SimulationInput {
    /// Selections are de-duplicated, keeping the first occurrence's position.
    pub fn new<S: AsRef<str>>(
        segments: &[S],
        messages: &[S],
        channels: &[S],
        total_budget: f64,
    ) -> Self {
        Self {
            segments: dedup(segments),
            messages: dedup(messages),
            channels: dedup(channels),
            total_budget,
            split: BudgetSplit::new(),
            lifts: LiftTable::new(),
            benchmarks: BenchmarkTable::new(),
            model: MetricModel::Cpm,
        }
    }

    pub fn with_split(mut self, split: BudgetSplit) -> Self {
        self.split = split;
        self
    }

    pub fn with_lifts(mut self, lifts: LiftTable) -> Self {
        self.lifts = lifts;
        self
    }

    pub fn with_benchmarks(mut self, benchmarks: BenchmarkTable) -> Self {
        self.benchmarks = benchmarks;
        self
    }

    pub fn with_model(mut self, model: MetricModel) -> Self {
        self.model = model;
        self
    }

    /// Number of rows a run over this input emits.
    pub fn combination_count(&self) -> usize {
        self.segments.len() * self.messages.len() * self.channels.len()
    }
}

fn dedup<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.as_ref();
        if !out.iter().any(|seen| seen == item) {
            out.push(item.to_string());
        }
    }
    out
}

/// Projected performance of one (segment, message, channel) combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignResult {
    pub segment: String,
    pub message: String,
    pub channel: String,
    pub channel_budget: f64,
    pub reach: u64,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    /// Cost per acquisition; NaN when there are no conversions.
    pub cpa: f64,
    /// Conversions × 100 over budget; NaN when the budget is zero.
    pub roi: f64,
}

/// Per-channel rollup of [`CampaignResult`] rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub channel: String,
    pub total_conversions: u64,
    pub total_budget_spent: f64,
    /// NaN when the channel produced no conversions.
    pub cpa: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benchmark_fallback_for_unknown_channel() {
        let table: BenchmarkTable = [BenchmarkEntry::new("YouTube", 12.0, 0.015, 0.08)]
            .into_iter()
            .collect();

        let known = table.get_or_default("YouTube");
        assert!((known.cpm - 12.0).abs() < f64::EPSILON);

        let unknown = table.get_or_default("Billboard");
        assert_eq!(unknown, BenchmarkEntry::fallback("Billboard"));
        assert!((unknown.cpm - 10.0).abs() < f64::EPSILON);
        assert!((unknown.ctr - 0.01).abs() < f64::EPSILON);
        assert!((unknown.cvr - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn test_benchmark_merge_overwrites() {
        let mut base: BenchmarkTable = [
            BenchmarkEntry::new("YouTube", 12.0, 0.015, 0.08),
            BenchmarkEntry::new("Podcast", 20.0, 0.005, 0.1),
        ]
        .into_iter()
        .collect();
        let upload: BenchmarkTable = [BenchmarkEntry::new("YouTube", 9.0, 0.02, 0.05)]
            .into_iter()
            .collect();

        base.merge(upload);
        assert_eq!(base.len(), 2);
        assert!((base.get_or_default("YouTube").cpm - 9.0).abs() < f64::EPSILON);
        assert!((base.get_or_default("Podcast").cpm - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lift_defaults_to_one() {
        let table: LiftTable = [LiftEntry::new("Tech Moms", "Planet First", 0.8)]
            .into_iter()
            .collect();
        assert_eq!(table.get("Tech Moms", "Planet First"), Some(0.8));
        assert_eq!(table.get("Tech Moms", "Switch and Save"), None);
        assert!((table.get_or_default("Tech Moms", "Switch and Save") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lift_upsert_and_merge() {
        let mut table = LiftTable::new();
        table.upsert(LiftEntry::new("Tech Moms", "Planet First", 0.8));
        table.upsert(LiftEntry::new("Tech Moms", "Planet First", 1.1));
        assert_eq!(table.len(), 1);

        let mut other = LiftTable::new();
        other.upsert(LiftEntry::new("Suburban Dads", "Planet First", 0.7));
        table.merge(other);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Tech Moms", "Planet First"), Some(1.1));
        let entries: Vec<_> = table.entries().collect();
        assert_eq!(entries[0].segment, "Suburban Dads");
    }

    #[test]
    fn test_budget_split_clamps_and_defaults() {
        let split = BudgetSplit::new().with("YouTube", 250).with("Podcast", 40);
        assert_eq!(split.weight("YouTube"), 100);
        assert_eq!(split.weight("Podcast"), 40);
        assert_eq!(split.weight("Instagram"), 0);
    }

    #[test]
    fn test_input_dedups_selections() {
        let input = SimulationInput::new(
            &["Tech Moms", "Tech Moms", "Eco Millennials"],
            &["Planet First"],
            &["Podcast", "YouTube", "Podcast"],
            1_000.0,
        );
        assert_eq!(input.segments, vec!["Tech Moms", "Eco Millennials"]);
        assert_eq!(input.channels, vec!["Podcast", "YouTube"]);
        assert_eq!(input.combination_count(), 4);
    }

    #[test]
    fn test_lift_table_serializes_nested() {
        let table: LiftTable = [LiftEntry::new("Tech Moms", "Planet First", 0.8)]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"Tech Moms":{"Planet First":0.8}}"#);
    }

    #[test]
    fn test_metric_model_serde_tag() {
        let json = serde_json::to_string(&MetricModel::cost_per_click()).unwrap();
        assert!(json.contains("\"kind\":\"cost_per_click\""));
        let back: MetricModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MetricModel::cost_per_click());
    }
}
