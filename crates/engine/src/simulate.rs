//! The simulation loop: segment × message × channel → [`CampaignResult`].

use crate::budget::allocate;
use crate::model::{
    cost_per_acquisition, return_on_investment, round2, truncate_count, FunnelModel,
};
use mixsim_core::{BenchmarkTable, BudgetSplit, CampaignResult, LiftTable, SimulationInput};
use tracing::debug;

/// Run the simulation described by `input` with its configured model.
///
/// Rows come out segment-major, then message, then channel. Never fails:
/// degenerate arithmetic shows up as zero counts and NaN CPA/ROI.
pub fn simulate(input: &SimulationInput) -> Vec<CampaignResult> {
    simulate_with_model(input, &input.model)
}

/// Run the simulation with an explicit funnel model, ignoring `input.model`.
pub fn simulate_with_model<M: FunnelModel + ?Sized>(
    input: &SimulationInput,
    model: &M,
) -> Vec<CampaignResult> {
    // Per-channel work does not depend on segment or message.
    let plans: Vec<_> = allocate(input.total_budget, &input.split, &input.channels)
        .into_iter()
        .map(|alloc| {
            let benchmark = input.benchmarks.get_or_default(&alloc.channel);
            (alloc, benchmark)
        })
        .collect();

    let mut results = Vec::with_capacity(input.combination_count());
    for segment in &input.segments {
        for message in &input.messages {
            let lift = input.lifts.get_or_default(segment, message);
            for (alloc, benchmark) in &plans {
                let budget = alloc.budget;
                let funnel = model.project(budget, benchmark, lift);
                results.push(CampaignResult {
                    segment: segment.clone(),
                    message: message.clone(),
                    channel: alloc.channel.clone(),
                    channel_budget: budget,
                    reach: truncate_count(funnel.reach),
                    impressions: truncate_count(funnel.impressions),
                    clicks: truncate_count(funnel.clicks),
                    conversions: truncate_count(funnel.conversions),
                    cpa: round2(cost_per_acquisition(budget, funnel.conversions)),
                    roi: round2(return_on_investment(funnel.conversions, budget)),
                });
            }
        }
    }

    debug!(
        model = model.model_name(),
        rows = results.len(),
        total_budget = input.total_budget,
        "Simulation complete"
    );
    results
}

/// Positional form of [`simulate`] using the CPM model.
#[allow(clippy::too_many_arguments)]
pub fn simulate_with<S: AsRef<str>>(
    segments: &[S],
    messages: &[S],
    channels: &[S],
    total_budget: f64,
    split: &BudgetSplit,
    lifts: &LiftTable,
    benchmarks: &BenchmarkTable,
) -> Vec<CampaignResult> {
    let input = SimulationInput::new(segments, messages, channels, total_budget)
        .with_split(split.clone())
        .with_lifts(lifts.clone())
        .with_benchmarks(benchmarks.clone());
    simulate(&input)
}
