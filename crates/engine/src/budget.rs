//! Budget normalisation across the selected channels.

use mixsim_core::BudgetSplit;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The slice of the total budget assigned to one selected channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelAllocation {
    pub channel: String,
    pub weight: u32,
    /// `weight / sum(selected weights)`, or 0 when the sum is 0.
    pub fraction: f64,
    pub budget: f64,
}

/// Split `total_budget` across `channels` in proportion to their weights.
///
/// Only selected channels count toward the denominator. Channels missing from
/// `split` weigh 0. A zero total leaves every channel with a zero budget.
pub fn allocate(total_budget: f64, split: &BudgetSplit, channels: &[String]) -> Vec<ChannelAllocation> {
    let total_weight: u64 = channels.iter().map(|c| split.weight(c) as u64).sum();

    if total_weight == 0 && !channels.is_empty() {
        warn!(
            channels = channels.len(),
            "Budget weights sum to zero, every channel gets no budget"
        );
    }

    channels
        .iter()
        .map(|channel| {
            let weight = split.weight(channel);
            let fraction = if total_weight > 0 {
                weight as f64 / total_weight as f64
            } else {
                0.0
            };
            ChannelAllocation {
                channel: channel.clone(),
                weight,
                fraction,
                budget: total_budget * fraction,
            }
        })
        .collect()
}
