//! Built-in audience, message, and channel catalog with stock lift scores.

use crate::types::{BudgetSplit, LiftEntry, LiftTable};

pub const DEFAULT_TOTAL_BUDGET: f64 = 100_000.0;
pub const MIN_TOTAL_BUDGET: f64 = 10_000.0;
pub const MAX_TOTAL_BUDGET: f64 = 500_000.0;
/// Weight every selected channel starts with.
pub const DEFAULT_CHANNEL_WEIGHT: u32 = 33;

pub const SEGMENTS: [&str; 3] = ["Tech Moms", "Eco Millennials", "Suburban Dads"];
pub const MESSAGES: [&str; 3] = ["Switch and Save", "Planet First", "Secure Your Family"];
pub const CHANNELS: [&str; 3] = ["YouTube", "Instagram", "Podcast"];

const LIFT_SCORES: [(&str, &str, f64); 9] = [
    ("Tech Moms", "Switch and Save", 1.3),
    ("Tech Moms", "Planet First", 0.8),
    ("Tech Moms", "Secure Your Family", 1.5),
    ("Eco Millennials", "Switch and Save", 1.0),
    ("Eco Millennials", "Planet First", 1.6),
    ("Eco Millennials", "Secure Your Family", 0.9),
    ("Suburban Dads", "Switch and Save", 1.4),
    ("Suburban Dads", "Planet First", 0.7),
    ("Suburban Dads", "Secure Your Family", 1.2),
];

pub fn segments() -> Vec<String> {
    SEGMENTS.iter().map(|s| s.to_string()).collect()
}

pub fn messages() -> Vec<String> {
    MESSAGES.iter().map(|s| s.to_string()).collect()
}

pub fn channels() -> Vec<String> {
    CHANNELS.iter().map(|s| s.to_string()).collect()
}

/// Stock lift scores for every catalog segment × message pair.
pub fn lift_table() -> LiftTable {
    LIFT_SCORES
        .iter()
        .map(|(segment, message, lift)| LiftEntry::new(*segment, *message, *lift))
        .collect()
}

/// Even split across `channels` at [`DEFAULT_CHANNEL_WEIGHT`].
pub fn even_split<S: AsRef<str>>(channels: &[S]) -> BudgetSplit {
    channels
        .iter()
        .map(|c| (c.as_ref().to_string(), DEFAULT_CHANNEL_WEIGHT))
        .collect()
}

/// Whether `budget` falls inside the range offered to planners.
pub fn budget_in_range(budget: f64) -> bool {
    (MIN_TOTAL_BUDGET..=MAX_TOTAL_BUDGET).contains(&budget)
}
