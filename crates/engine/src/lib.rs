//! Marketing-mix simulation engine — budget allocation, funnel projection,
//! and channel rollups.

pub mod budget;
pub mod model;
pub mod simulate;
pub mod summary;

pub use budget::{allocate, ChannelAllocation};
pub use model::{Funnel, FunnelModel};
pub use simulate::{simulate, simulate_with, simulate_with_model};
pub use summary::summarize_by_channel;
