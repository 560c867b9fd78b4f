//! Shared value types.

pub mod update_rate;

pub use update_rate::UpdateRate;
