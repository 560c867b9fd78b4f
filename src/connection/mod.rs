//! Connections that tie the listener, queue, pump and aggregator together.

pub mod live;

pub use live::{LiveConnection, MIN_TICK_INTERVAL};

#[cfg(test)]
mod tests;
