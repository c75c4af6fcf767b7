pub mod classify;
pub mod counters;

pub use classify::*;
pub use counters::*;
