pub mod customer;
pub mod request;
pub mod stats;

pub use customer::*;
pub use request::*;
pub use stats::*;
