pub mod satellites;
pub mod stats;

pub use satellites::*;
pub use stats::*;
