pub mod post_stats;
pub mod satellite;

pub use post_stats::*;
pub use satellite::*;
