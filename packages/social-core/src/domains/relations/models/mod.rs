pub mod outcome;
pub mod relation_edge;

pub use outcome::*;
pub use relation_edge::*;
