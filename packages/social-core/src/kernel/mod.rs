//! Kernel module - infrastructure shared by the domains.

pub mod deps;
pub mod identity;
pub mod test_dependencies;
pub mod traits;
pub mod transaction;

pub use deps::SocialDeps;
pub use identity::PgIdentityLookup;
pub use test_dependencies::{MockIdentityLookup, TestDependencies};
pub use traits::*;
