// Business domains
pub mod cascade;
pub mod engagement;
pub mod polls;
pub mod posts;
pub mod relations;
