//! Message providers.

pub mod replay;

pub use replay::ReplayProvider;
