//! Connections that turn a message source into session snapshots.

pub mod replay;

#[cfg(test)]
mod tests;

pub use replay::ReplayConnection;
