//! Command implementations for the league board CLI

pub mod board;
pub mod common;
pub mod resolve;
