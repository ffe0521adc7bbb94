//! dcasim — dollar-cost-averaging simulator over daily price data.
//!
//! Computes a fixed-amount monthly investment schedule over an ETF's daily
//! series and a synthetic leveraged variant of the same instrument.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
