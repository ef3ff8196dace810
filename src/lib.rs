//! Income inequality analysis: Gini coefficient, Lorenz curve and
//! percentile group shares.
//!
//! The computation lives in [`inequality`]; everything else is the glue the
//! `gini` binary uses to get incomes in and results out.

pub mod error;
pub mod export;
pub mod formatting;
pub mod inequality;
pub mod parsing;
pub mod report;
pub mod sample;

pub use error::{Error, Result};
