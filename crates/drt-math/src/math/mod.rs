//! Core math modules.

pub mod logit;
pub mod quantile;
