//! Utility functions for rule implementations.

pub mod allowance;

#[doc(inline)]
pub use allowance::{check_allow_with_reason, AllowCheck, AllowDirective};
