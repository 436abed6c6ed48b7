//! Strategies for use with `wordle_bench`.
//!
//! Each strategy consists of a single struct, and everything you need to
//! configure the strategy should exist as a method.

mod greedy;
pub use greedy::{Greedy, OPENING_WORD};
