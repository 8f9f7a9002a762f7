pub mod cleanup;
pub mod diff;
pub mod expand;
pub mod guard;
pub mod result;
pub mod stats;
pub mod symbols;
pub mod tokenize;
pub mod worker;

pub use result::*;
pub use worker::{compare, CompareConfig, CompareEngine, ComparePair};
