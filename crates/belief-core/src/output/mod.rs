//! Run output: the result representations handed back to callers.

pub mod result;

pub use result::{
    fraction_correct, is_polarized, ResultAssembler, RunResult, StoredValues, CORRECT_THRESHOLD,
};
