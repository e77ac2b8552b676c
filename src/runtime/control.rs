//! Control-flow signals, modeled as a distinct outcome rather than folded
//! into the error type (spec.md §9 Design Notes: exceptions → explicit
//! result values).

use crate::error::PolyscriptError;
use crate::runtime::value::Value;

/// The non-`Value` outcomes an evaluation step can produce. `Return` is
/// consumed by the enclosing call frame; `Break`/`Continue` by the nearest
/// enclosing loop. Anything else propagates through `?` unchanged.
#[derive(Debug)]
pub enum Unwind {
    Return(Value),
    Break,
    Continue,
    Error(PolyscriptError),
}

pub type EvalResult = Result<Value, Unwind>;

impl From<PolyscriptError> for Unwind {
    fn from(err: PolyscriptError) -> Self {
        Unwind::Error(err)
    }
}
