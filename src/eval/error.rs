use thiserror::Error;

use super::invoke::InvokeError;

/// A failed resolution attempt.
///
/// Three families: values the walk cannot pin down (`UnresolvedLocal`,
/// `MissingProducer`, `FieldNotFound`, `FieldOnNonObject`, `BadConstant`,
/// `StepLimit`), failures of the invoker seam (`Invoke`, which covers both
/// unloadable owner types and failed executions), and `Unsupported`, which
/// signals that opcode coverage needs extending rather than anything odd in
/// the analyzed method.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("no store to local slot {slot} precedes the load at offset {address}")]
    UnresolvedLocal { slot: u16, address: u32 },

    /// The walk ran past the start of the body looking for a producer.
    #[error("no value producer before offset {address}")]
    MissingProducer { address: u32 },

    #[error("field '{field}' not found on {class} or any ancestor")]
    FieldNotFound { class: String, field: String },

    #[error("field '{field}' read on a {found} value")]
    FieldOnNonObject { field: String, found: &'static str },

    /// An instruction operand does not resolve to a usable pool entry.
    #[error("constant pool slot {index} is not usable here")]
    BadConstant { index: u16 },

    #[error("step budget of {limit} exhausted")]
    StepLimit { limit: usize },

    #[error("unsupported instruction {op} at offset {address}")]
    Unsupported { op: String, address: u32 },

    #[error(transparent)]
    Invoke(#[from] InvokeError),
}

impl EvalError {
    /// True for the loud condition: the walk met an instruction kind the
    /// evaluator does not model.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, EvalError::Unsupported { .. })
    }
}
