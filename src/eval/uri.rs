//! Recovery of the URI argument of a handshake-style call.
//!
//! One specific two-call idiom gets special treatment: a three-argument
//! connect call whose last declared argument is a `java.net.URI` that was
//! just produced by a static `URI.create(...)`. The create call is skipped
//! and its own argument evaluated directly, so the URI string is recovered
//! without executing the creation. Anything else evaluates normally and
//! stringifies. This is deliberately not generalized to other idioms.

use crate::code_attribute::Instruction;
use crate::constant_info::ConstPool;
use crate::descriptor::argument_types;

use super::{Eval, EvalError};

const URI_CLASS: &str = "java.net.URI";

/// True when the pool entry at `index` names `java.net.URI.create`.
pub fn is_uri_create(pool: &ConstPool, index: u16) -> bool {
    pool.method_ref(index)
        .is_some_and(|m| m.class_name == URI_CLASS && m.name == "create")
}

/// Recover the URI argument of the three-argument connect call at `call`.
pub fn connect_uri(eval: &Eval<'_>, call: usize) -> Result<String, EvalError> {
    let address = eval.body().address(call).unwrap_or(0);
    let index = match eval.body().op(call) {
        Some(Instruction::InvokeVirtual(i))
        | Some(Instruction::InvokeInterface { index: i, .. })
        | Some(Instruction::InvokeStatic(i)) => *i,
        _ => return Err(EvalError::MissingProducer { address }),
    };
    let target = eval
        .pool()
        .method_ref(index)
        .ok_or(EvalError::BadConstant { index })?;
    let args = argument_types(target.descriptor).ok_or(EvalError::BadConstant { index })?;
    if args.len() != 3 || !args[2].is_class(URI_CLASS) {
        return Err(EvalError::Unsupported {
            op: format!("connect call with signature {}", target.descriptor),
            address,
        });
    }

    let prev = eval
        .body()
        .prev(call)
        .ok_or(EvalError::MissingProducer { address })?;
    if let Some(Instruction::InvokeStatic(create)) = eval.body().op(prev) {
        if is_uri_create(eval.pool(), *create) {
            // skip over URI.create and read the string it was given
            let producer = eval
                .body()
                .prev(prev)
                .ok_or(EvalError::MissingProducer { address })?;
            return Ok(eval.eval(producer)?.value.to_string());
        }
    }
    Ok(eval.eval(prev)?.value.to_string())
}
