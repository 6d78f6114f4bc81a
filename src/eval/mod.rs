//! Backward value resolution over a decoded method body.
//!
//! Given an instruction that produced a value, [`Eval`] walks the
//! predecessor chain to reconstruct the value that was pushed: constants
//! resolve immediately, local loads chase the nearest preceding store,
//! field reads recurse into the owning object, and static calls execute
//! through the [`StaticInvoker`] seam. Everything is read-only over the
//! body; failures are typed results, never panics.

mod error;
mod invoke;
mod uri;
mod value;

pub use error::EvalError;
pub use invoke::{HostRegistry, InvokeError, StaticInvoker};
pub use uri::{connect_uri, is_uri_create};
pub use value::{ClassCatalog, ClassSpec, Object, ObjectRef, Value};

use std::cell::Cell;

use crate::code_attribute::{Immediate, Instruction, MethodBody};
use crate::constant_info::{ConstPool, ConstValue};
use crate::descriptor::{argument_types, TypeDesc};

/// A successfully resolved value.
///
/// `origin` is the instruction the resolution was rooted at; `first` is the
/// earliest instruction consumed while producing the value. Chained
/// argument walks resume from `first`, so one argument's producer chain is
/// never consumed twice.
#[derive(Clone, Debug)]
pub struct Evaluated {
    pub value: Value,
    pub origin: usize,
    pub first: usize,
}

/// Arguments of one call, in declared positional order.
#[derive(Clone, Debug)]
pub struct Arguments {
    pub values: Vec<Value>,
    /// Earliest instruction consumed across all argument walks; the
    /// call instruction itself when there are no arguments.
    pub first: usize,
}

/// The backward evaluator for one method activation.
///
/// Borrows everything it touches, so independent instances may run in
/// parallel over different methods. The step budget makes pathological
/// walks fail deterministically instead of depending on stack depth.
pub struct Eval<'a> {
    this: Value,
    body: &'a MethodBody,
    pool: &'a ConstPool,
    catalog: &'a ClassCatalog,
    invoker: &'a dyn StaticInvoker,
    limit: usize,
    steps: Cell<usize>,
}

impl<'a> Eval<'a> {
    pub fn new(
        this: Value,
        body: &'a MethodBody,
        pool: &'a ConstPool,
        catalog: &'a ClassCatalog,
        invoker: &'a dyn StaticInvoker,
    ) -> Eval<'a> {
        let limit = body.len().saturating_mul(16).max(64);
        Eval {
            this,
            body,
            pool,
            catalog,
            invoker,
            limit,
            steps: Cell::new(limit),
        }
    }

    /// Replace the default step budget (sixteen times the body length).
    pub fn with_step_limit(mut self, limit: usize) -> Eval<'a> {
        self.limit = limit;
        self.steps.set(limit);
        self
    }

    pub fn body(&self) -> &MethodBody {
        self.body
    }

    pub fn pool(&self) -> &ConstPool {
        self.pool
    }

    /// Resolve the value produced by the instruction at `at`.
    pub fn eval(&self, at: usize) -> Result<Evaluated, EvalError> {
        self.charge()?;
        let address = self.address(at);
        let op = self
            .body
            .op(at)
            .ok_or(EvalError::MissingProducer { address })?;
        match *op {
            Instruction::LoadConst(index) => {
                let value = self.const_value(index)?;
                Ok(self.here(value, at))
            }
            Instruction::PushImmediate(imm) => Ok(self.here(immediate_value(imm), at)),
            Instruction::LoadLocal(0) => Ok(self.here(self.this.clone(), at)),
            Instruction::LoadLocal(slot) => self.eval_local(at, slot),
            Instruction::StoreLocal(_) => {
                let stored = self.eval(self.producer(at)?)?;
                Ok(Evaluated {
                    value: stored.value,
                    origin: at,
                    first: stored.first,
                })
            }
            Instruction::GetField(index) => self.eval_field(at, index),
            // a cast does not change the value the walk recovers
            Instruction::CheckCast(_) => {
                let inner = self.eval(self.producer(at)?)?;
                Ok(Evaluated {
                    value: inner.value,
                    origin: at,
                    first: inner.first,
                })
            }
            Instruction::InvokeStatic(index) => self.eval_static_call(at, index),
            ref other => {
                log::error!("unsupported instruction {other:?} at offset {address}");
                Err(EvalError::Unsupported {
                    op: format!("{other:?}"),
                    address,
                })
            }
        }
    }

    /// Resolve the `count` arguments of the call at `call`, last argument
    /// first, each walk resuming where the previous one stopped.
    pub fn eval_arguments(&self, call: usize, count: usize) -> Result<Arguments, EvalError> {
        let mut values = vec![Value::Null; count];
        let mut cursor = call;
        for slot in (0..count).rev() {
            cursor = self.producer(cursor)?;
            let evaluated = self.eval(cursor)?;
            values[slot] = evaluated.value;
            cursor = evaluated.first;
        }
        Ok(Arguments {
            values,
            first: cursor,
        })
    }

    /// Resolve the value the method's final return instruction hands back.
    pub fn eval_return(&self) -> Result<Evaluated, EvalError> {
        let ret = self
            .body
            .last_return()
            .ok_or(EvalError::MissingProducer { address: 0 })?;
        self.eval(self.producer(ret)?)
    }

    fn eval_local(&self, at: usize, slot: u16) -> Result<Evaluated, EvalError> {
        let mut scan = self.body.prev(at);
        while let Some(i) = scan {
            if matches!(self.body.op(i), Some(Instruction::StoreLocal(s)) if *s == slot) {
                let stored = self.eval(self.producer(i)?)?;
                // the load itself is the consumption point; the store's
                // chain stays available to earlier argument walks
                return Ok(self.here(stored.value, at));
            }
            scan = self.body.prev(i);
        }
        Err(EvalError::UnresolvedLocal {
            slot,
            address: self.address(at),
        })
    }

    fn eval_field(&self, at: usize, index: u16) -> Result<Evaluated, EvalError> {
        let field = self
            .pool
            .field_ref(index)
            .ok_or(EvalError::BadConstant { index })?;
        let name = field.name.to_string();
        let owner = self.eval(self.producer(at)?)?;
        let object = match owner.value {
            Value::Object(ref obj) => obj,
            ref other => {
                return Err(EvalError::FieldOnNonObject {
                    field: name,
                    found: other.kind(),
                })
            }
        };
        let value = self
            .catalog
            .field_value(object, &name)
            .ok_or_else(|| EvalError::FieldNotFound {
                class: object.class_name().to_string(),
                field: name,
            })?;
        Ok(Evaluated {
            value,
            origin: at,
            first: owner.first,
        })
    }

    fn eval_static_call(&self, at: usize, index: u16) -> Result<Evaluated, EvalError> {
        let target = self
            .pool
            .method_ref(index)
            .ok_or(EvalError::BadConstant { index })?;
        let arg_types: Vec<TypeDesc> =
            argument_types(target.descriptor).ok_or(EvalError::BadConstant { index })?;
        let (owner, name) = (target.class_name, target.name.to_string());
        let args = self.eval_arguments(at, arg_types.len())?;
        let value = self
            .invoker
            .invoke_static(&owner, &name, &arg_types, &args.values)?;
        log::debug!("resolved static call '{owner}.{name}' to {value}");
        Ok(Evaluated {
            value,
            origin: at,
            first: args.first,
        })
    }

    /// The instruction feeding the one at `at`: its direct predecessor.
    fn producer(&self, at: usize) -> Result<usize, EvalError> {
        self.body.prev(at).ok_or(EvalError::MissingProducer {
            address: self.address(at),
        })
    }

    fn const_value(&self, index: u16) -> Result<Value, EvalError> {
        let constant = self
            .pool
            .loadable(index)
            .ok_or(EvalError::BadConstant { index })?;
        Ok(match constant {
            ConstValue::Int(v) => Value::Int(v),
            ConstValue::Float(v) => Value::Float(v),
            ConstValue::Long(v) => Value::Long(v),
            ConstValue::Double(v) => Value::Double(v),
            ConstValue::Str(s) => Value::string(s),
            ConstValue::ClassName(name) => Value::string(name.replace('/', ".")),
        })
    }

    /// A value produced and consumed at a single position.
    fn here(&self, value: Value, at: usize) -> Evaluated {
        Evaluated {
            value,
            origin: at,
            first: at,
        }
    }

    fn address(&self, at: usize) -> u32 {
        self.body.address(at).unwrap_or(0)
    }

    fn charge(&self) -> Result<(), EvalError> {
        let left = self.steps.get();
        if left == 0 {
            return Err(EvalError::StepLimit { limit: self.limit });
        }
        self.steps.set(left - 1);
        Ok(())
    }
}

fn immediate_value(imm: Immediate) -> Value {
    match imm {
        Immediate::Null => Value::Null,
        Immediate::Int(v) => Value::Int(v),
        Immediate::Long(v) => Value::Long(v),
        Immediate::Float(v) => Value::Float(v),
        Immediate::Double(v) => Value::Double(v),
    }
}
