//! Call-point discovery: one forward scan per method, classifying each
//! call instruction into a normalized record of its target.

mod invoke_dynamic;

pub use invoke_dynamic::{bound_target, BoundTarget, ReferenceKind};

use std::collections::BTreeMap;

use crate::attribute_info::{bootstrap_methods_of, code_of, BootstrapMethodsAttribute};
use crate::code_attribute::{decode_code, Instruction, MethodBody};
use crate::constant_info::ConstPool;
use crate::descriptor::{argument_types, TypeDesc};
use crate::types::ClassFile;

/// One call site, normalized over direct and dynamically bound forms.
#[derive(Clone, Debug, PartialEq)]
pub struct CallPoint {
    /// Owner class in binary form; the class may not be loadable.
    pub owner: String,
    pub method: String,
    pub argument_types: Vec<TypeDesc>,
    /// Index of the originating instruction in the decoded body.
    pub index: usize,
    /// True when the call site was dynamically bound.
    pub dynamic: bool,
    /// Reference kind of the resolved target, for dynamic call sites.
    pub reference_kind: Option<ReferenceKind>,
}

/// Scan a decoded body forward and collect its call points.
///
/// Virtual and interface calls become direct records; `invokedynamic`
/// resolves through the bootstrap table; everything else is ignored.
/// Unresolvable operands skip the instruction, never fail the scan.
pub fn method_call_points(
    body: &MethodBody,
    pool: &ConstPool,
    bootstrap: Option<&BootstrapMethodsAttribute>,
) -> Vec<CallPoint> {
    let mut call_points = Vec::new();
    for (index, decoded) in body.iter().enumerate() {
        let call_point = match decoded.op {
            Instruction::InvokeVirtual(i) | Instruction::InvokeInterface { index: i, .. } => {
                direct_call_point(pool, i, index)
            }
            Instruction::InvokeDynamic { index: i } => bootstrap
                .and_then(|table| bound_target(pool, table, i))
                .and_then(|target| dynamic_call_point(target, index)),
            _ => None,
        };
        if let Some(cp) = call_point {
            call_points.push(cp);
        }
    }
    call_points
}

fn direct_call_point(pool: &ConstPool, pool_index: u16, index: usize) -> Option<CallPoint> {
    let target = pool.method_ref(pool_index)?;
    let Some(args) = argument_types(target.descriptor) else {
        log::debug!(
            "skipping call to {}.{}: bad descriptor '{}'",
            target.class_name,
            target.name,
            target.descriptor
        );
        return None;
    };
    Some(CallPoint {
        owner: target.class_name,
        method: target.name.to_string(),
        argument_types: args,
        index,
        dynamic: false,
        reference_kind: None,
    })
}

fn dynamic_call_point(target: BoundTarget, index: usize) -> Option<CallPoint> {
    let args = target.argument_types()?;
    Some(CallPoint {
        owner: target.owner,
        method: target.method,
        argument_types: args,
        index,
        dynamic: true,
        reference_kind: Some(target.kind),
    })
}

/// Call points of one declared method.
#[derive(Clone, Debug)]
pub struct MethodCalls {
    /// Declaring class, binary form.
    pub owner: String,
    pub method: String,
    pub descriptor: String,
    pub calls: Vec<CallPoint>,
}

/// Parsed classes by binary name; the lookup side of cross-class scans.
#[derive(Debug, Default)]
pub struct ClassIndex {
    classes: BTreeMap<String, ClassFile>,
}

impl ClassIndex {
    pub fn new() -> ClassIndex {
        ClassIndex::default()
    }

    /// Insert a parsed class, keyed by its own name. Returns the name, or
    /// `None` when the class's pool does not resolve it (the class is
    /// dropped).
    pub fn insert(&mut self, class: ClassFile) -> Option<String> {
        let Some(name) = class.name() else {
            log::warn!("dropping class with unresolvable name");
            return None;
        };
        self.classes.insert(name.clone(), class);
        Some(name)
    }

    pub fn get(&self, name: &str) -> Option<&ClassFile> {
        self.classes.get(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// The class and its ancestors, nearest first. The walk ends without
    /// error at `java.lang.Object` or at the first ancestor the index does
    /// not hold.
    pub fn hierarchy(&self, name: &str) -> Vec<&ClassFile> {
        let mut chain = Vec::new();
        let mut current = name.to_string();
        while current != "java.lang.Object" {
            let Some(class) = self.classes.get(&current) else {
                if !chain.is_empty() {
                    log::debug!("ancestor '{current}' not in index, stopping hierarchy walk");
                }
                break;
            };
            chain.push(class);
            match class.super_name() {
                Some(super_name) => current = super_name,
                None => break,
            }
        }
        chain
    }
}

/// Collect call points for every method of `name` and its indexed
/// ancestors. Methods whose code cannot be decoded contribute an empty
/// call list; nothing here is fatal.
pub fn class_call_points(index: &ClassIndex, name: &str) -> Vec<MethodCalls> {
    let mut result = Vec::new();
    for class in index.hierarchy(name) {
        let pool = &class.const_pool;
        let Some(owner) = class.name() else { continue };
        let bootstrap = bootstrap_methods_of(class);
        for method in &class.methods {
            let (Some(method_name), Some(descriptor)) = (method.name(pool), method.descriptor(pool))
            else {
                log::debug!("skipping method with unresolvable name in {owner}");
                continue;
            };
            let calls = match code_of(pool, method) {
                Some(code) => match decode_code(&code.code) {
                    Ok(body) => method_call_points(&body, pool, bootstrap.as_ref()),
                    Err(e) => {
                        log::debug!("cannot decode {owner}.{method_name}: {e}");
                        Vec::new()
                    }
                },
                // abstract and native methods have no code
                None => Vec::new(),
            };
            result.push(MethodCalls {
                owner: owner.clone(),
                method: method_name.to_string(),
                descriptor: descriptor.to_string(),
                calls,
            });
        }
    }
    result
}
