//! Resolution of dynamically bound call sites.
//!
//! An `invokedynamic` instruction names a bootstrap table entry; for the
//! lambda and method-reference factories, one of the bootstrap arguments is
//! a method-handle constant pointing at the real target method. Recovering
//! it lets a bound call site be treated like a direct call.

use crate::attribute_info::BootstrapMethodsAttribute;
use crate::constant_info::{ConstPool, ConstantInfo};
use crate::descriptor::{argument_types, TypeDesc};

/// Method-handle reference kinds, JVMS §4.4.8.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceKind {
    GetField,
    GetStatic,
    PutField,
    PutStatic,
    InvokeVirtual,
    InvokeStatic,
    InvokeSpecial,
    NewInvokeSpecial,
    InvokeInterface,
}

impl ReferenceKind {
    pub fn from_tag(tag: u8) -> Option<ReferenceKind> {
        Some(match tag {
            1 => ReferenceKind::GetField,
            2 => ReferenceKind::GetStatic,
            3 => ReferenceKind::PutField,
            4 => ReferenceKind::PutStatic,
            5 => ReferenceKind::InvokeVirtual,
            6 => ReferenceKind::InvokeStatic,
            7 => ReferenceKind::InvokeSpecial,
            8 => ReferenceKind::NewInvokeSpecial,
            9 => ReferenceKind::InvokeInterface,
            _ => return None,
        })
    }

    /// True for references that capture a receiver instance.
    pub fn is_bound_instance(self) -> bool {
        matches!(
            self,
            ReferenceKind::InvokeVirtual
                | ReferenceKind::InvokeSpecial
                | ReferenceKind::InvokeInterface
        )
    }
}

/// The real method behind a dynamically bound call site.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundTarget {
    /// Owner class in binary form.
    pub owner: String,
    pub method: String,
    pub descriptor: String,
    pub kind: ReferenceKind,
}

impl BoundTarget {
    pub fn argument_types(&self) -> Option<Vec<TypeDesc>> {
        argument_types(&self.descriptor)
    }
}

/// Resolve the `invokedynamic` constant at `index` against the bootstrap
/// table.
///
/// Returns the first bootstrap argument that is a method handle referring
/// to a plain method. `None` means the entry does not encode a method
/// reference (synthesized body, field handle, constant payload); the call
/// site simply yields no call point.
pub fn bound_target(
    pool: &ConstPool,
    bootstrap: &BootstrapMethodsAttribute,
    index: u16,
) -> Option<BoundTarget> {
    let call_site = pool.invoke_dynamic(index)?;
    let entry = bootstrap
        .bootstrap_methods
        .get(call_site.bootstrap_method_attr_index as usize)?;
    entry
        .bootstrap_arguments
        .iter()
        .find_map(|&argument| handle_target(pool, argument))
}

fn handle_target(pool: &ConstPool, index: u16) -> Option<BoundTarget> {
    let handle = pool.method_handle(index)?;
    let kind = ReferenceKind::from_tag(handle.reference_kind)?;
    // field handles never make a call point
    if !matches!(
        pool.get(handle.reference_index)?,
        ConstantInfo::MethodRef(_) | ConstantInfo::InterfaceMethodRef(_)
    ) {
        return None;
    }
    let target = pool.method_ref(handle.reference_index)?;
    Some(BoundTarget {
        owner: target.class_name,
        method: target.name.to_string(),
        descriptor: target.descriptor.to_string(),
        kind,
    })
}
