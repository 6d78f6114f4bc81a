mod parser;
mod types;

pub use parser::{bootstrap_methods_attribute_parser, code_attribute_parser};
pub use types::*;

use crate::constant_info::ConstPool;
use crate::method_info::MethodInfo;
use crate::types::ClassFile;

/// Find an attribute by its resolved name.
pub fn named_attribute<'a>(
    pool: &ConstPool,
    attributes: &'a [AttributeInfo],
    name: &str,
) -> Option<&'a AttributeInfo> {
    attributes
        .iter()
        .find(|a| pool.utf8(a.attribute_name_index) == Some(name))
}

/// Decode a method's `Code` attribute, if present and well formed.
pub fn code_of(pool: &ConstPool, method: &MethodInfo) -> Option<CodeAttribute> {
    let attr = named_attribute(pool, &method.attributes, "Code")?;
    code_attribute_parser(&attr.info).ok().map(|(_, code)| code)
}

/// Decode a class's `BootstrapMethods` attribute, if present and well formed.
pub fn bootstrap_methods_of(class: &ClassFile) -> Option<BootstrapMethodsAttribute> {
    let attr = named_attribute(&class.const_pool, &class.attributes, "BootstrapMethods")?;
    bootstrap_methods_attribute_parser(&attr.info)
        .ok()
        .map(|(_, bsm)| bsm)
}
