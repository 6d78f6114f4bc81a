use binrw::BinRead;

/// A raw attribute: name index plus undecoded payload bytes.
///
/// Payloads this crate consumes (`Code`, `BootstrapMethods`) are decoded on
/// demand by the parsers in this module; everything else stays raw.
#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct AttributeInfo {
    pub attribute_name_index: u16,
    pub attribute_length: u32,
    #[br(count = attribute_length)]
    pub info: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExceptionEntry {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    pub catch_type: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CodeAttribute {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code_length: u32,
    pub code: Vec<u8>,
    pub exception_table_length: u16,
    pub exception_table: Vec<ExceptionEntry>,
    pub attributes_count: u16,
    pub attributes: Vec<AttributeInfo>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BootstrapMethod {
    pub bootstrap_method_ref: u16,
    pub num_bootstrap_arguments: u16,
    pub bootstrap_arguments: Vec<u16>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BootstrapMethodsAttribute {
    pub num_bootstrap_methods: u16,
    pub bootstrap_methods: Vec<BootstrapMethod>,
}

impl BootstrapMethodsAttribute {
    /// Build the attribute directly from bootstrap method entries.
    pub fn from_methods(bootstrap_methods: Vec<BootstrapMethod>) -> Self {
        BootstrapMethodsAttribute {
            num_bootstrap_methods: bootstrap_methods.len() as u16,
            bootstrap_methods,
        }
    }
}

impl BootstrapMethod {
    pub fn new(bootstrap_method_ref: u16, bootstrap_arguments: Vec<u16>) -> Self {
        BootstrapMethod {
            bootstrap_method_ref,
            num_bootstrap_arguments: bootstrap_arguments.len() as u16,
            bootstrap_arguments,
        }
    }
}
