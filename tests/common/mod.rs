#![allow(dead_code)]

use classfile_callpoints::attribute_info::{AttributeInfo, BootstrapMethod, BootstrapMethodsAttribute};
use classfile_callpoints::constant_info::*;
use classfile_callpoints::field_info::FieldInfo;
use classfile_callpoints::method_info::{MethodAccessFlags, MethodInfo};
use classfile_callpoints::{ClassAccessFlags, ClassFile};

/// Assembles a constant pool entry by entry, returning 1-based slot
/// indices as it goes.
#[derive(Default)]
pub struct PoolBuilder {
    entries: Vec<ConstantInfo>,
}

impl PoolBuilder {
    pub fn new() -> PoolBuilder {
        PoolBuilder::default()
    }

    fn push(&mut self, entry: ConstantInfo) -> u16 {
        self.entries.push(entry);
        self.entries.len() as u16
    }

    pub fn utf8(&mut self, text: &str) -> u16 {
        self.push(ConstantInfo::Utf8(Utf8Constant {
            text: text.to_string(),
        }))
    }

    pub fn int(&mut self, value: i32) -> u16 {
        self.push(ConstantInfo::Integer(IntegerConstant { value }))
    }

    pub fn string(&mut self, text: &str) -> u16 {
        let string_index = self.utf8(text);
        self.push(ConstantInfo::String(StringConstant { string_index }))
    }

    /// `name` in internal (slashed) form.
    pub fn class(&mut self, name: &str) -> u16 {
        let name_index = self.utf8(name);
        self.push(ConstantInfo::Class(ClassConstant { name_index }))
    }

    pub fn name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name_index = self.utf8(name);
        let descriptor_index = self.utf8(descriptor);
        self.push(ConstantInfo::NameAndType(NameAndTypeConstant {
            name_index,
            descriptor_index,
        }))
    }

    pub fn method_ref(&mut self, class: &str, name: &str, descriptor: &str) -> u16 {
        let class_index = self.class(class);
        let name_and_type_index = self.name_and_type(name, descriptor);
        self.push(ConstantInfo::MethodRef(RefConstant {
            class_index,
            name_and_type_index,
        }))
    }

    pub fn interface_method_ref(&mut self, class: &str, name: &str, descriptor: &str) -> u16 {
        let class_index = self.class(class);
        let name_and_type_index = self.name_and_type(name, descriptor);
        self.push(ConstantInfo::InterfaceMethodRef(RefConstant {
            class_index,
            name_and_type_index,
        }))
    }

    pub fn field_ref(&mut self, class: &str, name: &str, descriptor: &str) -> u16 {
        let class_index = self.class(class);
        let name_and_type_index = self.name_and_type(name, descriptor);
        self.push(ConstantInfo::FieldRef(RefConstant {
            class_index,
            name_and_type_index,
        }))
    }

    pub fn method_handle(&mut self, reference_kind: u8, reference_index: u16) -> u16 {
        self.push(ConstantInfo::MethodHandle(MethodHandleConstant {
            reference_kind,
            reference_index,
        }))
    }

    pub fn method_type(&mut self, descriptor: &str) -> u16 {
        let descriptor_index = self.utf8(descriptor);
        self.push(ConstantInfo::MethodType(MethodTypeConstant { descriptor_index }))
    }

    pub fn invoke_dynamic(
        &mut self,
        bootstrap_method_attr_index: u16,
        name: &str,
        descriptor: &str,
    ) -> u16 {
        let name_and_type_index = self.name_and_type(name, descriptor);
        self.push(ConstantInfo::InvokeDynamic(DynamicConstant {
            bootstrap_method_attr_index,
            name_and_type_index,
        }))
    }

    pub fn build(self) -> ConstPool {
        ConstPool::from_entries(self.entries)
    }
}

/// A bootstrap table with one entry holding the given argument slots.
pub fn one_bootstrap_method(arguments: Vec<u16>) -> BootstrapMethodsAttribute {
    BootstrapMethodsAttribute::from_methods(vec![BootstrapMethod::new(0, arguments)])
}

/// A method record with no code, as an abstract declaration would have.
pub fn abstract_method(pool: &mut PoolBuilder, name: &str, descriptor: &str) -> MethodInfo {
    let name_index = pool.utf8(name);
    let descriptor_index = pool.utf8(descriptor);
    MethodInfo {
        access_flags: MethodAccessFlags::PUBLIC,
        name_index,
        descriptor_index,
        attributes_count: 0,
        attributes: Vec::new(),
    }
}

/// A method whose `Code` attribute holds the given raw code bytes.
pub fn method_with_code(
    pool: &mut PoolBuilder,
    name: &str,
    descriptor: &str,
    code: &[u8],
) -> MethodInfo {
    let name_index = pool.utf8(name);
    let descriptor_index = pool.utf8(descriptor);
    let attribute_name_index = pool.utf8("Code");
    let info = encode_code_attribute(code);
    MethodInfo {
        access_flags: MethodAccessFlags::PUBLIC,
        name_index,
        descriptor_index,
        attributes_count: 1,
        attributes: vec![AttributeInfo {
            attribute_name_index,
            attribute_length: info.len() as u32,
            info,
        }],
    }
}

/// Encode a `Code` attribute payload around raw code bytes.
pub fn encode_code_attribute(code: &[u8]) -> Vec<u8> {
    let mut info = Vec::new();
    info.extend_from_slice(&2u16.to_be_bytes()); // max_stack
    info.extend_from_slice(&2u16.to_be_bytes()); // max_locals
    info.extend_from_slice(&(code.len() as u32).to_be_bytes());
    info.extend_from_slice(code);
    info.extend_from_slice(&0u16.to_be_bytes()); // exception_table_length
    info.extend_from_slice(&0u16.to_be_bytes()); // attributes_count
    info
}

/// Assemble a `ClassFile` value around an already-built pool.
pub fn class_file(
    pool: ConstPool,
    this_class: u16,
    super_class: u16,
    methods: Vec<MethodInfo>,
) -> ClassFile {
    let fields: Vec<FieldInfo> = Vec::new();
    ClassFile {
        minor_version: 0,
        major_version: 52,
        const_pool_size: pool.len() as u16 + 1,
        const_pool: pool,
        access_flags: ClassAccessFlags::PUBLIC,
        this_class,
        super_class,
        interfaces_count: 0,
        interfaces: Vec::new(),
        fields_count: fields.len() as u16,
        fields,
        methods_count: methods.len() as u16,
        methods,
        attributes_count: 0,
        attributes: Vec::new(),
    }
}
