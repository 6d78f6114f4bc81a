use binrw::BinRead;

use crate::attribute_info::AttributeInfo;
use crate::constant_info::{const_pool_parser, ConstPool};
use crate::field_info::FieldInfo;
use crate::method_info::MethodInfo;

#[derive(Clone, Debug, BinRead)]
#[br(big, magic = b"\xca\xfe\xba\xbe")]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub const_pool_size: u16,
    #[br(parse_with = const_pool_parser, args(const_pool_size))]
    pub const_pool: ConstPool,
    pub access_flags: ClassAccessFlags,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces_count: u16,
    #[br(count = interfaces_count)]
    pub interfaces: Vec<u16>,
    pub fields_count: u16,
    #[br(count = fields_count)]
    pub fields: Vec<FieldInfo>,
    pub methods_count: u16,
    #[br(count = methods_count)]
    pub methods: Vec<MethodInfo>,
    pub attributes_count: u16,
    #[br(count = attributes_count)]
    pub attributes: Vec<AttributeInfo>,
}

impl ClassFile {
    /// Binary name of this class (`com.example.Service`).
    pub fn name(&self) -> Option<String> {
        self.const_pool.class_name_binary(self.this_class)
    }

    /// Binary name of the superclass; `None` for `java.lang.Object`'s
    /// zero index and for unresolvable pools.
    pub fn super_name(&self) -> Option<String> {
        if self.super_class == 0 {
            return None;
        }
        self.const_pool.class_name_binary(self.super_class)
    }

    /// Find a method by name (first match in declaration order).
    pub fn method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods
            .iter()
            .find(|m| m.name(&self.const_pool) == Some(name))
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, BinRead)]
#[br(big)]
pub struct ClassAccessFlags(u16);

bitflags! {
    impl ClassAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const FINAL = 0x0010;
        const SUPER = 0x0020;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        const MODULE = 0x8000;
    }
}
