use binrw::BinRead;

use crate::attribute_info::AttributeInfo;
use crate::constant_info::ConstPool;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, BinRead)]
#[br(big)]
pub struct FieldAccessFlags(u16);

bitflags! {
    impl FieldAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const VOLATILE = 0x0040;
        const TRANSIENT = 0x0080;
        const SYNTHETIC = 0x1000;
        const ENUM = 0x4000;
    }
}

#[derive(Clone, Debug, BinRead)]
#[br(big)]
pub struct FieldInfo {
    pub access_flags: FieldAccessFlags,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes_count: u16,
    #[br(count = attributes_count)]
    pub attributes: Vec<AttributeInfo>,
}

impl FieldInfo {
    pub fn name<'a>(&self, pool: &'a ConstPool) -> Option<&'a str> {
        pool.utf8(self.name_index)
    }

    pub fn descriptor<'a>(&self, pool: &'a ConstPool) -> Option<&'a str> {
        pool.utf8(self.descriptor_index)
    }
}
