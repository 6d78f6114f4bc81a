use std::io::{Read, Seek};

use binrw::{BinRead, BinResult};

use super::types::*;

/// The constant pool of one class, with 1-based slot addressing.
///
/// Resolution helpers return `None` for out-of-range indices and for slots
/// holding a different kind of entry; callers decide whether that is a
/// data error or a skippable instruction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConstPool {
    entries: Vec<ConstantInfo>,
}

/// A resolved `Methodref`/`InterfaceMethodref`/`Fieldref` entry.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberRef<'a> {
    /// Owner class in binary form (`java.net.URI`).
    pub class_name: String,
    pub name: &'a str,
    pub descriptor: &'a str,
}

/// A constant resolvable by an `ldc`-family instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstValue<'a> {
    Int(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Str(&'a str),
    ClassName(&'a str),
}

impl ConstPool {
    /// Build a pool from already-decoded entries (slot 1 first).
    pub fn from_entries(entries: Vec<ConstantInfo>) -> Self {
        ConstPool { entries }
    }

    /// Number of occupied slots, not counting the reserved slot 0.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at a 1-based slot index.
    pub fn get(&self, index: u16) -> Option<&ConstantInfo> {
        self.entries.get((index as usize).checked_sub(1)?)
    }

    pub fn utf8(&self, index: u16) -> Option<&str> {
        match self.get(index)? {
            ConstantInfo::Utf8(c) => Some(&c.text),
            _ => None,
        }
    }

    /// Name of a `Class` constant, in internal (slashed) form.
    pub fn class_name(&self, index: u16) -> Option<&str> {
        match self.get(index)? {
            ConstantInfo::Class(c) => self.utf8(c.name_index),
            _ => None,
        }
    }

    /// Name of a `Class` constant, in binary (dotted) form.
    pub fn class_name_binary(&self, index: u16) -> Option<String> {
        self.class_name(index).map(|n| n.replace('/', "."))
    }

    pub fn name_and_type(&self, index: u16) -> Option<(&str, &str)> {
        match self.get(index)? {
            ConstantInfo::NameAndType(nat) => {
                Some((self.utf8(nat.name_index)?, self.utf8(nat.descriptor_index)?))
            }
            _ => None,
        }
    }

    /// Resolve a `Methodref` or `InterfaceMethodref` entry.
    pub fn method_ref(&self, index: u16) -> Option<MemberRef<'_>> {
        let r = match self.get(index)? {
            ConstantInfo::MethodRef(r) | ConstantInfo::InterfaceMethodRef(r) => r,
            _ => return None,
        };
        self.member_ref(r)
    }

    /// Resolve a `Fieldref` entry.
    pub fn field_ref(&self, index: u16) -> Option<MemberRef<'_>> {
        let r = match self.get(index)? {
            ConstantInfo::FieldRef(r) => r,
            _ => return None,
        };
        self.member_ref(r)
    }

    fn member_ref(&self, r: &RefConstant) -> Option<MemberRef<'_>> {
        let class_name = self.class_name(r.class_index)?.replace('/', ".");
        let (name, descriptor) = self.name_and_type(r.name_and_type_index)?;
        Some(MemberRef {
            class_name,
            name,
            descriptor,
        })
    }

    pub fn method_handle(&self, index: u16) -> Option<&MethodHandleConstant> {
        match self.get(index)? {
            ConstantInfo::MethodHandle(c) => Some(c),
            _ => None,
        }
    }

    pub fn invoke_dynamic(&self, index: u16) -> Option<&DynamicConstant> {
        match self.get(index)? {
            ConstantInfo::InvokeDynamic(c) => Some(c),
            _ => None,
        }
    }

    /// Resolve the operand of an `ldc`-family instruction.
    pub fn loadable(&self, index: u16) -> Option<ConstValue<'_>> {
        match self.get(index)? {
            ConstantInfo::Integer(c) => Some(ConstValue::Int(c.value)),
            ConstantInfo::Float(c) => Some(ConstValue::Float(c.value)),
            ConstantInfo::Long(c) => Some(ConstValue::Long(c.value)),
            ConstantInfo::Double(c) => Some(ConstValue::Double(c.value)),
            ConstantInfo::String(c) => self.utf8(c.string_index).map(ConstValue::Str),
            ConstantInfo::Class(c) => self.utf8(c.name_index).map(ConstValue::ClassName),
            _ => None,
        }
    }
}

/// Read `size - 1` pool slots, inserting `Unusable` fillers after the
/// two-slot `Long`/`Double` entries.
#[binrw::parser(reader, endian)]
pub fn const_pool_parser(size: u16) -> BinResult<ConstPool> {
    let mut entries = Vec::with_capacity(size.saturating_sub(1) as usize);
    while (entries.len() as u16) + 1 < size {
        let tag = u8::read_options(reader, endian, ())?;
        let entry = match tag {
            tag::UTF8 => {
                let length = u16::read_options(reader, endian, ())?;
                let mut bytes = vec![0u8; length as usize];
                reader.read_exact(&mut bytes)?;
                ConstantInfo::Utf8(Utf8Constant {
                    text: String::from_utf8_lossy(&bytes).into_owned(),
                })
            }
            tag::INTEGER => ConstantInfo::Integer(IntegerConstant::read_options(reader, endian, ())?),
            tag::FLOAT => ConstantInfo::Float(FloatConstant::read_options(reader, endian, ())?),
            tag::LONG => ConstantInfo::Long(LongConstant::read_options(reader, endian, ())?),
            tag::DOUBLE => ConstantInfo::Double(DoubleConstant::read_options(reader, endian, ())?),
            tag::CLASS => ConstantInfo::Class(ClassConstant::read_options(reader, endian, ())?),
            tag::STRING => ConstantInfo::String(StringConstant::read_options(reader, endian, ())?),
            tag::FIELD_REF => ConstantInfo::FieldRef(RefConstant::read_options(reader, endian, ())?),
            tag::METHOD_REF => ConstantInfo::MethodRef(RefConstant::read_options(reader, endian, ())?),
            tag::INTERFACE_METHOD_REF => {
                ConstantInfo::InterfaceMethodRef(RefConstant::read_options(reader, endian, ())?)
            }
            tag::NAME_AND_TYPE => {
                ConstantInfo::NameAndType(NameAndTypeConstant::read_options(reader, endian, ())?)
            }
            tag::METHOD_HANDLE => {
                ConstantInfo::MethodHandle(MethodHandleConstant::read_options(reader, endian, ())?)
            }
            tag::METHOD_TYPE => {
                ConstantInfo::MethodType(MethodTypeConstant::read_options(reader, endian, ())?)
            }
            tag::DYNAMIC => ConstantInfo::Dynamic(DynamicConstant::read_options(reader, endian, ())?),
            tag::INVOKE_DYNAMIC => {
                ConstantInfo::InvokeDynamic(DynamicConstant::read_options(reader, endian, ())?)
            }
            tag::MODULE => ConstantInfo::Module(ModuleConstant::read_options(reader, endian, ())?),
            tag::PACKAGE => ConstantInfo::Package(PackageConstant::read_options(reader, endian, ())?),
            _ => {
                return Err(binrw::Error::AssertFail {
                    pos: reader.stream_position()?,
                    message: format!("unknown constant pool tag {tag}"),
                })
            }
        };
        let two_slots = matches!(entry, ConstantInfo::Long(_) | ConstantInfo::Double(_));
        entries.push(entry);
        if two_slots {
            entries.push(ConstantInfo::Unusable);
        }
    }
    Ok(ConstPool::from_entries(entries))
}
