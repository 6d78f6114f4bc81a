use binrw::BinRead;

/// One constant pool entry.
///
/// `Long` and `Double` occupy two pool slots; the reader inserts an
/// `Unusable` filler after each so that 1-based indices stay aligned.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstantInfo {
    Utf8(Utf8Constant),
    Integer(IntegerConstant),
    Float(FloatConstant),
    Long(LongConstant),
    Double(DoubleConstant),
    Class(ClassConstant),
    String(StringConstant),
    FieldRef(RefConstant),
    MethodRef(RefConstant),
    InterfaceMethodRef(RefConstant),
    NameAndType(NameAndTypeConstant),
    MethodHandle(MethodHandleConstant),
    MethodType(MethodTypeConstant),
    Dynamic(DynamicConstant),
    InvokeDynamic(DynamicConstant),
    Module(ModuleConstant),
    Package(PackageConstant),
    Unusable,
}

/// Constant pool entry tags, JVMS §4.4.
pub mod tag {
    pub const UTF8: u8 = 1;
    pub const INTEGER: u8 = 3;
    pub const FLOAT: u8 = 4;
    pub const LONG: u8 = 5;
    pub const DOUBLE: u8 = 6;
    pub const CLASS: u8 = 7;
    pub const STRING: u8 = 8;
    pub const FIELD_REF: u8 = 9;
    pub const METHOD_REF: u8 = 10;
    pub const INTERFACE_METHOD_REF: u8 = 11;
    pub const NAME_AND_TYPE: u8 = 12;
    pub const METHOD_HANDLE: u8 = 15;
    pub const METHOD_TYPE: u8 = 16;
    pub const DYNAMIC: u8 = 17;
    pub const INVOKE_DYNAMIC: u8 = 18;
    pub const MODULE: u8 = 19;
    pub const PACKAGE: u8 = 20;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Utf8Constant {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct IntegerConstant {
    pub value: i32,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct FloatConstant {
    pub value: f32,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct LongConstant {
    pub value: i64,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct DoubleConstant {
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct ClassConstant {
    pub name_index: u16,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct StringConstant {
    pub string_index: u16,
}

/// Shared shape of `Fieldref`, `Methodref` and `InterfaceMethodref`.
#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct RefConstant {
    pub class_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct NameAndTypeConstant {
    pub name_index: u16,
    pub descriptor_index: u16,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct MethodHandleConstant {
    pub reference_kind: u8,
    pub reference_index: u16,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct MethodTypeConstant {
    pub descriptor_index: u16,
}

/// Shared shape of `Dynamic` and `InvokeDynamic`.
#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct DynamicConstant {
    pub bootstrap_method_attr_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct ModuleConstant {
    pub name_index: u16,
}

#[derive(Clone, Debug, PartialEq, BinRead)]
#[br(big)]
pub struct PackageConstant {
    pub name_index: u16,
}
