//! JVM type and method descriptor parsing.

/// A type named by a descriptor string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeDesc {
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Void,
    Class(String),
    Array(Box<TypeDesc>),
}

impl TypeDesc {
    /// Parse a single type descriptor, e.g. `Ljava/lang/String;` or `[I`.
    pub fn parse(desc: &str) -> Option<TypeDesc> {
        let (ty, rest) = parse_one(desc)?;
        rest.is_empty().then_some(ty)
    }

    /// The Java binary name of this type: `java.lang.String`, `int`,
    /// `java.net.URI[]`. Used to match declared host-method signatures.
    pub fn binary_name(&self) -> String {
        match self {
            TypeDesc::Byte => "byte".into(),
            TypeDesc::Char => "char".into(),
            TypeDesc::Short => "short".into(),
            TypeDesc::Int => "int".into(),
            TypeDesc::Long => "long".into(),
            TypeDesc::Float => "float".into(),
            TypeDesc::Double => "double".into(),
            TypeDesc::Boolean => "boolean".into(),
            TypeDesc::Void => "void".into(),
            TypeDesc::Class(name) => name.replace('/', "."),
            TypeDesc::Array(inner) => format!("{}[]", inner.binary_name()),
        }
    }

    /// Whether this is a reference to the class with the given binary name.
    pub fn is_class(&self, binary_name: &str) -> bool {
        matches!(self, TypeDesc::Class(name) if name.replace('/', ".") == binary_name)
    }
}

impl std::fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.binary_name())
    }
}

/// Parse one type at the front of `desc`, returning it and the remainder.
fn parse_one(desc: &str) -> Option<(TypeDesc, &str)> {
    let mut chars = desc.chars();
    let ty = match chars.next()? {
        'B' => TypeDesc::Byte,
        'C' => TypeDesc::Char,
        'S' => TypeDesc::Short,
        'I' => TypeDesc::Int,
        'J' => TypeDesc::Long,
        'F' => TypeDesc::Float,
        'D' => TypeDesc::Double,
        'Z' => TypeDesc::Boolean,
        'V' => TypeDesc::Void,
        'L' => {
            let rest = chars.as_str();
            let semi = rest.find(';')?;
            return Some((TypeDesc::Class(rest[..semi].to_string()), &rest[semi + 1..]));
        }
        '[' => {
            let (inner, rest) = parse_one(chars.as_str())?;
            return Some((TypeDesc::Array(Box::new(inner)), rest));
        }
        _ => return None,
    };
    Some((ty, chars.as_str()))
}

/// Parse a method descriptor, e.g. `(Ljava/lang/String;I)V`, into its
/// argument types and return type.
pub fn method_descriptor(desc: &str) -> Option<(Vec<TypeDesc>, TypeDesc)> {
    let body = desc.strip_prefix('(')?;
    let close = body.find(')')?;
    let (mut params_str, ret_str) = (&body[..close], &body[close + 1..]);
    let mut params = Vec::new();
    while !params_str.is_empty() {
        let (ty, rest) = parse_one(params_str)?;
        params.push(ty);
        params_str = rest;
    }
    let ret = TypeDesc::parse(ret_str)?;
    Some((params, ret))
}

/// Argument types of a method descriptor, ignoring the return type.
pub fn argument_types(desc: &str) -> Option<Vec<TypeDesc>> {
    method_descriptor(desc).map(|(args, _)| args)
}
