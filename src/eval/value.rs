use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// A value recovered by the backward walk.
///
/// Object values are reference-counted so that the receiver supplied by the
/// caller round-trips identically through `LoadLocal(0)`.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
    Object(ObjectRef),
}

pub type ObjectRef = Rc<Object>;

impl Value {
    pub fn string(s: impl Into<String>) -> Value {
        Value::Str(s.into())
    }

    pub fn object(object: Object) -> Value {
        Value::Object(Rc::new(object))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Short kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Str(s) => f.write_str(s),
            Value::Object(o) => f.write_str(o.class_name()),
        }
    }
}

/// A constructed instance with named field values.
#[derive(Clone, Debug)]
pub struct Object {
    class_name: String,
    fields: BTreeMap<String, Value>,
}

impl Object {
    pub fn new(class_name: impl Into<String>) -> Object {
        Object {
            class_name: class_name.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: Value) -> Object {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn into_ref(self) -> ObjectRef {
        Rc::new(self)
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn field_value(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Declared shape of one class: its superclass and declared field names.
#[derive(Clone, Debug, Default)]
pub struct ClassSpec {
    pub super_class: Option<String>,
    pub fields: Vec<String>,
}

impl ClassSpec {
    pub fn extends(super_class: impl Into<String>) -> ClassSpec {
        ClassSpec {
            super_class: Some(super_class.into()),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>) -> ClassSpec {
        self.fields.push(name.into());
        self
    }
}

/// Read-only registry of class shapes used for field resolution.
///
/// Field reads search the object's class and then its ancestors in order,
/// mirroring reflective field lookup. Classes absent from the catalog answer
/// from the instance's own fields.
#[derive(Debug, Default)]
pub struct ClassCatalog {
    classes: BTreeMap<String, ClassSpec>,
}

impl ClassCatalog {
    pub fn new() -> ClassCatalog {
        ClassCatalog::default()
    }

    pub fn register(&mut self, name: impl Into<String>, spec: ClassSpec) {
        self.classes.insert(name.into(), spec);
    }

    pub fn class(&self, name: &str) -> Option<&ClassSpec> {
        self.classes.get(name)
    }

    /// Resolve `object.name`, searching the class chain for the declaring
    /// class. `None` means no ancestor declares the field.
    pub fn field_value(&self, object: &Object, name: &str) -> Option<Value> {
        let mut class_name = object.class_name();
        loop {
            let Some(spec) = self.classes.get(class_name) else {
                // uncataloged class: the instance's own fields are authoritative
                return object.field_value(name).cloned();
            };
            if spec.fields.iter().any(|f| f == name) {
                // declared but unset fields read as null
                return Some(object.field_value(name).cloned().unwrap_or(Value::Null));
            }
            class_name = spec.super_class.as_deref()?;
        }
    }
}
