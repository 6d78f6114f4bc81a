use std::collections::BTreeMap;

use thiserror::Error;

use crate::descriptor::TypeDesc;

use super::value::Value;

/// Why a static call could not be executed.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// The owner type is not known to the invoker (absent dependency).
    #[error("unknown owner type '{0}'")]
    UnknownOwner(String),
    #[error("method not found: {owner}.{name}")]
    MethodNotFound { owner: String, name: String },
    /// A method with the name exists but its declared parameter types do
    /// not match the call site's.
    #[error("no overload of {owner}.{name} matches ({signature})")]
    SignatureMismatch {
        owner: String,
        name: String,
        signature: String,
    },
    /// Declared and resolved argument counts disagree.
    #[error("{owner}.{name} takes {declared} arguments, {resolved} resolved")]
    ArityMismatch {
        owner: String,
        name: String,
        declared: usize,
        resolved: usize,
    },
    /// The host function itself failed; the original message is kept.
    #[error("invocation of {owner}.{name} failed: {message}")]
    Failed {
        owner: String,
        name: String,
        message: String,
    },
}

/// Executes a resolved static call and returns its runtime result.
///
/// The evaluator only ever calls through this seam, so an implementation
/// can be a host-function registry, an interpreter, or a stub. Whatever is
/// registered here is what the walk is allowed to execute.
pub trait StaticInvoker {
    fn invoke_static(
        &self,
        owner: &str,
        name: &str,
        arg_types: &[TypeDesc],
        args: &[Value],
    ) -> Result<Value, InvokeError>;
}

type HostFn = dyn Fn(&[Value]) -> Result<Value, String>;

struct HostMethod {
    name: String,
    params: Vec<String>,
    func: Box<HostFn>,
}

/// In-process [`StaticInvoker`]: host functions registered under their
/// owner class, method name and declared parameter type names.
#[derive(Default)]
pub struct HostRegistry {
    owners: BTreeMap<String, Vec<HostMethod>>,
}

impl HostRegistry {
    pub fn new() -> HostRegistry {
        HostRegistry::default()
    }

    /// A registry pre-loaded with the standard creation helpers the walk
    /// commonly meets: `java.net.URI.create` and `java.lang.String.valueOf`.
    pub fn with_standard() -> HostRegistry {
        let mut registry = HostRegistry::new();
        registry.register("java.net.URI", "create", &["java.lang.String"], |args| {
            match args[0].as_str() {
                Some(s) => Ok(Value::string(s)),
                None => Err(format!("URI.create expects a string, got {}", args[0].kind())),
            }
        });
        registry.register(
            "java.lang.String",
            "valueOf",
            &["java.lang.Object"],
            |args| Ok(Value::string(args[0].to_string())),
        );
        registry
    }

    /// Register a host function for `owner.name(params...)`. Parameter
    /// types are binary names (`java.lang.String`, `int`).
    pub fn register(
        &mut self,
        owner: impl Into<String>,
        name: impl Into<String>,
        params: &[&str],
        func: impl Fn(&[Value]) -> Result<Value, String> + 'static,
    ) {
        self.owners.entry(owner.into()).or_default().push(HostMethod {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
            func: Box::new(func),
        });
    }
}

impl StaticInvoker for HostRegistry {
    fn invoke_static(
        &self,
        owner: &str,
        name: &str,
        arg_types: &[TypeDesc],
        args: &[Value],
    ) -> Result<Value, InvokeError> {
        let methods = self
            .owners
            .get(owner)
            .ok_or_else(|| InvokeError::UnknownOwner(owner.to_string()))?;
        if !methods.iter().any(|m| m.name == name) {
            log::info!("method not found, '{owner}.{name}'");
            return Err(InvokeError::MethodNotFound {
                owner: owner.to_string(),
                name: name.to_string(),
            });
        }
        let declared: Vec<String> = arg_types.iter().map(|t| t.binary_name()).collect();
        let method = methods
            .iter()
            .find(|m| m.name == name && m.params == declared)
            .ok_or_else(|| InvokeError::SignatureMismatch {
                owner: owner.to_string(),
                name: name.to_string(),
                signature: declared.join(", "),
            })?;
        if args.len() != method.params.len() {
            return Err(InvokeError::ArityMismatch {
                owner: owner.to_string(),
                name: name.to_string(),
                declared: method.params.len(),
                resolved: args.len(),
            });
        }
        let result = (method.func)(args).map_err(|message| {
            log::warn!("invocation failed, '{owner}.{name}': {message}");
            InvokeError::Failed {
                owner: owner.to_string(),
                name: name.to_string(),
                message,
            }
        })?;
        log::debug!("invoked '{owner}.{name}', result: {result}");
        Ok(result)
    }
}
