//! Managed type descriptors
//!
//! A [`ManagedType`] is the contract a proxy implements: an ordered list of
//! methods, each either abstract (implemented by the generated proxy against
//! the state store) or carrying a default body.

use crate::error::ProxyError;
use crate::instance::ManagedInstance;
use modelkit_core::{ModelValue, ValueType};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Body of a default (non-abstract) method
pub type MethodBody =
    Arc<dyn Fn(&ManagedInstance, &[ModelValue]) -> Result<ModelValue, ProxyError> + Send + Sync>;

/// No-argument initializer of an abstract base class
pub type Initializer = Arc<dyn Fn(&ManagedInstance) -> Result<(), ProxyError> + Send + Sync>;

/// Whether the managed type is a pure contract or a base to extend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Pure contract, no base behaviour
    Interface,
    /// Base class with an optional initializer
    AbstractClass,
}

/// Parameter and return types of a method
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    /// Parameter types, in order
    pub params: Vec<ValueType>,
    /// Return type, `None` for no value
    pub returns: Option<ValueType>,
}

impl MethodSignature {
    /// Create signature
    #[inline]
    #[must_use]
    pub fn new(params: Vec<ValueType>, returns: Option<ValueType>) -> Self {
        Self { params, returns }
    }

    /// Signature of a getter returning `ty`
    #[inline]
    #[must_use]
    pub fn getter(ty: ValueType) -> Self {
        Self::new(Vec::new(), Some(ty))
    }

    /// Signature of a setter accepting `ty`
    #[inline]
    #[must_use]
    pub fn setter(ty: ValueType) -> Self {
        Self::new(vec![ty], None)
    }
}

/// Method implementation kind
#[derive(Clone)]
pub enum MethodKind {
    /// Implemented by the generated proxy
    Abstract,
    /// Implemented by the managed type itself
    Default(MethodBody),
}

impl Debug for MethodKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abstract => f.write_str("Abstract"),
            Self::Default(_) => f.write_str("Default(..)"),
        }
    }
}

/// A method declared by a managed type
#[derive(Debug, Clone)]
pub struct ManagedMethod {
    name: String,
    signature: MethodSignature,
    kind: MethodKind,
}

impl ManagedMethod {
    /// Abstract method
    #[must_use]
    pub fn abstract_method(name: impl Into<String>, signature: MethodSignature) -> Self {
        Self {
            name: name.into(),
            signature,
            kind: MethodKind::Abstract,
        }
    }

    /// Method with a default body
    #[must_use]
    pub fn default_method<F>(name: impl Into<String>, signature: MethodSignature, body: F) -> Self
    where
        F: Fn(&ManagedInstance, &[ModelValue]) -> Result<ModelValue, ProxyError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            signature,
            kind: MethodKind::Default(Arc::new(body)),
        }
    }

    /// Method name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Method signature
    #[inline]
    #[must_use]
    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    /// Implementation kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &MethodKind {
        &self.kind
    }

    /// Whether the proxy must implement this method
    #[inline]
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        matches!(self.kind, MethodKind::Abstract)
    }

    /// Methods with the same name and parameter types are the same method
    #[inline]
    #[must_use]
    pub fn same_signature(&self, other: &Self) -> bool {
        self.name == other.name && self.signature.params == other.signature.params
    }
}

impl fmt::Display for ManagedMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let params: Vec<_> = self.signature.params.iter().map(|p| p.as_str()).collect();
        write!(f, "{}({})", self.name, params.join(", "))?;
        if let Some(ret) = self.signature.returns {
            write!(f, " -> {ret}")?;
        }
        Ok(())
    }
}

/// Managed type contract
///
/// Immutable once built. Cheap to clone (method bodies are shared).
#[derive(Clone)]
pub struct ManagedType {
    name: String,
    kind: TypeKind,
    methods: Vec<ManagedMethod>,
    initializer: Option<Initializer>,
}

impl ManagedType {
    /// Start building a pure contract
    #[inline]
    #[must_use]
    pub fn interface(name: impl Into<String>) -> ManagedTypeBuilder {
        ManagedTypeBuilder::new(name.into(), TypeKind::Interface)
    }

    /// Start building an abstract base class
    #[inline]
    #[must_use]
    pub fn abstract_class(name: impl Into<String>) -> ManagedTypeBuilder {
        ManagedTypeBuilder::new(name.into(), TypeKind::AbstractClass)
    }

    /// Type name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// All methods, own declarations first, then inherited ones
    #[inline]
    #[must_use]
    pub fn methods(&self) -> &[ManagedMethod] {
        &self.methods
    }

    /// Base initializer, if any
    #[inline]
    #[must_use]
    pub fn initializer(&self) -> Option<&Initializer> {
        self.initializer.as_ref()
    }
}

impl Debug for ManagedType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedType")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("methods", &self.methods)
            .field("initializer", &self.initializer.is_some())
            .finish()
    }
}

/// Builder for [`ManagedType`]
#[must_use]
pub struct ManagedTypeBuilder {
    name: String,
    kind: TypeKind,
    methods: Vec<ManagedMethod>,
    inherited: Vec<ManagedMethod>,
    initializer: Option<Initializer>,
}

impl ManagedTypeBuilder {
    fn new(name: String, kind: TypeKind) -> Self {
        Self {
            name,
            kind,
            methods: Vec::new(),
            inherited: Vec::new(),
            initializer: None,
        }
    }

    /// Declare an abstract `get`/`set` pair for `property`
    ///
    /// `property("firstName", ValueType::String)` declares
    /// `getFirstName() -> string` and `setFirstName(string)`. Types generated
    /// with custom accessor prefixes declare their methods explicitly.
    pub fn property(self, property: &str, ty: ValueType) -> Self {
        let suffix = capitalize(property);
        self.abstract_method(format!("get{suffix}"), MethodSignature::getter(ty))
            .abstract_method(format!("set{suffix}"), MethodSignature::setter(ty))
    }

    /// Declare an abstract getter only
    pub fn read_only_property(self, property: &str, ty: ValueType) -> Self {
        let suffix = capitalize(property);
        self.abstract_method(format!("get{suffix}"), MethodSignature::getter(ty))
    }

    /// Declare an abstract method
    pub fn abstract_method(mut self, name: impl Into<String>, signature: MethodSignature) -> Self {
        self.methods
            .push(ManagedMethod::abstract_method(name, signature));
        self
    }

    /// Declare a method with a default body
    pub fn default_method<F>(mut self, name: impl Into<String>, signature: MethodSignature, body: F) -> Self
    where
        F: Fn(&ManagedInstance, &[ModelValue]) -> Result<ModelValue, ProxyError>
            + Send
            + Sync
            + 'static,
    {
        self.methods
            .push(ManagedMethod::default_method(name, signature, body));
        self
    }

    /// Declare a no-argument default getter
    pub fn default_getter<F>(self, name: impl Into<String>, returns: ValueType, body: F) -> Self
    where
        F: Fn(&ManagedInstance) -> Result<ModelValue, ProxyError> + Send + Sync + 'static,
    {
        self.default_method(name, MethodSignature::getter(returns), move |instance, _| {
            body(instance)
        })
    }

    /// Inherit every method of `parent`
    ///
    /// Own declarations take precedence over inherited ones with the same
    /// signature.
    pub fn extends(mut self, parent: &ManagedType) -> Self {
        self.inherited.extend(parent.methods.iter().cloned());
        self
    }

    /// Set the base initializer run while an instance is constructed
    pub fn initializer<F>(mut self, init: F) -> Self
    where
        F: Fn(&ManagedInstance) -> Result<(), ProxyError> + Send + Sync + 'static,
    {
        self.initializer = Some(Arc::new(init));
        self
    }

    /// Finish the type
    #[must_use]
    pub fn build(self) -> ManagedType {
        let mut methods = self.methods;
        methods.extend(self.inherited);
        ManagedType {
            name: self.name,
            kind: self.kind,
            methods,
            initializer: self.initializer,
        }
    }
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
