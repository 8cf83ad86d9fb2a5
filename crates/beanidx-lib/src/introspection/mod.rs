//! Runtime invocation facade.
//!
//! An [`Introspection`] pairs a generated type (anything implementing
//! [`GeneratedType`]) with the property and method references recorded when
//! the type was built. Every operation resolves to one of the generated
//! type's three entry points, keyed by the member's dispatch index.

mod builder;
mod compiled;
mod handles;
mod options;

#[cfg(test)]
mod builder_tests;
#[cfg(test)]
mod test_utils;

use beanidx_core::{AnnotationMetadata, Argument, TypeRef, Value};
use beanidx_vm::{ReflectedMethod, RuntimeError};
use tracing::trace;

use crate::{Error, Result};

pub use builder::{Accessors, IntrospectionBuilder, MethodDecl};
pub use compiled::{CompiledType, Instantiator};
pub use handles::{ConstructorHandle, MethodHandle, MethodRef, PropertyHandle, PropertyRef};
pub use options::InstantiateOptions;

/// Contract between emitted dispatch code and the facade.
///
/// Indices passed in are the catalog indices recorded in [`PropertyRef`] and
/// [`MethodRef`]. An index with no case fails with
/// [`RuntimeError::UnknownDispatchIndex`].
pub trait GeneratedType {
    /// Multi-value dispatch: invoke a method target with positional arguments.
    fn dispatch(&self, index: u32, target: &Value, args: &[Value]) -> Result<Value, RuntimeError>;

    /// Single-value dispatch: read a field, write a field, or call an
    /// accessor with at most one argument.
    fn dispatch_one(&self, index: u32, target: &Value, arg: &Value) -> Result<Value, RuntimeError>;

    /// Reflective handle for the method target at `index`.
    fn target_method_by_index(&self, index: u32) -> Result<ReflectedMethod, RuntimeError>;

    /// Whether `value` is a non-null instance of `ty`.
    fn is_instance(&self, value: &Value, ty: &TypeRef) -> bool;

    /// Construct a bean from arguments that already passed validation.
    fn instantiate_internal(&self, args: &[Value]) -> Result<Value>;

    /// Construct a bean without arguments.
    fn instantiate_default(&self) -> Result<Value> {
        Err(Error::Instantiation("No default constructor exists".to_owned()))
    }

    /// Position of the property called `name`.
    fn find_property(&self, name: &str, properties: &[PropertyRef]) -> Option<usize> {
        properties.iter().position(|p| p.name() == name)
    }
}

/// Introspection over one bean type.
pub struct Introspection<G = CompiledType> {
    generated: G,
    bean_type: String,
    properties: Box<[PropertyRef]>,
    methods: Box<[MethodRef]>,
    constructor_arguments: Box<[Argument]>,
    constructor_metadata: AnnotationMetadata,
}

impl<G: GeneratedType> Introspection<G> {
    pub fn new(
        generated: G,
        bean_type: impl Into<String>,
        properties: Vec<PropertyRef>,
        methods: Vec<MethodRef>,
        constructor_arguments: Vec<Argument>,
    ) -> Self {
        Self {
            generated,
            bean_type: bean_type.into(),
            properties: properties.into_boxed_slice(),
            methods: methods.into_boxed_slice(),
            constructor_arguments: constructor_arguments.into_boxed_slice(),
            constructor_metadata: AnnotationMetadata::new(),
        }
    }

    pub fn with_constructor_metadata(mut self, metadata: AnnotationMetadata) -> Self {
        self.constructor_metadata = metadata;
        self
    }

    pub fn generated(&self) -> &G {
        &self.generated
    }

    pub fn bean_type(&self) -> &str {
        &self.bean_type
    }

    /// Property called `name`, if the type has one.
    pub fn property(&self, name: &str) -> Option<PropertyHandle<'_, G>> {
        let index = self.generated.find_property(name, &self.properties)?;
        self.properties
            .get(index)
            .map(|property| PropertyHandle::new(self, property))
    }

    /// Property at `index` in declaration order.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn property_at(&self, index: usize) -> PropertyHandle<'_, G> {
        let count = self.properties.len();
        let Some(property) = self.properties.get(index) else {
            panic!("property index {index} out of range for {count} properties");
        };
        PropertyHandle::new(self, property)
    }

    pub fn properties(&self) -> impl ExactSizeIterator<Item = PropertyHandle<'_, G>> + '_ {
        self.properties
            .iter()
            .map(move |property| PropertyHandle::new(self, property))
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(PropertyRef::name)
    }

    pub fn methods(&self) -> impl ExactSizeIterator<Item = MethodHandle<'_, G>> + '_ {
        self.methods
            .iter()
            .map(move |method| MethodHandle::new(self, method))
    }

    /// Property indexed under `annotation` with `value`.
    ///
    /// Indexed lookups are not recorded by the builder, so there is never a
    /// match.
    pub fn indexed_property(&self, annotation: &str, value: &str) -> Option<PropertyHandle<'_, G>> {
        trace!(annotation, value, "indexed property lookup");
        None
    }

    /// Properties indexed under `annotation`. Always empty.
    pub fn indexed_properties(&self, annotation: &str) -> Vec<PropertyHandle<'_, G>> {
        trace!(annotation, "indexed properties lookup");
        Vec::new()
    }

    pub fn constructor_arguments(&self) -> &[Argument] {
        &self.constructor_arguments
    }

    pub fn constructor(&self) -> ConstructorHandle<'_, G> {
        ConstructorHandle::new(self, &self.constructor_arguments, &self.constructor_metadata)
    }

    /// Instantiate with strict nullability.
    pub fn instantiate(&self, args: &[Value]) -> Result<Value> {
        self.instantiate_with(&InstantiateOptions::default(), args)
    }

    /// Instantiate a bean.
    ///
    /// No arguments selects the default constructor. Otherwise the argument
    /// count must match the constructor, null is rejected for parameters not
    /// declared nullable (when strict), and every non-null argument must be
    /// an instance of its parameter's boxed type.
    pub fn instantiate_with(&self, options: &InstantiateOptions, args: &[Value]) -> Result<Value> {
        if args.is_empty() {
            return self.generated.instantiate_default();
        }

        let expected = self.constructor_arguments.len();
        if args.len() != expected {
            return Err(Error::Instantiation(format!(
                "Argument count [{}] doesn't match required argument count: {expected}",
                args.len()
            )));
        }

        for (argument, value) in self.constructor_arguments.iter().zip(args) {
            if value.is_null() {
                if argument.is_declared_nullable() || !options.strict_nullable {
                    continue;
                }
                return Err(Error::Instantiation(format!(
                    "Null argument specified for [{}]. If this argument is allowed to be null annotate it with @Nullable",
                    argument.name()
                )));
            }
            if !self.generated.is_instance(value, &argument.wrapper_type()) {
                return Err(Error::Instantiation(format!(
                    "Invalid argument [{value}] specified for argument: {argument}"
                )));
            }
        }

        trace!(bean = %self.bean_type, args = args.len(), "instantiate");
        self.generated.instantiate_internal(args)
    }

    fn check_bean(&self, bean: &Value) -> Result<()> {
        if self
            .generated
            .is_instance(bean, &TypeRef::class(&self.bean_type))
        {
            return Ok(());
        }
        Err(Error::TypeMismatch(format!(
            "Invalid bean [{bean}] for type: {}",
            self.bean_type
        )))
    }
}
