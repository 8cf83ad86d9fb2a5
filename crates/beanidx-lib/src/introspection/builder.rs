//! Ordered registration of bean members.
//!
//! The builder is the only place indices are assigned: every member is
//! appended to the dispatch catalog and recorded in the property or method
//! references in the same step, so the indices the facade dispatches on are
//! the case keys of the emitted routines.

use std::sync::Arc;

use beanidx_compiler::{DispatchCatalog, DispatchStyle, EmitOptions, emit};
use beanidx_core::{AnnotationMetadata, Argument, MethodSignature, TypeRef, Value};
use beanidx_vm::{ClassTable, RuntimeError};
use indexmap::IndexMap;
use tracing::debug;

use super::{CompiledType, Instantiator, Introspection, MethodRef, PropertyRef};
use crate::Result;

/// Accessor methods backing a property.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Accessors {
    getter: Option<String>,
    setter: Option<String>,
    wither: Option<String>,
}

impl Accessors {
    pub fn new() -> Self {
        Self::default()
    }

    /// `name(): T`
    pub fn getter(mut self, name: impl Into<String>) -> Self {
        self.getter = Some(name.into());
        self
    }

    /// `name(T): void`
    pub fn setter(mut self, name: impl Into<String>) -> Self {
        self.setter = Some(name.into());
        self
    }

    /// `name(T): Bean`, returning a copy with the property replaced.
    pub fn wither(mut self, name: impl Into<String>) -> Self {
        self.wither = Some(name.into());
        self
    }
}

/// Declaration of a bean method.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodDecl {
    name: String,
    return_type: TypeRef,
    arguments: Vec<Argument>,
    declaring: Option<String>,
    interface: bool,
    style: DispatchStyle,
    annotation_metadata: AnnotationMetadata,
    bridge: Option<(String, String)>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            return_type,
            arguments: Vec::new(),
            declaring: None,
            interface: false,
            style: DispatchStyle::Multi,
            annotation_metadata: AnnotationMetadata::new(),
            bridge: None,
        }
    }

    pub fn argument(mut self, argument: Argument) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Declared by a superclass rather than the bean type.
    pub fn declared_by(mut self, owner: impl Into<String>) -> Self {
        self.declaring = Some(owner.into());
        self.interface = false;
        self
    }

    /// Declared by an interface the bean type implements.
    pub fn declared_by_interface(mut self, owner: impl Into<String>) -> Self {
        self.declaring = Some(owner.into());
        self.interface = true;
        self
    }

    pub fn style(mut self, style: DispatchStyle) -> Self {
        self.style = style;
        self
    }

    pub fn annotated(mut self, metadata: AnnotationMetadata) -> Self {
        self.annotation_metadata = metadata;
        self
    }

    /// Redirect dispatch to `bridge_method` on `proxy_type` instances while
    /// the generated type is interceptable.
    pub fn intercepted(
        mut self,
        proxy_type: impl Into<String>,
        bridge_method: impl Into<String>,
    ) -> Self {
        self.bridge = Some((proxy_type.into(), bridge_method.into()));
        self
    }

    fn signature(&self) -> MethodSignature {
        let params = self.arguments.iter().map(|a| a.ty().clone()).collect();
        MethodSignature::new(&self.name, params, self.return_type.clone())
    }
}

struct PendingProperty {
    argument: Argument,
    read: Option<u32>,
    write: Option<u32>,
    with: Option<u32>,
}

/// Builds an [`Introspection`] over one bean type.
pub struct IntrospectionBuilder {
    bean_type: String,
    catalog: DispatchCatalog,
    properties: Vec<PendingProperty>,
    methods: Vec<MethodRef>,
    constructor_arguments: Vec<Argument>,
    constructor: Option<Box<Instantiator>>,
    default_constructor: Option<Box<Instantiator>>,
    constructor_metadata: AnnotationMetadata,
    options: EmitOptions,
}

impl IntrospectionBuilder {
    pub fn new(bean_type: impl Into<String>) -> Self {
        let bean_type = bean_type.into();
        let catalog = DispatchCatalog::new(format!("{bean_type}$Introspection"));
        Self {
            bean_type,
            catalog,
            properties: Vec::new(),
            methods: Vec::new(),
            constructor_arguments: Vec::new(),
            constructor: None,
            default_constructor: None,
            constructor_metadata: AnnotationMetadata::new(),
            options: EmitOptions::default(),
        }
    }

    /// Catalog assembled so far.
    pub fn catalog(&self) -> &DispatchCatalog {
        &self.catalog
    }

    pub fn emit_options(mut self, options: EmitOptions) -> Self {
        self.options = options;
        self
    }

    /// Property backed by a field, read and written directly.
    pub fn field(mut self, argument: Argument) -> Self {
        let (name, ty) = (argument.name(), argument.ty());
        let read = self.catalog.add_get_field(&self.bean_type, name, ty.clone());
        let write = self.catalog.add_set_field(&self.bean_type, name, ty.clone());
        self.push_property(argument, Some(read), Some(write), None)
    }

    /// Property backed by a field that is never written after construction.
    pub fn read_only_field(mut self, argument: Argument) -> Self {
        let read = self
            .catalog
            .add_get_field(&self.bean_type, argument.name(), argument.ty().clone());
        self.push_property(argument, Some(read), None, None)
    }

    /// Property backed by accessor methods of the bean type.
    pub fn property(mut self, argument: Argument, accessors: Accessors) -> Self {
        let ty = argument.ty().clone();
        let bean = TypeRef::class(&self.bean_type);
        let read = accessors
            .getter
            .map(|name| self.add_accessor(MethodSignature::new(name, vec![], ty.clone())));
        let write = accessors.setter.map(|name| {
            self.add_accessor(MethodSignature::new(name, vec![ty.clone()], TypeRef::Void))
        });
        let with = accessors
            .wither
            .map(|name| self.add_accessor(MethodSignature::new(name, vec![ty.clone()], bean)));
        self.push_property(argument, read, write, with)
    }

    pub fn method(mut self, decl: MethodDecl) -> Self {
        let declaring = decl.declaring.as_deref().unwrap_or(&self.bean_type).to_owned();
        let signature = decl.signature();
        let index = match &decl.bridge {
            Some((proxy_type, bridge_method)) => self.catalog.add_intercepted_method(
                &declaring,
                signature,
                decl.interface,
                proxy_type,
                bridge_method,
            ),
            None => self
                .catalog
                .add_method(&declaring, signature, decl.interface, decl.style),
        };
        let single_value = decl.bridge.is_none() && decl.style == DispatchStyle::One;
        self.methods.push(
            MethodRef::new(
                decl.name,
                Argument::of_type(decl.return_type),
                decl.arguments,
                decl.annotation_metadata,
                index,
            )
            .single_value(single_value),
        );
        self
    }

    /// Constructor assigning each argument to the field of the same name.
    pub fn constructor(self, arguments: Vec<Argument>) -> Self {
        let body = field_constructor(self.bean_type.clone(), arguments.clone());
        self.install_constructor(arguments, body)
    }

    /// Constructor with a custom body.
    pub fn constructor_with<F>(self, arguments: Vec<Argument>, body: F) -> Self
    where
        F: Fn(&ClassTable, &[Value]) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        self.install_constructor(arguments, Box::new(body))
    }

    /// Allow instantiation without arguments, leaving every field at its
    /// default.
    pub fn default_constructor(mut self) -> Self {
        self.default_constructor = Some(field_constructor(self.bean_type.clone(), Vec::new()));
        self
    }

    pub fn constructor_metadata(mut self, metadata: AnnotationMetadata) -> Self {
        self.constructor_metadata = metadata;
        self
    }

    /// Emit the dispatch module and assemble the introspection.
    pub fn build(self, classes: Arc<ClassTable>) -> Result<Introspection<CompiledType>> {
        if !classes.contains(&self.bean_type) {
            return Err(RuntimeError::UnknownClass(self.bean_type).into());
        }
        let module = emit(&self.catalog, &self.options)?;

        let properties: Vec<PropertyRef> = self
            .properties
            .into_iter()
            .map(|p| {
                let in_constructor = self
                    .constructor_arguments
                    .iter()
                    .any(|arg| arg.name() == p.argument.name());
                let read_only = p.write.is_none();
                let mutable = p.write.is_some() || in_constructor;
                PropertyRef::new(p.argument, p.read, p.write, p.with, read_only, mutable)
            })
            .collect();
        let property_index: IndexMap<String, usize> = properties
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name().to_owned(), i))
            .collect();

        debug!(
            bean = %self.bean_type,
            targets = self.catalog.len(),
            properties = properties.len(),
            methods = self.methods.len(),
            "built introspection"
        );

        let generated = CompiledType::new(
            module,
            classes,
            property_index,
            self.constructor,
            self.default_constructor,
        );
        Ok(Introspection::new(
            generated,
            self.bean_type,
            properties,
            self.methods,
            self.constructor_arguments,
        )
        .with_constructor_metadata(self.constructor_metadata))
    }

    fn add_accessor(&mut self, signature: MethodSignature) -> u32 {
        self.catalog
            .add_method(&self.bean_type, signature, false, DispatchStyle::One)
    }

    fn push_property(
        mut self,
        argument: Argument,
        read: Option<u32>,
        write: Option<u32>,
        with: Option<u32>,
    ) -> Self {
        self.properties.push(PendingProperty {
            argument,
            read,
            write,
            with,
        });
        self
    }

    fn install_constructor(mut self, arguments: Vec<Argument>, body: Box<Instantiator>) -> Self {
        // A constructor without parameters is the default constructor.
        if arguments.is_empty() {
            self.default_constructor = Some(body);
        } else {
            self.constructor = Some(body);
        }
        self.constructor_arguments = arguments;
        self
    }
}

fn field_constructor(class: String, arguments: Vec<Argument>) -> Box<Instantiator> {
    Box::new(
        move |classes: &ClassTable, args: &[Value]| -> Result<Value, RuntimeError> {
            let obj = classes.new_instance(&class)?;
            for (argument, value) in arguments.iter().zip(args) {
                let slot = classes.cast(value, argument.ty())?;
                if !obj.set_field(argument.name(), slot) {
                    return Err(RuntimeError::NoSuchField {
                        class: class.clone(),
                        field: argument.name().to_owned(),
                    });
                }
            }
            Ok(Value::Object(obj))
        },
    )
}
