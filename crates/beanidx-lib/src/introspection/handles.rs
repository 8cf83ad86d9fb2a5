//! Property, method and constructor handles.

use std::fmt;

use beanidx_core::{AnnotationMetadata, Argument, TypeRef, Value};
use beanidx_vm::ReflectedMethod;
use tracing::trace;

use super::{GeneratedType, InstantiateOptions, Introspection};
use crate::{Error, Result};

/// Dispatch indices and flags of one property.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyRef {
    argument: Argument,
    read_index: Option<u32>,
    write_index: Option<u32>,
    with_index: Option<u32>,
    read_only: bool,
    mutable: bool,
}

impl PropertyRef {
    pub fn new(
        argument: Argument,
        read_index: Option<u32>,
        write_index: Option<u32>,
        with_index: Option<u32>,
        read_only: bool,
        mutable: bool,
    ) -> Self {
        Self {
            argument,
            read_index,
            write_index,
            with_index,
            read_only,
            mutable,
        }
    }

    pub fn name(&self) -> &str {
        self.argument.name()
    }

    pub fn argument(&self) -> &Argument {
        &self.argument
    }

    pub fn read_index(&self) -> Option<u32> {
        self.read_index
    }

    pub fn write_index(&self) -> Option<u32> {
        self.write_index
    }

    pub fn with_index(&self) -> Option<u32> {
        self.with_index
    }
}

/// Dispatch index and descriptors of one bean method.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodRef {
    name: String,
    return_type: Argument,
    arguments: Box<[Argument]>,
    annotation_metadata: AnnotationMetadata,
    index: u32,
    single_value: bool,
}

impl MethodRef {
    pub fn new(
        name: impl Into<String>,
        return_type: Argument,
        arguments: Vec<Argument>,
        annotation_metadata: AnnotationMetadata,
        index: u32,
    ) -> Self {
        Self {
            name: name.into(),
            return_type,
            arguments: arguments.into_boxed_slice(),
            annotation_metadata,
            index,
            single_value: false,
        }
    }

    /// Only a `dispatch_one` case exists for this method.
    pub fn single_value(mut self, single_value: bool) -> Self {
        self.single_value = single_value;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn is_single_value(&self) -> bool {
        self.single_value
    }
}

/// A property bound to its introspection.
pub struct PropertyHandle<'a, G> {
    introspection: &'a Introspection<G>,
    property: &'a PropertyRef,
}

impl<'a, G: GeneratedType> PropertyHandle<'a, G> {
    pub(super) fn new(introspection: &'a Introspection<G>, property: &'a PropertyRef) -> Self {
        Self {
            introspection,
            property,
        }
    }

    pub fn name(&self) -> &'a str {
        self.property.name()
    }

    pub fn ty(&self) -> &'a TypeRef {
        self.property.argument.ty()
    }

    pub fn argument(&self) -> &'a Argument {
        &self.property.argument
    }

    pub fn annotation_metadata(&self) -> &'a AnnotationMetadata {
        self.property.argument.annotation_metadata()
    }

    pub fn declaring_type(&self) -> &'a str {
        self.introspection.bean_type()
    }

    pub fn is_read_only(&self) -> bool {
        self.property.read_only
    }

    /// No read accessor, but a write or with accessor.
    pub fn is_write_only(&self) -> bool {
        self.property.read_index.is_none()
            && (self.property.write_index.is_some() || self.property.with_index.is_some())
    }

    pub fn has_setter_or_constructor_argument(&self) -> bool {
        self.property.mutable
    }

    /// Read the property. Primitive values come back boxed.
    pub fn get(&self, bean: &Value) -> Result<Value> {
        self.introspection.check_bean(bean)?;
        if self.is_write_only() {
            return Err(Error::UnsupportedOperation(
                "Cannot read from a write-only property".to_owned(),
            ));
        }
        let index = self.property.read_index.ok_or_else(|| {
            Error::UnsupportedOperation(format!("Property [{}] has no read accessor", self.name()))
        })?;

        trace!(property = self.name(), index, "get");
        Ok(self
            .introspection
            .generated
            .dispatch_one(index, bean, &Value::Null)?)
    }

    /// Write the property on `bean`.
    pub fn set(&self, bean: &Value, value: Value) -> Result<()> {
        self.introspection.check_bean(bean)?;
        if self.is_read_only() {
            return Err(Error::UnsupportedOperation(format!(
                "Cannot write a read-only property: {}",
                self.name()
            )));
        }
        self.check_value(&value)?;
        let index = self.property.write_index.ok_or_else(|| {
            Error::UnsupportedOperation(format!("Property [{}] has no write accessor", self.name()))
        })?;

        trace!(property = self.name(), index, "set");
        self.introspection
            .generated
            .dispatch_one(index, bean, &value)?;
        Ok(())
    }

    /// A bean with the property set to `value`.
    ///
    /// Returns `bean` itself when the value is unchanged. Without a with
    /// accessor, writable properties are set in place, and read-only ones
    /// are copied through the constructor.
    pub fn with_value(&self, bean: &Value, value: Value) -> Result<Value> {
        self.introspection.check_bean(bean)?;
        if self.property.read_index.is_some() && self.get(bean)? == value {
            return Ok(bean.clone());
        }

        match self.property.with_index {
            Some(index) => {
                trace!(property = self.name(), index, "with");
                Ok(self
                    .introspection
                    .generated
                    .dispatch_one(index, bean, &value)?)
            }
            None => self.copy_with(bean, value),
        }
    }

    fn check_value(&self, value: &Value) -> Result<()> {
        if value.is_null() {
            return Ok(());
        }
        let ty = self.property.argument.wrapper_type();
        if self.introspection.generated.is_instance(value, &ty) {
            return Ok(());
        }
        Err(Error::TypeMismatch(format!(
            "Specified value [{value}] is not of the correct type: {}",
            ty.name()
        )))
    }

    fn copy_with(&self, bean: &Value, value: Value) -> Result<Value> {
        if !self.is_read_only() {
            self.set(bean, value)?;
            return Ok(bean.clone());
        }

        let introspection = self.introspection;
        let constructor = introspection.constructor_arguments();
        if !constructor.iter().any(|arg| arg.name() == self.name()) {
            return Err(Error::UnsupportedOperation(format!(
                "Cannot create copy of type [{}]. Property of type [{}] is not a constructor argument and is read-only",
                introspection.bean_type(),
                self.ty().name()
            )));
        }

        let mut args = Vec::with_capacity(constructor.len());
        for arg in constructor {
            if arg.name() == self.name() {
                args.push(value.clone());
                continue;
            }
            let Some(property) = introspection.property(arg.name()) else {
                return Err(Error::UnsupportedOperation(format!(
                    "Constructor argument [{arg}] doesn't have a corresponding property"
                )));
            };
            args.push(property.get(bean)?);
        }
        let lenient = InstantiateOptions::new().strict_nullable(false);
        let copy = introspection.instantiate_with(&lenient, &args)?;

        // Carry over state the constructor did not set.
        for property in introspection.properties() {
            let in_constructor = constructor.iter().any(|arg| arg.name() == property.name());
            if in_constructor || property.is_read_only() || property.is_write_only() {
                continue;
            }
            property.set(&copy, property.get(bean)?)?;
        }
        Ok(copy)
    }
}

impl<G> fmt::Debug for PropertyHandle<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyHandle")
            .field("bean_type", &self.introspection.bean_type)
            .field("type", self.property.argument.ty())
            .field("name", &self.property.name())
            .finish()
    }
}

/// A bean method bound to its introspection.
pub struct MethodHandle<'a, G> {
    introspection: &'a Introspection<G>,
    method: &'a MethodRef,
}

impl<'a, G: GeneratedType> MethodHandle<'a, G> {
    pub(super) fn new(introspection: &'a Introspection<G>, method: &'a MethodRef) -> Self {
        Self {
            introspection,
            method,
        }
    }

    pub fn name(&self) -> &'a str {
        &self.method.name
    }

    pub fn index(&self) -> u32 {
        self.method.index
    }

    pub fn return_type(&self) -> &'a Argument {
        &self.method.return_type
    }

    pub fn arguments(&self) -> &'a [Argument] {
        &self.method.arguments
    }

    pub fn annotation_metadata(&self) -> &'a AnnotationMetadata {
        &self.method.annotation_metadata
    }

    pub fn declaring_type(&self) -> &'a str {
        self.introspection.bean_type()
    }

    /// Invoke on `bean`. Void methods yield `Value::Null`.
    pub fn invoke(&self, bean: &Value, args: &[Value]) -> Result<Value> {
        let index = self.method.index;
        trace!(method = self.name(), index, "invoke");
        let generated = &self.introspection.generated;
        if !self.method.single_value {
            return Ok(generated.dispatch(index, bean, args)?);
        }
        if args.len() > 1 {
            return Err(Error::UnsupportedOperation(format!(
                "Method [{}] takes at most one argument, got {}",
                self.name(),
                args.len()
            )));
        }
        let arg = args.first().cloned().unwrap_or(Value::Null);
        Ok(generated.dispatch_one(index, bean, &arg)?)
    }

    /// Locate the method reflectively instead of dispatching by index.
    pub fn reflect(&self) -> Result<ReflectedMethod> {
        Ok(self
            .introspection
            .generated
            .target_method_by_index(self.method.index)?)
    }
}

impl<G> fmt::Debug for MethodHandle<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodHandle")
            .field("bean_type", &self.introspection.bean_type)
            .field("name", &self.method.name)
            .field("index", &self.method.index)
            .finish()
    }
}

/// The constructor of an introspected type.
pub struct ConstructorHandle<'a, G> {
    introspection: &'a Introspection<G>,
    arguments: &'a [Argument],
    annotation_metadata: &'a AnnotationMetadata,
}

impl<'a, G: GeneratedType> ConstructorHandle<'a, G> {
    pub(super) fn new(
        introspection: &'a Introspection<G>,
        arguments: &'a [Argument],
        annotation_metadata: &'a AnnotationMetadata,
    ) -> Self {
        Self {
            introspection,
            arguments,
            annotation_metadata,
        }
    }

    pub fn declaring_type(&self) -> &'a str {
        self.introspection.bean_type()
    }

    pub fn arguments(&self) -> &'a [Argument] {
        self.arguments
    }

    pub fn annotation_metadata(&self) -> &'a AnnotationMetadata {
        self.annotation_metadata
    }

    pub fn instantiate(&self, args: &[Value]) -> Result<Value> {
        self.introspection.instantiate(args)
    }
}
