//! Generated type backed by an emitted dispatch module.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use beanidx_bytecode::{DispatchModule, dump};
use beanidx_core::{TypeRef, Value};
use beanidx_vm::{ClassTable, Interpreter, ReflectedMethod, RuntimeError};
use indexmap::IndexMap;

use super::{GeneratedType, PropertyRef};
use crate::{Error, Result};

/// Constructor body: builds a bean from validated arguments.
pub type Instantiator =
    dyn Fn(&ClassTable, &[Value]) -> Result<Value, RuntimeError> + Send + Sync;

/// Dispatch module, class table and constructors of one bean type.
pub struct CompiledType {
    module: DispatchModule,
    classes: Arc<ClassTable>,
    interceptable: AtomicBool,
    property_index: IndexMap<String, usize>,
    constructor: Option<Box<Instantiator>>,
    default_constructor: Option<Box<Instantiator>>,
}

impl CompiledType {
    pub(super) fn new(
        module: DispatchModule,
        classes: Arc<ClassTable>,
        property_index: IndexMap<String, usize>,
        constructor: Option<Box<Instantiator>>,
        default_constructor: Option<Box<Instantiator>>,
    ) -> Self {
        Self {
            module,
            classes,
            interceptable: AtomicBool::new(false),
            property_index,
            constructor,
            default_constructor,
        }
    }

    pub fn module(&self) -> &DispatchModule {
        &self.module
    }

    pub fn classes(&self) -> &ClassTable {
        &self.classes
    }

    /// Route intercepted methods to their proxy bridge when the target is a
    /// proxy instance.
    pub fn set_interceptable(&self, interceptable: bool) {
        self.interceptable.store(interceptable, Ordering::Release);
    }

    pub fn is_interceptable(&self) -> bool {
        self.interceptable.load(Ordering::Acquire)
    }

    /// Disassembly of the dispatch module.
    pub fn dump(&self) -> String {
        dump(&self.module)
    }

    fn interpreter(&self) -> Interpreter<'_> {
        Interpreter::new(&self.module, &self.classes)
    }
}

impl GeneratedType for CompiledType {
    fn dispatch(&self, index: u32, target: &Value, args: &[Value]) -> Result<Value, RuntimeError> {
        self.interpreter()
            .dispatch(index, target, args, self.is_interceptable())
    }

    fn dispatch_one(&self, index: u32, target: &Value, arg: &Value) -> Result<Value, RuntimeError> {
        self.interpreter().dispatch_one(index, target, arg)
    }

    fn target_method_by_index(&self, index: u32) -> Result<ReflectedMethod, RuntimeError> {
        self.interpreter().target_method(index)
    }

    fn is_instance(&self, value: &Value, ty: &TypeRef) -> bool {
        self.classes.is_instance(value, ty)
    }

    fn instantiate_internal(&self, args: &[Value]) -> Result<Value> {
        let Some(constructor) = &self.constructor else {
            return Err(Error::Instantiation(format!(
                "No constructor exists for type: {}",
                self.module.this_type()
            )));
        };
        Ok(constructor(&self.classes, args)?)
    }

    fn instantiate_default(&self) -> Result<Value> {
        let Some(constructor) = &self.default_constructor else {
            return Err(Error::Instantiation("No default constructor exists".to_owned()));
        };
        Ok(constructor(&self.classes, &[])?)
    }

    fn find_property(&self, name: &str, _properties: &[PropertyRef]) -> Option<usize> {
        self.property_index.get(name).copied()
    }
}

impl fmt::Debug for CompiledType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledType")
            .field("this_type", &self.module.this_type())
            .field("properties", &self.property_index.len())
            .field("interceptable", &self.is_interceptable())
            .finish()
    }
}
