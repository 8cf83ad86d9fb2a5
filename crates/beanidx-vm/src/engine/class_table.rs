//! Runtime class metadata: hierarchy, fields and native method bodies.

use std::fmt;
use std::sync::Arc;

use beanidx_bytecode::{InvokeKind, ParamTypes};
use beanidx_core::{MethodSignature, ObjRef, Slot, TypeRef, Value, builtin};
use indexmap::IndexMap;
use tracing::debug;

use super::error::RuntimeError;
use super::reflect::ReflectedMethod;

/// Native method body. Receives the receiver and the already-cast arguments;
/// the returned slot is ignored for void methods.
pub type NativeFn = dyn Fn(&ObjRef, &[Slot]) -> Result<Slot, RuntimeError> + Send + Sync;

#[derive(Clone)]
struct MethodDef {
    signature: MethodSignature,
    /// `None` for abstract interface methods.
    body: Option<Arc<NativeFn>>,
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("signature", &self.signature)
            .field("abstract", &self.body.is_none())
            .finish()
    }
}

#[derive(Clone, Debug)]
struct FieldDef {
    name: String,
    default: Slot,
}

/// Definition of a class or interface.
#[derive(Clone, Debug)]
pub struct ClassDef {
    name: String,
    superclass: Option<String>,
    interfaces: Vec<String>,
    is_interface: bool,
    fields: Vec<FieldDef>,
    methods: Vec<MethodDef>,
}

impl ClassDef {
    /// A class extending `Object`.
    pub fn class(name: impl Into<String>) -> Self {
        let name = name.into();
        let superclass = (name != builtin::OBJECT).then(|| builtin::OBJECT.to_owned());
        Self {
            name,
            superclass,
            interfaces: Vec::new(),
            is_interface: false,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            superclass: None,
            interfaces: Vec::new(),
            is_interface: true,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Implemented interfaces for classes, super-interfaces for interfaces.
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Declare a field initialized to the zero value of its type.
    pub fn field(self, name: impl Into<String>, ty: TypeRef) -> Self {
        let default = Slot::default_for(&ty);
        self.field_with_default(name, default)
    }

    pub fn field_with_default(mut self, name: impl Into<String>, default: Slot) -> Self {
        self.fields.push(FieldDef {
            name: name.into(),
            default,
        });
        self
    }

    /// Declare a method with a native body.
    pub fn method<F>(mut self, signature: MethodSignature, body: F) -> Self
    where
        F: Fn(&ObjRef, &[Slot]) -> Result<Slot, RuntimeError> + Send + Sync + 'static,
    {
        self.methods.push(MethodDef {
            signature,
            body: Some(Arc::new(body)),
        });
        self
    }

    /// Declare a method without a body; implementations come from subclasses.
    pub fn abstract_method(mut self, signature: MethodSignature) -> Self {
        self.methods.push(MethodDef {
            signature,
            body: None,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn superclass(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    pub fn is_interface(&self) -> bool {
        self.is_interface
    }

    fn declared(&self, name: &str, params: &[TypeRef]) -> Option<&MethodDef> {
        self.methods
            .iter()
            .find(|m| m.signature.name == name && m.signature.params == params)
    }
}

/// Every class known at run time, keyed by name.
///
/// Superclasses and interfaces must be defined before the classes that
/// reference them, so the hierarchy is acyclic.
#[derive(Clone, Debug)]
pub struct ClassTable {
    classes: IndexMap<String, ClassDef>,
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassTable {
    /// Table holding the builtin classes: `Object`, `String`, `Number` and
    /// the primitive wrappers.
    pub fn new() -> Self {
        let mut classes = IndexMap::new();
        let builtins = [
            ClassDef::class(builtin::OBJECT),
            ClassDef::class(builtin::STRING),
            ClassDef::class(builtin::NUMBER),
            ClassDef::class(builtin::BOOLEAN),
            ClassDef::class(builtin::INTEGER).extends(builtin::NUMBER),
            ClassDef::class(builtin::LONG).extends(builtin::NUMBER),
            ClassDef::class(builtin::DOUBLE).extends(builtin::NUMBER),
        ];
        for def in builtins {
            classes.insert(def.name.clone(), def);
        }
        Self { classes }
    }

    /// Add a class or interface.
    pub fn define(&mut self, def: ClassDef) -> Result<(), RuntimeError> {
        if self.classes.contains_key(&def.name) {
            return Err(RuntimeError::DuplicateClass(def.name));
        }
        for parent in def.superclass.iter().chain(&def.interfaces) {
            if !self.classes.contains_key(parent) {
                return Err(RuntimeError::UnknownClass(parent.clone()));
            }
        }
        if let Some(sup) = &def.superclass
            && self.classes[sup].is_interface
        {
            return Err(RuntimeError::IncompatibleClassChange(format!(
                "{} cannot extend interface {sup}",
                def.name
            )));
        }
        debug!(
            class = %def.name,
            interface = def.is_interface,
            fields = def.fields.len(),
            methods = def.methods.len(),
            "defined class"
        );
        self.classes.insert(def.name.clone(), def);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Whether `sub` is `sup` or inherits from it through superclasses or
    /// interfaces.
    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        if sub == sup || sup == builtin::OBJECT {
            return true;
        }
        let Some(def) = self.classes.get(sub) else {
            return false;
        };
        def.superclass
            .iter()
            .chain(&def.interfaces)
            .any(|parent| self.is_subtype(parent, sup))
    }

    /// Whether `value` is a non-null instance of `ty`. Primitive and void
    /// types have no instances.
    pub fn is_instance(&self, value: &Value, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Class(name) => !value.is_null() && self.is_subtype(value.class_name(), name),
            TypeRef::Primitive(_) | TypeRef::Void => false,
        }
    }

    /// Checked cast. Reference types accept null and instances; primitive
    /// types unbox their wrapper.
    pub fn cast(&self, value: &Value, ty: &TypeRef) -> Result<Slot, RuntimeError> {
        match ty {
            TypeRef::Primitive(prim) => Slot::unbox(value, *prim).ok_or_else(|| {
                if value.is_null() {
                    RuntimeError::NullPointer(format!("cannot unbox null to {}", prim.name()))
                } else {
                    RuntimeError::ClassCast {
                        from: value.class_name().to_owned(),
                        to: prim.wrapper_name().to_owned(),
                    }
                }
            }),
            TypeRef::Class(_) if value.is_null() || self.is_instance(value, ty) => {
                Ok(Slot::Ref(value.clone()))
            }
            TypeRef::Class(name) => Err(RuntimeError::ClassCast {
                from: value.class_name().to_owned(),
                to: name.clone(),
            }),
            TypeRef::Void => Err(RuntimeError::InvalidOperand("cast to void".to_owned())),
        }
    }

    /// Allocate an instance with every inherited and declared field set to
    /// its default.
    pub fn new_instance(&self, class: &str) -> Result<ObjRef, RuntimeError> {
        let def = self
            .classes
            .get(class)
            .ok_or_else(|| RuntimeError::UnknownClass(class.to_owned()))?;
        if def.is_interface {
            return Err(RuntimeError::NotInstantiable(class.to_owned()));
        }

        let mut fields = IndexMap::new();
        for def in self.superclass_chain(class).into_iter().rev() {
            for field in &def.fields {
                fields.insert(field.name.clone(), field.default.clone());
            }
        }
        Ok(ObjRef::new(class, fields))
    }

    /// Call `method` on `receiver` with arguments already cast to the
    /// parameter types. Returns `None` for void methods.
    pub fn invoke(
        &self,
        kind: InvokeKind,
        owner: &str,
        method: &MethodSignature,
        receiver: &Value,
        args: &[Slot],
    ) -> Result<Option<Slot>, RuntimeError> {
        let obj = match receiver {
            Value::Object(obj) => obj,
            Value::Null => {
                return Err(RuntimeError::NullPointer(format!(
                    "invoke {owner}.{} on null",
                    method.name
                )));
            }
            other => {
                return Err(RuntimeError::InvalidOperand(format!(
                    "receiver of {owner}.{} is a {}",
                    method.name,
                    other.class_name()
                )));
            }
        };

        let owner_def = self
            .classes
            .get(owner)
            .ok_or_else(|| RuntimeError::UnknownClass(owner.to_owned()))?;
        match (kind, owner_def.is_interface) {
            (InvokeKind::Virtual, true) => {
                return Err(RuntimeError::IncompatibleClassChange(format!(
                    "{owner} is an interface, expected a class"
                )));
            }
            (InvokeKind::Interface, false) => {
                return Err(RuntimeError::IncompatibleClassChange(format!(
                    "{owner} is a class, expected an interface"
                )));
            }
            _ => {}
        }
        if !self.is_subtype(obj.class_name(), owner) {
            return Err(RuntimeError::IncompatibleClassChange(format!(
                "{} is not a subtype of {owner}",
                obj.class_name()
            )));
        }
        if args.len() != method.arity() {
            return Err(RuntimeError::ArgumentCount {
                method: format!("{owner}.{}", method.name),
                expected: method.arity(),
                found: args.len(),
            });
        }

        let body = self
            .resolve(obj.class_name(), &method.name, &method.params)
            .ok_or_else(|| RuntimeError::NoSuchMethod {
                class: obj.class_name().to_owned(),
                method: method.to_string(),
            })?;
        let result = body(obj, args)?;

        if method.returns_void() {
            return Ok(None);
        }
        self.check_return(owner, method, &result)?;
        Ok(Some(result))
    }

    /// Reflective handle to a method declared on `owner` or inherited by it,
    /// matched by name and exact parameter types.
    pub fn get_required_method(
        &self,
        owner: &str,
        name: &str,
        params: &ParamTypes,
    ) -> Result<ReflectedMethod, RuntimeError> {
        let owner_def = self
            .classes
            .get(owner)
            .ok_or_else(|| RuntimeError::UnknownClass(owner.to_owned()))?;
        let params = params.as_slice();

        let found = self
            .supertypes(owner)
            .into_iter()
            .find_map(|def| def.declared(name, params));
        let Some(found) = found else {
            let params: Vec<String> = params.iter().map(ToString::to_string).collect();
            return Err(RuntimeError::NoSuchMethod {
                class: owner.to_owned(),
                method: format!("{name}({})", params.join(", ")),
            });
        };

        Ok(ReflectedMethod::new(
            owner,
            found.signature.clone(),
            owner_def.is_interface,
        ))
    }

    /// Implementation body for a call dispatched on a `class` instance:
    /// the nearest concrete declaration in the superclass chain, then a
    /// default body from an implemented interface.
    fn resolve(&self, class: &str, name: &str, params: &[TypeRef]) -> Option<Arc<NativeFn>> {
        let concrete = |def: &ClassDef| def.declared(name, params).and_then(|m| m.body.clone());
        self.superclass_chain(class)
            .into_iter()
            .find_map(concrete)
            .or_else(|| {
                self.supertypes(class)
                    .into_iter()
                    .filter(|def| def.is_interface)
                    .find_map(concrete)
            })
    }

    fn check_return(
        &self,
        owner: &str,
        method: &MethodSignature,
        result: &Slot,
    ) -> Result<(), RuntimeError> {
        let ok = match (&method.return_type, result) {
            (TypeRef::Primitive(prim), slot) => slot.primitive_type() == Some(*prim),
            (TypeRef::Class(_), Slot::Ref(v)) => {
                v.is_null() || self.is_instance(v, &method.return_type)
            }
            _ => false,
        };
        if ok {
            return Ok(());
        }
        let found = match result {
            Slot::Ref(v) => v.class_name().to_owned(),
            other => other
                .primitive_type()
                .map_or("?", |p| p.name())
                .to_owned(),
        };
        Err(RuntimeError::InvalidReturn {
            method: format!("{owner}.{}", method.name),
            expected: method.return_type.to_string(),
            found,
        })
    }

    /// `class` followed by its superclasses, nearest first.
    fn superclass_chain(&self, class: &str) -> Vec<&ClassDef> {
        let mut chain = Vec::new();
        let mut next = self.classes.get(class);
        while let Some(def) = next {
            chain.push(def);
            next = def.superclass.as_deref().and_then(|s| self.classes.get(s));
        }
        chain
    }

    /// `class`, its superclasses, then every interface reachable from them,
    /// breadth first without repeats.
    fn supertypes(&self, class: &str) -> Vec<&ClassDef> {
        let mut out = self.superclass_chain(class);
        let mut cursor = 0;
        while cursor < out.len() {
            let current = out[cursor];
            for name in &current.interfaces {
                if let Some(def) = self.classes.get(name)
                    && !out.iter().any(|d| d.name == def.name)
                {
                    out.push(def);
                }
            }
            cursor += 1;
        }
        out
    }
}
