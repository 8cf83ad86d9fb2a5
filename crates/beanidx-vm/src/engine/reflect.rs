//! Reflective method handles returned by the `target_method` locator.

use std::fmt;

use beanidx_bytecode::InvokeKind;
use beanidx_core::{MethodSignature, TypeRef, Value};

use super::class_table::ClassTable;
use super::error::RuntimeError;

/// A method located by name and parameter types.
///
/// Invoking it casts arguments and resolves the body on every call, which is
/// the slow path index-based dispatch avoids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReflectedMethod {
    declaring: String,
    signature: MethodSignature,
    interface: bool,
}

impl ReflectedMethod {
    pub fn new(declaring: impl Into<String>, signature: MethodSignature, interface: bool) -> Self {
        Self {
            declaring: declaring.into(),
            signature,
            interface,
        }
    }

    pub fn declaring_type(&self) -> &str {
        &self.declaring
    }

    pub fn name(&self) -> &str {
        &self.signature.name
    }

    pub fn parameter_types(&self) -> &[TypeRef] {
        &self.signature.params
    }

    pub fn return_type(&self) -> &TypeRef {
        &self.signature.return_type
    }

    pub fn signature(&self) -> &MethodSignature {
        &self.signature
    }

    pub fn is_interface(&self) -> bool {
        self.interface
    }

    /// Invoke on `target`. Void methods yield `Value::Null`, primitive results
    /// are boxed.
    pub fn invoke(
        &self,
        classes: &ClassTable,
        target: &Value,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        if args.len() != self.signature.arity() {
            return Err(RuntimeError::ArgumentCount {
                method: format!("{}.{}", self.declaring, self.signature.name),
                expected: self.signature.arity(),
                found: args.len(),
            });
        }
        let receiver = classes.cast(target, &TypeRef::class(&self.declaring))?;
        let receiver = receiver.into_value();
        let slots = args
            .iter()
            .zip(&self.signature.params)
            .map(|(arg, ty)| classes.cast(arg, ty))
            .collect::<Result<Vec<_>, _>>()?;

        let kind = if self.interface {
            InvokeKind::Interface
        } else {
            InvokeKind::Virtual
        };
        let result = classes.invoke(kind, &self.declaring, &self.signature, &receiver, &slots)?;
        Ok(result.map_or(Value::Null, |slot| slot.into_value()))
    }
}

impl fmt::Display for ReflectedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring, self.signature)
    }
}
