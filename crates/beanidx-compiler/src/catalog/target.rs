//! Dispatch target kinds.

use beanidx_core::{MethodSignature, TypeRef};
use serde::{Deserialize, Serialize};

/// Which dispatch routines a method participates in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStyle {
    /// Single-value dispatch only (accessor-style methods).
    One,
    /// Multi-value dispatch only.
    #[default]
    Multi,
    Both,
}

impl DispatchStyle {
    pub fn one(self) -> bool {
        matches!(self, DispatchStyle::One | DispatchStyle::Both)
    }

    pub fn multi(self) -> bool {
        matches!(self, DispatchStyle::Multi | DispatchStyle::Both)
    }
}

/// A field read or written directly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTarget {
    pub owner: String,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

/// A method invoked on its declaring type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodTarget {
    pub declaring: String,
    pub signature: MethodSignature,
    /// Resolve through the declaring interface instead of the class chain.
    #[serde(default)]
    pub interface: bool,
    #[serde(default)]
    pub style: DispatchStyle,
}

/// A method whose multi-value dispatch is redirected to a proxy bridge when
/// interception is enabled and the target is a proxy instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterceptedTarget {
    pub declaring: String,
    pub signature: MethodSignature,
    #[serde(default)]
    pub interface: bool,
    pub proxy_type: String,
    pub bridge_method: String,
    /// Generated type whose interceptable flag gates the bridge.
    pub this_type: String,
}

impl InterceptedTarget {
    /// Signature of the bridge: same parameters and return type, bridge name.
    pub fn bridge_signature(&self) -> MethodSignature {
        self.signature.renamed(&self.bridge_method)
    }
}

/// A member registered for index-based invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispatchTarget {
    FieldGet(FieldTarget),
    FieldSet(FieldTarget),
    Method(MethodTarget),
    InterceptedMethod(InterceptedTarget),
}

impl DispatchTarget {
    pub fn supports_one(&self) -> bool {
        match self {
            DispatchTarget::FieldGet(_) | DispatchTarget::FieldSet(_) => true,
            DispatchTarget::Method(m) => m.style.one(),
            DispatchTarget::InterceptedMethod(_) => false,
        }
    }

    pub fn supports_multi(&self) -> bool {
        match self {
            DispatchTarget::FieldGet(_) | DispatchTarget::FieldSet(_) => false,
            DispatchTarget::Method(m) => m.style.multi(),
            DispatchTarget::InterceptedMethod(_) => true,
        }
    }

    /// Plain and intercepted methods. These are the targets the reflective
    /// locator covers.
    pub fn is_method(&self) -> bool {
        matches!(
            self,
            DispatchTarget::Method(_) | DispatchTarget::InterceptedMethod(_)
        )
    }

    /// Declaring type, signature and interface flag of a method target.
    pub fn method_parts(&self) -> Option<(&str, &MethodSignature, bool)> {
        match self {
            DispatchTarget::Method(m) => Some((&m.declaring, &m.signature, m.interface)),
            DispatchTarget::InterceptedMethod(m) => {
                Some((&m.declaring, &m.signature, m.interface))
            }
            _ => None,
        }
    }

    /// Type the target is cast to before access.
    pub fn owner(&self) -> &str {
        match self {
            DispatchTarget::FieldGet(f) | DispatchTarget::FieldSet(f) => &f.owner,
            DispatchTarget::Method(m) => &m.declaring,
            DispatchTarget::InterceptedMethod(m) => &m.declaring,
        }
    }
}
