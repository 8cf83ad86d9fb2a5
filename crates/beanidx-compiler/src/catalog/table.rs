//! Ordered catalog of dispatch targets.

use beanidx_core::{MethodSignature, TypeRef};
use serde::{Deserialize, Serialize};

use super::target::{
    DispatchStyle, DispatchTarget, FieldTarget, InterceptedTarget, MethodTarget,
};

/// Errors loading or storing a catalog description.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid catalog description: {0}")]
    Json(#[from] serde_json::Error),
}

/// Dispatch targets of one generated type, in index order.
///
/// A target's index is its append position. Indices are never reused or
/// reordered, and appending the same member twice yields two indices.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchCatalog {
    this_type: String,
    #[serde(default)]
    targets: Vec<DispatchTarget>,
}

impl DispatchCatalog {
    /// Empty catalog owned by the generated type `this_type`.
    pub fn new(this_type: impl Into<String>) -> Self {
        Self {
            this_type: this_type.into(),
            targets: Vec::new(),
        }
    }

    pub fn this_type(&self) -> &str {
        &self.this_type
    }

    /// Append a target and return its index.
    pub fn append(&mut self, target: DispatchTarget) -> u32 {
        let index = self.targets.len() as u32;
        self.targets.push(target);
        index
    }

    pub fn add_get_field(&mut self, owner: &str, name: &str, ty: TypeRef) -> u32 {
        self.append(DispatchTarget::FieldGet(FieldTarget {
            owner: owner.to_owned(),
            name: name.to_owned(),
            ty,
        }))
    }

    pub fn add_set_field(&mut self, owner: &str, name: &str, ty: TypeRef) -> u32 {
        self.append(DispatchTarget::FieldSet(FieldTarget {
            owner: owner.to_owned(),
            name: name.to_owned(),
            ty,
        }))
    }

    pub fn add_method(
        &mut self,
        declaring: &str,
        signature: MethodSignature,
        interface: bool,
        style: DispatchStyle,
    ) -> u32 {
        self.append(DispatchTarget::Method(MethodTarget {
            declaring: declaring.to_owned(),
            signature,
            interface,
            style,
        }))
    }

    /// Append a method whose multi-value dispatch may be redirected to
    /// `bridge_method` on `proxy_type`. The interceptable flag consulted is
    /// the one of this catalog's generated type.
    pub fn add_intercepted_method(
        &mut self,
        declaring: &str,
        signature: MethodSignature,
        interface: bool,
        proxy_type: &str,
        bridge_method: &str,
    ) -> u32 {
        let this_type = self.this_type.clone();
        self.append(DispatchTarget::InterceptedMethod(InterceptedTarget {
            declaring: declaring.to_owned(),
            signature,
            interface,
            proxy_type: proxy_type.to_owned(),
            bridge_method: bridge_method.to_owned(),
            this_type,
        }))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<&DispatchTarget> {
        self.targets.get(index as usize)
    }

    pub fn targets(&self) -> &[DispatchTarget] {
        &self.targets
    }

    pub fn has_intercepted(&self) -> bool {
        self.targets
            .iter()
            .any(|t| matches!(t, DispatchTarget::InterceptedMethod(_)))
    }

    pub fn targets_supporting_multi(&self) -> impl Iterator<Item = (u32, &DispatchTarget)> {
        self.indexed().filter(|(_, t)| t.supports_multi())
    }

    pub fn targets_supporting_one(&self) -> impl Iterator<Item = (u32, &DispatchTarget)> {
        self.indexed().filter(|(_, t)| t.supports_one())
    }

    pub fn method_targets(&self) -> impl Iterator<Item = (u32, &DispatchTarget)> {
        self.indexed().filter(|(_, t)| t.is_method())
    }

    fn indexed(&self) -> impl Iterator<Item = (u32, &DispatchTarget)> {
        self.targets
            .iter()
            .enumerate()
            .map(|(i, t)| (i as u32, t))
    }

    /// Load a catalog description.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
