//! Typed argument descriptors for constructor parameters, method parameters,
//! return types and properties.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::annotation::AnnotationMetadata;
use crate::types::TypeRef;

/// Name, declared type, generic parameters and nullability of an argument.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    ty: TypeRef,
    #[serde(default)]
    type_parameters: Vec<Argument>,
    #[serde(default)]
    nullable: bool,
    #[serde(default, skip_serializing_if = "AnnotationMetadata::is_empty")]
    annotation_metadata: AnnotationMetadata,
}

impl Argument {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            type_parameters: Vec::new(),
            nullable: false,
            annotation_metadata: AnnotationMetadata::default(),
        }
    }

    /// Unnamed argument, used for return types.
    pub fn of_type(ty: TypeRef) -> Self {
        Self::new("", ty)
    }

    /// Mark the argument as declared nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_type_parameters(mut self, params: Vec<Argument>) -> Self {
        self.type_parameters = params;
        self
    }

    pub fn with_annotation_metadata(mut self, metadata: AnnotationMetadata) -> Self {
        self.annotation_metadata = metadata;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn is_declared_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_void(&self) -> bool {
        self.ty.is_void()
    }

    pub fn annotation_metadata(&self) -> &AnnotationMetadata {
        &self.annotation_metadata
    }

    pub fn type_parameters(&self) -> &[Argument] {
        &self.type_parameters
    }

    /// Type parameters keyed by their variable name, in declaration order.
    pub fn type_variables(&self) -> IndexMap<&str, &Argument> {
        self.type_parameters
            .iter()
            .map(|p| (p.name.as_str(), p))
            .collect()
    }

    pub fn first_type_variable(&self) -> Option<&Argument> {
        self.type_parameters.first()
    }

    /// Declared type with primitives replaced by their wrapper class.
    pub fn wrapper_type(&self) -> TypeRef {
        self.ty.wrapper()
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty)?;
        if !self.type_parameters.is_empty() {
            f.write_str("<")?;
            for (i, p) in self.type_parameters.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", p.ty)?;
            }
            f.write_str(">")?;
        }
        if !self.name.is_empty() {
            write!(f, " {}", self.name)?;
        }
        Ok(())
    }
}
