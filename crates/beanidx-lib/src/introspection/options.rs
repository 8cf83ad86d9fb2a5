/// Instantiation configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstantiateOptions {
    /// Reject null for parameters not declared nullable (default: true).
    pub(crate) strict_nullable: bool,
}

impl Default for InstantiateOptions {
    fn default() -> Self {
        Self {
            strict_nullable: true,
        }
    }
}

impl InstantiateOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable strict nullability checks.
    pub fn strict_nullable(mut self, strict: bool) -> Self {
        self.strict_nullable = strict;
        self
    }

    pub fn is_strict_nullable(&self) -> bool {
        self.strict_nullable
    }
}
