/// Emission configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmitOptions {
    /// Emit the reflective-fallback locator (default: true).
    pub(crate) target_method_locator: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            target_method_locator: true,
        }
    }
}

impl EmitOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable emission of the `target_method` locator.
    pub fn target_method_locator(mut self, enabled: bool) -> Self {
        self.target_method_locator = enabled;
        self
    }

    pub fn emits_target_method_locator(&self) -> bool {
        self.target_method_locator
    }
}
