/// Knobs for a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Traits derived on every family enum and variant struct.
    pub derives: Vec<String>,
    /// Emit unknown type references verbatim instead of rejecting them.
    pub allow_opaque_types: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            derives: ["Debug", "Clone", "PartialEq", "Eq", "Hash"]
                .into_iter()
                .map(String::from)
                .collect(),
            allow_opaque_types: false,
        }
    }
}

impl GeneratorConfig {
    pub fn allow_opaque_types(mut self, allow: bool) -> Self {
        self.allow_opaque_types = allow;
        self
    }

    pub fn derives<I, S>(mut self, derives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.derives = derives.into_iter().map(Into::into).collect();
        self
    }

    /// The `#[derive(...)]` line, or `None` when nothing is derived.
    pub(crate) fn derive_attribute(&self) -> Option<String> {
        if self.derives.is_empty() {
            return None;
        }
        Some(format!("#[derive({})]", self.derives.join(", ")))
    }
}
