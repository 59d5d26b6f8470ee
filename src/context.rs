//! Rendering context for a single file entry.

use crate::config::Values;
use serde::Serialize;

/// The two-scope value view handed to a template.
///
/// Global and local values stay in separate namespaces (`Global.*` and
/// `Local.*`), so a key defined in both scopes never shadows the other.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RenderContext<'a> {
    #[serde(rename = "Global")]
    pub global: &'a Values,
    #[serde(rename = "Local")]
    pub local: &'a Values,
}

impl<'a> RenderContext<'a> {
    /// Builds the context for one render. Borrows both mappings, never copies.
    pub fn build(global: &'a Values, local: &'a Values) -> Self {
        Self { global, local }
    }
}
