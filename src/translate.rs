//! Description translation seam.
//!
//! Submissions pass their description through a `Translator` before
//! classification and storage. Only the identity translator exists today.

/// Converts a free-text description into the stored language.
pub trait Translator: Send + Sync {
    fn translate(&self, description: &str) -> String;
}

/// Pass-through translator: returns the description unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, description: &str) -> String {
        description.to_string()
    }
}
