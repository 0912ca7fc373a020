//! Secret values that must never leak into logs or responses.
//!
//! `SecretString` only hands out the real value through [`SecretString::expose`].
//! Every formatting path (`Debug`, `Display`, `Serialize`) renders a masked
//! preview instead, so a config struct holding one can be logged or returned
//! as JSON without exposing the credential.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Marker used in config files for values that are injected from the environment.
pub const SECRET_FROM_ENV_MARKER: &str = "secret_from_env";

/// Placeholder rendered for absent values.
pub const MISSING: &str = "MISSING";

const MASK: &str = "****";
// Values shorter than this are fully masked; a 4+4 preview would reveal most of them.
const MIN_PREVIEW_LEN: usize = 9;

/// A string credential with masked formatting.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw secret. Only the request signer should need this.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True when the value is empty or still the unresolved env marker.
    pub fn is_unresolved(&self) -> bool {
        let trimmed = self.0.trim();
        trimmed.is_empty() || trimmed == SECRET_FROM_ENV_MARKER
    }

    /// `****` followed by the last four characters, or `MISSING`.
    pub fn masked_preview(&self) -> String {
        if self.is_unresolved() {
            return MISSING.to_string();
        }
        mask_suffix(&self.0)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretString")
            .field(&self.masked_preview())
            .finish()
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked_preview())
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.masked_preview())
    }
}

/// Keeps the first four characters visible: `ABCD****`.
pub fn mask_prefix(value: &str) -> String {
    if value.is_empty() {
        return MISSING.to_string();
    }
    if value.chars().count() < MIN_PREVIEW_LEN {
        return MASK.to_string();
    }
    let head: String = value.chars().take(4).collect();
    format!("{head}{MASK}")
}

/// Keeps the last four characters visible: `****WXYZ`.
pub fn mask_suffix(value: &str) -> String {
    if value.is_empty() {
        return MISSING.to_string();
    }
    let len = value.chars().count();
    if len < MIN_PREVIEW_LEN {
        return MASK.to_string();
    }
    let tail: String = value.chars().skip(len - 4).collect();
    format!("{MASK}{tail}")
}
