//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of a fully qualified product-variant identifier.
const VARIANT_GID_PREFIX: &str = "gid://shopify/ProductVariant/";

/// Normalized product-variant identifier.
///
/// The platform emits variant ids in two equivalent shapes: the bare numeric
/// id (`"12345"`) and the fully qualified global id
/// (`"gid://shopify/ProductVariant/12345"`). Every path into the price cache
/// constructs a `VariantId` at the boundary, so the two shapes always land on
/// the same map key. The inner String is private to ensure all construction
/// goes through [`VariantId::normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantId(String);

impl VariantId {
    /// Build a normalized id from either identifier shape.
    ///
    /// A qualified gid is reduced to its trailing numeric segment; anything
    /// else is taken as-is.
    pub fn normalize(raw: impl AsRef<str>) -> Self {
        let raw = raw.as_ref().trim();
        let id = match raw.rsplit_once('/') {
            Some((_, tail)) if raw.starts_with("gid://") => tail,
            _ => raw,
        };
        Self(id.to_string())
    }

    /// The bare numeric form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The fully qualified global-id form expected by write mutations.
    pub fn to_gid(&self) -> String {
        format!("{VARIANT_GID_PREFIX}{}", self.0)
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VariantId {
    fn from(s: &str) -> Self {
        Self::normalize(s)
    }
}

impl From<String> for VariantId {
    fn from(s: String) -> Self {
        Self::normalize(s)
    }
}
