//! Canonicalizes node/condition attribute maps into a region key `platform/city`.

use std::collections::HashMap;
use std::fmt;

/// Attribute key carrying the city/group component of a region.
pub const ATTR_KEY_CITY: &str = "City";
/// Attribute key carrying the platform component of a region.
pub const ATTR_KEY_PLATFORM: &str = "Platform";

const UNKNOWN_CITY: &str = "unknown_city";
const DEFAULT_PLATFORM: &str = "default-platform";

fn non_empty_or(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Opaque region identifier. Two attribute maps that canonicalize to the same
/// `(platform, city)` pair produce an equal key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionKey(String);

impl RegionKey {
    /// Builds a key directly from a platform/city pair, applying the same
    /// default substitution as [`RegionKey::from_attributes`].
    pub fn new(platform: impl Into<String>, city: impl Into<String>) -> Self {
        let platform = non_empty_or(platform.into(), DEFAULT_PLATFORM);
        let city = non_empty_or(city.into(), UNKNOWN_CITY);
        RegionKey(format!("{platform}/{city}"))
    }

    /// Canonicalizes an attribute map into a `(platform, city)` pair, substituting
    /// defaults for absent or empty values.
    pub fn canonicalize(attributes: &HashMap<String, String>) -> (String, String) {
        let city = attributes
            .get(ATTR_KEY_CITY)
            .cloned()
            .map(|c| non_empty_or(c, UNKNOWN_CITY))
            .unwrap_or_else(|| UNKNOWN_CITY.to_string());
        let platform = attributes
            .get(ATTR_KEY_PLATFORM)
            .cloned()
            .map(|p| non_empty_or(p, DEFAULT_PLATFORM))
            .unwrap_or_else(|| DEFAULT_PLATFORM.to_string());
        (platform, city)
    }

    /// Computes the region key for an attribute map (a node's attributes or an
    /// admission condition).
    pub fn from_attributes(attributes: &HashMap<String, String>) -> Self {
        let (platform, city) = Self::canonicalize(attributes);
        RegionKey(format!("{platform}/{city}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
