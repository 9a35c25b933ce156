//! Cache keys: resource family plus parameter segments.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level resource grouping used for invalidation fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceFamily {
    Dashboard,
    Orders,
    Pricing,
    Weather,
    Users,
    FishTypes,
    Blog,
    System,
}

impl ResourceFamily {
    pub const ALL: [ResourceFamily; 8] = [
        ResourceFamily::Dashboard,
        ResourceFamily::Orders,
        ResourceFamily::Pricing,
        ResourceFamily::Weather,
        ResourceFamily::Users,
        ResourceFamily::FishTypes,
        ResourceFamily::Blog,
        ResourceFamily::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceFamily::Dashboard => "dashboard",
            ResourceFamily::Orders => "orders",
            ResourceFamily::Pricing => "pricing",
            ResourceFamily::Weather => "weather",
            ResourceFamily::Users => "users",
            ResourceFamily::FishTypes => "fish_types",
            ResourceFamily::Blog => "blog",
            ResourceFamily::System => "system",
        }
    }
}

impl fmt::Display for ResourceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cache key: family plus the parameter segments that distinguish one
/// query from another within the family (page, filters, date ranges).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    pub family: ResourceFamily,
    pub segments: Vec<String>,
}

impl QueryKey {
    pub fn new<I, S>(family: ResourceFamily, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            family,
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// The bare family key, for queries with no parameters.
    pub fn of(family: ResourceFamily) -> Self {
        Self {
            family,
            segments: Vec::new(),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.family)?;
        for segment in &self.segments {
            write!(f, ":{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        let key = QueryKey::new(ResourceFamily::Orders, ["page=2", "status=pending"]);
        assert_eq!(key.to_string(), "orders:page=2:status=pending");
        assert_eq!(QueryKey::of(ResourceFamily::Weather).to_string(), "weather");
    }

    #[test]
    fn test_keys_differ_by_segments() {
        let a = QueryKey::new(ResourceFamily::Pricing, ["fish=2"]);
        let b = QueryKey::new(ResourceFamily::Pricing, ["fish=3"]);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
