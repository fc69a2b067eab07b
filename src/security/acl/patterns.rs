//! Resource Patterns for ACL Bindings and Filters

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resource name Kafka uses for the cluster-wide resource
pub const CLUSTER_RESOURCE_NAME: &str = "kafka-cluster";

/// Resource pattern for ACL bindings and filters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourcePattern {
    /// Type of resource
    pub resource_type: ResourceType,

    /// Resource name. Empty in a filter means any name.
    pub name: String,

    /// How `name` is matched against resource names
    pub pattern_type: PatternType,
}

/// Resource type enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceType {
    /// Not set, or not understood
    #[default]
    Unknown,

    /// In a filter, matches any resource type
    Any,

    /// The cluster as a whole
    Cluster,

    /// Topic resource
    Topic,

    /// Consumer group resource
    Group,

    /// Transactional ID resource
    TransactionalId,
}

/// Pattern type enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternType {
    /// Not set, or not understood
    #[default]
    Unknown,

    /// In a filter, matches any pattern type
    Any,

    /// Exact resource name match
    Literal,

    /// Resource name prefix match
    Prefixed,
}

impl ResourceType {
    /// Every concrete resource type, in canonical order
    pub const CONCRETE: [ResourceType; 4] = [
        ResourceType::Cluster,
        ResourceType::Topic,
        ResourceType::Group,
        ResourceType::TransactionalId,
    ];

    /// User-facing tokens, excluding the `any`/`unknown` sentinels
    pub fn valid_tokens() -> Vec<&'static str> {
        Self::CONCRETE.iter().map(|t| t.as_str()).collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Unknown => "unknown",
            ResourceType::Any => "any",
            ResourceType::Cluster => "cluster",
            ResourceType::Topic => "topic",
            ResourceType::Group => "group",
            ResourceType::TransactionalId => "transactional-id",
        }
    }

    /// True for the wildcard and unset sentinels
    pub fn is_sentinel(&self) -> bool {
        matches!(self, ResourceType::Unknown | ResourceType::Any)
    }
}

impl PatternType {
    pub const CONCRETE: [PatternType; 2] = [PatternType::Literal, PatternType::Prefixed];

    pub fn valid_tokens() -> Vec<&'static str> {
        Self::CONCRETE.iter().map(|t| t.as_str()).collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Unknown => "unknown",
            PatternType::Any => "any",
            PatternType::Literal => "literal",
            PatternType::Prefixed => "prefixed",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower-case a token and treat `_` as `-`
pub(crate) fn normalize_token(token: &str) -> String {
    token.trim().to_lowercase().replace('_', "-")
}

impl FromStr for ResourceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "cluster" => Ok(ResourceType::Cluster),
            "topic" => Ok(ResourceType::Topic),
            "group" | "consumer-group" => Ok(ResourceType::Group),
            "transactional-id" => Ok(ResourceType::TransactionalId),
            _ => Err(ValidationError::InvalidResourceType {
                token: s.to_string(),
                valid: Self::valid_tokens().join(", "),
            }),
        }
    }
}

impl FromStr for PatternType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "literal" => Ok(PatternType::Literal),
            "prefixed" => Ok(PatternType::Prefixed),
            _ => Err(ValidationError::InvalidPatternType {
                token: s.to_string(),
                valid: Self::valid_tokens().join(", "),
            }),
        }
    }
}

impl ResourcePattern {
    /// Create a new resource pattern
    pub fn new(resource_type: ResourceType, name: impl Into<String>, pattern_type: PatternType) -> Self {
        Self {
            resource_type,
            name: name.into(),
            pattern_type,
        }
    }

    /// The cluster resource, always literal
    pub fn cluster() -> Self {
        Self::new(ResourceType::Cluster, CLUSTER_RESOURCE_NAME, PatternType::Literal)
    }

    /// Create a literal topic pattern
    pub fn topic(name: impl Into<String>) -> Self {
        Self::new(ResourceType::Topic, name, PatternType::Literal)
    }

    /// Create a literal consumer group pattern
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(ResourceType::Group, name, PatternType::Literal)
    }

    /// Create a literal transactional ID pattern
    pub fn transactional_id(name: impl Into<String>) -> Self {
        Self::new(ResourceType::TransactionalId, name, PatternType::Literal)
    }

    /// Pattern matching every resource; used when a filter has no pattern
    pub fn any() -> Self {
        Self::new(ResourceType::Any, String::new(), PatternType::Any)
    }

    /// Switch to prefix matching
    pub fn prefixed(mut self) -> Self {
        self.pattern_type = PatternType::Prefixed;
        self
    }

    /// Check if this filter pattern matches a concrete pattern.
    ///
    /// `Any` fields and an empty name match everything; other fields must be equal.
    pub fn matches(&self, other: &ResourcePattern) -> bool {
        if self.resource_type != ResourceType::Any && self.resource_type != other.resource_type {
            return false;
        }

        if self.pattern_type != PatternType::Any && self.pattern_type != other.pattern_type {
            return false;
        }

        self.name.is_empty() || self.name == other.name
    }
}

impl fmt::Display for ResourcePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.resource_type, self.pattern_type, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_tokens() {
        assert_eq!(
            ResourceType::valid_tokens(),
            vec!["cluster", "topic", "group", "transactional-id"]
        );
    }

    #[test]
    fn test_resource_type_parsing() {
        assert_eq!("TOPIC".parse::<ResourceType>().unwrap(), ResourceType::Topic);
        assert_eq!("consumer_group".parse::<ResourceType>().unwrap(), ResourceType::Group);
        assert_eq!(
            "Transactional_Id".parse::<ResourceType>().unwrap(),
            ResourceType::TransactionalId
        );

        let err = "any".parse::<ResourceType>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid resource type \"any\": valid resource types are: cluster, topic, group, transactional-id"
        );
    }

    #[test]
    fn test_pattern_type_parsing() {
        assert_eq!("Prefixed".parse::<PatternType>().unwrap(), PatternType::Prefixed);
        assert!("unknown".parse::<PatternType>().is_err());
    }

    #[test]
    fn test_cluster_pattern() {
        let pattern = ResourcePattern::cluster();
        assert_eq!(pattern.resource_type, ResourceType::Cluster);
        assert_eq!(pattern.name, "kafka-cluster");
        assert_eq!(pattern.pattern_type, PatternType::Literal);
    }

    #[test]
    fn test_filter_pattern_matching() {
        let bound = ResourcePattern::topic("orders").prefixed();

        assert!(ResourcePattern::any().matches(&bound));
        assert!(ResourcePattern::new(ResourceType::Topic, "orders", PatternType::Any).matches(&bound));
        assert!(!ResourcePattern::topic("orders").matches(&bound));
        assert!(!ResourcePattern::new(ResourceType::Group, "", PatternType::Any).matches(&bound));
        assert!(!ResourcePattern::new(ResourceType::Any, "payments", PatternType::Any).matches(&bound));
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_string(&ResourceType::TransactionalId).unwrap();
        assert_eq!(json, "\"TRANSACTIONAL_ID\"");
    }
}
