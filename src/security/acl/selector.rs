//! Resource Selector
//!
//! Turns the mutually exclusive resource flags into a [`ResourcePattern`].

use super::{PatternType, ResourcePattern, ResourceType};
use crate::error::ValidationError;

/// Resource flags as supplied on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceSelector {
    pub cluster_scope: bool,
    pub topic: Option<String>,
    pub consumer_group: Option<String>,
    pub transactional_id: Option<String>,
    pub prefix: bool,
}

impl ResourceSelector {
    pub fn cluster() -> Self {
        Self {
            cluster_scope: true,
            ..Self::default()
        }
    }

    pub fn topic(name: impl Into<String>) -> Self {
        Self {
            topic: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn consumer_group(name: impl Into<String>) -> Self {
        Self {
            consumer_group: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn transactional_id(name: impl Into<String>) -> Self {
        Self {
            transactional_id: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_prefix(mut self, prefix: bool) -> Self {
        self.prefix = prefix;
        self
    }

    /// Number of resource flags that were set
    pub fn selected_count(&self) -> usize {
        [
            self.cluster_scope,
            self.topic.is_some(),
            self.consumer_group.is_some(),
            self.transactional_id.is_some(),
        ]
        .iter()
        .filter(|&&set| set)
        .count()
    }

    /// Pattern for a binding. Exactly one resource flag must be set.
    ///
    /// Cluster scope is always literal; other resources are prefixed only
    /// when the prefix flag is set. Resource names must not be empty.
    pub fn select(&self) -> Result<ResourcePattern, ValidationError> {
        if self.selected_count() != 1 {
            return Err(ValidationError::ResourceSelector);
        }

        let pattern_type = if self.prefix {
            PatternType::Prefixed
        } else {
            PatternType::Literal
        };

        require_name(self.build(pattern_type))
    }

    /// Pattern for a query filter. At most one resource flag may be set.
    ///
    /// With no flag there is no pattern, and the prefix flag has nothing to
    /// apply to. Without the prefix flag the pattern type is left `Unknown`
    /// so filter widening turns it into `Any`.
    pub fn select_for_query(&self) -> Result<Option<ResourcePattern>, ValidationError> {
        match self.selected_count() {
            0 if self.prefix => Err(ValidationError::PrefixWithoutResource),
            0 => Ok(None),
            1 => {
                let pattern_type = if self.prefix {
                    PatternType::Prefixed
                } else {
                    PatternType::Unknown
                };
                require_name(self.build(pattern_type)).map(Some)
            }
            _ => Err(ValidationError::ResourceSelector),
        }
    }

    fn build(&self, pattern_type: PatternType) -> ResourcePattern {
        if self.cluster_scope {
            return ResourcePattern::cluster();
        }

        let (resource_type, name) = if let Some(topic) = &self.topic {
            (ResourceType::Topic, topic)
        } else if let Some(group) = &self.consumer_group {
            (ResourceType::Group, group)
        } else if let Some(id) = &self.transactional_id {
            (ResourceType::TransactionalId, id)
        } else {
            return ResourcePattern::new(ResourceType::Unknown, String::new(), pattern_type);
        };

        ResourcePattern::new(resource_type, name.clone(), pattern_type)
    }
}

/// An empty name would match every resource once widened into a filter
fn require_name(pattern: ResourcePattern) -> Result<ResourcePattern, ValidationError> {
    if pattern.resource_type != ResourceType::Cluster && pattern.name.is_empty() {
        return Err(ValidationError::EmptyResourceName(
            pattern.resource_type.as_str().to_string(),
        ));
    }
    Ok(pattern)
}
