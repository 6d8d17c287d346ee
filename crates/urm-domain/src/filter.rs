//! Mapping filters.
//!
//! A [`MappingFilter`] is a conjunction of optional equality constraints.
//! Unset fields match every record; an invalid (zero) identifier counts as
//! unset.

use crate::model::{Id, ResourceType, UserResourceMapping, UserType};

/// Predicate over [`UserResourceMapping`] records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MappingFilter {
    pub user_id: Option<Id>,
    pub resource_id: Option<Id>,
    pub user_type: Option<UserType>,
    pub resource_type: Option<ResourceType>,
}

impl MappingFilter {
    /// A filter that matches every mapping.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user_id: impl Into<Id>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_resource(mut self, resource_id: impl Into<Id>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn with_user_type(mut self, user_type: UserType) -> Self {
        self.user_type = Some(user_type);
        self
    }

    pub fn with_resource_type(mut self, resource_type: ResourceType) -> Self {
        self.resource_type = Some(resource_type);
        self
    }

    /// Returns `true` if `mapping` satisfies every specified field.
    pub fn matches(&self, mapping: &UserResourceMapping) -> bool {
        id_matches(self.user_id, mapping.user_id)
            && id_matches(self.resource_id, mapping.resource_id)
            && self.user_type.map_or(true, |t| t == mapping.user_type)
            && self.resource_type.map_or(true, |t| t == mapping.resource_type)
    }
}

fn id_matches(expected: Option<Id>, actual: Id) -> bool {
    match expected {
        Some(id) if id.is_valid() => id == actual,
        _ => true,
    }
}

/// Input to deep resolution: everything of `resource_type` that `user_id`
/// can reach directly or through organization membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeepMappingFilter {
    pub user_id: Id,
    pub resource_type: ResourceType,
}

impl DeepMappingFilter {
    pub fn new(user_id: impl Into<Id>, resource_type: ResourceType) -> Self {
        Self {
            user_id: user_id.into(),
            resource_type,
        }
    }
}
