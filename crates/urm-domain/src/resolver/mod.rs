//! Deep (transitive) mapping resolution.
//!
//! Expands a user's direct mappings with the mappings held by every
//! organization the user belongs to:
//!
//! ```text
//! D = scan(user_id = user, resource_type = target)
//! O = scan(user_id = user, resource_type = orgs)
//! for o in O: D += scan(user_id = o.resource_id, resource_type = target)
//! ```
//!
//! The closure is fixed at two levels and takes `2 + |O|` scans. Results are
//! not deduplicated: a resource reachable both directly and through an
//! organization is returned once per path. Any scan error aborts the whole
//! resolution.

mod traits;

#[cfg(test)]
mod tests;

pub use traits::MappingScan;

use tracing::debug;

use crate::error::{DomainError, DomainResult};
use crate::filter::{DeepMappingFilter, MappingFilter};
use crate::model::{ResourceType, UserResourceMapping};

/// Resolves direct and organization-inherited mappings over a scanner.
#[derive(Debug, Clone)]
pub struct DeepResolver<S> {
    scanner: S,
}

impl<S: MappingScan> DeepResolver<S> {
    pub fn new(scanner: S) -> Self {
        Self { scanner }
    }

    /// Returns the direct mappings followed by the inherited ones, grouped
    /// by organization in scan order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the filter's user id is invalid;
    /// an unset user would otherwise match every mapping.
    pub fn resolve(&self, filter: &DeepMappingFilter) -> DomainResult<Vec<UserResourceMapping>> {
        if !filter.user_id.is_valid() {
            return Err(DomainError::Validation {
                message: "deep resolution requires a valid user id".to_string(),
            });
        }

        let mut mappings = self.scanner.scan(
            &MappingFilter::new()
                .with_user(filter.user_id)
                .with_resource_type(filter.resource_type),
        )?;
        let direct = mappings.len();

        let memberships = self.scanner.scan(
            &MappingFilter::new()
                .with_user(filter.user_id)
                .with_resource_type(ResourceType::Orgs),
        )?;

        for membership in &memberships {
            let inherited = self.scanner.scan(
                &MappingFilter::new()
                    .with_user(membership.resource_id)
                    .with_resource_type(filter.resource_type),
            )?;
            mappings.extend(inherited);
        }

        debug!(
            user_id = %filter.user_id,
            resource_type = %filter.resource_type,
            direct,
            orgs = memberships.len(),
            total = mappings.len(),
            "resolved deep mappings"
        );
        Ok(mappings)
    }
}
