//! Traits for the scans needed by the resolver.

use crate::error::DomainResult;
use crate::filter::MappingFilter;
use crate::model::UserResourceMapping;

/// Filtered scan over the mapping namespace.
///
/// Synchronous so that every scan of one resolution can run inside the same
/// read transaction.
pub trait MappingScan {
    /// Returns every mapping matching `filter`, in key order.
    fn scan(&self, filter: &MappingFilter) -> DomainResult<Vec<UserResourceMapping>>;
}

impl<S: MappingScan + ?Sized> MappingScan for &S {
    fn scan(&self, filter: &MappingFilter) -> DomainResult<Vec<UserResourceMapping>> {
        (**self).scan(filter)
    }
}
