//! Async service boundary for mapping operations.

use async_trait::async_trait;
use urm_storage::HealthStatus;

use crate::error::{DomainError, DomainResult};
use crate::filter::{DeepMappingFilter, MappingFilter};
use crate::model::{Id, UserResourceMapping};

/// Page size used when `PaginationOptions::page_size` is unset.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Pagination options for list operations.
#[derive(Debug, Clone, Default)]
pub struct PaginationOptions {
    /// Maximum number of items to return.
    pub page_size: Option<u32>,
    /// Token from a previous page, to continue after it.
    pub continuation_token: Option<String>,
}

/// One page of results.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    /// Present when more items follow this page.
    pub continuation_token: Option<String>,
}

/// Parses a continuation token into a scan offset.
///
/// Tokens are plain offsets into the key-ordered result, so they are only
/// stable while the namespace is not modified between pages.
pub fn parse_continuation_token(token: &Option<String>) -> DomainResult<usize> {
    match token.as_deref() {
        None | Some("") => Ok(0),
        Some(token) => token.parse().map_err(|_| DomainError::Validation {
            message: format!("invalid continuation token: {token}"),
        }),
    }
}

/// Resolves the effective page size, rejecting zero.
pub fn resolve_page_size(page_size: Option<u32>) -> DomainResult<usize> {
    match page_size.unwrap_or(DEFAULT_PAGE_SIZE) {
        0 => Err(DomainError::Validation {
            message: "page_size must be greater than 0".to_string(),
        }),
        n => Ok(n as usize),
    }
}

/// Mapping operations consumed by the rest of the platform.
///
/// Every operation runs inside a single engine transaction.
#[async_trait]
pub trait MappingService: Send + Sync + 'static {
    /// Creates a mapping; `Conflict` if one exists for the same pair.
    async fn create_mapping(&self, mapping: &UserResourceMapping) -> DomainResult<()>;

    /// Fetches the mapping for a `(resource_id, user_id)` pair.
    async fn find_mapping(&self, resource_id: Id, user_id: Id)
        -> DomainResult<UserResourceMapping>;

    /// Returns every mapping matching `filter`, and how many there are.
    async fn find_mappings(
        &self,
        filter: &MappingFilter,
    ) -> DomainResult<(Vec<UserResourceMapping>, usize)>;

    /// Returns one page of the mappings matching `filter`.
    async fn find_mappings_paginated(
        &self,
        filter: &MappingFilter,
        pagination: &PaginationOptions,
    ) -> DomainResult<PaginatedResult<UserResourceMapping>>;

    /// Returns direct and organization-inherited mappings for a user.
    async fn find_deep_mappings(
        &self,
        filter: &DeepMappingFilter,
    ) -> DomainResult<(Vec<UserResourceMapping>, usize)>;

    /// Deletes the mapping for a pair; `NotFound` if there is none.
    async fn delete_mapping(&self, resource_id: Id, user_id: Id) -> DomainResult<()>;

    async fn health_check(&self) -> DomainResult<HealthStatus>;
}
