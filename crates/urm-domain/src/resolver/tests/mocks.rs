//! Mock implementations for resolver testing.

use std::cell::RefCell;

use crate::error::{DomainError, DomainResult};
use crate::filter::MappingFilter;
use crate::model::{Id, ResourceType, UserResourceMapping, UserType};
use crate::resolver::MappingScan;

/// In-memory scanner that records every filter it is asked for.
#[derive(Default)]
pub struct MockScanner {
    mappings: Vec<UserResourceMapping>,
    calls: RefCell<Vec<MappingFilter>>,
    /// Fail the scan with this 0-based index.
    fail_on_call: Option<usize>,
}

impl MockScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, user: u64, resource: u64, resource_type: ResourceType) -> Self {
        self.mappings.push(UserResourceMapping::new(
            user,
            UserType::Member,
            resource,
            resource_type,
        ));
        self
    }

    pub fn failing_on(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    pub fn calls(&self) -> Vec<MappingFilter> {
        self.calls.borrow().clone()
    }
}

impl MappingScan for MockScanner {
    fn scan(&self, filter: &MappingFilter) -> DomainResult<Vec<UserResourceMapping>> {
        let call = self.calls.borrow().len();
        self.calls.borrow_mut().push(*filter);

        if self.fail_on_call == Some(call) {
            return Err(DomainError::Corruption {
                key: format!("scan-{call}"),
                resource_id: None,
                user_id: None,
                message: "injected failure".to_string(),
            });
        }

        Ok(self
            .mappings
            .iter()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect())
    }
}

/// Resource ids of `mappings`, in order.
pub fn resource_ids(mappings: &[UserResourceMapping]) -> Vec<Id> {
    mappings.iter().map(|m| m.resource_id).collect()
}
