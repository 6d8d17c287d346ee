//! Deep resolver test suite.

use super::mocks::{resource_ids, MockScanner};
use crate::error::DomainError;
use crate::filter::{DeepMappingFilter, MappingFilter};
use crate::model::{Id, ResourceType};
use crate::resolver::DeepResolver;

const USER: u64 = 0x100;
const ORG_A: u64 = 0x200;
const ORG_B: u64 = 0x300;

fn buckets_of(user: u64) -> DeepMappingFilter {
    DeepMappingFilter::new(user, ResourceType::Buckets)
}

// ========== Section 1: Direct and Inherited Mappings ==========

#[test]
fn test_direct_and_inherited_mappings_are_combined() {
    let scanner = MockScanner::new()
        .with(USER, 0xb1, ResourceType::Buckets)
        .with(USER, ORG_A, ResourceType::Orgs)
        .with(ORG_A, 0xb2, ResourceType::Buckets);

    let result = DeepResolver::new(&scanner).resolve(&buckets_of(USER)).unwrap();

    assert_eq!(resource_ids(&result), vec![Id::new(0xb1), Id::new(0xb2)]);
}

#[test]
fn test_inherited_mappings_keep_the_organization_as_user() {
    let scanner = MockScanner::new()
        .with(USER, ORG_A, ResourceType::Orgs)
        .with(ORG_A, 0xb2, ResourceType::Buckets);

    let result = DeepResolver::new(&scanner).resolve(&buckets_of(USER)).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].user_id, Id::new(ORG_A));
}

#[test]
fn test_other_resource_types_are_ignored() {
    let scanner = MockScanner::new()
        .with(USER, 0xd1, ResourceType::Dashboards)
        .with(USER, ORG_A, ResourceType::Orgs)
        .with(ORG_A, 0xd2, ResourceType::Dashboards)
        .with(ORG_A, 0xb2, ResourceType::Buckets);

    let result = DeepResolver::new(&scanner).resolve(&buckets_of(USER)).unwrap();

    assert_eq!(resource_ids(&result), vec![Id::new(0xb2)]);
}

#[test]
fn test_other_users_are_ignored() {
    let scanner = MockScanner::new()
        .with(0x999, 0xb9, ResourceType::Buckets)
        .with(0x999, ORG_B, ResourceType::Orgs)
        .with(ORG_B, 0xb8, ResourceType::Buckets);

    let result = DeepResolver::new(&scanner).resolve(&buckets_of(USER)).unwrap();

    assert!(result.is_empty());
}

#[test]
fn test_empty_store_resolves_to_nothing() {
    let scanner = MockScanner::new();
    let result = DeepResolver::new(&scanner).resolve(&buckets_of(USER)).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_closure_stops_after_one_organization_hop() {
    // ORG_A is itself a member of ORG_B; ORG_B's buckets are out of reach.
    let scanner = MockScanner::new()
        .with(USER, ORG_A, ResourceType::Orgs)
        .with(ORG_A, ORG_B, ResourceType::Orgs)
        .with(ORG_B, 0xb3, ResourceType::Buckets);

    let result = DeepResolver::new(&scanner).resolve(&buckets_of(USER)).unwrap();

    assert!(result.is_empty());
}

// ========== Section 2: Ordering and Duplication ==========

#[test]
fn test_resource_reachable_twice_is_returned_twice() {
    let scanner = MockScanner::new()
        .with(USER, 0xb1, ResourceType::Buckets)
        .with(USER, ORG_A, ResourceType::Orgs)
        .with(ORG_A, 0xb1, ResourceType::Buckets);

    let result = DeepResolver::new(&scanner).resolve(&buckets_of(USER)).unwrap();

    assert_eq!(resource_ids(&result), vec![Id::new(0xb1), Id::new(0xb1)]);
}

#[test]
fn test_direct_results_come_before_inherited_results() {
    let scanner = MockScanner::new()
        .with(ORG_A, 0xb1, ResourceType::Buckets)
        .with(USER, ORG_A, ResourceType::Orgs)
        .with(USER, ORG_B, ResourceType::Orgs)
        .with(ORG_B, 0xb2, ResourceType::Buckets)
        .with(USER, 0xb9, ResourceType::Buckets);

    let result = DeepResolver::new(&scanner).resolve(&buckets_of(USER)).unwrap();

    assert_eq!(
        resource_ids(&result),
        vec![Id::new(0xb9), Id::new(0xb1), Id::new(0xb2)]
    );
}

#[test]
fn test_scan_sequence_is_direct_then_orgs_then_one_per_org() {
    let scanner = MockScanner::new()
        .with(USER, ORG_A, ResourceType::Orgs)
        .with(USER, ORG_B, ResourceType::Orgs);

    DeepResolver::new(&scanner).resolve(&buckets_of(USER)).unwrap();

    assert_eq!(
        scanner.calls(),
        vec![
            MappingFilter::new()
                .with_user(USER)
                .with_resource_type(ResourceType::Buckets),
            MappingFilter::new()
                .with_user(USER)
                .with_resource_type(ResourceType::Orgs),
            MappingFilter::new()
                .with_user(ORG_A)
                .with_resource_type(ResourceType::Buckets),
            MappingFilter::new()
                .with_user(ORG_B)
                .with_resource_type(ResourceType::Buckets),
        ]
    );
}

#[test]
fn test_resolving_orgs_lists_memberships_and_parent_orgs() {
    let scanner = MockScanner::new()
        .with(USER, ORG_A, ResourceType::Orgs)
        .with(ORG_A, ORG_B, ResourceType::Orgs);

    let result = DeepResolver::new(&scanner)
        .resolve(&DeepMappingFilter::new(USER, ResourceType::Orgs))
        .unwrap();

    assert_eq!(resource_ids(&result), vec![Id::new(ORG_A), Id::new(ORG_B)]);
}

// ========== Section 3: Error Propagation ==========

#[test]
fn test_invalid_user_is_rejected_before_scanning() {
    let scanner = MockScanner::new().with(USER, 0xb1, ResourceType::Buckets);

    let result = DeepResolver::new(&scanner).resolve(&buckets_of(0));

    assert!(matches!(result, Err(DomainError::Validation { .. })));
    assert!(scanner.calls().is_empty());
}

#[test]
fn test_failure_in_any_scan_aborts_resolution() {
    for failing in 0..3 {
        let scanner = MockScanner::new()
            .with(USER, 0xb1, ResourceType::Buckets)
            .with(USER, ORG_A, ResourceType::Orgs)
            .with(ORG_A, 0xb2, ResourceType::Buckets)
            .failing_on(failing);

        let result = DeepResolver::new(&scanner).resolve(&buckets_of(USER));

        assert!(
            matches!(result, Err(DomainError::Corruption { .. })),
            "scan {failing} should abort resolution"
        );
        assert_eq!(scanner.calls().len(), failing + 1);
    }
}
