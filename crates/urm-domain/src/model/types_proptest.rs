//! Property-based tests for model types.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::model::{Id, ResourceType, UserResourceMapping, UserType};

    fn valid_id() -> impl Strategy<Value = Id> {
        (1..=u64::MAX).prop_map(Id::new)
    }

    fn user_type() -> impl Strategy<Value = UserType> {
        prop_oneof![Just(UserType::Owner), Just(UserType::Member)]
    }

    fn resource_type() -> impl Strategy<Value = ResourceType> {
        proptest::sample::select(ResourceType::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn test_id_display_parse_roundtrip(id in valid_id()) {
            let text = id.to_string();
            prop_assert_eq!(text.len(), Id::ENCODED_LEN);
            prop_assert_eq!(text.parse::<Id>().unwrap(), id);
        }

        #[test]
        fn test_id_text_order_matches_value_order(a in valid_id(), b in valid_id()) {
            prop_assert_eq!(a.to_string().cmp(&b.to_string()), a.cmp(&b));
        }

        #[test]
        fn test_uppercase_hex_parses_to_same_id(id in valid_id()) {
            let upper = id.to_string().to_uppercase();
            prop_assert_eq!(upper.parse::<Id>().unwrap(), id);
        }

        #[test]
        fn test_mapping_json_roundtrip(
            user in valid_id(),
            kind in user_type(),
            resource in valid_id(),
            resource_kind in resource_type()
        ) {
            let mapping = UserResourceMapping::new(user, kind, resource, resource_kind);
            let bytes = serde_json::to_vec(&mapping).unwrap();
            let decoded: UserResourceMapping = serde_json::from_slice(&bytes).unwrap();
            prop_assert_eq!(decoded, mapping);
        }
    }
}
