//! Property-based tests for binding assembly and filter widening

use kafka_acl::security::acl::{
    filter_from_parts, to_filter, widen_filter, AclEntry, AclOperation, BindingAssembler, BindingRequest,
    PatternType, PermissionType, ResourcePattern, ResourceSelector, ResourceType,
};
use kafka_acl::security::auth::{DirectoryEntry, DirectorySnapshot, PrincipalResolver};
use kafka_acl::ValidationError;
use proptest::prelude::*;

fn operation() -> impl Strategy<Value = AclOperation> {
    prop::sample::select(AclOperation::CONCRETE.to_vec())
}

fn resource_type() -> impl Strategy<Value = ResourceType> {
    prop::sample::select(vec![
        ResourceType::Unknown,
        ResourceType::Any,
        ResourceType::Cluster,
        ResourceType::Topic,
        ResourceType::Group,
        ResourceType::TransactionalId,
    ])
}

fn pattern_type() -> impl Strategy<Value = PatternType> {
    prop::sample::select(vec![
        PatternType::Unknown,
        PatternType::Any,
        PatternType::Literal,
        PatternType::Prefixed,
    ])
}

fn permission_type() -> impl Strategy<Value = PermissionType> {
    prop::sample::select(vec![
        PermissionType::Unknown,
        PermissionType::Any,
        PermissionType::Allow,
        PermissionType::Deny,
    ])
}

fn all_operations() -> impl Strategy<Value = AclOperation> {
    prop::sample::select(vec![
        AclOperation::Unknown,
        AclOperation::Any,
        AclOperation::Read,
        AclOperation::Write,
        AclOperation::ClusterAction,
    ])
}

fn selector(flags: [bool; 4], name: &str) -> ResourceSelector {
    ResourceSelector {
        cluster_scope: flags[0],
        topic: flags[1].then(|| name.to_string()),
        consumer_group: flags[2].then(|| name.to_string()),
        transactional_id: flags[3].then(|| name.to_string()),
        prefix: false,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn test_selector_requires_exactly_one(flags in any::<[bool; 4]>(), name in "[a-z]{1,12}") {
        let selector = selector(flags, &name);
        let set = flags.iter().filter(|&&f| f).count();

        match selector.select() {
            Ok(_) => prop_assert_eq!(set, 1),
            Err(e) => {
                prop_assert_ne!(set, 1);
                prop_assert_eq!(e, ValidationError::ResourceSelector);
            }
        }
    }

    #[test]
    fn test_one_binding_per_operation(
        operations in prop::collection::vec(operation(), 1..8),
        name in "[a-z][a-z0-9-]{0,20}",
    ) {
        let snapshot = DirectorySnapshot::from_entries(vec![DirectoryEntry::new(7, "sa-7")]);
        let assembler = BindingAssembler::new(PrincipalResolver::new(&snapshot));

        let request = BindingRequest {
            resource: ResourceSelector::topic(name.clone()),
            allow: true,
            service_account: Some("sa-7".to_string()),
            operations: vec![operations.iter().map(|op| op.to_string()).collect::<Vec<_>>().join(",")],
            ..BindingRequest::default()
        };

        let bindings = assembler.bindings(&request).unwrap();

        prop_assert_eq!(bindings.len(), operations.len());
        for (binding, op) in bindings.iter().zip(&operations) {
            prop_assert_eq!(binding.entry.operation, *op);
            prop_assert_eq!(&binding.entry.principal, "User:7");
            prop_assert_eq!(binding.entry.host.as_str(), "*");
            prop_assert_eq!(&binding.pattern, &ResourcePattern::topic(name.clone()));
        }
    }

    #[test]
    fn test_widening_is_idempotent(
        resource_type in resource_type(),
        pattern_type in pattern_type(),
        name in "[a-z*]{0,8}",
        permission_type in permission_type(),
        operation in all_operations(),
        host in "[0-9.*]{0,15}",
    ) {
        let entry = AclEntry {
            principal: "User:1".to_string(),
            permission_type,
            operation,
            host,
        };
        let once = filter_from_parts(Some(ResourcePattern::new(resource_type, name, pattern_type)), Some(entry));
        let twice = widen_filter(once.clone());

        prop_assert_eq!(&twice, &once);
        prop_assert_ne!(once.pattern_filter.resource_type, ResourceType::Unknown);
        prop_assert_ne!(once.pattern_filter.pattern_type, PatternType::Unknown);
        prop_assert_ne!(once.entry_filter.permission_type, PermissionType::Unknown);
        prop_assert_ne!(once.entry_filter.operation, AclOperation::Unknown);
        prop_assert_eq!(once.entry_filter.host.as_str(), "*");
    }

    #[test]
    fn test_binding_matches_own_filter(operation in operation(), name in "[a-z]{1,12}", deny in any::<bool>()) {
        let snapshot = DirectorySnapshot::from_entries(vec![DirectoryEntry::new(3, "sa-3")]);
        let assembler = BindingAssembler::new(PrincipalResolver::new(&snapshot));

        let request = BindingRequest {
            resource: ResourceSelector::consumer_group(name),
            allow: !deny,
            deny,
            service_account: Some("sa-3".to_string()),
            operations: vec![operation.to_string()],
            ..BindingRequest::default()
        };

        for binding in assembler.bindings(&request).unwrap() {
            prop_assert!(to_filter(binding.clone()).matches(&binding));
        }
    }
}
