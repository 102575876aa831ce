//! Unit tests for the prefix validator

#[cfg(test)]
mod tests {
    use crate::test_utils::*;
    use crate::tools::prefix_validator::*;
    use ipam_engine::{CollisionMode, NetworkPrefix, PrefixStatus};

    fn cidr(s: &str) -> NetworkPrefix {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_overlaps_split_by_status() {
        let (mock, inventory) = mock_inventory();
        seed_two_vrfs(&mock);

        let report = validate_vrfs(&inventory, 1, 2, CollisionMode::AccumulateAll).await.unwrap();
        assert_eq!(report.primary, "primary");
        assert_eq!(report.secondary, "secondary");
        assert!(!report.first_match);

        // The container prefix of the primary VRF is not checked
        assert_eq!(report.findings.len(), 2);

        let first = &report.findings[0];
        assert_eq!(first.prefix, cidr("10.0.0.0/24"));
        assert_eq!(labels(&first.reserved_overlaps), vec!["10.0.0.0/25 (Reserved)"]);
        assert_eq!(labels(&first.active_overlaps), vec!["10.0.0.128/25 (Active)"]);

        // Its only overlap is deprecated
        let second = &report.findings[1];
        assert_eq!(second.status, PrefixStatus::Reserved);
        assert!(!second.has_conflicts());
        assert_eq!(report.conflicts().count(), 1);
    }

    #[tokio::test]
    async fn test_first_match_mode() {
        let (mock, inventory) = mock_inventory();
        seed_two_vrfs(&mock);

        let report = validate_vrfs(&inventory, 1, 2, CollisionMode::FirstMatch).await.unwrap();
        assert!(report.first_match);
        let first = &report.findings[0];
        assert_eq!(labels(&first.reserved_overlaps), vec!["10.0.0.0/25 (Reserved)"]);
        assert!(first.active_overlaps.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_vrf_fails() {
        let (mock, inventory) = mock_inventory();
        seed_two_vrfs(&mock);
        assert!(validate_vrfs(&inventory, 1, 9, CollisionMode::AccumulateAll).await.is_err());
    }

    #[test]
    fn test_label_capitalizes_status() {
        assert_eq!(label(&cidr("10.0.0.0/25"), &PrefixStatus::Reserved), "10.0.0.0/25 (Reserved)");
        assert_eq!(
            label(&cidr("2001:db8::/64"), &PrefixStatus::Other("PLANNED".to_string())),
            "2001:db8::/64 (Planned)"
        );
    }
}
