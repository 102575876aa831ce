//! Unit tests for the allocation engine

#[cfg(test)]
mod tests {
    use crate::allocation::*;
    use crate::prefix::NetworkPrefix;
    use std::collections::HashSet;
    use std::net::IpAddr;

    fn prefix(s: &str) -> NetworkPrefix {
        NetworkPrefix::parse(s).unwrap()
    }

    fn addrs(list: &[&str]) -> HashSet<IpAddr> {
        list.iter().map(|a| a.parse().unwrap()).collect()
    }

    #[test]
    fn test_allocate_first_free_after_assigned() {
        let result = allocate(&prefix("10.0.0.0/29"), &addrs(&["10.0.0.1", "10.0.0.2"]), 0);
        assert_eq!(result.total, 8);
        assert_eq!(result.available, 6);
        assert_eq!(result.next, NextAddress::Available("10.0.0.3".parse().unwrap()));
    }

    #[test]
    fn test_allocate_skip_leaves_last_host() {
        let result = allocate(&prefix("10.0.0.0/29"), &HashSet::new(), 5);
        assert_eq!(result.next, NextAddress::Available("10.0.0.6".parse().unwrap()));
        assert_eq!(result.available, 8);
    }

    #[test]
    fn test_allocate_exhausted_prefix_returns_sentinel() {
        let all = addrs(&["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.4", "10.0.0.5", "10.0.0.6"]);
        let result = allocate(&prefix("10.0.0.0/29"), &all, 5);
        assert_eq!(result.next, NextAddress::NoneAvailable);
        assert_eq!(result.next.to_string(), "None available");
        assert_eq!(result.available, 2);
    }

    #[test]
    fn test_allocate_skip_past_end() {
        let assigned = addrs(&["10.0.0.1"]);
        for skip in [6, 7, 1000] {
            let result = allocate(&prefix("10.0.0.0/29"), &assigned, skip);
            assert!(result.next.is_exhausted(), "skip {skip}");
            assert_eq!(result.available, 7, "skip must not affect available");
        }
    }

    #[test]
    fn test_skip_ignores_assignment_of_skipped_hosts() {
        // .2 is free but inside the skipped range, .3 is the first candidate
        let result = allocate(&prefix("10.0.0.0/29"), &addrs(&["10.0.0.1"]), 2);
        assert_eq!(result.next.address(), Some("10.0.0.3".parse().unwrap()));
    }

    #[test]
    fn test_available_is_independent_of_skip() {
        let p = prefix("192.168.10.0/28");
        let assigned = addrs(&["192.168.10.1", "192.168.10.4", "192.168.10.9", "192.168.10.14"]);
        let baseline = allocate(&p, &assigned, 0).available;
        for skip in 0..20 {
            assert_eq!(allocate(&p, &assigned, skip).available, baseline);
        }
        assert_eq!(baseline, 16 - 4);
    }

    #[test]
    fn test_addresses_outside_prefix_are_not_counted() {
        let assigned = addrs(&["10.0.0.1", "10.0.1.1", "192.168.0.1", "2001:db8::1"]);
        let result = allocate(&prefix("10.0.0.0/29"), &assigned, 0);
        assert_eq!(result.available, 7);
        assert_eq!(result.next.address(), Some("10.0.0.2".parse().unwrap()));
    }

    #[test]
    fn test_network_and_broadcast_assignments_count_toward_utilization() {
        let assigned = addrs(&["10.0.0.0", "10.0.0.7"]);
        let result = allocate(&prefix("10.0.0.0/29"), &assigned, 0);
        assert_eq!(result.available, 6);
        assert_eq!(result.next.address(), Some("10.0.0.1".parse().unwrap()));
    }

    #[test]
    fn test_allocate_slash_31_and_slash_32() {
        let result = allocate(&prefix("10.0.0.0/31"), &addrs(&["10.0.0.0"]), 0);
        assert_eq!(result.next.address(), Some("10.0.0.1".parse().unwrap()));

        let result = allocate(&prefix("10.0.0.9/32"), &HashSet::new(), 0);
        assert_eq!(result.next.address(), Some("10.0.0.9".parse().unwrap()));
        assert_eq!(result.total, 1);

        let result = allocate(&prefix("10.0.0.9/32"), &HashSet::new(), 1);
        assert!(result.next.is_exhausted());
    }

    #[test]
    fn test_allocate_ipv6() {
        let result = allocate(&prefix("2001:db8::/120"), &addrs(&["2001:db8::1", "2001:db8::2"]), 0);
        assert_eq!(result.total, 256);
        assert_eq!(result.available, 254);
        assert_eq!(result.next.address(), Some("2001:db8::3".parse().unwrap()));
    }

    #[test]
    fn test_allocate_large_ipv6_prefix_stays_cheap() {
        let result = allocate(&prefix("2001:db8::/32"), &HashSet::new(), 1_000_000);
        assert_eq!(result.next.address(), Some("2001:db8::f:4241".parse().unwrap()));
    }

    #[test]
    fn test_allocate_is_idempotent() {
        let p = prefix("10.20.0.0/24");
        let assigned = addrs(&["10.20.0.1", "10.20.0.2", "10.20.0.3"]);
        let first = allocate(&p, &assigned, 1);
        let second = allocate(&p, &assigned, 1);
        assert_eq!(first, second);
        assert_eq!(assigned.len(), 3);
    }

    #[test]
    fn test_empty_assigned_set() {
        let result = allocate(&prefix("172.16.0.0/30"), &HashSet::new(), 0);
        assert_eq!(result.total, 4);
        assert_eq!(result.available, 4);
        assert_eq!(result.next.address(), Some("172.16.0.1".parse().unwrap()));
    }

    #[test]
    fn test_query_runs_allocate() {
        let p = prefix("10.0.0.0/29");
        let assigned = addrs(&["10.0.0.3"]);
        let query = AllocationQuery {
            prefix: &p,
            assigned: &assigned,
            skip_count: 2,
        };
        assert_eq!(query.run(), allocate(&p, &assigned, 2));
        assert_eq!(query.run().next.address(), Some("10.0.0.4".parse().unwrap()));
    }

    #[test]
    fn test_result_serializes_sentinel_explicitly() {
        let result = allocate(&prefix("10.0.0.0/32"), &addrs(&["10.0.0.0"]), 0);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["prefix"], "10.0.0.0/32");
        assert_eq!(json["next"]["kind"], "none_available");
    }
}
