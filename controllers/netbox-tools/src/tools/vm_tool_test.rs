//! Unit tests for the VM address tool

#[cfg(test)]
mod tests {
    use crate::error::ToolsError;
    use crate::profile::ReservationProfile;
    use crate::test_utils::*;
    use crate::tools::vm_tool::*;
    use ipam_engine::NextAddress;
    use netbox_client::VM_INTERFACE_OBJECT_TYPE;

    const VM_SKIP: usize = 5;

    #[tokio::test]
    async fn test_suggestion_skips_first_five_hosts() {
        let (mock, inventory) = mock_inventory();
        seed_two_vrfs(&mock);
        let h = mock.helpers();
        mock.add_ip_address(h.ip_address(100, "10.0.0.6/32", Some((1, "primary"))));

        let report = suggest_vm_address(&inventory, 10, ReservationProfile::Vm.skip_count(), None).await.unwrap();
        assert_eq!(report.allocation.next, NextAddress::Available("10.0.0.7".parse().unwrap()));
        assert!(report.created.is_none());
        assert_eq!(mock.ip_addresses().len(), 1);
    }

    #[tokio::test]
    async fn test_apply_creates_host_address_in_prefix_vrf() {
        let (mock, inventory) = mock_inventory();
        seed_two_vrfs(&mock);
        mock.add_virtual_machine(mock.helpers().virtual_machine(30, "AB12CDE0042"));

        let report = suggest_vm_address(&inventory, 10, VM_SKIP, Some("AB12CDE0042")).await.unwrap();
        let created = report.created.unwrap();
        assert_eq!(created.address, "10.0.0.6/32");

        let stored = mock.ip_addresses();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].vrf.as_ref().map(|v| v.id), Some(1));
        assert_eq!(stored[0].description, "AB12CDE0042");
        assert_eq!(created.url, format!("http://netbox.test/ipam/ip-addresses/{}/", stored[0].id));
    }

    #[tokio::test]
    async fn test_apply_attaches_address_and_makes_it_primary() {
        let (mock, inventory) = mock_inventory();
        seed_two_vrfs(&mock);
        mock.add_virtual_machine(mock.helpers().virtual_machine(30, "web-01"));

        let created = suggest_vm_address(&inventory, 10, VM_SKIP, Some("web-01"))
            .await
            .unwrap()
            .created
            .unwrap();
        assert_eq!((created.vm_id, created.interface.as_str()), (30, "NIC-web-01"));

        let interfaces = mock.vm_interfaces();
        assert_eq!(interfaces.len(), 1);
        assert_eq!(interfaces[0].name, "NIC-web-01");
        assert_eq!(interfaces[0].virtual_machine.id, 30);

        let ip = &mock.ip_addresses()[0];
        assert_eq!(ip.assigned_object_type.as_deref(), Some(VM_INTERFACE_OBJECT_TYPE));
        assert_eq!(ip.assigned_object_id, Some(interfaces[0].id));

        let vm = &mock.virtual_machines()[0];
        assert_eq!(vm.primary_ip4.as_ref().map(|p| p.id), Some(ip.id));
        assert_eq!(vm.primary_ip4.as_ref().map(|p| p.address.as_str()), Some("10.0.0.6/32"));
    }

    #[tokio::test]
    async fn test_apply_reuses_existing_interface() {
        let (mock, inventory) = mock_inventory();
        seed_two_vrfs(&mock);
        let h = mock.helpers();
        mock.add_virtual_machine(h.virtual_machine(30, "web-01"));
        mock.add_vm_interface(h.vm_interface(40, "NIC-web-01", (30, "web-01")));

        suggest_vm_address(&inventory, 10, VM_SKIP, Some("web-01")).await.unwrap();
        suggest_vm_address(&inventory, 10, VM_SKIP, Some("web-01")).await.unwrap();

        assert_eq!(mock.vm_interfaces().len(), 1);
        let ips = mock.ip_addresses();
        assert_eq!(ips.iter().map(|ip| ip.address.as_str()).collect::<Vec<_>>(), vec!["10.0.0.6/32", "10.0.0.7/32"]);
        assert!(ips.iter().all(|ip| ip.assigned_object_id == Some(40)));

        // the latest address wins
        let vm = &mock.virtual_machines()[0];
        assert_eq!(vm.primary_ip4.as_ref().map(|p| p.id), Some(ips[1].id));
    }

    #[tokio::test]
    async fn test_apply_to_unknown_vm_writes_nothing() {
        let (mock, inventory) = mock_inventory();
        seed_two_vrfs(&mock);

        let err = suggest_vm_address(&inventory, 10, VM_SKIP, Some("ghost-01")).await.unwrap_err();
        assert!(matches!(err, ToolsError::VmNotFound(ref name) if name == "ghost-01"));
        assert!(mock.ip_addresses().is_empty());
        assert!(mock.vm_interfaces().is_empty());
    }

    #[tokio::test]
    async fn test_exhaustion_only_fails_on_apply() {
        let (mock, inventory) = mock_inventory();
        let h = mock.helpers();
        mock.add_prefix(h.prefix(1, "10.9.0.0/29", "active", None));

        let report = suggest_vm_address(&inventory, 1, 6, None).await.unwrap();
        assert!(report.allocation.next.is_exhausted());

        let err = suggest_vm_address(&inventory, 1, 6, Some("web-01")).await.unwrap_err();
        assert!(matches!(err, ToolsError::NoAvailableIPs(ref p) if p == "10.9.0.0/29"));
        assert!(mock.ip_addresses().is_empty());
    }
}
