//! Integration tests for NetBox client
//!
//! These tests require a running NetBox instance.
//! Set NETBOX_URL and NETBOX_TOKEN environment variables to run.

use netbox_client::NetBoxClient;

fn client() -> NetBoxClient {
    let url = std::env::var("NETBOX_URL")
        .unwrap_or_else(|_| "http://localhost:8001".to_string());
    let token = std::env::var("NETBOX_TOKEN")
        .expect("NETBOX_TOKEN environment variable must be set");

    NetBoxClient::new(url, token).expect("Failed to create client")
}

#[tokio::test]
#[ignore] // Requires running NetBox instance
async fn test_validate_token() {
    client().validate_token().await.expect("Token should be accepted");
}

#[tokio::test]
#[ignore]
async fn test_query_vrfs() {
    let vrfs = client().query_vrfs(&[], true).await
        .expect("Failed to query VRFs");

    println!("Found {} VRFs", vrfs.len());
}

#[tokio::test]
#[ignore]
async fn test_prefixes_of_each_vrf_parse() {
    let client = client();
    let vrfs = client.query_vrfs(&[], true).await
        .expect("Failed to query VRFs");

    for vrf in vrfs {
        let vrf_id = vrf.id.to_string();
        let prefixes = client.query_prefixes(&[("vrf_id", vrf_id.as_str())], true).await
            .expect("Failed to query prefixes");
        for prefix in prefixes {
            assert!(prefix.prefix.parse::<ipnet::IpNet>().is_ok(), "bad prefix {}", prefix.prefix);
            assert_eq!(prefix.vrf.as_ref().map(|v| v.id), Some(vrf.id));
        }
    }
}

#[tokio::test]
#[ignore]
async fn test_query_ip_addresses_by_parent() {
    let client = client();
    let prefixes = client.query_prefixes(&[], false).await
        .expect("Failed to query prefixes");

    if let Some(prefix) = prefixes.first() {
        let net: ipnet::IpNet = prefix.prefix.parse().expect("NetBox prefix");
        let ips = client.query_ip_addresses(&[("parent", prefix.prefix.as_str())], true).await
            .expect("Failed to query IP addresses");
        for ip in ips {
            let host: ipnet::IpNet = ip.address.parse().expect("NetBox address");
            assert!(net.contains(&host.addr()), "{} outside {}", ip.address, prefix.prefix);
        }
    }
}

#[tokio::test]
#[ignore]
async fn test_query_virtual_machines() {
    let vms = client().query_virtual_machines(&[], true).await
        .expect("Failed to query virtual machines");

    println!("Found {} virtual machines", vms.len());
}
