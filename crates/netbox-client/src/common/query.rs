//! Query utilities for NetBox API
//!
//! Endpoint-level helpers shared by every resource type: list with filters
//! (optionally walking every page) and fetch by ID.

use crate::common::{HttpClient, PaginatedResponse};
use crate::error::NetBoxError;
use serde::Deserialize;

/// Query resources with optional filtering and pagination
///
/// `endpoint` is the path below `/api/`, e.g. `ipam/prefixes`.
pub async fn query_resources<T: for<'de> Deserialize<'de>>(
    http: &HttpClient,
    endpoint: &str,
    filters: &[(&str, &str)],
    fetch_all: bool,
) -> Result<Vec<T>, NetBoxError> {
    let url = list_path(http, endpoint, filters);

    if fetch_all {
        http.fetch_all_pages(http.build_url(&url)).await
    } else {
        let response: PaginatedResponse<T> = http.get(&url).await?;
        Ok(response.results)
    }
}

/// Fetch a single resource by ID
pub async fn get_resource<T: for<'de> Deserialize<'de>>(
    http: &HttpClient,
    endpoint: &str,
    id: u64,
) -> Result<T, NetBoxError> {
    http.get(&format!("/api/{}/{}/", endpoint, id)).await
}

fn list_path(http: &HttpClient, endpoint: &str, filters: &[(&str, &str)]) -> String {
    let base = format!("/api/{}/", endpoint);
    if filters.is_empty() {
        base
    } else {
        format!("{}?{}", base, http.build_query_string(filters))
    }
}
