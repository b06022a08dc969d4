//! Catalog API
//!
//! Read-only lookups for form pickers. No simulated delay.

use crate::domain::catalog::{self, Permission, Tag};
use crate::Result;

use super::ApiResponse;

/// Tag catalog for task labels
pub async fn get_task_tags() -> Result<ApiResponse<Vec<Tag>>> {
    Ok(ApiResponse::ok(catalog::TAGS.to_vec()))
}

/// Permissions that can be granted to a role
pub async fn get_available_permissions() -> Result<ApiResponse<Vec<Permission>>> {
    Ok(ApiResponse::ok(catalog::PERMISSIONS.to_vec()))
}

/// Department names
pub async fn get_departments() -> Result<ApiResponse<Vec<String>>> {
    Ok(ApiResponse::ok(
        catalog::DEPARTMENTS.iter().map(|d| d.to_string()).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_catalogs() {
        assert_eq!(get_task_tags().await.unwrap().data.len(), 8);
        let permissions = get_available_permissions().await.unwrap().data;
        assert!(permissions.iter().any(|p| p.id == "roles.manage"));
        let departments = get_departments().await.unwrap().data;
        assert_eq!(departments.first().map(String::as_str), Some("Engineering"));
    }
}
