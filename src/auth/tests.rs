//! Tests for auth module
//!
//! These tests verify the collaborator boundary:
//! - Role row projection (well-formed, malformed, array relations)
//! - Session expiry
//! - In-memory backend behaviour

#[cfg(test)]
mod tests {
    use super::super::*;
    use chrono::{Duration, Utc};
    use serde_json::json;

    #[test]
    fn test_project_role_names_keeps_order_and_dedups() {
        let rows = vec![
            json!({"roles": {"name": "mentor"}}),
            json!({"roles": {"name": "admin"}}),
            json!({"roles": {"name": "mentor"}}),
        ];

        let roles = project_role_names("user-1", rows);
        assert_eq!(roles, vec![Role::from("mentor"), Role::from("admin")]);
    }

    #[test]
    fn test_project_role_names_skips_malformed_rows() {
        let rows = vec![
            json!({"roles": null}),
            json!({"roles": {"title": "admin"}}),
            json!("admin"),
            json!({"roles": {"name": "  "}}),
            json!({"roles": {"name": "instructor"}}),
        ];

        let roles = project_role_names("user-1", rows);
        assert_eq!(roles, vec![Role::from("instructor")]);
    }

    #[test]
    fn test_project_role_names_accepts_array_relation() {
        let rows = vec![json!({"roles": [{"name": "admin"}, {"name": "freelancer"}]})];

        let roles = project_role_names("user-1", rows);
        assert_eq!(roles, vec![Role::from("admin"), Role::from("freelancer")]);
    }

    #[test]
    fn test_session_expiry() {
        let mut session = Session::new("token", "user-1");
        assert!(!session.is_expired());

        session.expires_at = Some(Utc::now() - Duration::seconds(1));
        assert!(session.is_expired());

        session.expires_at = Some(Utc::now() + Duration::hours(1));
        assert!(!session.is_expired());
    }

    #[test]
    fn test_role_serializes_as_plain_string() {
        let role = Role::from(models::ROLE_ADMIN);
        assert_eq!(serde_json::to_value(&role).unwrap(), json!("admin"));
        assert_eq!(role.to_string(), "admin");
    }

    #[tokio::test]
    async fn test_in_memory_backend_roundtrip() {
        let backend = InMemoryAuthBackend::new();
        assert!(backend.get_session().await.unwrap().is_none());

        backend.sign_in("user-1", Some("ada@example.com")).await;
        backend.set_roles("user-1", &["instructor"]).await;

        let session = backend.get_session().await.unwrap().unwrap();
        assert_eq!(session.user_id, "user-1");

        let roles = backend.query_role_names("user-1").await.unwrap();
        assert_eq!(roles, vec![Role::from("instructor")]);
        assert_eq!(backend.role_query_count(), 1);

        backend.fail_role_queries(true);
        assert!(backend.query_role_names("user-1").await.is_err());

        backend.sign_out().await;
        assert!(backend.get_user().await.unwrap().is_none());
    }
}
