use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::{Role, User};

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_jwt_secret: self.jwt_secret.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
    pub owner_id: Option<String>,
    pub branch_id: Option<String>,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "owner@example.com".to_string(),
            role: "admin".to_string(),
            owner_id: None,
            branch_id: None,
        }
    }
}

impl TestUser {
    pub fn admin(email: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: "admin".to_string(),
            owner_id: None,
            branch_id: None,
        }
    }

    pub fn receptionist(email: &str, owner_id: &str, branch_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: "receptionist".to_string(),
            owner_id: Some(owner_id.to_string()),
            branch_id: Some(branch_id.to_string()),
        }
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Role::parse(&self.role).expect("test role must be valid"),
            owner_id: self.owner_id.clone().unwrap_or_else(|| self.id.clone()),
            branch_id: self.branch_id.clone(),
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "owner_id": user.owner_id,
            "branch_id": user.branch_id,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}

/// Canned PostgREST rows for wiremock-backed integration tests.
pub struct MockSupabaseRows;

impl MockSupabaseRows {
    pub fn branch_row(owner_id: &str, branch_id: &str) -> serde_json::Value {
        json!({
            "id": branch_id,
            "owner_id": owner_id,
            "name": "Downtown Salon",
            "address": "12 Main Street",
            "phone": "+353-1-555-0100",
            "opening_time": "9:00 AM",
            "closing_time": "9:00 PM",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn staff_row(owner_id: &str, branch_id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "owner_id": owner_id,
            "branch_id": branch_id,
            "name": name,
            "title": "Stylist",
            "working_days": ["Mon", "Tue", "Wed", "Thu", "Fri"],
            "working_hours": { "start": "9:00 AM", "end": "6:00 PM" },
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn service_row(owner_id: &str, name: &str, duration: &str, price: f64) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "owner_id": owner_id,
            "category": "Hair",
            "name": name,
            "duration": duration,
            "price": price,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn appointment_row(
        owner_id: &str,
        branch_id: &str,
        staff: &str,
        date: &str,
        time: &str,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "owner_id": owner_id,
            "branch_id": branch_id,
            "customer_name": "Jamie Doe",
            "email": "jamie@example.com",
            "phone": "+353-86-555-0101",
            "category": "Hair",
            "service": "Haircut",
            "staff": staff,
            "date": date,
            "time": time,
            "notes": null,
            "price": 45.0,
            "status": status,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn expense_row(owner_id: &str, branch_id: &str, category: &str, amount: f64, date: &str) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "owner_id": owner_id,
            "branch_id": branch_id,
            "title": "Supplies restock",
            "category": category,
            "amount": amount,
            "date": date,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::default();
        let app_config = config.to_app_config();

        assert_eq!(app_config.supabase_url, "http://localhost:54321");
        assert_eq!(app_config.supabase_anon_key, "test-anon-key");
        assert!(!app_config.supabase_jwt_secret.is_empty());
    }

    #[test]
    fn test_user_creation() {
        let user = TestUser::receptionist("front@example.com", "owner-1", "branch-1");
        assert_eq!(user.role, "receptionist");

        let user_model = user.to_user();
        assert_eq!(user_model.role, Role::Receptionist);
        assert_eq!(user_model.owner_id, "owner-1");
        assert_eq!(user_model.branch_id.as_deref(), Some("branch-1"));
    }

    #[test]
    fn test_jwt_token_creation() {
        let user = TestUser::default();
        let secret = "test-secret";
        let token = JwtTestUtils::create_test_token(&user, secret, Some(1));

        assert!(token.contains('.'));
        assert_eq!(token.split('.').count(), 3);
    }
}
