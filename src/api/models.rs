//! Resource shapes returned by the storefront API.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Architect,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default = "active")]
    pub is_active: bool,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Architect {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Plan {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: f32,
    pub square_feet: u32,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub architect_id: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub categories: Option<Category>,
    #[serde(default)]
    pub architects: Option<Architect>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Review {
    pub id: String,
    pub plan_id: String,
    pub user_id: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReviewStats {
    pub total_reviews: u32,
    pub average_rating: f64,
    #[serde(default)]
    pub rating_distribution: HashMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CartItem {
    pub id: String,
    pub plan_id: String,
    pub quantity: u32,
    #[serde(default)]
    pub plans: Option<Plan>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
    pub total_items: u32,
    pub total_price: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Download {
    pub id: String,
    pub plan_id: String,
    pub file_id: String,
    pub download_token: String,
    pub expires_at: String,
    pub download_count: u32,
    pub max_downloads: u32,
}

/// Tokens issued on login/registration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    #[serde(alias = "access_token")]
    pub access_token: String,
    #[serde(default, alias = "refresh_token")]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AuthSession {
    pub user: User,
    pub tokens: AuthTokens,
}

/// `data` of single-plan responses (`{ plan }`).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlanEnvelope {
    pub plan: Plan,
}

/// `data` of the featured plans response (`{ plans }`).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlansEnvelope {
    pub plans: Vec<Plan>,
}
