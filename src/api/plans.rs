//! Plan catalogue queries.

use serde::Serialize;

use crate::api::endpoints;
use crate::api::models::{Category, Plan, PlanEnvelope, PlansEnvelope};
use crate::client::{ApiClient, ApiClientError, ApiResponse, ApiResult, RequestConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    Price,
    Bedrooms,
    SquareFeet,
    CreatedAt,
    AverageRating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortBy {
    fn as_str(&self) -> &'static str {
        match self {
            SortBy::Price => "price",
            SortBy::Bedrooms => "bedrooms",
            SortBy::SquareFeet => "square_feet",
            SortBy::CreatedAt => "created_at",
            SortBy::AverageRating => "average_rating",
        }
    }
}

impl SortOrder {
    fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Filters for the plan listing. Unset fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanFilters {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f32>,
    pub min_sq_ft: Option<u32>,
    pub max_sq_ft: Option<u32>,
    pub featured: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
}

impl PlanFilters {
    /// Percent-encoded query string, without the leading `?`.
    pub fn to_query(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());

        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            query.append_pair("search", search);
        }
        if let Some(category) = self.category.as_deref().filter(|s| !s.is_empty()) {
            query.append_pair("category", category);
        }
        let numeric = [
            ("minPrice", self.min_price.map(|v| v.to_string())),
            ("maxPrice", self.max_price.map(|v| v.to_string())),
            ("bedrooms", self.bedrooms.map(|v| v.to_string())),
            ("bathrooms", self.bathrooms.map(|v| v.to_string())),
            ("minSqFt", self.min_sq_ft.map(|v| v.to_string())),
            ("maxSqFt", self.max_sq_ft.map(|v| v.to_string())),
            ("featured", self.featured.map(|v| v.to_string())),
            ("page", self.page.map(|v| v.to_string())),
            ("limit", self.limit.map(|v| v.to_string())),
        ];
        for (key, value) in numeric {
            if let Some(value) = value {
                query.append_pair(key, &value);
            }
        }
        if let Some(sort_by) = self.sort_by {
            query.append_pair("sortBy", sort_by.as_str());
        }
        if let Some(sort_order) = self.sort_order {
            query.append_pair("sortOrder", sort_order.as_str());
        }

        query.finish()
    }

    /// Listing endpoint with the query attached.
    pub fn endpoint(&self) -> String {
        let query = self.to_query();
        if query.is_empty() {
            endpoints::plans::LIST.to_string()
        } else {
            format!("{}?{}", endpoints::plans::LIST, query)
        }
    }
}

/// Plan and category lookups.
#[derive(Debug, Clone, Copy)]
pub struct PlansApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn plans(&self) -> PlansApi<'_> {
        PlansApi { client: self }
    }
}

impl PlansApi<'_> {
    /// One page of plans; pagination is on the envelope.
    pub async fn list(&self, filters: &PlanFilters) -> ApiResult<ApiResponse<Vec<Plan>>> {
        self.client.get(&filters.endpoint(), RequestConfig::default()).await
    }

    pub async fn featured(&self) -> ApiResult<Vec<Plan>> {
        let resp = self
            .client
            .get::<PlansEnvelope>(endpoints::plans::FEATURED, RequestConfig::default())
            .await?;
        Ok(resp.data.map(|d| d.plans).unwrap_or_default())
    }

    pub async fn get(&self, id: &str) -> ApiResult<Plan> {
        let resp = self
            .client
            .get::<PlanEnvelope>(&endpoints::plans::by_id(id), RequestConfig::default())
            .await?;
        resp.data
            .map(|d| d.plan)
            .ok_or_else(|| ApiClientError::decode("Plan response carried no data"))
    }

    pub async fn categories(&self) -> ApiResult<Vec<Category>> {
        let resp = self
            .client
            .get::<Vec<Category>>(endpoints::categories::LIST, RequestConfig::default())
            .await?;
        Ok(resp.data.unwrap_or_default())
    }
}
