//! Endpoint paths of the storefront API, relative to `/api/<version>`.

pub mod auth {
    pub const REGISTER: &str = "/auth/register";
    pub const LOGIN: &str = "/auth/login";
    pub const PROFILE: &str = "/auth/profile";
    pub const REFRESH: &str = "/auth/refresh-token";
    pub const CHANGE_PASSWORD: &str = "/auth/change-password";
    pub const OAUTH_CALLBACK: &str = "/auth/oauth/callback";
}

pub mod plans {
    pub const LIST: &str = "/plans";
    pub const SEARCH: &str = "/plans/search";
    pub const FEATURED: &str = "/plans/featured";

    pub fn by_id(id: &str) -> String {
        format!("/plans/{}", id)
    }
}

pub mod categories {
    pub const LIST: &str = "/categories";
    pub const STATS: &str = "/categories/stats";

    pub fn by_id(id: &str) -> String {
        format!("/categories/{}", id)
    }

    pub fn by_slug(slug: &str) -> String {
        format!("/categories/slug/{}", slug)
    }
}

pub mod reviews {
    pub fn by_plan(plan_id: &str) -> String {
        format!("/reviews/plan/{}", plan_id)
    }

    pub fn stats(plan_id: &str) -> String {
        format!("/reviews/plan/{}/stats", plan_id)
    }

    pub fn by_id(review_id: &str) -> String {
        format!("/reviews/{}", review_id)
    }
}

pub mod cart {
    pub const GET: &str = "/cart";
    pub const ADD: &str = "/cart/add";
    pub const CLEAR: &str = "/cart/clear";

    pub fn item(item_id: &str) -> String {
        format!("/cart/item/{}", item_id)
    }
}

pub mod downloads {
    pub const LIST: &str = "/downloads";

    pub fn generate(plan_id: &str, file_id: &str) -> String {
        format!("/downloads/generate/{}/{}", plan_id, file_id)
    }

    pub fn file(token: &str) -> String {
        format!("/downloads/file/{}", token)
    }
}

pub mod users {
    pub const LIST: &str = "/users";

    pub fn by_id(id: &str) -> String {
        format!("/users/{}", id)
    }

    pub fn role(id: &str) -> String {
        format!("/users/{}/role", id)
    }

    pub fn toggle_status(id: &str) -> String {
        format!("/users/{}/toggle-status", id)
    }
}
