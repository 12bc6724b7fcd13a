use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const VALID_RATINGS: [&str; 5] = ["G", "PG", "PG-13", "R", "NC-17"];

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct Film {
    pub film_id: i32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
    pub language_id: i16,
    pub rental_duration: i16,
    pub rental_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<i16>,
    pub replacement_cost: f64,
    pub rating: String,
    pub last_update: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub special_features: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actors: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Category {
    pub category_id: i32,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct FilmListResponse {
    pub films: Vec<Film>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

/// Narrows a film listing. A zero `page` or `limit` means "not supplied".
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct FilmFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub limit: i64,
}

impl FilmFilters {
    /// Checks the filters exactly as supplied, before any defaulting.
    pub fn validate(&self) -> Result<(), String> {
        if self.page < 1 {
            return Err("page must be greater than 0".to_string());
        }
        if self.limit < 1 || self.limit > MAX_LIMIT {
            return Err(format!("limit must be between 1 and {}", MAX_LIMIT));
        }
        if (self.page - 1).checked_mul(self.limit).is_none() {
            return Err("page is too large".to_string());
        }
        if let Some(rating) = self.rating() {
            if !VALID_RATINGS.contains(&rating) {
                return Err("invalid rating provided".to_string());
            }
        }
        Ok(())
    }

    pub fn with_default_pagination(mut self) -> Self {
        if self.page <= 0 {
            self.page = DEFAULT_PAGE;
        }
        if self.limit <= 0 {
            self.limit = DEFAULT_LIMIT;
        }
        self
    }

    /// Rows to skip for the current page. Saturates rather than overflowing.
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).max(0).saturating_mul(self.limit.max(0))
    }

    pub fn title(&self) -> Option<&str> {
        non_empty(&self.title)
    }

    pub fn rating(&self) -> Option<&str> {
        non_empty(&self.rating)
    }

    pub fn category(&self) -> Option<&str> {
        non_empty(&self.category)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
