use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const MAX_CUSTOMER_NAME_LENGTH: usize = 100;
pub const MAX_COMMENT_LENGTH: usize = 1000;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Comment {
    pub id: i32,
    pub film_id: i32,
    pub customer_name: String,
    pub comment: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, message = "customer_name is required"))]
    pub customer_name: String,
    #[validate(length(min = 1, message = "comment is required"))]
    pub comment: String,
}

impl CommentRequest {
    pub fn new(customer_name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            customer_name: customer_name.into(),
            comment: comment.into(),
        }
    }

    /// Business rules for a comment. The first failing rule wins.
    pub fn check(&self) -> Result<(), String> {
        if self.customer_name.is_empty() {
            return Err("customer name is required".to_string());
        }
        if self.customer_name.chars().count() > MAX_CUSTOMER_NAME_LENGTH {
            return Err(format!("customer name too long (max {} characters)", MAX_CUSTOMER_NAME_LENGTH));
        }
        if self.comment.is_empty() {
            return Err("comment text is required".to_string());
        }
        if self.comment.chars().count() > MAX_COMMENT_LENGTH {
            return Err(format!("comment text too long (max {} characters)", MAX_COMMENT_LENGTH));
        }
        Ok(())
    }
}
