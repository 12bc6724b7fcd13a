pub mod handler;
pub mod models;
pub mod repository;
pub mod service;

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

pub use models::{Comment, CommentRequest};
pub use repository::{CommentRepository, PgCommentRepository};
pub use service::{CommentError, CommentService, DefaultCommentService};
