use crate::models::{Comment, CommentRequest};
use crate::repository::CommentRepository;
use async_trait::async_trait;
use chrono::Utc;
use database::RepositoryError;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Comment store that knows which film ids exist.
#[derive(Default)]
pub struct InMemoryCommentRepository {
    film_ids: HashSet<i32>,
    comments: Mutex<Vec<Comment>>,
    broken: AtomicBool,
}

impl InMemoryCommentRepository {
    pub fn new(film_ids: impl IntoIterator<Item = i32>) -> Self {
        Self {
            film_ids: film_ids.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn break_connection(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    pub fn stored(&self) -> Vec<Comment> {
        self.comments.lock().unwrap().clone()
    }

    fn check(&self, film_id: i32) -> Result<(), RepositoryError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(RepositoryError::Infrastructure(sqlx::Error::PoolClosed));
        }
        if !self.film_ids.contains(&film_id) {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn add_comment(&self, film_id: i32, request: &CommentRequest) -> Result<Comment, RepositoryError> {
        self.check(film_id)?;

        let mut comments = self.comments.lock().unwrap();
        let comment = Comment {
            id: comments.len() as i32 + 1,
            film_id,
            customer_name: request.customer_name.clone(),
            comment: request.comment.clone(),
            created_at: Utc::now().naive_utc(),
        };
        comments.push(comment.clone());
        Ok(comment)
    }

    async fn get_comments_by_film_id(&self, film_id: i32) -> Result<Vec<Comment>, RepositoryError> {
        self.check(film_id)?;

        let mut comments: Vec<Comment> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.film_id == film_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(comments)
    }
}
