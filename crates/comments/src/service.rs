use crate::models::{Comment, CommentRequest};
use crate::repository::CommentRepository;
use async_trait::async_trait;
use database::RepositoryError;
use films::FilmRepository;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("film not found")]
    FilmNotFound,
    #[error("Database error: {0}")]
    Infrastructure(String),
}

impl From<RepositoryError> for CommentError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound | RepositoryError::ForeignKeyViolation(_) => CommentError::FilmNotFound,
            RepositoryError::Infrastructure(e) => CommentError::Infrastructure(e.to_string()),
            _ => CommentError::Infrastructure(err.to_string()),
        }
    }
}

#[async_trait]
pub trait CommentService: Send + Sync {
    async fn add_comment(&self, film_id: i32, request: CommentRequest) -> Result<Comment, CommentError>;
    async fn get_comments_by_film_id(&self, film_id: i32) -> Result<Vec<Comment>, CommentError>;
}

pub struct DefaultCommentService {
    comments: Arc<dyn CommentRepository>,
    films: Arc<dyn FilmRepository>,
}

impl DefaultCommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, films: Arc<dyn FilmRepository>) -> Self {
        Self { comments, films }
    }

    async fn ensure_film_exists(&self, film_id: i32) -> Result<(), CommentError> {
        match self.films.get_film_by_id(film_id).await {
            Ok(_) => Ok(()),
            Err(RepositoryError::NotFound) => {
                tracing::warn!(film_id, "Film does not exist");
                Err(CommentError::FilmNotFound)
            }
            Err(e) => {
                tracing::error!(film_id, error = %e, "Failed to verify film exists");
                Err(e.into())
            }
        }
    }
}

fn check_film_id(film_id: i32) -> Result<(), CommentError> {
    if film_id <= 0 {
        tracing::warn!(film_id, "Invalid film ID provided");
        return Err(CommentError::InvalidInput("invalid film ID".into()));
    }
    Ok(())
}

#[async_trait]
impl CommentService for DefaultCommentService {
    #[instrument(skip(self, request))]
    async fn add_comment(&self, film_id: i32, request: CommentRequest) -> Result<Comment, CommentError> {
        check_film_id(film_id)?;

        if let Err(msg) = request.check() {
            tracing::warn!(customer_name = %request.customer_name, error = %msg, "Invalid comment provided");
            return Err(CommentError::InvalidInput(msg));
        }

        self.ensure_film_exists(film_id).await?;

        let comment = self.comments.add_comment(film_id, &request).await.map_err(|e| {
            tracing::error!(film_id, error = %e, "Failed to add comment to repository");
            CommentError::from(e)
        })?;

        tracing::info!(film_id, comment_id = comment.id, "Successfully added comment");
        Ok(comment)
    }

    #[instrument(skip(self))]
    async fn get_comments_by_film_id(&self, film_id: i32) -> Result<Vec<Comment>, CommentError> {
        check_film_id(film_id)?;
        self.ensure_film_exists(film_id).await?;

        let comments = self.comments.get_comments_by_film_id(film_id).await.map_err(|e| {
            tracing::error!(film_id, error = %e, "Failed to retrieve comments from repository");
            CommentError::from(e)
        })?;

        tracing::info!(film_id, count = comments.len(), "Successfully retrieved comments");
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::InMemoryCommentRepository;
    use films::testutils::sample_catalog;

    fn service_with(comments: Arc<InMemoryCommentRepository>) -> DefaultCommentService {
        DefaultCommentService::new(comments, Arc::new(sample_catalog()))
    }

    fn setup() -> (Arc<InMemoryCommentRepository>, DefaultCommentService) {
        let comments = Arc::new(InMemoryCommentRepository::new([1, 2]));
        (comments.clone(), service_with(comments))
    }

    #[tokio::test]
    async fn test_add_comment() {
        let (_, service) = setup();

        let comment = service
            .add_comment(1, CommentRequest::new("John Doe", "Great movie!"))
            .await
            .unwrap();

        assert!(comment.id > 0);
        assert_eq!(comment.film_id, 1);
        assert_eq!(comment.customer_name, "John Doe");
        assert_eq!(comment.comment, "Great movie!");
    }

    #[tokio::test]
    async fn test_add_comment_invalid_film_id() {
        let (store, service) = setup();

        let err = service.add_comment(0, CommentRequest::new("John", "Hi")).await.unwrap_err();
        assert!(matches!(err, CommentError::InvalidInput(_)));
        assert_eq!(err.to_string(), "invalid film ID");
        assert!(store.stored().is_empty());
    }

    #[tokio::test]
    async fn test_add_comment_validation_messages() {
        let (store, service) = setup();
        let cases = [
            (CommentRequest::new("", "Hi"), "customer name is required"),
            (CommentRequest::new("a".repeat(101), "Hi"), "customer name too long (max 100 characters)"),
            (CommentRequest::new("John", ""), "comment text is required"),
            (CommentRequest::new("John", "b".repeat(1001)), "comment text too long (max 1000 characters)"),
        ];

        for (request, expected) in cases {
            let err = service.add_comment(1, request).await.unwrap_err();
            assert!(matches!(err, CommentError::InvalidInput(_)));
            assert_eq!(err.to_string(), expected);
        }
        assert!(store.stored().is_empty());
    }

    #[tokio::test]
    async fn test_add_comment_film_not_found_does_not_insert() {
        let (store, service) = setup();

        let err = service
            .add_comment(99999, CommentRequest::new("John", "Hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, CommentError::FilmNotFound));
        assert_eq!(err.to_string(), "film not found");
        assert!(store.stored().is_empty());
    }

    #[test]
    fn test_foreign_key_violation_means_missing_film() {
        let err = CommentError::from(RepositoryError::ForeignKeyViolation("film_id".into()));
        assert!(matches!(err, CommentError::FilmNotFound));
    }

    #[tokio::test]
    async fn test_add_comment_backend_failure() {
        let (store, service) = setup();
        store.break_connection();

        let err = service.add_comment(1, CommentRequest::new("John", "Hi")).await.unwrap_err();
        assert!(matches!(err, CommentError::Infrastructure(_)));
    }

    #[tokio::test]
    async fn test_film_lookup_failure_is_infrastructure() {
        let films = sample_catalog();
        films.break_connection();
        let service = DefaultCommentService::new(Arc::new(InMemoryCommentRepository::new([1])), Arc::new(films));

        let err = service.get_comments_by_film_id(1).await.unwrap_err();
        assert!(matches!(err, CommentError::Infrastructure(_)));
    }

    #[tokio::test]
    async fn test_get_comments_newest_first() {
        let (_, service) = setup();
        let first = service.add_comment(2, CommentRequest::new("A", "first")).await.unwrap();
        let second = service.add_comment(2, CommentRequest::new("B", "second")).await.unwrap();
        service.add_comment(1, CommentRequest::new("C", "other film")).await.unwrap();

        let comments = service.get_comments_by_film_id(2).await.unwrap();
        let ids: Vec<_> = comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_get_comments_invalid_and_missing_film() {
        let (_, service) = setup();

        let err = service.get_comments_by_film_id(-1).await.unwrap_err();
        assert!(matches!(err, CommentError::InvalidInput(_)));

        let err = service.get_comments_by_film_id(99999).await.unwrap_err();
        assert!(matches!(err, CommentError::FilmNotFound));
    }
}
