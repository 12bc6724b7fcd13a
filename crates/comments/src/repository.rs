use crate::models::{Comment, CommentRequest};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use database::{self, Database, RepositoryError};
use sqlx::FromRow;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Stores a comment for an existing film. Fails with `NotFound` and inserts
    /// nothing when the film does not exist.
    async fn add_comment(&self, film_id: i32, request: &CommentRequest) -> Result<Comment, RepositoryError>;

    /// Comments for a film, newest first.
    async fn get_comments_by_film_id(&self, film_id: i32) -> Result<Vec<Comment>, RepositoryError>;
}

#[derive(FromRow)]
struct CommentRecord {
    id: i32,
    film_id: i32,
    customer_name: String,
    comment: String,
    created_at: NaiveDateTime,
}

impl From<CommentRecord> for Comment {
    fn from(record: CommentRecord) -> Self {
        Comment {
            id: record.id,
            film_id: record.film_id,
            customer_name: record.customer_name,
            comment: record.comment,
            created_at: record.created_at,
        }
    }
}

async fn film_exists(conn: &mut database::Connection, film_id: i32) -> Result<bool, RepositoryError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM film WHERE film_id = $1)")
        .bind(film_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}

#[derive(Clone)]
pub struct PgCommentRepository {
    db: Database,
}

impl PgCommentRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn add_comment(&self, film_id: i32, request: &CommentRequest) -> Result<Comment, RepositoryError> {
        let mut uow = self.db.begin().await?;

        if !film_exists(uow.connection(), film_id).await? {
            return Err(RepositoryError::NotFound);
        }

        let record = sqlx::query_as::<_, CommentRecord>(
            "INSERT INTO film_comments (film_id, customer_name, comment, created_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, film_id, customer_name, comment, created_at",
        )
        .bind(film_id)
        .bind(&request.customer_name)
        .bind(&request.comment)
        .bind(Utc::now().naive_utc())
        .fetch_one(uow.connection())
        .await?;

        uow.commit().await?;

        Ok(record.into())
    }

    async fn get_comments_by_film_id(&self, film_id: i32) -> Result<Vec<Comment>, RepositoryError> {
        let mut conn = self.db.pool.acquire().await?;

        if !film_exists(&mut conn, film_id).await? {
            return Err(RepositoryError::NotFound);
        }

        let records = sqlx::query_as::<_, CommentRecord>(
            "SELECT id, film_id, customer_name, comment, created_at FROM film_comments \
             WHERE film_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(film_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(records.into_iter().map(|r| r.into()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::get_test_db;

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database loaded with dvdrental"]
    async fn test_add_comment() {
        let repo = PgCommentRepository::new(get_test_db().await);

        let req = CommentRequest::new("John Doe", "Great movie!");
        let comment = repo.add_comment(1, &req).await.unwrap();

        assert!(comment.id > 0);
        assert_eq!(comment.film_id, 1);
        assert_eq!(comment.customer_name, "John Doe");
        assert_eq!(comment.comment, "Great movie!");
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database loaded with dvdrental"]
    async fn test_add_comment_film_not_found() {
        let repo = PgCommentRepository::new(get_test_db().await);

        let req = CommentRequest::new("John Doe", "Great movie!");
        let result = repo.add_comment(99999, &req).await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database loaded with dvdrental"]
    async fn test_comments_newest_first() {
        let repo = PgCommentRepository::new(get_test_db().await);

        let older = repo.add_comment(2, &CommentRequest::new("A", "first")).await.unwrap();
        let newer = repo.add_comment(2, &CommentRequest::new("B", "second")).await.unwrap();

        let comments = repo.get_comments_by_film_id(2).await.unwrap();
        let newer_pos = comments.iter().position(|c| c.id == newer.id).unwrap();
        let older_pos = comments.iter().position(|c| c.id == older.id).unwrap();
        assert!(newer_pos < older_pos);
    }

    #[tokio::test]
    #[ignore = "requires a PostgreSQL database loaded with dvdrental"]
    async fn test_get_comments_film_not_found() {
        let repo = PgCommentRepository::new(get_test_db().await);

        let result = repo.get_comments_by_film_id(99999).await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }
}
