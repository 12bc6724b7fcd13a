use crate::models::{Category, Film, FilmFilters, FilmListResponse};
use crate::repository::FilmRepository;
use async_trait::async_trait;
use database::RepositoryError;
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum FilmError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("film not found")]
    NotFound,
    #[error("Database error: {0}")]
    Infrastructure(String),
}

impl From<RepositoryError> for FilmError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => FilmError::NotFound,
            RepositoryError::Infrastructure(e) => FilmError::Infrastructure(e.to_string()),
            _ => FilmError::Infrastructure(err.to_string()),
        }
    }
}

#[async_trait]
pub trait FilmService: Send + Sync {
    async fn get_films(&self, filters: FilmFilters) -> Result<FilmListResponse, FilmError>;
    async fn get_film_by_id(&self, film_id: i32) -> Result<Film, FilmError>;
    async fn get_categories(&self) -> Result<Vec<Category>, FilmError>;
}

pub struct DefaultFilmService {
    repository: Arc<dyn FilmRepository>,
}

impl DefaultFilmService {
    pub fn new(repository: Arc<dyn FilmRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl FilmService for DefaultFilmService {
    #[instrument(skip(self))]
    async fn get_films(&self, filters: FilmFilters) -> Result<FilmListResponse, FilmError> {
        // Validation sees the filters exactly as given; defaults only fill what is left.
        if let Err(msg) = filters.validate() {
            tracing::warn!(error = %msg, "Invalid filters provided");
            return Err(FilmError::InvalidInput(msg));
        }
        let filters = filters.with_default_pagination();

        let films = self.repository.get_films(filters).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to retrieve films from repository");
            FilmError::from(e)
        })?;

        tracing::info!(count = films.films.len(), total = films.total, "Successfully retrieved films");
        Ok(films)
    }

    #[instrument(skip(self))]
    async fn get_film_by_id(&self, film_id: i32) -> Result<Film, FilmError> {
        if film_id <= 0 {
            tracing::warn!(film_id, "Invalid film ID provided");
            return Err(FilmError::InvalidInput("invalid film ID".into()));
        }

        let film = match self.repository.get_film_by_id(film_id).await {
            Ok(film) => film,
            Err(RepositoryError::NotFound) => {
                tracing::warn!(film_id, "Film not found");
                return Err(FilmError::NotFound);
            }
            Err(e) => {
                tracing::error!(film_id, error = %e, "Failed to retrieve film from repository");
                return Err(e.into());
            }
        };

        tracing::info!(film_id, title = %film.title, "Successfully retrieved film");
        Ok(film)
    }

    #[instrument(skip(self))]
    async fn get_categories(&self) -> Result<Vec<Category>, FilmError> {
        let categories = self.repository.get_categories().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to retrieve categories from repository");
            FilmError::from(e)
        })?;

        tracing::info!(count = categories.len(), "Successfully retrieved categories");
        Ok(categories)
    }
}
