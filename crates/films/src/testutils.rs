//! In-memory stand-ins for the catalog, for tests of the layers above the repository.

use crate::models::{Category, Film, FilmFilters, FilmListResponse};
use crate::repository::FilmRepository;
use async_trait::async_trait;
use database::RepositoryError;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Default)]
pub struct InMemoryFilmRepository {
    films: Vec<Film>,
    categories: Vec<Category>,
    broken: AtomicBool,
}

impl InMemoryFilmRepository {
    pub fn new(films: Vec<Film>, categories: Vec<Category>) -> Self {
        Self {
            films,
            categories,
            broken: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent call fail as if the database were unreachable.
    pub fn break_connection(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(RepositoryError::Infrastructure(sqlx::Error::PoolClosed));
        }
        Ok(())
    }

    fn matches(film: &Film, filters: &FilmFilters) -> bool {
        let title_ok = filters
            .title()
            .is_none_or(|t| film.title.to_lowercase().contains(&t.to_lowercase()));
        let rating_ok = filters.rating().is_none_or(|r| film.rating == r);
        let category_ok = filters.category().is_none_or(|c| {
            let c = c.to_lowercase();
            film.categories.iter().any(|name| name.to_lowercase().contains(&c))
        });
        title_ok && rating_ok && category_ok
    }
}

#[async_trait]
impl FilmRepository for InMemoryFilmRepository {
    async fn get_films(&self, filters: FilmFilters) -> Result<FilmListResponse, RepositoryError> {
        self.check()?;
        let filters = filters.with_default_pagination();

        let mut matching: Vec<&Film> = self.films.iter().filter(|f| Self::matches(f, &filters)).collect();
        matching.sort_by(|a, b| a.title.cmp(&b.title));

        let films = matching
            .iter()
            .skip(filters.offset() as usize)
            .take(filters.limit as usize)
            .map(|f| (*f).clone())
            .collect();

        Ok(FilmListResponse {
            films,
            total: matching.len() as i64,
            page: filters.page,
            limit: filters.limit,
        })
    }

    async fn get_film_by_id(&self, film_id: i32) -> Result<Film, RepositoryError> {
        self.check()?;
        self.films
            .iter()
            .find(|f| f.film_id == film_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        self.check()?;
        let mut categories = self.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

pub fn film(film_id: i32, title: &str, rating: &str) -> Film {
    Film {
        film_id,
        title: title.to_string(),
        rating: rating.to_string(),
        language_id: 1,
        rental_duration: 3,
        rental_rate: 4.99,
        replacement_cost: 19.99,
        ..Default::default()
    }
}

/// Two films and three categories, enough for most scenarios.
pub fn sample_catalog() -> InMemoryFilmRepository {
    let mut first = film(1, "Test Film 1", "PG");
    first.categories = vec!["Action".to_string()];
    first.actors = vec!["Penelope Guiness".to_string()];
    first.special_features = vec!["Trailers".to_string()];

    let mut second = film(2, "Test Film 2", "G");
    second.categories = vec!["Comedy".to_string()];

    InMemoryFilmRepository::new(
        vec![second, first],
        vec![
            Category { category_id: 5, name: "Comedy".to_string() },
            Category { category_id: 1, name: "Action".to_string() },
            Category { category_id: 3, name: "Children".to_string() },
        ],
    )
}
