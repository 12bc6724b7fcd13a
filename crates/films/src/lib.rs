pub mod handler;
pub mod models;
pub mod repository;
pub mod service;

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

pub use models::{Category, Film, FilmFilters, FilmListResponse};
pub use repository::{FilmRepository, PgFilmRepository};
pub use service::{DefaultFilmService, FilmError, FilmService};
