use crate::models::{Category, Film, FilmFilters, FilmListResponse};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use database::{self, Database, Driver, RepositoryError};
use sqlx::{FromRow, QueryBuilder};

/// Read access to the film catalog.
#[async_trait]
pub trait FilmRepository: Send + Sync {
    /// Returns one page of films matching `filters` plus the total match count.
    async fn get_films(&self, filters: FilmFilters) -> Result<FilmListResponse, RepositoryError>;

    /// Fails with `RepositoryError::NotFound` when no film has this id.
    async fn get_film_by_id(&self, film_id: i32) -> Result<Film, RepositoryError>;

    async fn get_categories(&self) -> Result<Vec<Category>, RepositoryError>;
}

// Money columns are numeric and rating is an enum in the catalog schema; both
// are cast so they decode into plain Rust types.
const FILM_COLUMNS: &str = "f.film_id, f.title, f.description, \
     f.release_year::integer AS release_year, f.language_id, f.rental_duration, \
     f.rental_rate::float8 AS rental_rate, f.length, \
     f.replacement_cost::float8 AS replacement_cost, f.rating::text AS rating, \
     f.last_update, f.special_features::text AS special_features";

const FILTERED_FILMS: &str = " FROM film f \
     LEFT JOIN film_category fc ON f.film_id = fc.film_id \
     LEFT JOIN category c ON fc.category_id = c.category_id \
     WHERE 1=1";

#[derive(FromRow)]
struct FilmRecord {
    film_id: i32,
    title: String,
    description: Option<String>,
    release_year: Option<i32>,
    language_id: i16,
    rental_duration: i16,
    rental_rate: f64,
    length: Option<i16>,
    replacement_cost: f64,
    rating: Option<String>,
    last_update: NaiveDateTime,
    special_features: Option<String>,
}

impl From<FilmRecord> for Film {
    fn from(record: FilmRecord) -> Self {
        Film {
            film_id: record.film_id,
            title: record.title,
            description: record.description,
            release_year: record.release_year,
            language_id: record.language_id,
            rental_duration: record.rental_duration,
            rental_rate: record.rental_rate,
            length: record.length,
            replacement_cost: record.replacement_cost,
            rating: record.rating.unwrap_or_default(),
            last_update: record.last_update,
            special_features: parse_special_features(record.special_features.as_deref()),
            categories: Vec::new(),
            actors: Vec::new(),
        }
    }
}

#[derive(FromRow)]
struct CategoryRecord {
    category_id: i32,
    name: String,
}

impl From<CategoryRecord> for Category {
    fn from(record: CategoryRecord) -> Self {
        Category {
            category_id: record.category_id,
            name: record.name,
        }
    }
}

/// Splits a text-array literal such as `{Trailers,"Deleted Scenes"}`.
pub(crate) fn parse_special_features(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let features = raw.trim().trim_start_matches('{').trim_end_matches('}');
    if features.is_empty() {
        return Vec::new();
    }

    features
        .split(',')
        .map(|feature| feature.trim_matches('"').to_string())
        .collect()
}

fn push_filter_predicates(builder: &mut QueryBuilder<'static, Driver>, filters: &FilmFilters) {
    if let Some(title) = filters.title() {
        builder.push(" AND f.title ILIKE ").push_bind(format!("%{}%", title));
    }
    if let Some(rating) = filters.rating() {
        builder.push(" AND f.rating::text = ").push_bind(rating.to_string());
    }
    if let Some(category) = filters.category() {
        builder.push(" AND c.name ILIKE ").push_bind(format!("%{}%", category));
    }
}

pub(crate) fn build_films_query(filters: &FilmFilters) -> QueryBuilder<'static, Driver> {
    let mut builder = QueryBuilder::new(format!("SELECT DISTINCT {}{}", FILM_COLUMNS, FILTERED_FILMS));
    push_filter_predicates(&mut builder, filters);
    builder
        .push(" ORDER BY f.title LIMIT ")
        .push_bind(filters.limit)
        .push(" OFFSET ")
        .push_bind(filters.offset());
    builder
}

pub(crate) fn build_count_query(filters: &FilmFilters) -> QueryBuilder<'static, Driver> {
    let mut builder = QueryBuilder::new(format!("SELECT COUNT(DISTINCT f.film_id){}", FILTERED_FILMS));
    push_filter_predicates(&mut builder, filters);
    builder
}

async fn film_categories(
    conn: &mut database::Connection,
    film_id: i32,
) -> Result<Vec<String>, RepositoryError> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT c.name FROM category c \
         JOIN film_category fc ON c.category_id = fc.category_id \
         WHERE fc.film_id = $1 ORDER BY c.name",
    )
    .bind(film_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(names)
}

async fn film_actors(
    conn: &mut database::Connection,
    film_id: i32,
) -> Result<Vec<String>, RepositoryError> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT a.first_name || ' ' || a.last_name AS actor_name FROM actor a \
         JOIN film_actor fa ON a.actor_id = fa.actor_id \
         WHERE fa.film_id = $1 ORDER BY a.last_name, a.first_name",
    )
    .bind(film_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(names)
}

async fn enrich(conn: &mut database::Connection, record: FilmRecord) -> Result<Film, RepositoryError> {
    let mut film = Film::from(record);
    film.categories = film_categories(conn, film.film_id).await?;
    film.actors = film_actors(conn, film.film_id).await?;
    Ok(film)
}

#[derive(Clone)]
pub struct PgFilmRepository {
    db: Database,
}

impl PgFilmRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FilmRepository for PgFilmRepository {
    async fn get_films(&self, filters: FilmFilters) -> Result<FilmListResponse, RepositoryError> {
        let filters = filters.with_default_pagination();
        let mut conn = self.db.pool.acquire().await?;

        let mut query = build_films_query(&filters);
        let records = query
            .build_query_as::<FilmRecord>()
            .fetch_all(&mut *conn)
            .await?;

        let mut films = Vec::with_capacity(records.len());
        for record in records {
            films.push(enrich(&mut conn, record).await?);
        }

        let mut count = build_count_query(&filters);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&mut *conn)
            .await?;

        Ok(FilmListResponse {
            films,
            total,
            page: filters.page,
            limit: filters.limit,
        })
    }

    async fn get_film_by_id(&self, film_id: i32) -> Result<Film, RepositoryError> {
        let mut conn = self.db.pool.acquire().await?;

        let record = sqlx::query_as::<_, FilmRecord>(&format!(
            "SELECT {} FROM film f WHERE f.film_id = $1",
            FILM_COLUMNS
        ))
        .bind(film_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        enrich(&mut conn, record).await
    }

    async fn get_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let records = sqlx::query_as::<_, CategoryRecord>(
            "SELECT category_id, name FROM category ORDER BY name",
        )
        .fetch_all(&self.db.pool)
        .await?;

        Ok(records.into_iter().map(|r| r.into()).collect())
    }
}
