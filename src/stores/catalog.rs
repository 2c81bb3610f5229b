use rand::Rng;
use serde_json::Value;

use crate::{
    client::ApiClient,
    model::{Film, GenreKey},
};

pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Cached view of the movie catalog. Loaders return the cache when it is
/// populated and only go to the network otherwise; failed loads leave an
/// empty cache behind rather than stale data.
#[derive(Debug)]
pub struct MovieCatalog {
    client: ApiClient,
    page_size: u32,
    all_movies: Vec<Film>,
    top10: Vec<Film>,
    genres: Vec<String>,
    search_results: Vec<Film>,
    is_loading: bool,
    is_loaded: bool,
    is_searching: bool,
}

impl MovieCatalog {
    pub fn new(client: ApiClient) -> Self {
        Self::with_page_size(client, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(client: ApiClient, page_size: u32) -> Self {
        MovieCatalog {
            client,
            page_size,
            all_movies: Vec::new(),
            top10: Vec::new(),
            genres: Vec::new(),
            search_results: Vec::new(),
            is_loading: false,
            is_loaded: false,
            is_searching: false,
        }
    }

    pub fn all_movies(&self) -> &[Film] {
        &self.all_movies
    }

    pub fn top10(&self) -> &[Film] {
        &self.top10
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn search_results(&self) -> &[Film] {
        &self.search_results
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    pub fn is_searching(&self) -> bool {
        self.is_searching
    }

    #[tracing::instrument(name = "load all movies", skip(self))]
    pub async fn load_all_movies(&mut self, force_refresh: bool) -> &[Film] {
        if self.is_loaded && !force_refresh && !self.all_movies.is_empty() {
            return &self.all_movies;
        }

        self.is_loading = true;
        let result = self
            .client
            .get("/movie", &[("limit", self.page_size.to_string())])
            .await;
        self.is_loading = false;

        match result {
            Ok(data) => {
                self.all_movies = normalize_movies(data);
                self.is_loaded = true;
            }
            Err(error) => {
                tracing::error!(err.msg = %error, "Failed to fetch movies");
                self.all_movies.clear();
                self.is_loaded = false;
            }
        }

        &self.all_movies
    }

    #[tracing::instrument(name = "load top 10", skip(self))]
    pub async fn load_top10(&mut self) -> &[Film] {
        if !self.top10.is_empty() {
            return &self.top10;
        }

        match self.client.get("/movie/top10", &[]).await {
            Ok(data) => self.top10 = normalize_movies(data),
            Err(error) => {
                tracing::error!(err.msg = %error, "Failed to fetch top 10");
                self.top10.clear();
            }
        }

        &self.top10
    }

    /// Raw genre slugs as the backend lists them; see
    /// [`crate::genres::format_genres`] for display data.
    #[tracing::instrument(name = "load genres", skip(self))]
    pub async fn load_genres(&mut self) -> &[String] {
        if !self.genres.is_empty() {
            return &self.genres;
        }

        match self.client.get("/movie/genres", &[]).await {
            Ok(Value::Array(items)) => {
                self.genres = items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(slug) => Some(slug),
                        _ => None,
                    })
                    .collect();
            }
            Ok(_) => self.genres.clear(),
            Err(error) => {
                tracing::error!(err.msg = %error, "Failed to fetch genres");
                self.genres.clear();
            }
        }

        &self.genres
    }

    #[tracing::instrument(name = "get movie by id", skip(self))]
    pub async fn get_movie_by_id(&self, id: i64) -> Option<Film> {
        if let Some(movie) = self.all_movies.iter().find(|movie| movie.id == id) {
            return Some(movie.clone());
        }

        self.fetch_movie(&format!("/movie/{}", id)).await
    }

    /// Picks uniformly from the full listing, loading it first if needed. The
    /// random-movie endpoint is only used when the listing stays empty.
    #[tracing::instrument(name = "get random movie", skip(self))]
    pub async fn get_random_movie(&mut self) -> Option<Film> {
        if self.all_movies.is_empty() {
            self.load_all_movies(false).await;
        }

        if !self.all_movies.is_empty() {
            let index = rand::rng().random_range(0..self.all_movies.len());
            return self.all_movies.get(index).cloned();
        }

        self.fetch_movie("/movie/random").await
    }

    #[tracing::instrument(name = "search movies", skip(self))]
    pub async fn search_movies(&mut self, query: &str, limit: u32) -> &[Film] {
        if query.trim().is_empty() {
            self.search_results.clear();
            return &self.search_results;
        }

        self.is_searching = true;
        let result = self
            .client
            .get(
                "/movie",
                &[("title", query.to_string()), ("count", limit.to_string())],
            )
            .await;
        self.is_searching = false;

        match result {
            Ok(data) => self.search_results = normalize_movies(data),
            Err(error) => {
                tracing::error!(err.msg = %error, "Failed to search movies");
                self.search_results.clear();
            }
        }

        &self.search_results
    }

    pub fn clear_search_results(&mut self) {
        self.search_results.clear();
    }

    /// Filters the cached listing locally; never touches the network.
    pub fn get_movies_by_genre(&self, key: impl Into<GenreKey>) -> Vec<&Film> {
        filter_by_genre(&self.all_movies, &key.into())
    }

    async fn fetch_movie(&self, path: &str) -> Option<Film> {
        let data = match self.client.get(path, &[]).await {
            Ok(data) => data,
            Err(error) => {
                tracing::error!(err.msg = %error, path, "Failed to fetch movie");
                return None;
            }
        };

        match serde_json::from_value(data) {
            Ok(movie) => Some(movie),
            Err(error) => {
                tracing::error!(err.msg = %error, path, "Unexpected movie payload");
                None
            }
        }
    }
}

pub fn filter_by_genre<'a>(movies: &'a [Film], key: &GenreKey) -> Vec<&'a Film> {
    movies.iter().filter(|movie| movie.has_genre(key)).collect()
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum MovieListPayload {
    Bare(Vec<Value>),
    Plural { movies: Vec<Value> },
    Singular { movie: Vec<Value> },
}

/// Accepts a bare array, `{"movies": [...]}` or `{"movie": [...]}`; anything
/// else is an empty list. Entries that are not films (no usable `id`) are
/// dropped.
pub fn normalize_movies(data: Value) -> Vec<Film> {
    let items = match serde_json::from_value(data) {
        Ok(MovieListPayload::Bare(items))
        | Ok(MovieListPayload::Plural { movies: items })
        | Ok(MovieListPayload::Singular { movie: items }) => items,
        Err(_) => return Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(film) => Some(film),
            Err(error) => {
                tracing::warn!(err.msg = %error, "Skipping malformed movie entry");
                None
            }
        })
        .collect()
}
