use axum::http::{Method, StatusCode};
use cinema_guide::{model::GenreKey, stores::MovieCatalog};
use serde_json::json;

use crate::{
    fake::{fake_film, fake_films},
    helper::spawn_backend,
};

#[tokio::test]
async fn load_all_movies_uses_cache_after_first_load() {
    let backend = spawn_backend().await;
    backend.stub(Method::GET, "/movie", StatusCode::OK, fake_films(&[1, 2, 3]));
    let mut catalog = MovieCatalog::new(backend.api());

    assert_eq!(catalog.load_all_movies(false).await.len(), 3);
    assert_eq!(catalog.load_all_movies(false).await.len(), 3);

    assert!(catalog.is_loaded());
    assert!(!catalog.is_loading());
    assert_eq!(backend.hits(Method::GET, "/movie"), 1);

    let request = &backend.requests_to(Method::GET, "/movie")[0];
    assert_eq!(request.query.as_deref(), Some("limit=50"));
}

#[tokio::test]
async fn load_all_movies_refetches_when_forced() {
    let backend = spawn_backend().await;
    backend.stub(Method::GET, "/movie", StatusCode::OK, fake_films(&[1]));
    let mut catalog = MovieCatalog::new(backend.api());

    catalog.load_all_movies(false).await;
    backend.stub(Method::GET, "/movie", StatusCode::OK, fake_films(&[1, 2]));
    let movies = catalog.load_all_movies(true).await;

    assert_eq!(movies.len(), 2);
    assert_eq!(backend.hits(Method::GET, "/movie"), 2);
}

#[tokio::test]
async fn load_all_movies_retries_while_cache_is_empty() {
    let backend = spawn_backend().await;
    backend.stub(Method::GET, "/movie", StatusCode::OK, json!([]));
    let mut catalog = MovieCatalog::new(backend.api());

    catalog.load_all_movies(false).await;
    catalog.load_all_movies(false).await;

    assert_eq!(backend.hits(Method::GET, "/movie"), 2);
}

#[tokio::test]
async fn load_all_movies_accepts_wrapped_payloads() {
    let backend = spawn_backend().await;
    backend.stub(
        Method::GET,
        "/movie",
        StatusCode::OK,
        json!({"movies": fake_films(&[4, 5])}),
    );
    let mut catalog = MovieCatalog::new(backend.api());

    let ids: Vec<i64> = catalog
        .load_all_movies(false)
        .await
        .iter()
        .map(|m| m.id)
        .collect();

    assert_eq!(ids, vec![4, 5]);
}

#[tokio::test]
async fn failed_load_drops_stale_movies() {
    let backend = spawn_backend().await;
    backend.stub(Method::GET, "/movie", StatusCode::OK, fake_films(&[1, 2]));
    let mut catalog = MovieCatalog::new(backend.api());
    catalog.load_all_movies(false).await;

    backend.stub(
        Method::GET,
        "/movie",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"message": "boom"}),
    );
    let movies = catalog.load_all_movies(true).await;

    assert!(movies.is_empty());
    assert!(catalog.all_movies().is_empty());
    assert!(!catalog.is_loaded());
}

#[tokio::test]
async fn top10_and_genres_are_cached() {
    let backend = spawn_backend().await;
    backend.stub(Method::GET, "/movie/top10", StatusCode::OK, fake_films(&[9, 8]));
    backend.stub(
        Method::GET,
        "/movie/genres",
        StatusCode::OK,
        json!(["action", "drama", 3]),
    );
    let mut catalog = MovieCatalog::new(backend.api());

    catalog.load_top10().await;
    assert_eq!(catalog.load_top10().await.len(), 2);

    catalog.load_genres().await;
    assert_eq!(catalog.load_genres().await, ["action", "drama"]);

    assert_eq!(backend.hits(Method::GET, "/movie/top10"), 1);
    assert_eq!(backend.hits(Method::GET, "/movie/genres"), 1);
}

#[tokio::test]
async fn genres_must_be_a_list() {
    let backend = spawn_backend().await;
    backend.stub(
        Method::GET,
        "/movie/genres",
        StatusCode::OK,
        json!({"genres": ["action"]}),
    );
    let mut catalog = MovieCatalog::new(backend.api());

    assert!(catalog.load_genres().await.is_empty());
}

#[tokio::test]
async fn get_movie_by_id_prefers_cache() {
    let backend = spawn_backend().await;
    backend.stub(Method::GET, "/movie", StatusCode::OK, fake_films(&[1, 2]));
    backend.stub(
        Method::GET,
        "/movie/42",
        StatusCode::OK,
        fake_film(42, json!(["war"])),
    );
    let mut catalog = MovieCatalog::new(backend.api());
    catalog.load_all_movies(false).await;

    let cached = catalog.get_movie_by_id(2).await.unwrap();
    assert_eq!(cached.id, 2);
    assert_eq!(backend.hits(Method::GET, "/movie/2"), 0);

    let fetched = catalog.get_movie_by_id(42).await.unwrap();
    assert_eq!(fetched.id, 42);
    assert_eq!(backend.hits(Method::GET, "/movie/42"), 1);

    assert_eq!(catalog.get_movie_by_id(404).await, None);
}

#[tokio::test]
async fn random_movie_comes_from_listing() {
    let backend = spawn_backend().await;
    backend.stub(Method::GET, "/movie", StatusCode::OK, fake_films(&[1, 2, 3]));
    let mut catalog = MovieCatalog::new(backend.api());

    let movie = catalog.get_random_movie().await.unwrap();

    assert!([1, 2, 3].contains(&movie.id));
    assert_eq!(backend.hits(Method::GET, "/movie"), 1);
    assert_eq!(backend.hits(Method::GET, "/movie/random"), 0);
}

#[tokio::test]
async fn random_movie_falls_back_to_endpoint() {
    let backend = spawn_backend().await;
    backend.stub(Method::GET, "/movie", StatusCode::OK, json!({"unexpected": true}));
    backend.stub(
        Method::GET,
        "/movie/random",
        StatusCode::OK,
        fake_film(77, json!([])),
    );
    let mut catalog = MovieCatalog::new(backend.api());

    let movie = catalog.get_random_movie().await.unwrap();

    assert_eq!(movie.id, 77);
    assert_eq!(backend.hits(Method::GET, "/movie/random"), 1);
}

#[tokio::test]
async fn random_movie_is_none_when_everything_fails() {
    let backend = spawn_backend().await;
    let mut catalog = MovieCatalog::new(backend.api());

    assert_eq!(catalog.get_random_movie().await, None);
}

#[tokio::test]
async fn blank_search_skips_network() {
    let backend = spawn_backend().await;
    let mut catalog = MovieCatalog::new(backend.api());

    assert!(catalog.search_movies("   ", 5).await.is_empty());
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn search_sends_title_and_count() {
    let backend = spawn_backend().await;
    backend.stub(
        Method::GET,
        "/movie",
        StatusCode::OK,
        json!({"movie": fake_films(&[11])}),
    );
    let mut catalog = MovieCatalog::new(backend.api());

    let results = catalog.search_movies("matrix", 3).await;

    assert_eq!(results.len(), 1);
    assert!(!catalog.is_searching());

    let request = &backend.requests_to(Method::GET, "/movie")[0];
    assert_eq!(request.query.as_deref(), Some("title=matrix&count=3"));

    catalog.clear_search_results();
    assert!(catalog.search_results().is_empty());
}

#[tokio::test]
async fn movies_by_genre_filters_cached_listing() {
    let backend = spawn_backend().await;
    backend.stub(
        Method::GET,
        "/movie",
        StatusCode::OK,
        json!([
            fake_film(1, json!([{"id": 1, "name": "Action"}])),
            fake_film(2, json!(["comedy"])),
            fake_film(3, json!(null)),
            fake_film(4, json!("action")),
        ]),
    );
    let mut catalog = MovieCatalog::new(backend.api());
    catalog.load_all_movies(false).await;
    let requests = backend.requests().len();

    let action: Vec<i64> = catalog
        .get_movies_by_genre("action")
        .iter()
        .map(|m| m.id)
        .collect();
    let by_id: Vec<i64> = catalog
        .get_movies_by_genre(GenreKey::Id(1))
        .iter()
        .map(|m| m.id)
        .collect();

    assert_eq!(action, vec![1]);
    assert_eq!(by_id, vec![1]);
    assert_eq!(backend.requests().len(), requests);
}
