use std::sync::Arc;

use axum::http::{Method, StatusCode};
use cinema_guide::{
    Session,
    model::{Credentials, Film},
    storage::{MemoryStorage, SessionStorage, USER_SNAPSHOT_KEY},
};
use serde_json::json;

use crate::{
    fake::{fake_film, fake_films, fake_user},
    helper::{Stub, config_for, spawn_backend},
};

#[tokio::test]
async fn stores_share_one_cookie_jar() {
    let backend = spawn_backend().await;
    backend.stub_with(
        Method::POST,
        "/auth/login",
        Stub {
            status: StatusCode::OK,
            body: json!({"user": fake_user(1)}),
            set_cookie: Some("session=s3cr3t; Path=/".to_string()),
        },
    );
    backend.stub(Method::GET, "/profile", StatusCode::OK, fake_user(1));
    backend.stub(Method::GET, "/favorites", StatusCode::OK, fake_films(&[4]));
    let (mut session, _) = backend.session();

    session
        .auth
        .login(&Credentials::with_name("viewer", "password".into()))
        .await
        .unwrap();
    session.favorites.fetch_favorites().await;

    let request = &backend.requests_to(Method::GET, "/favorites")[0];
    assert_eq!(request.cookie.as_deref(), Some("session=s3cr3t"));
    assert!(session.favorites.is_in_basket(4));
}

#[tokio::test]
async fn init_restores_and_revalidates_user() {
    let backend = spawn_backend().await;
    backend.stub(Method::GET, "/profile", StatusCode::OK, fake_user(12));
    let (mut session, storage) = backend.session();
    storage
        .set_item(USER_SNAPSHOT_KEY, &json!({"id": 12, "name": "cached"}).to_string())
        .unwrap();

    let outcome = session.init().await.unwrap();

    assert!(outcome.is_success());
    assert_eq!(session.auth.user().and_then(|u| u.id), Some(12));
    assert_eq!(backend.hits(Method::GET, "/profile"), 1);
}

#[tokio::test]
async fn genres_are_formatted_with_asset_base() {
    let backend = spawn_backend().await;
    backend.stub(
        Method::GET,
        "/movie/genres",
        StatusCode::OK,
        json!(["horror", "unknown"]),
    );
    let (mut session, _) = backend.session();

    let genres = session.genres().await;

    assert_eq!(genres.len(), 2);
    assert_eq!(genres[0].id, 1);
    assert_eq!(genres[0].name_ru, "Ужасы");
    assert_eq!(genres[0].image, "/static/images/genres/horror.png");
    assert_eq!(genres[1].name_ru, "unknown");
    assert_eq!(genres[1].image, "");
}

#[tokio::test]
async fn search_uses_configured_limit() {
    let backend = spawn_backend().await;
    backend.stub(
        Method::GET,
        "/movie",
        StatusCode::OK,
        json!([fake_film(1, json!([]))]),
    );
    let mut config = config_for(&backend.address);
    config.catalog.search_limit = 8;
    let mut session = Session::with_storage(config, Arc::new(MemoryStorage::new())).unwrap();

    let results = session.search("alien").await;

    assert_eq!(results.len(), 1);
    let request = &backend.requests_to(Method::GET, "/movie")[0];
    assert_eq!(request.query.as_deref(), Some("title=alien&count=8"));
}

#[tokio::test]
async fn pending_film_survives_sign_in_prompt() {
    let backend = spawn_backend().await;
    let (mut session, _) = backend.session();

    let film = Film::new(21).with_title("Stalker");
    if !session.auth.is_authenticated() {
        session.modal.open_modal_window(Some(film));
    }
    session.modal.close_modal_window();
    assert!(session.modal.take_pending_film().is_none());

    session.modal.open_modal_window(Some(Film::new(22)));
    assert_eq!(session.modal.take_pending_film().map(|f| f.id), Some(22));
    assert!(session.modal.take_pending_film().is_none());
}
