use serde_json::Value;

use crate::{client::ApiClient, model::Film};

/// The signed-in user's favorites, mirrored from the server. Entries are
/// unique by `id`; the server listing is authoritative and replaces any local
/// optimistic update.
#[derive(Debug)]
pub struct Favorites {
    client: ApiClient,
    products_in_basket: Vec<Film>,
    is_loading: bool,
}

impl Favorites {
    pub fn new(client: ApiClient) -> Self {
        Favorites {
            client,
            products_in_basket: Vec::new(),
            is_loading: false,
        }
    }

    pub fn products_in_basket(&self) -> &[Film] {
        &self.products_in_basket
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Replaces the local list with the server's. Only a list whose first
    /// entry is an object with an `id` is accepted; any other shape empties
    /// the list. A failed request leaves the list untouched.
    #[tracing::instrument(name = "fetch favorites", skip(self))]
    pub async fn fetch_favorites(&mut self) {
        self.is_loading = true;
        let result = self.client.get("/favorites", &[]).await;
        self.is_loading = false;

        match result {
            Ok(data) => self.products_in_basket = accept_favorites(data),
            Err(error) => {
                tracing::error!(err.msg = %error, "Failed to fetch favorites");
            }
        }
    }

    #[tracing::instrument(name = "add to favorites", skip(self, film), fields(film.id = film.id))]
    pub async fn add_to_basket(&mut self, film: &Film) {
        if let Err(error) = self
            .client
            .post_form("/favorites", &[("id", film.id.to_string())])
            .await
        {
            tracing::error!(err.msg = %error, "Failed to add favorite");
            return;
        }

        if !self.is_in_basket(film.id) {
            self.products_in_basket.push(film.clone());
        }

        self.fetch_favorites().await;
    }

    #[tracing::instrument(name = "remove from favorites", skip(self))]
    pub async fn remove_from_basket(&mut self, id: i64) {
        if let Err(error) = self.client.delete(&format!("/favorites/{}", id)).await {
            tracing::error!(err.msg = %error, "Failed to remove favorite");
            return;
        }

        self.products_in_basket.retain(|film| film.id != id);
    }

    pub fn is_in_basket(&self, id: i64) -> bool {
        self.products_in_basket.iter().any(|film| film.id == id)
    }
}

// Only the first entry is checked. Later entries that do not decode as films
// are skipped rather than failing the whole list.
fn accept_favorites(data: Value) -> Vec<Film> {
    let Value::Array(items) = data else {
        return Vec::new();
    };

    let first_is_film = items
        .first()
        .and_then(Value::as_object)
        .is_some_and(|first| first.contains_key("id"));
    if !first_is_film {
        return Vec::new();
    }

    let films = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<Film>(item).ok());

    let mut accepted: Vec<Film> = Vec::new();
    for film in films {
        if !accepted.iter().any(|existing| existing.id == film.id) {
            accepted.push(film);
        }
    }

    accepted
}
