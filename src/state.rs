use std::sync::Arc;

use crate::{
    client::ApiClient,
    configuration::Config,
    error::Error,
    genres::{Genre, format_genres},
    model::{Film, Outcome, User},
    storage::{FileStorage, SessionStorage},
    stores::{AuthStore, Favorites, ModalState, MovieCatalog},
};

/// Everything one running application needs: the stores, sharing one HTTP
/// client and so one cookie jar. Build it once and pass it to whatever needs
/// it.
#[derive(Debug)]
pub struct Session {
    pub catalog: MovieCatalog,
    pub favorites: Favorites,
    pub auth: AuthStore,
    pub modal: ModalState,
    config: Config,
}

impl Session {
    pub fn build(config: Config) -> Result<Self, Error> {
        let storage = Arc::new(FileStorage::new(&config.storage.directory));
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: Config, storage: Arc<dyn SessionStorage>) -> Result<Self, Error> {
        let client = ApiClient::new(&config.api)?;

        Ok(Session {
            catalog: MovieCatalog::with_page_size(client.clone(), config.catalog.page_size),
            favorites: Favorites::new(client.clone()),
            auth: AuthStore::new(client, storage),
            modal: ModalState::new(),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    #[tracing::instrument(name = "session startup", skip(self))]
    pub async fn init(&mut self) -> Result<Outcome<User>, Error> {
        self.auth.init().await
    }

    /// Genre list from the backend, formatted for display with artwork under
    /// the configured asset base.
    pub async fn genres(&mut self) -> Vec<Genre> {
        let base_path = self.config.assets.base_path.clone();
        let slugs = self.catalog.load_genres().await;

        format_genres(slugs, &base_path)
    }

    pub async fn search(&mut self, query: &str) -> Vec<Film> {
        let limit = self.config.catalog.search_limit;
        self.catalog.search_movies(query, limit).await.to_vec()
    }
}
