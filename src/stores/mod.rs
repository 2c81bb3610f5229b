pub mod auth;
pub mod catalog;
pub mod favorites;
pub mod modal;

pub use auth::AuthStore;
pub use catalog::MovieCatalog;
pub use favorites::Favorites;
pub use modal::ModalState;
