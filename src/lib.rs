pub mod client;
pub mod configuration;
pub mod error;
pub mod genres;
pub mod model;
pub mod state;
pub mod storage;
pub mod stores;
pub mod telemetry;

pub use client::ApiClient;
pub use error::Error;
pub use state::Session;
