use std::sync::Arc;

use serde_json::Value;
use validator::Validate;

use crate::{
    client::ApiClient,
    error::Error,
    model::{Credentials, LogoutOutcome, Outcome, RegisterRequest, User},
    storage::{SessionStorage, USER_SNAPSHOT_KEY},
};

const LOGIN_FAILED: &str = "Authorization failed";
const REGISTRATION_FAILED: &str = "Registration failed";
const NOT_AUTHORIZED: &str = "Not authorized";

/// Current user session.
///
/// Error reporting differs per operation and callers rely on it:
/// - [`AuthStore::login`] and [`AuthStore::init`] return `Err` on failure.
/// - [`AuthStore::fetch_user`] reports 401/403 as an [`Outcome`] failure and
///   returns `Err` for anything else.
/// - [`AuthStore::register`] and [`AuthStore::logout`] never fail; the result
///   value carries the error message.
///
/// Every change of `user` is mirrored into the storage snapshot, which is only
/// ever used to show the user before the server confirms the session.
pub struct AuthStore {
    client: ApiClient,
    storage: Arc<dyn SessionStorage>,
    user: Option<User>,
    is_loading: bool,
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("user", &self.user)
            .field("is_loading", &self.is_loading)
            .finish()
    }
}

impl AuthStore {
    pub fn new(client: ApiClient, storage: Arc<dyn SessionStorage>) -> Self {
        AuthStore {
            client,
            storage,
            user: None,
            is_loading: false,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Signs in, then reconciles against the profile endpoint. Returns the
    /// user held after reconciliation.
    #[tracing::instrument(name = "login", skip_all)]
    pub async fn login(&mut self, credentials: &Credentials) -> Result<Option<User>, Error> {
        self.is_loading = true;
        let result = self.login_inner(credentials).await;
        self.is_loading = false;

        result
    }

    async fn login_inner(&mut self, credentials: &Credentials) -> Result<Option<User>, Error> {
        let data = self
            .client
            .post_json("/auth/login", credentials)
            .await
            .map_err(|error| match error {
                Error::Http { status, message } => Error::Http {
                    status,
                    message: Some(message.unwrap_or_else(|| LOGIN_FAILED.to_string())),
                },
                other => other,
            })?;

        let data = match data {
            Value::Object(mut body) => match body.remove("user") {
                Some(user @ Value::Object(_)) => user,
                _ => Value::Object(body),
            },
            other => other,
        };

        match User::from_value(data) {
            Ok(user) => self.set_user(user, true),
            Err(error) => {
                tracing::warn!(err.msg = %error, "Login response carried no user");
            }
        }

        self.fetch_user().await?;

        Ok(self.user.clone())
    }

    /// Creates an account. Never returns an error: failures, including
    /// client-side validation, come back as [`Outcome::failure`].
    #[tracing::instrument(name = "register", skip_all)]
    pub async fn register(&mut self, request: &RegisterRequest) -> Outcome<Value> {
        if let Err(errors) = request.validate() {
            tracing::warn!(err.msg = %errors, "Registration rejected locally");
            return Outcome::failure(Error::Validation(errors).user_message());
        }

        self.is_loading = true;
        let result = self.client.post_json("/user", request).await;
        self.is_loading = false;

        match result {
            Ok(data) => Outcome::success(data),
            Err(Error::Http { message, .. }) => {
                Outcome::failure(message.unwrap_or_else(|| REGISTRATION_FAILED.to_string()))
            }
            Err(error) => Outcome::failure(error.user_message()),
        }
    }

    /// Ends the session. The local user and snapshot are always cleared, even
    /// when the backend cannot be reached.
    #[tracing::instrument(name = "logout", skip_all)]
    pub async fn logout(&mut self) -> LogoutOutcome {
        let result = self.client.get("/auth/logout", &[]).await;

        self.clear_user();

        match result {
            Err(Error::Transport(error)) => {
                tracing::error!(err.msg = %error, "Logout error");
                LogoutOutcome {
                    success: false,
                    error: Some(error.to_string()),
                }
            }
            // The server answered, so the round-trip itself succeeded.
            Err(error) => {
                tracing::warn!(err.msg = %error, "Logout rejected by server");
                LogoutOutcome {
                    success: true,
                    error: None,
                }
            }
            Ok(_) => LogoutOutcome {
                success: true,
                error: None,
            },
        }
    }

    /// Asks the server who is signed in. A 401/403 signs the user out and is
    /// reported as an [`Outcome`] failure; any other failure also signs the
    /// user out and is returned as `Err`.
    #[tracing::instrument(name = "fetch user", skip_all)]
    pub async fn fetch_user(&mut self) -> Result<Outcome<User>, Error> {
        let result = self
            .client
            .get("/profile", &[])
            .await
            .and_then(|data| User::from_value(data).map_err(Error::from));

        match result {
            Ok(user) => {
                let persist = user.id.is_some();
                self.set_user(user.clone(), persist);
                Ok(Outcome::success(user))
            }
            Err(error) if error.is_unauthorized() => {
                self.clear_user();
                Ok(Outcome::failure(NOT_AUTHORIZED))
            }
            Err(error) => {
                tracing::error!(err.msg = %error, "Fetch user error");
                self.clear_user();
                Err(error)
            }
        }
    }

    /// Startup: shows the stored snapshot if there is one, then always
    /// revalidates with the server.
    #[tracing::instrument(name = "init session", skip_all)]
    pub async fn init(&mut self) -> Result<Outcome<User>, Error> {
        self.restore();
        self.fetch_user().await
    }

    /// Loads the stored snapshot, if any, without asking the server. An
    /// unreadable snapshot is logged and ignored. Returns whether a user was
    /// restored.
    pub fn restore(&mut self) -> bool {
        match self.restore_snapshot() {
            Ok(Some(user)) => {
                self.user = Some(user);
                true
            }
            Ok(None) => false,
            Err(error) => {
                tracing::error!(err.msg = %error, "Error loading stored user");
                false
            }
        }
    }

    fn restore_snapshot(&self) -> Result<Option<User>, Error> {
        let Some(saved) = self.storage.get_item(USER_SNAPSHOT_KEY)? else {
            return Ok(None);
        };

        let user = User::from_value(serde_json::from_str(&saved)?)?;

        Ok(user.id.is_some().then_some(user))
    }

    fn set_user(&mut self, user: User, persist: bool) {
        if persist {
            let stored = serde_json::to_string(&user)
                .map_err(Error::from)
                .and_then(|snapshot| self.storage.set_item(USER_SNAPSHOT_KEY, &snapshot));
            if let Err(error) = stored {
                tracing::error!(err.msg = %error, "Failed to store user snapshot");
            }
        }

        self.user = Some(user);
    }

    fn clear_user(&mut self) {
        self.user = None;

        if let Err(error) = self.storage.remove_item(USER_SNAPSHOT_KEY) {
            tracing::error!(err.msg = %error, "Failed to remove user snapshot");
        }
    }
}
