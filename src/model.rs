use std::borrow::Cow;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serializer, de::DeserializeOwned};
use serde_aux::field_attributes::{
    deserialize_number_from_string, deserialize_option_number_from_string,
};
use serde_json::{Map, Value};
use validator::{Validate, ValidateEmail, ValidateLength, ValidationError, ValidationErrors};

/// A film as the backend describes it. Only `id` is guaranteed; every other
/// field degrades to `None` when it is missing or has an unexpected type.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub original_title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub plot: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub poster_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub backdrop_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub trailer_url: Option<String>,
    #[serde(default, deserialize_with = "deserialize_genres")]
    pub genres: Option<Vec<GenreEntry>>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub tmdb_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub release_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub runtime: Option<i64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub budget: Option<i64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub revenue: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub director: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub production: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub languages: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub awards_summary: Option<String>,
}

impl Film {
    pub fn new(id: i64) -> Self {
        Film {
            id,
            title: None,
            original_title: None,
            plot: None,
            poster_url: None,
            backdrop_url: None,
            trailer_url: None,
            genres: None,
            tmdb_rating: None,
            release_year: None,
            runtime: None,
            budget: None,
            revenue: None,
            director: None,
            production: None,
            language: None,
            languages: None,
            awards_summary: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_genres(mut self, genres: Vec<GenreEntry>) -> Self {
        self.genres = Some(genres);
        self
    }

    /// True if any genre entry of this film matches `key`. Films without a
    /// genre list never match.
    pub fn has_genre(&self, key: &GenreKey) -> bool {
        self.genres
            .as_deref()
            .is_some_and(|genres| genres.iter().any(|genre| genre.matches(key)))
    }
}

/// A genre reference inside a film. Depending on the endpoint the backend
/// sends either a bare slug or a structured object.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum GenreEntry {
    Slug(String),
    Detailed(GenreObject),
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Default)]
pub struct GenreObject {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<GenreId>,
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name_ru: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub slug: Option<String>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum GenreId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for GenreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenreId::Number(id) => write!(f, "{}", id),
            GenreId::Text(id) => f.write_str(id),
        }
    }
}

/// What a caller filters by: a numeric genre id or a textual key (id, slug or
/// name).
#[derive(Debug, Clone, PartialEq)]
pub enum GenreKey {
    Id(i64),
    Text(String),
}

impl From<i64> for GenreKey {
    fn from(id: i64) -> Self {
        GenreKey::Id(id)
    }
}

impl From<&str> for GenreKey {
    fn from(key: &str) -> Self {
        GenreKey::Text(key.to_string())
    }
}

impl From<String> for GenreKey {
    fn from(key: String) -> Self {
        GenreKey::Text(key)
    }
}

impl GenreEntry {
    /// Candidates are tried in a fixed order: id, slug, normalized name,
    /// normalized localized name. A numeric key only ever compares against a
    /// numeric id.
    pub fn matches(&self, key: &GenreKey) -> bool {
        match (self, key) {
            (GenreEntry::Slug(_), GenreKey::Id(_)) => false,
            (GenreEntry::Slug(slug), GenreKey::Text(key)) => {
                slug == key || slugify(slug) == key.to_lowercase()
            }
            (GenreEntry::Detailed(genre), GenreKey::Id(id)) => {
                genre.id == Some(GenreId::Number(*id))
            }
            (GenreEntry::Detailed(genre), GenreKey::Text(key)) => {
                let wanted = key.to_lowercase();

                genre.id.as_ref().is_some_and(|id| id.to_string() == *key)
                    || genre.slug.as_deref() == Some(key.as_str())
                    || genre.name.as_deref().is_some_and(|n| slugify(n) == wanted)
                    || genre.name_ru.as_deref().is_some_and(|n| slugify(n) == wanted)
            }
        }
    }
}

/// Lowercases and replaces every run of whitespace with a single `-`.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut in_whitespace = false;

    for c in value.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.extend(c.to_lowercase());
            in_whitespace = false;
        }
    }

    slug
}

/// The authenticated user. The snapshot persisted client-side is this value
/// serialized; it never carries a password.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Default)]
pub struct User {
    #[serde(
        default,
        deserialize_with = "deserialize_option_number_from_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Decodes a user from a response body, dropping any password the server
    /// echoed back.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let mut user: User = serde_json::from_value(value)?;
        user.extra.remove("password");
        Ok(user)
    }
}

#[derive(serde::Serialize, Debug)]
pub struct Credentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(serialize_with = "expose_secret")]
    pub password: SecretString,
}

impl Credentials {
    pub fn with_email(email: impl Into<String>, password: SecretString) -> Self {
        Credentials {
            email: Some(email.into()),
            name: None,
            password,
        }
    }

    pub fn with_name(name: impl Into<String>, password: SecretString) -> Self {
        Credentials {
            email: None,
            name: Some(name.into()),
            password,
        }
    }
}

#[derive(serde::Serialize, Debug)]
pub struct RegisterRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,
    pub email: String,
    #[serde(serialize_with = "expose_secret")]
    pub password: SecretString,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() {
            errors.add(
                "name",
                ValidationError::new("name_length").with_message(Cow::from("Name is required")),
            );
        }

        if !self.email.validate_email() {
            errors.add(
                "email",
                ValidationError::new("email_email")
                    .with_message(Cow::from("Incorrect email format")),
            );
        }

        let password = self.password.expose_secret();
        if !password.validate_length(Some(1), Some(64), None) {
            errors.add(
                "password",
                ValidationError::new("password_length")
                    .with_message(Cow::from("Password length must be between 1 and 64")),
            );
        }

        if !errors.errors().is_empty() {
            return Err(errors);
        }

        Ok(())
    }
}

/// Result of an operation that reports failure instead of raising it.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Outcome<T> {
    pub fn success(data: T) -> Self {
        Outcome {
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Outcome {
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct LogoutOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn expose_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr + DeserializeOwned,
    <T as std::str::FromStr>::Err: std::fmt::Display,
{
    let value = Value::deserialize(deserializer)?;
    Ok(deserialize_option_number_from_string::<T, Value>(value)
        .ok()
        .flatten())
}

fn deserialize_genres<'de, D>(deserializer: D) -> Result<Option<Vec<GenreEntry>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}
