use reqwest::{
    Client, RequestBuilder, Response,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{configuration::Api, error::Error};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Thin wrapper over a cookie-keeping `reqwest::Client` bound to one backend
/// origin. Successful calls yield the response body only; failures are logged
/// and handed back unchanged.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(api: &Api) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .build()?;

        Ok(ApiClient {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    #[tracing::instrument(name = "[GET] api", skip(self, query), fields(request_id))]
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, Error> {
        let request = self.client.get(self.url(path)).query(query);
        self.send(request).await
    }

    #[tracing::instrument(name = "[POST] api", skip(self, body), fields(request_id))]
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, Error> {
        let request = self.client.post(self.url(path)).json(body);
        self.send(request).await
    }

    /// Posts a URL-encoded form; the form content type overrides the JSON
    /// default.
    #[tracing::instrument(name = "[POST] api form", skip(self, form), fields(request_id))]
    pub async fn post_form(&self, path: &str, form: &[(&str, String)]) -> Result<Value, Error> {
        let request = self.client.post(self.url(path)).form(form);
        self.send(request).await
    }

    #[tracing::instrument(name = "[DELETE] api", skip(self), fields(request_id))]
    pub async fn delete(&self, path: &str) -> Result<Value, Error> {
        let request = self.client.delete(self.url(path));
        self.send(request).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, Error> {
        let request_id = Uuid::new_v4();
        tracing::Span::current().record("request_id", tracing::field::display(request_id));

        let result = match request
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await
        {
            Ok(response) => handle_response(response).await,
            Err(error) => Err(Error::Transport(error)),
        };

        if let Err(error) = &result {
            tracing::error!(err.msg = %error, err.details = ?error, "Api error");
        }

        result
    }
}

async fn handle_response(response: Response) -> Result<Value, Error> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(Error::Http {
            status,
            message: error_message(&body),
        });
    }

    Ok(parse_body(body))
}

/// Empty bodies become `null`; bodies that are not JSON are kept as a string.
fn parse_body(body: String) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }

    serde_json::from_str(&body).unwrap_or(Value::String(body))
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_owned)
}
