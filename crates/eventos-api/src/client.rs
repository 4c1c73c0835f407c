// eventos HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, per-request bearer
// injection, and error-body categorisation. Endpoint groups (auth,
// events, sessions) are inherent methods in sibling modules so this file
// stays focused on transport mechanics.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{BearerSource, wants_bearer};
use crate::error::{Error, FieldMessages};
use crate::transport::TransportConfig;

/// Error body shape shared by every endpoint:
/// `{"message": "..."}` or `{"errors": {"field": ["..."]}}`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
    errors: Option<BTreeMap<String, serde_json::Value>>,
}

/// HTTP client for the eventos API.
///
/// Cheap to clone: the underlying `reqwest::Client` and the bearer
/// source are reference-counted.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    bearer: Option<Arc<dyn BearerSource>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("bearer", &self.bearer.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the API root including any path prefix, e.g.
    /// `http://localhost:5000/api`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self::with_client(transport.build_client()?, base_url))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            bearer: None,
        }
    }

    /// Attach the source consulted for `Authorization: Bearer` headers.
    pub fn with_bearer(mut self, source: Arc<dyn BearerSource>) -> Self {
        self.bearer = Some(source);
        self
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Join an endpoint path onto the base URL, keeping the base's own
    /// path prefix (`Url::join` would drop it for absolute paths).
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn authorize(&self, path: &str, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if !wants_bearer(path) {
            return builder;
        }
        match self.bearer.as_ref().and_then(|source| source.bearer_token()) {
            Some(token) => {
                trace!("attaching bearer token");
                builder.bearer_auth(token.expose_secret())
            }
            None => builder,
        }
    }

    /// Send a GET request with optional query parameters.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {}", url);

        let builder = self.authorize(path, self.http.get(url).query(query));
        let resp = builder.send().await?;
        parse_json(resp).await
    }

    /// Send a POST request with a JSON body.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {}", url);

        let builder = self.authorize(path, self.http.post(url).json(body));
        let resp = builder.send().await?;
        parse_json(resp).await
    }

    /// Send a POST request without a body.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {}", url);

        let builder = self.authorize(path, self.http.post(url));
        let resp = builder.send().await?;
        parse_json(resp).await
    }

    /// Send a PUT request with a JSON body.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {}", url);

        let builder = self.authorize(path, self.http.put(url).json(body));
        let resp = builder.send().await?;
        parse_json(resp).await
    }

    /// Send a DELETE request. The success body is optional (204 responses
    /// carry none), so it comes back as `Option<T>`.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, Error> {
        let url = self.url(path)?;
        debug!("DELETE {}", url);

        let builder = self.authorize(path, self.http.delete(url));
        let resp = builder.send().await?;
        let body = read_success_body(resp).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        decode(&body).map(Some)
    }
}

// ── Response parsing ─────────────────────────────────────────────────

async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let body = read_success_body(resp).await?;
    decode(&body)
}

/// Return the body of a 2xx response, or categorise the failure.
async fn read_success_body(resp: reqwest::Response) -> Result<String, Error> {
    let status = resp.status();
    let body = resp.text().await?;

    if status.is_success() {
        return Ok(body);
    }

    debug!(status = status.as_u16(), "request rejected");
    Err(categorize(status.as_u16(), &body))
}

/// Map a non-success response onto `Error::Validation` when it carries a
/// field map, else `Error::Api` with whatever top-level message it has.
pub(crate) fn categorize(status: u16, body: &str) -> Error {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return Error::Api {
            status,
            message: None,
        };
    };

    if let Some(raw) = parsed.errors {
        let errors: FieldMessages = raw
            .into_iter()
            .map(|(field, value)| (field, messages_of(value)))
            .filter(|(_, messages)| !messages.is_empty())
            .collect();
        if !errors.is_empty() {
            return Error::Validation { status, errors };
        }
    }

    Error::Api {
        status,
        message: parsed.message.filter(|m| !m.is_empty()),
    }
}

/// Flatten one entry of an `errors` map into plain messages. Servers send
/// a list of strings, but a bare string or a nested map also turn up.
fn messages_of(value: serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::String(s) => vec![s],
        serde_json::Value::Array(items) => items.into_iter().flat_map(messages_of).collect(),
        serde_json::Value::Object(map) => map.into_iter().flat_map(|(_, v)| messages_of(v)).collect(),
        serde_json::Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn url_keeps_base_prefix() {
        let client = ApiClient::with_client(
            reqwest::Client::new(),
            Url::parse("http://localhost:5000/api/").unwrap(),
        );
        assert_eq!(
            client.url("/eventos/1/actualizar").unwrap().as_str(),
            "http://localhost:5000/api/eventos/1/actualizar"
        );
    }

    #[test]
    fn categorize_prefers_field_errors() {
        let body = r#"{"message":"ignored","errors":{"nombre":["El nombre ya está en uso"],"fecha_fin":"bad"}}"#;
        let Error::Validation { status, errors } = categorize(400, body) else {
            panic!("expected validation error");
        };
        assert_eq!(status, 400);
        assert_eq!(errors["nombre"], vec!["El nombre ya está en uso".to_owned()]);
        assert_eq!(errors["fecha_fin"], vec!["bad".to_owned()]);
    }

    #[test]
    fn categorize_top_level_message() {
        let err = categorize(400, r#"{"message":"Email already exists"}"#);
        assert_eq!(err.server_message(), Some("Email already exists"));
    }

    #[test]
    fn categorize_unparseable_body() {
        let err = categorize(502, "<html>Bad Gateway</html>");
        assert!(matches!(
            err,
            Error::Api {
                status: 502,
                message: None
            }
        ));
    }

    #[test]
    fn empty_errors_map_falls_back_to_message() {
        let err = categorize(400, r#"{"errors":{},"message":"Datos inválidos"}"#);
        assert_eq!(err.server_message(), Some("Datos inválidos"));
    }
}
