//! `reqwest`-backed gateway implementation.
//!
//! Attaches the current identity's bearer token to every request (the view
//! layer never sees a header) and shapes non-success responses into
//! [`GatewayError::Status`] with the body sniffed into one of the known
//! error shapes.

use std::future::Future;
use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::gateway::{Confirmation, ErrorBody, Gateway, GatewayError, Resource};
use crate::store::EntityStore;

/// HTTP gateway against the remote coupon API.
#[derive(Clone)]
pub struct HttpGateway {
    inner: Arc<HttpGatewayInner>,
}

struct HttpGatewayInner {
    client: reqwest::Client,
    base: Url,
    store: EntityStore,
}

impl HttpGateway {
    /// Create a gateway from configuration.
    ///
    /// The store handle is read for the identity token on every request;
    /// the gateway itself holds no credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, store: EntityStore) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpGatewayInner {
                client,
                base: config.base_url.clone(),
                store,
            }),
        })
    }

    fn url(&self, resource: Resource) -> Result<Url, GatewayError> {
        self.inner
            .base
            .join(&resource.path())
            .map_err(|e| GatewayError::Transport(format!("invalid resource URL: {e}")))
    }

    /// Attach the current identity's bearer token, if one is present.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.inner.store.identity() {
            Some(identity) => request.bearer_auth(identity.token().expose_secret()),
            None => request,
        }
    }

    /// Send a request and shape any non-success status into a structured
    /// failure.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, GatewayError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = sniff_body(response.text().await.unwrap_or_default());
        debug!(status = status.as_u16(), ?body, "remote call rejected");
        Err(GatewayError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

impl Gateway for HttpGateway {
    fn list<T>(
        &self,
        resource: Resource,
    ) -> impl Future<Output = Result<Vec<T>, GatewayError>> + Send
    where
        T: DeserializeOwned,
    {
        async move {
            let url = self.url(resource)?;
            let response = self.send(self.inner.client.get(url)).await?;
            let value: Value = response.json().await?;
            let items = unwrap_list_envelope(value)?;
            Ok(serde_json::from_value(items)?)
        }
    }

    fn create<B>(
        &self,
        resource: Resource,
        body: &B,
    ) -> impl Future<Output = Result<Confirmation, GatewayError>> + Send
    where
        B: Serialize + Sync,
    {
        async move {
            let url = self.url(resource)?;
            let response = self.send(self.inner.client.post(url).json(body)).await?;
            Ok(response.json().await?)
        }
    }

    fn update<B>(
        &self,
        resource: Resource,
        body: &B,
    ) -> impl Future<Output = Result<Confirmation, GatewayError>> + Send
    where
        B: Serialize + Sync,
    {
        async move {
            let url = self.url(resource)?;
            let response = self.send(self.inner.client.put(url).json(body)).await?;
            Ok(response.json().await?)
        }
    }

    fn delete(
        &self,
        resource: Resource,
    ) -> impl Future<Output = Result<Confirmation, GatewayError>> + Send {
        async move {
            let url = self.url(resource)?;
            let response = self.send(self.inner.client.delete(url)).await?;
            Ok(response.json().await?)
        }
    }
}

/// Sniff a failure body into one of the shapes the classifier understands.
fn sniff_body(text: String) -> ErrorBody {
    if text.trim().is_empty() {
        return ErrorBody::Empty;
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::String(s)) => ErrorBody::Text(s),
        Ok(Value::Array(items)) => {
            let strings: Option<Vec<String>> = items
                .iter()
                .map(|v| v.as_str().map(str::to_owned))
                .collect();
            match strings {
                Some(list) => ErrorBody::List(list),
                None => ErrorBody::Json(Value::Array(items)),
            }
        }
        Ok(other) => ErrorBody::Json(other),
        // Not JSON at all: the server sent its message as plain text.
        Err(_) => ErrorBody::Text(text),
    }
}

/// Accept a bare JSON array or the API's single-key list envelope
/// (`{"coupons": [...]}`).
fn unwrap_list_envelope(value: Value) -> Result<Value, GatewayError> {
    match value {
        Value::Array(_) => Ok(value),
        Value::Object(map) => {
            let mut arrays = map.into_iter().filter(|(_, v)| v.is_array());
            match (arrays.next(), arrays.next()) {
                (Some((_, inner)), None) => Ok(inner),
                _ => Err(GatewayError::Parse(
                    "list response is neither an array nor a single-key envelope".to_owned(),
                )),
            }
        }
        _ => Err(GatewayError::Parse(
            "list response is neither an array nor a single-key envelope".to_owned(),
        )),
    }
}
