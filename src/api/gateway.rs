use reqwest::header::CONTENT_TYPE;
use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

use super::envelope::{Envelope, CODE_AUTH_EXPIRED, CODE_OK};
use crate::config::ApiConfig;
use crate::error::ClientError;
use crate::session::SessionStore;

/// Builder and envelope-unwrapper for every outbound request
///
/// Prefixes the base address, merges the default `Content-Type` with an
/// `Authorization: Bearer` header (omitted when unauthenticated), and
/// applies the caller's timeout or the configured default. Nothing in this
/// layer retries: a transport failure surfaces as
/// [`ClientError::Network`] exactly once, and a 401 envelope clears the
/// session before rejecting with [`ClientError::AuthExpired`].
pub struct RequestGateway {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    session: Arc<SessionStore>,
}

impl RequestGateway {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session: Arc<SessionStore>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            timeout,
            session,
        }
    }

    pub fn from_config(cfg: &ApiConfig, session: Arc<SessionStore>) -> Self {
        Self::new(
            cfg.base_url.clone(),
            Duration::from_millis(cfg.timeout_ms),
            session,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>, ClientError> {
        self.dispatch(self.http.get(self.url(path)), None).await
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<Envelope<T>, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.dispatch(self.http.get(self.url(path)).query(query), None)
            .await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<Envelope<T>, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(self.http.post(self.url(path)).json(body), None)
            .await
    }

    /// POST with a caller-supplied timeout instead of the default
    pub async fn post_with_timeout<T, B>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<Envelope<T>, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(self.http.post(self.url(path)).json(body), Some(timeout))
            .await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<Envelope<T>, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.dispatch(self.http.put(self.url(path)).json(body), None)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Envelope<T>, ClientError> {
        self.dispatch(self.http.delete(self.url(path)), None).await
    }

    /// Multipart file upload.
    ///
    /// The file is read locally first; a read failure is a
    /// [`ClientError::Resource`], not a network error.
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &'static str,
        file: &Path,
    ) -> Result<Envelope<T>, ClientError> {
        let bytes = tokio::fs::read(file).await.map_err(|e| {
            ClientError::resource(format!("cannot read {}: {}", file.display(), e))
        })?;
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());

        let form =
            multipart::Form::new().part(field, multipart::Part::bytes(bytes).file_name(file_name));
        let builder = self.http.post(self.url(path)).multipart(form);

        self.execute(self.authorize(builder).timeout(self.timeout))
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let session = self.session.current();
        if session.is_authenticated() {
            builder.bearer_auth(&session.token)
        } else {
            builder
        }
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        timeout: Option<Duration>,
    ) -> Result<Envelope<T>, ClientError> {
        let builder = self
            .authorize(builder)
            .header(CONTENT_TYPE, "application/json")
            .timeout(timeout.unwrap_or(self.timeout));

        self.execute(builder).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<Envelope<T>, ClientError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::network(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::network(format!("http status {status}")));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ClientError::network(format!("malformed envelope: {e}")))?;

        self.unwrap_envelope(envelope).await
    }

    async fn unwrap_envelope<T>(&self, envelope: Envelope<T>) -> Result<Envelope<T>, ClientError> {
        match envelope.code {
            CODE_OK => Ok(envelope),
            CODE_AUTH_EXPIRED => {
                // The one cross-component side effect in the error taxonomy:
                // auth expiry tears down the session before the caller sees
                // the rejection. Callers must re-authenticate, not retry.
                warn!("Session expired, clearing stored credentials");
                self.session.clear().await;
                Err(ClientError::AuthExpired)
            }
            _ => Err(ClientError::business(envelope.message)),
        }
    }
}
