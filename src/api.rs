/// Authorized HTTP access to the backend collaborator
///
/// The bearer token is read from the session store at call time rather than
/// captured when a screen renders, so a logout between render and request
/// surfaces as `NotAuthenticated` instead of a stale token going out as
/// valid. A 401 response is not special-cased: it surfaces as an ordinary
/// API error and the session store is left untouched.
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::SessionStore;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Error payload the backend returns on failed requests
#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// HTTP client bound to the configured base URL
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> ClientResult<Self> {
        let base_url = Url::parse(&config.api.base_url).map_err(|e| {
            ClientError::Config(format!("Invalid base URL '{}': {}", config.api.base_url, e))
        })?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()
            .map_err(|e| ClientError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Config(format!("Invalid request path '{}': {}", path, e)))
    }

    /// Attach the current bearer token; fails when no session is active
    fn authorized(&self, request: RequestBuilder) -> ClientResult<RequestBuilder> {
        let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;
        Ok(request.bearer_auth(token))
    }

    /// Authorized JSON GET
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorized(self.http.get(self.url(path)?))?;
        Self::decode_json(request.send().await?).await
    }

    /// Authorized GET returning the raw body, for file exports
    pub async fn get_bytes(&self, path: &str) -> ClientResult<Vec<u8>> {
        let request = self.authorized(self.http.get(self.url(path)?))?;
        let response = Self::check(request.send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Authorized JSON POST, discarding the response body
    pub async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<()> {
        let request = self.authorized(self.http.post(self.url(path)?))?;
        Self::check(request.json(body).send().await?).await?;
        Ok(())
    }

    /// Authorized JSON PUT. Returns the decoded body when the server echoes
    /// the updated entity, `None` when the body is missing or not decodable.
    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<Option<T>> {
        let request = self.authorized(self.http.put(self.url(path)?))?;
        let response = Self::check(request.json(body).send().await?).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes).ok())
    }

    /// Authorized DELETE
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let request = self.authorized(self.http.delete(self.url(path)?))?;
        Self::check(request.send().await?).await?;
        Ok(())
    }

    /// Unauthenticated JSON POST, for the public login/register endpoints
    pub async fn post_public<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.http.post(self.url(path)?).json(body);
        Self::decode_json(request.send().await?).await
    }

    /// Unauthenticated JSON POST, discarding the response body
    pub async fn post_public_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<()> {
        let request = self.http.post(self.url(path)?).json(body);
        Self::check(request.send().await?).await?;
        Ok(())
    }

    /// Map a non-success response to an API error with the server's message
    async fn check(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| "Server error".to_string());
        Err(ClientError::Api { status, message })
    }

    async fn decode_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        Ok(Self::check(response).await?.json::<T>().await?)
    }
}
