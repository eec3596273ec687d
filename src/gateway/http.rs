//! Gateway speaking the JSON API over HTTP.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::domain::client::Client;
use crate::domain::query::QueryDescriptor;
use crate::domain::types::ClientId;
use crate::dto::api::{ClientDto, ClientsQuery, ErrorPayload, LoginRequest, LoginResponse, User};
use crate::forms::client::ClientForm;
use crate::gateway::{ClientGateway, GatewayError, GatewayResult};
use crate::pagination::Paginated;
use crate::session::CredentialStore;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the registry API; the bearer token lives in a [`CredentialStore`].
#[derive(Debug)]
pub struct HttpGateway<S> {
    client: reqwest::Client,
    base_url: String,
    credentials: S,
}

impl<S: CredentialStore> HttpGateway<S> {
    pub fn new(base_url: impl Into<String>, credentials: S) -> GatewayResult<Self> {
        Self::with_timeout(base_url, credentials, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        credentials: S,
        timeout: Duration,
    ) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                log::error!("Failed to build HTTP client: {e}");
                GatewayError::generic()
            })?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    pub fn credentials(&self) -> &S {
        &self.credentials
    }

    /// Exchanges credentials for a token and stores the session.
    pub async fn login(&self, email: &str, password: &str) -> GatewayResult<User> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = self.request(Method::POST, "/api/login").json(&body);
        let session: LoginResponse = self.send_json(request, "login").await?;
        self.credentials.save(&session).map_err(|e| {
            log::error!("Failed to store session: {e}");
            GatewayError::generic()
        })?;
        Ok(session.user)
    }

    pub fn logout(&self) -> GatewayResult<()> {
        self.credentials.clear().map_err(|e| {
            log::error!("Failed to clear session: {e}");
            GatewayError::generic()
        })
    }

    /// Stored user, if a session exists.
    pub fn current_user(&self) -> Option<User> {
        self.credentials.load().ok().flatten().map(|s| s.user)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self
            .client
            .request(method, format!("{}{path}", self.base_url));
        match self.credentials.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, operation: &str) -> GatewayResult<Response> {
        let response = request.send().await.map_err(|e| {
            log::warn!("{operation} failed: {e}");
            GatewayError::generic()
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            if let Err(e) = self.credentials.clear() {
                log::warn!("Failed to clear rejected session: {e}");
            }
        }

        let payload = response.json::<ErrorPayload>().await.ok();
        log::warn!("{operation} failed: HTTP {status}");
        Err(match payload {
            Some(payload) if !payload.message.trim().is_empty() => {
                GatewayError::OperationFailed {
                    message: payload.message,
                    errors: payload.errors,
                }
            }
            _ => GatewayError::generic(),
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> GatewayResult<T> {
        let response = self.send(request, operation).await?;
        response.json::<T>().await.map_err(|e| {
            log::warn!("{operation} returned an unreadable body: {e}");
            GatewayError::generic()
        })
    }

    async fn send_client(&self, request: RequestBuilder, operation: &str) -> GatewayResult<Client> {
        let dto: ClientDto = self.send_json(request, operation).await?;
        Client::try_from(dto).map_err(|e| {
            log::warn!("{operation} returned an invalid client: {e}");
            GatewayError::generic()
        })
    }
}

impl<S: CredentialStore> ClientGateway for HttpGateway<S> {
    async fn list(&self, query: &QueryDescriptor) -> GatewayResult<Paginated<Client>> {
        let request = self
            .request(Method::GET, "/api/clients")
            .query(&ClientsQuery::from(query));
        let page: Paginated<ClientDto> = self.send_json(request, "list clients").await?;
        page.try_map(Client::try_from).map_err(|e| {
            log::warn!("list clients returned an invalid client: {e}");
            GatewayError::generic()
        })
    }

    async fn create(&self, form: &ClientForm) -> GatewayResult<Client> {
        let request = self.request(Method::POST, "/api/clients").json(form);
        self.send_client(request, "create client").await
    }

    async fn update(&self, id: &ClientId, form: &ClientForm) -> GatewayResult<Client> {
        let request = self
            .request(Method::PUT, &format!("/api/clients/{id}"))
            .json(form);
        self.send_client(request, "update client").await
    }

    async fn delete(&self, id: &ClientId) -> GatewayResult<()> {
        let request = self.request(Method::DELETE, &format!("/api/clients/{id}"));
        self.send(request, "delete client").await?;
        Ok(())
    }
}
