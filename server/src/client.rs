//! HTTP client for the quote API.
//!
//! Attaches the bearer token obtained from [`ApiClient::login`] to every
//! request and folds all failures into [`ClientError`], whose `Display` text
//! is fit to show to a user.

use crate::db::models::{Quote, QuoteStats, QuoteStatus};
use crate::http::errors::ErrorResponse;
use crate::http::models::{
    BulkDeleteResponse, BulkIds, BulkStatusResponse, BulkStatusUpdate, FormSubmissionRequest, LoginRequest,
    LoginResponse, MessageResponse, QuoteCreated, QuoteDetail, QuoteListQuery, QuoteListResponse,
    QuoteSubmission, StatusUpdate, SubmissionCreated, SubmissionList,
};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

const GENERIC_ERROR: &str = "An error occurred";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("No response from server. Please try again later.")]
    NoResponse(#[source] reqwest::Error),

    #[error("Error setting up the request. Please try again.")]
    Request(#[source] reqwest::Error),

    #[error("Unexpected response from server")]
    Decode(#[source] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn from_transport(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ClientError::Request(err)
        } else if err.is_decode() {
            ClientError::Decode(err)
        } else {
            ClientError::NoResponse(err)
        }
    }
}

/// Picks the message a user should see from an error body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(resp) if !resp.message.is_empty() => resp.message,
        Ok(resp) => resp
            .errors
            .and_then(|errors| errors.into_iter().next())
            .map(|e| e.message)
            .unwrap_or_else(|| GENERIC_ERROR.to_string()),
        Err(_) => serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or_else(|| GENERIC_ERROR.to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:5000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}/api{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await.map_err(ClientError::from_transport)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body);
            tracing::debug!("API call failed with {}: {}", status, message);
            return Err(ClientError::Api { status, message });
        }

        response.json::<T>().await.map_err(ClientError::from_transport)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(self.request(method, path).json(body)).await
    }

    /// Logs in and keeps the token for subsequent calls.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.send_json(Method::POST, "/auth/login", &body).await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    pub async fn submit_quote(&self, quote: &QuoteSubmission) -> Result<QuoteCreated, ClientError> {
        self.send_json(Method::POST, "/quotes", quote).await
    }

    pub async fn submit_form(&self, form: &FormSubmissionRequest) -> Result<SubmissionCreated, ClientError> {
        self.send_json(Method::POST, "/forms/submit", form).await
    }

    pub async fn fetch_quotes(&self, query: &QuoteListQuery) -> Result<QuoteListResponse, ClientError> {
        self.send(self.request(Method::GET, "/quotes").query(query)).await
    }

    pub async fn fetch_quote(&self, id: &str) -> Result<QuoteDetail, ClientError> {
        self.send(self.request(Method::GET, &format!("/quotes/{id}"))).await
    }

    pub async fn quote_stats(&self) -> Result<QuoteStats, ClientError> {
        self.send(self.request(Method::GET, "/quotes/stats")).await
    }

    pub async fn update_quote_status(&self, id: &str, status: QuoteStatus) -> Result<Quote, ClientError> {
        let body = StatusUpdate {
            status: status.as_str().to_string(),
        };
        self.send_json(Method::PATCH, &format!("/quotes/{id}/status"), &body).await
    }

    pub async fn delete_quote(&self, id: &str) -> Result<MessageResponse, ClientError> {
        self.send(self.request(Method::DELETE, &format!("/quotes/{id}"))).await
    }

    pub async fn bulk_delete_quotes(&self, ids: &[String]) -> Result<BulkDeleteResponse, ClientError> {
        let body = BulkIds { ids: ids.to_vec() };
        self.send_json(Method::POST, "/quotes/bulk-delete", &body).await
    }

    pub async fn bulk_update_quote_status(
        &self,
        ids: &[String],
        status: QuoteStatus,
    ) -> Result<BulkStatusResponse, ClientError> {
        let body = BulkStatusUpdate {
            ids: ids.to_vec(),
            status: status.as_str().to_string(),
        };
        self.send_json(Method::PATCH, "/quotes/bulk-status", &body).await
    }

    pub async fn fetch_submissions(&self) -> Result<SubmissionList, ClientError> {
        self.send(self.request(Method::GET, "/forms/submissions")).await
    }
}
