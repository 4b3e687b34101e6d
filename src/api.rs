/// The backend operations on problem records.
///
/// Implementations either fully succeed and return the server's canonical
/// state, or fail without touching anything locally.
pub trait ProblemRepository: Send + Sync + 'static {
    fn list_sorted_by(&self, mode: SortMode) -> impl Future<Output = Result<Vec<Problem>>> + Send;

    fn create(&self, problem: &NewProblem) -> impl Future<Output = Result<Problem>> + Send;

    fn update(
        &self,
        id: i64,
        fields: &ProblemUpdate,
    ) -> impl Future<Output = Result<Problem>> + Send;

    fn delete(&self, id: i64) -> impl Future<Output = Result<()>> + Send;

    /// Refreshes only `lastEdited`, server side.
    fn touch_timestamp(&self, id: i64) -> impl Future<Output = Result<Problem>> + Send;
}

/// Talks to the problems REST API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpProblemRepository {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProblemRepository {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build the HTTP client")?;

        Ok(HttpProblemRepository {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "sending request");
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    async fn send(&self, operation: Operation, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "{}", operation);
            return Err(Error::Status {
                operation,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<T> {
        self.send(operation, request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| Error::transport(operation, e))
    }
}

impl ProblemRepository for HttpProblemRepository {
    async fn list_sorted_by(&self, mode: SortMode) -> Result<Vec<Problem>> {
        let request = self.request(Method::GET, mode.path());
        self.send_json(Operation::List, request).await
    }

    async fn create(&self, problem: &NewProblem) -> Result<Problem> {
        let request = self.request(Method::POST, "/problems").json(problem);
        self.send_json(Operation::Create, request).await
    }

    async fn update(&self, id: i64, fields: &ProblemUpdate) -> Result<Problem> {
        let request = self
            .request(Method::PUT, &format!("/problems/{}", id))
            .json(fields);
        self.send_json(Operation::Update, request).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let request = self.request(Method::DELETE, &format!("/problems/{}", id));
        self.send(Operation::Delete, request).await?;
        Ok(())
    }

    async fn touch_timestamp(&self, id: i64) -> Result<Problem> {
        let request = self.request(Method::PATCH, &format!("/problems/{}/timestamp", id));
        self.send_json(Operation::Touch, request).await
    }
}


use crate::error::{Error, Operation, Result};
use crate::problems::{NewProblem, Problem, ProblemUpdate, SortMode};
use anyhow::Context;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};
