use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;

// tokio::time::sleep is only available on non-WASM targets.
#[cfg(not(target_arch = "wasm32"))]
use tokio::time::sleep;

use crate::{CallError, CallFailure, CallRequest, CallResult, ClientOptions, Result};

#[derive(Clone)]
/// HTTP client that bounds every attempt with a timeout and retries failed
/// calls up to a fixed budget.
pub struct SteadyClient {
    http: reqwest::Client,
    default_headers: Vec<(String, String)>,
    options: ClientOptions,
}

impl fmt::Debug for SteadyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Header values may carry credentials; only names are printed.
        let header_names: Vec<&str> = self
            .default_headers
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        f.debug_struct("SteadyClient")
            .field("default_headers", &header_names)
            .field("options", &self.options)
            .finish()
    }
}

impl Default for SteadyClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SteadyClient {
    /// Creates a client with default options: 15 s per-attempt timeout,
    /// 3 retries after the initial attempt, no delay between attempts.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            default_headers: Vec::new(),
            options: ClientOptions::default(),
        }
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Adds a header sent with every call issued through this client.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Adds an `Authorization` bearer header sent with every call.
    ///
    /// If the token is missing the `Bearer ` prefix, it is added
    /// automatically.
    pub fn with_bearer(self, token: impl AsRef<str>) -> Self {
        let authorization = normalize_bearer(token.as_ref());
        self.with_header(reqwest::header::AUTHORIZATION.as_str(), authorization)
    }

    /// Issues a call and decodes the 2xx JSON body into `T`.
    ///
    /// Every failure path — timeout, transport error, non-2xx status, or an
    /// undecodable success body — ends in an `Err(CallFailure)` value once
    /// the retry budget is spent. Nothing at this boundary panics, so one
    /// branch is enough to detect failure.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use steady_http::{CallRequest, SteadyClient};
    ///
    /// # async fn demo() {
    /// let client = SteadyClient::new();
    /// match client.call::<serde_json::Value>(CallRequest::get("https://api/stock")).await {
    ///     Ok(payload) => println!("{payload}"),
    ///     Err(failure) => eprintln!("{}", failure.message),
    /// }
    /// # }
    /// ```
    pub async fn call<T: DeserializeOwned>(&self, request: CallRequest) -> CallResult<T> {
        self.try_call(request).await.map_err(CallFailure::from)
    }

    /// Issues a call, preserving the full [`CallError`] taxonomy.
    ///
    /// Same retry semantics as [`SteadyClient::call`]; use this entry point
    /// when the caller needs to branch on the failure class rather than
    /// surface a message.
    pub async fn try_call<T: DeserializeOwned>(&self, request: CallRequest) -> Result<T> {
        self.send_with_retry(&request).await
    }

    /// Issues a GET call. See [`SteadyClient::call`].
    pub async fn get<T: DeserializeOwned>(&self, url: impl Into<String>) -> CallResult<T> {
        self.call(CallRequest::get(url)).await
    }

    /// Issues a POST call with a JSON body. See [`SteadyClient::call`].
    pub async fn post<T: DeserializeOwned>(
        &self,
        url: impl Into<String>,
        body: serde_json::Value,
    ) -> CallResult<T> {
        self.call(CallRequest::post(url).json(body)).await
    }

    /// Issues a PUT call with a JSON body. See [`SteadyClient::call`].
    pub async fn put<T: DeserializeOwned>(
        &self,
        url: impl Into<String>,
        body: serde_json::Value,
    ) -> CallResult<T> {
        self.call(CallRequest::put(url).json(body)).await
    }

    /// Issues a DELETE call. See [`SteadyClient::call`].
    pub async fn delete<T: DeserializeOwned>(&self, url: impl Into<String>) -> CallResult<T> {
        self.call(CallRequest::delete(url)).await
    }

    async fn send_with_retry<T: DeserializeOwned>(&self, request: &CallRequest) -> Result<T> {
        let limit_ms = request.timeout_ms.unwrap_or(self.options.timeout_ms);
        let max_retries = request.max_retries.unwrap_or(self.options.max_retries);
        let mut attempt = 0usize;

        loop {
            // Build the attempt from scratch. On WASM, reqwest uses
            // AbortController for timeout; the `.timeout()` method is
            // available on both targets.
            let response = self.build_attempt(request, limit_ms).send().await;

            let failure = match response {
                Ok(response) => {
                    let status = response.status();
                    match response.text().await {
                        Ok(body) if status.is_success() => {
                            return serde_json::from_str::<T>(&body).map_err(|err| {
                                CallError::Decode(format!(
                                    "invalid JSON payload: {err}; body: {body}"
                                ))
                            });
                        }
                        Ok(body) => CallError::Http {
                            status: status.as_u16(),
                            body,
                        },
                        Err(err) => classify_transport(err, limit_ms),
                    }
                }
                Err(err) => classify_transport(err, limit_ms),
            };

            if attempt < max_retries {
                #[cfg(feature = "tracing")]
                tracing::debug!("attempt {attempt} failed: {failure}; retrying");
                self.wait_before_retry().await;
                attempt += 1;
                continue;
            }

            #[cfg(feature = "tracing")]
            tracing::debug!("giving up after {} attempts: {failure}", attempt + 1);
            return Err(failure);
        }
    }

    fn build_attempt(&self, request: &CallRequest, limit_ms: u64) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(request.method.clone(), request.url.as_str())
            .timeout(Duration::from_millis(limit_ms));

        for (name, value) in self.default_headers.iter().chain(&request.headers) {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        builder
    }

    /// Waits between attempts when a retry delay is configured.
    ///
    /// On native targets: `tokio::time::sleep`. On WASM targets: no-op —
    /// edge functions prefer fast failure over sleeping, and
    /// `tokio::time::sleep` is not available.
    async fn wait_before_retry(&self) {
        let delay_ms = self.options.retry_delay_ms;
        if delay_ms == 0 {
            return;
        }

        #[cfg(not(target_arch = "wasm32"))]
        sleep(Duration::from_millis(delay_ms)).await;
    }
}

fn classify_transport(err: reqwest::Error, limit_ms: u64) -> CallError {
    if err.is_timeout() {
        CallError::TimedOut { limit_ms }
    } else {
        CallError::Transport(err)
    }
}

fn normalize_bearer(token: &str) -> String {
    let trimmed = token.trim();
    let prefix = trimmed.get(..7);
    if prefix.is_some_and(|value| value.eq_ignore_ascii_case("bearer ")) {
        trimmed.to_owned()
    } else {
        format!("Bearer {trimmed}")
    }
}
