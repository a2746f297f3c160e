//! CloudStack API client
//!
//! Speaks the CloudStack HTTP query API: every call is a signed GET with
//! `command`, `apiKey` and `response=json`. Asynchronous commands return a
//! job id which is polled through `queryAsyncJobResult` until the job
//! finishes or the async timeout elapses.

use crate::api::AsyncJobResult;
use crate::error::{CloudStackError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha1::Sha1;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::Instant;

const DEFAULT_ASYNC_TIMEOUT: Duration = Duration::from_secs(300);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const JOB_PENDING: i64 = 0;
const JOB_SUCCEEDED: i64 = 1;
const JOB_FAILED: i64 = 2;

/// Command parameters, kept sorted for signing
pub type Params = BTreeMap<String, String>;

/// Client bound to one endpoint and key pair
pub struct CloudStackClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    secret_key: String,
    async_timeout: Duration,
    poll_interval: Duration,
}

impl CloudStackClient {
    /// Create a client; no request is made until the first API call
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        verify_ssl: bool,
    ) -> Result<Self> {
        let endpoint = endpoint.into();
        if !verify_ssl {
            tracing::warn!("TLS certificate validation disabled for {}", endpoint);
        }

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!verify_ssl)
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CloudStackError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            async_timeout: DEFAULT_ASYNC_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    pub fn with_async_timeout(mut self, timeout: Duration) -> Self {
        self.async_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Full signed request URL for `command`
    pub(crate) fn request_url(&self, command: &str, mut params: Params) -> Result<String> {
        if self.endpoint.is_empty() {
            return Err(CloudStackError::InvalidConfig(
                "CloudStack endpoint is empty".to_string(),
            ));
        }

        params.insert("command".to_string(), command.to_string());
        params.insert("response".to_string(), "json".to_string());
        params.insert("apiKey".to_string(), self.api_key.clone());

        let query = encode_params(&params);
        let signature = sign(&query, &self.secret_key)?;
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };

        Ok(format!(
            "{}{}{}&signature={}",
            self.endpoint,
            separator,
            query,
            escape(&signature)
        ))
    }

    /// Issue a synchronous command and return its response object
    pub async fn request(&self, command: &str, params: Params) -> Result<Value> {
        let url = self.request_url(command, params)?;
        tracing::debug!("CloudStack request: {} ({})", command, self.endpoint);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let parsed: Value = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                CloudStackError::JsonError(e)
            } else {
                CloudStackError::Api {
                    code: i64::from(status.as_u16()),
                    text: body.trim().to_string(),
                }
            }
        })?;

        let inner = response_object(command, parsed)?;
        if let Some(code) = inner.get("errorcode").and_then(Value::as_i64) {
            return Err(CloudStackError::Api {
                code,
                text: error_text(&inner),
            });
        }
        if !status.is_success() {
            return Err(CloudStackError::Api {
                code: i64::from(status.as_u16()),
                text: error_text(&inner),
            });
        }

        Ok(inner)
    }

    /// Issue an asynchronous command and wait for its job result
    pub async fn request_async(&self, command: &str, params: Params) -> Result<Value> {
        let response = self.request(command, params).await?;
        let job_id = response
            .get("jobid")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                CloudStackError::UnexpectedResponse(format!("{} returned no jobid", command))
            })?
            .to_string();

        tracing::debug!("{} queued as async job {}", command, job_id);
        self.wait_for_job(&job_id).await
    }

    /// Poll `queryAsyncJobResult` until the job leaves the pending state
    pub async fn wait_for_job(&self, job_id: &str) -> Result<Value> {
        let deadline = Instant::now() + self.async_timeout;

        loop {
            let mut params = Params::new();
            params.insert("jobid".to_string(), job_id.to_string());
            let job: AsyncJobResult =
                serde_json::from_value(self.request("queryAsyncJobResult", params).await?)?;

            match job.jobstatus {
                JOB_SUCCEEDED => return Ok(job.jobresult.unwrap_or(Value::Null)),
                JOB_FAILED => {
                    let result = job.jobresult.unwrap_or(Value::Null);
                    return Err(CloudStackError::JobFailed {
                        job_id: job_id.to_string(),
                        code: result
                            .get("errorcode")
                            .and_then(Value::as_i64)
                            .unwrap_or(job.jobresultcode),
                        text: error_text(&result),
                    });
                }
                JOB_PENDING => {}
                other => {
                    return Err(CloudStackError::UnexpectedResponse(format!(
                        "async job {} has unknown status {}",
                        job_id, other
                    )));
                }
            }

            if Instant::now() >= deadline {
                return Err(CloudStackError::Timeout {
                    job_id: job_id.to_string(),
                    seconds: self.async_timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Unwrap `{"<command>response": {...}}`
///
/// Some error replies use `errorresponse` instead of the command key.
fn response_object(command: &str, parsed: Value) -> Result<Value> {
    let key = format!("{}response", command.to_lowercase());
    match parsed {
        Value::Object(mut map) => {
            if let Some(inner) = map.remove(&key) {
                return Ok(inner);
            }
            if let Some(inner) = map.remove("errorresponse") {
                return Ok(inner);
            }
            Err(CloudStackError::UnexpectedResponse(format!(
                "missing '{}' in response",
                key
            )))
        }
        other => Err(CloudStackError::UnexpectedResponse(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

fn error_text(value: &Value) -> String {
    value
        .get("errortext")
        .and_then(Value::as_str)
        .unwrap_or("Unknown error")
        .to_string()
}

fn escape(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

pub(crate) fn encode_params(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", escape(k), escape(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// HMAC-SHA1 over the lowercased query, base64 encoded
pub(crate) fn sign(query: &str, secret_key: &str) -> Result<String> {
    let mut mac = Hmac::<Sha1>::new_from_slice(secret_key.as_bytes())
        .map_err(|e| CloudStackError::InvalidConfig(e.to_string()))?;
    mac.update(query.to_lowercase().as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeCloudStack;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Parameters are sorted and spaces become %20
    #[test]
    fn test_encode_params_sorted_and_escaped() {
        let query = encode_params(&params(&[
            ("zoneid", "z 1"),
            ("command", "listZones"),
            ("name", "a+b/c"),
        ]));

        assert_eq!(query, "command=listZones&name=a%2Bb%2Fc&zoneid=z%201");
    }

    /// HMAC-SHA1 over the lowercased query
    #[test]
    fn test_signature_matches_reference() {
        let query = "apikey=miVr6X7u6bN_sdahOBpjNejPgEsT35eXq-jB8CG20YI3yaxXcgpyuaIRmFI_EJTVwZ0nUkkJbPmY3y2bciKwFQ&command=listUsers&response=json";
        let signature = sign(
            query,
            "Lxx1DM40AjcXU_8H6Tt1ilRl4BWqiDBsmKkzfLtc7YzmrsXQXfP6iC8qNr1-Uk-M5aCizIDDJFf81Rb6NeWIQ",
        )
        .unwrap();

        assert_eq!(signature, "K2BwdNffwBso6fXGiw3iaeoK1uA=");
    }

    /// The signed URL carries the command, key and signature but never the secret
    #[test]
    fn test_request_url_contains_auth_fields() {
        let client =
            CloudStackClient::new("http://cs.local/client/api", "AK", "secret-key-value", true)
                .unwrap();
        let url = client
            .request_url("listZones", params(&[("available", "true")]))
            .unwrap();

        assert!(url.starts_with("http://cs.local/client/api?"));
        assert!(url.contains("apiKey=AK"));
        assert!(url.contains("command=listZones"));
        assert!(url.contains("response=json"));
        assert!(url.contains("&signature="));
        assert!(!url.contains("secret-key-value"));
    }

    /// An empty endpoint fails on first use, not on construction
    #[test]
    fn test_empty_endpoint_is_rejected_on_use() {
        let client = CloudStackClient::new("", "AK", "SK", true).unwrap();

        let err = client.request_url("listZones", Params::new()).unwrap_err();
        assert!(matches!(err, CloudStackError::InvalidConfig(_)));
    }

    /// The command response envelope is unwrapped
    #[test]
    fn test_response_object_unwraps_command_key() {
        let parsed = serde_json::json!({"listzonesresponse": {"count": 1}});
        let inner = response_object("listZones", parsed).unwrap();
        assert_eq!(inner["count"], 1);

        let missing = response_object("listZones", serde_json::json!({"other": {}}));
        assert!(matches!(missing, Err(CloudStackError::UnexpectedResponse(_))));
    }

    /// errorcode/errortext become an Api error
    #[tokio::test]
    async fn test_request_maps_api_error() {
        let server = FakeCloudStack::serve(vec![(
            431,
            r#"{"listzonesresponse":{"uuidList":[],"errorcode":431,"cserrorcode":9999,"errortext":"Unable to find zone"}}"#,
        )])
        .await;
        let client = CloudStackClient::new(server.endpoint(), "AK", "SK", true).unwrap();

        let err = client.request("listZones", Params::new()).await.unwrap_err();
        match err {
            CloudStackError::Api { code, text } => {
                assert_eq!(code, 431);
                assert_eq!(text, "Unable to find zone");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    /// A non-JSON error page keeps the HTTP status
    #[tokio::test]
    async fn test_request_non_json_failure() {
        let server = FakeCloudStack::serve(vec![(503, "Service Unavailable")]).await;
        let client = CloudStackClient::new(server.endpoint(), "AK", "SK", true).unwrap();

        let err = client.request("listZones", Params::new()).await.unwrap_err();
        assert!(matches!(err, CloudStackError::Api { code: 503, .. }));
    }

    /// Pending jobs are polled until they finish
    #[tokio::test]
    async fn test_wait_for_job_polls_until_done() {
        let server = FakeCloudStack::serve(vec![
            (200, r#"{"queryasyncjobresultresponse":{"jobid":"j1","jobstatus":0}}"#),
            (
                200,
                r#"{"queryasyncjobresultresponse":{"jobid":"j1","jobstatus":1,"jobresultcode":0,"jobresult":{"ok":true}}}"#,
            ),
        ])
        .await;
        let client = CloudStackClient::new(server.endpoint(), "AK", "SK", true)
            .unwrap()
            .with_poll_interval(Duration::from_millis(10));

        let result = client.wait_for_job("j1").await.unwrap();

        assert_eq!(result["ok"], true);
        let requests = server.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].contains("command=queryAsyncJobResult"));
        assert!(requests[0].contains("jobid=j1"));
    }

    /// A failed job reports its error code and text
    #[tokio::test]
    async fn test_wait_for_job_reports_failure() {
        let server = FakeCloudStack::serve(vec![(
            200,
            r#"{"queryasyncjobresultresponse":{"jobid":"j2","jobstatus":2,"jobresultcode":530,"jobresult":{"errorcode":530,"errortext":"Insufficient capacity"}}}"#,
        )])
        .await;
        let client = CloudStackClient::new(server.endpoint(), "AK", "SK", true).unwrap();

        let err = client.wait_for_job("j2").await.unwrap_err();
        match err {
            CloudStackError::JobFailed { job_id, code, text } => {
                assert_eq!(job_id, "j2");
                assert_eq!(code, 530);
                assert_eq!(text, "Insufficient capacity");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    /// Polling stops at the async timeout
    #[tokio::test]
    async fn test_wait_for_job_times_out() {
        let server = FakeCloudStack::serve(vec![
            (200, r#"{"queryasyncjobresultresponse":{"jobid":"j3","jobstatus":0}}"#),
            (200, r#"{"queryasyncjobresultresponse":{"jobid":"j3","jobstatus":0}}"#),
        ])
        .await;
        let client = CloudStackClient::new(server.endpoint(), "AK", "SK", true)
            .unwrap()
            .with_async_timeout(Duration::from_millis(5))
            .with_poll_interval(Duration::from_millis(20));

        let err = client.wait_for_job("j3").await.unwrap_err();
        assert!(matches!(err, CloudStackError::Timeout { .. }));
    }
}
