//! Transport boundary between the Tempo services and the HTTP stack.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client as HttpClient, Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::TempoConfig;
use crate::error::{ApiError, TransportError};

/// Status line, headers and final URL of an HTTP exchange.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub url: Url,
}

impl ResponseMeta {
    fn from_response(response: &Response) -> Self {
        Self {
            status: response.status(),
            headers: response.headers().clone(),
            url: response.url().clone(),
        }
    }
}

/// A request ready to be executed by a [`Transport`].
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Value>,
}

/// Successful response whose body has not been decoded yet.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub meta: ResponseMeta,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn json<T>(&self) -> std::result::Result<T, serde_json::Error>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(&self.body)
    }
}

/// Builds and executes requests on behalf of the services.
///
/// Implementations classify non-success statuses as errors. They may be
/// shared between services and must not hold per-call state.
#[async_trait]
pub trait Transport: Send + Sync {
    fn new_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> std::result::Result<ApiRequest, TransportError>;

    async fn execute(&self, request: ApiRequest) -> std::result::Result<RawResponse, TransportError>;
}

/// Executes `request` and decodes a successful body into `T`.
pub async fn execute_json<T>(
    transport: &dyn Transport,
    request: ApiRequest,
) -> crate::Result<(T, ResponseMeta)>
where
    T: DeserializeOwned,
{
    let raw = transport.execute(request).await?;
    match raw.json::<T>() {
        Ok(value) => Ok((value, raw.meta)),
        Err(err) => Err(ApiError::wrap(Some(raw.meta), TransportError::Decode(err))),
    }
}

/// reqwest-backed transport talking to a Jira server.
#[derive(Clone)]
pub struct HttpTransport {
    http: HttpClient,
    config: TempoConfig,
}

impl HttpTransport {
    pub fn new(config: TempoConfig) -> std::result::Result<Self, TransportError> {
        let http = build_http_client(&config)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &TempoConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn new_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> std::result::Result<ApiRequest, TransportError> {
        let url = Url::parse(&self.config.api_root())
            .and_then(|base| base.join(path.trim_start_matches('/')))
            .map_err(|err| TransportError::InvalidRequest(err.to_string()))?;
        Ok(ApiRequest { method, url, body })
    }

    async fn execute(&self, request: ApiRequest) -> std::result::Result<RawResponse, TransportError> {
        let ApiRequest { method, url, body } = request;
        debug!(method = %method, url = %url, "sending tempo request");

        let mut builder = self.http.request(method, url);
        if let Some(payload) = &body {
            builder = builder.json(payload);
        }
        let response = builder.send().await?;
        let meta = ResponseMeta::from_response(&response);
        let status = meta.status;

        if status.is_success() {
            let body = response.bytes().await?.to_vec();
            debug!(status = %status, bytes = body.len(), "tempo response received");
            return Ok(RawResponse { meta, body });
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, url = %meta.url, "tempo request rejected");
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(TransportError::Authentication {
                response: meta,
                body,
            })
        } else {
            Err(TransportError::http(meta, body))
        }
    }
}

fn build_http_client(config: &TempoConfig) -> std::result::Result<HttpClient, TransportError> {
    let mut headers = HeaderMap::new();

    if let Some(credentials) = &config.credentials {
        let mut auth_value = header_value(credentials.header_value())?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
    }

    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, header_value(config.user_agent.clone())?);

    HttpClient::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()
        .map_err(|err| TransportError::Other(err.to_string()))
}

fn header_value(value: String) -> std::result::Result<HeaderValue, TransportError> {
    HeaderValue::from_str(&value).map_err(|err| TransportError::InvalidRequest(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_request_joins_path_onto_base_url() {
        let transport = HttpTransport::new(TempoConfig::new("https://jira.example.com/jira")).unwrap();
        let request = transport
            .new_request(Method::GET, "/rest/tempo-timesheets/3/worklogs?username=jdoe", None)
            .unwrap();

        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.url.as_str(),
            "https://jira.example.com/jira/rest/tempo-timesheets/3/worklogs?username=jdoe"
        );
        assert!(request.body.is_none());
    }

    #[test]
    fn invalid_base_url_is_rejected_when_building_requests() {
        let transport = HttpTransport::new(TempoConfig::new("not a url")).unwrap();
        let err = transport.new_request(Method::GET, "rest", None).unwrap_err();
        assert!(matches!(err, TransportError::InvalidRequest(_)));
    }

    #[test]
    fn header_values_with_newlines_are_rejected() {
        let err = HttpTransport::new(TempoConfig::new("https://jira.example.com").with_bearer_token("a\nb"))
            .err()
            .unwrap();
        assert!(matches!(err, TransportError::InvalidRequest(_)));
    }
}
