/// Anthropic Messages / Message Batches API 客户端
///
/// 整个运行期间复用同一个 `reqwest::Client`，预热、提交、轮询和结果流共享连接池
use crate::clients::batch_api::{BatchApi, BetaFeature, ResultStream};
use crate::clients::jsonl::jsonl_records;
use crate::config::Config;
use crate::error::{ApiError, ConfigError};
use crate::models::{BatchJob, Message, MessageParams, SubRequest};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

const API_VERSION: &str = "2023-06-01";

/// Anthropic API 客户端
pub struct AnthropicClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct CreateBatchBody<'a> {
    requests: &'a [SubRequest],
}

impl AnthropicClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        if config.api_key.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar {
                var_name: "ANTHROPIC_API_KEY".to_string(),
            });
        }

        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(config.api_key.trim())
            .map_err(|e| ConfigError::HttpClient(format!("API 密钥包含非法字符: {}", e)))?;
        headers.insert("x-api-key", api_key);
        headers.insert("anthropic-version", HeaderValue::from_static(API_VERSION));
        headers.insert("priority", HeaderValue::from_static("u=0"));
        headers.insert("cf-skip-cache", HeaderValue::from_static("true"));

        // 不做自动重试，连接保持长期可复用；TLS 握手通过 ALPN 协商 h2
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .http2_adaptive_window(true)
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(usize::MAX)
            .pool_idle_timeout(None::<Duration>)
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_features(request: RequestBuilder, features: &[BetaFeature]) -> RequestBuilder {
        if features.is_empty() {
            request
        } else {
            request.header("anthropic-beta", BetaFeature::header_value(features))
        }
    }

    /// 发送请求并把响应体解析为 JSON
    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(endpoint, request).await?;
        let body = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
            what: format!("{} 的响应", endpoint),
            source,
        })
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<Response, ApiError> {
        debug!("请求 {}", endpoint);
        let response = request.send().await.map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl BatchApi for AnthropicClient {
    async fn create_message(
        &self,
        params: &MessageParams,
        features: &[BetaFeature],
    ) -> Result<Message, ApiError> {
        let endpoint = "/v1/messages";
        let request = self.http.post(self.url(endpoint)).json(params);
        self.send_json(endpoint, Self::with_features(request, features))
            .await
    }

    async fn create_batch(
        &self,
        requests: &[SubRequest],
        features: &[BetaFeature],
    ) -> Result<BatchJob, ApiError> {
        let endpoint = "/v1/messages/batches";
        let request = self
            .http
            .post(self.url(endpoint))
            .json(&CreateBatchBody { requests });
        self.send_json(endpoint, Self::with_features(request, features))
            .await
    }

    async fn retrieve_batch(&self, batch_id: &str) -> Result<BatchJob, ApiError> {
        let endpoint = format!("/v1/messages/batches/{}", batch_id);
        let request = Self::with_features(
            self.http.get(self.url(&endpoint)),
            &[BetaFeature::MessageBatches],
        );
        self.send_json(&endpoint, request).await
    }

    async fn stream_batch_results(&self, batch_id: &str) -> Result<ResultStream, ApiError> {
        let endpoint = format!("/v1/messages/batches/{}/results", batch_id);
        let request = Self::with_features(
            self.http.get(self.url(&endpoint)),
            &[BetaFeature::MessageBatches],
        );
        let response = self.send(&endpoint, request).await?;

        let stream_endpoint = endpoint.clone();
        Ok(jsonl_records(
            response.bytes_stream(),
            endpoint,
            move |source| ApiError::Transport {
                endpoint: stream_endpoint.clone(),
                source,
            },
        ))
    }
}
