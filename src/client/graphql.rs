use super::retry::{retry_transient, RetryPolicy};
use crate::config::MondayConfig;
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// GraphQL 请求体
#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest {
    pub query: String,
    pub variables: Value,
}

/// 原始响应 (尚未区分限流/错误)
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    /// Retry-After 头 (秒)
    pub retry_after: Option<Duration>,
    pub body: Value,
}

impl TransportResponse {
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            retry_after: None,
            body,
        }
    }
}

/// 发送 GraphQL 请求的底层通道
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn send(&self, request: &GraphqlRequest) -> Result<TransportResponse>;
}

/// 基于 reqwest 的 HTTP 通道
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    api_url: String,
}

impl HttpTransport {
    pub fn new(config: &MondayConfig) -> Result<Self> {
        let api_key = config.api_key.as_deref().ok_or(ReportError::MissingApiKey)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(api_key)
                .map_err(|e| ReportError::Config(format!("invalid MONDAY_API_KEY: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "api-version",
            HeaderValue::from_str(&config.api_version)
                .map_err(|e| ReportError::Config(format!("invalid API version: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }
}

#[async_trait]
impl GraphqlTransport for HttpTransport {
    async fn send(&self, request: &GraphqlRequest) -> Result<TransportResponse> {
        let response = self.client.post(&self.api_url).json(request).send().await?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let text = response.text().await?;
        let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

        Ok(TransportResponse {
            status,
            retry_after,
            body,
        })
    }
}

/// 是否为限流类错误码 (complexity / minute / daily / field rate / concurrency)
pub fn is_rate_limit_code(code: &str) -> bool {
    let code = code.to_ascii_lowercase();
    code.contains("complexity")
        || code.contains("rate_limit")
        || code.contains("ratelimit")
        || code.contains("daily_limit")
        || code.contains("concurrency")
}

fn error_code(error: &Value) -> Option<&str> {
    error
        .pointer("/extensions/code")
        .or_else(|| error.get("error_code"))
        .and_then(Value::as_str)
}

fn retry_hint(error: &Value) -> Option<Duration> {
    error
        .pointer("/extensions/retry_in_seconds")
        .or_else(|| error.get("retry_in_seconds"))
        .and_then(Value::as_f64)
        .filter(|secs| *secs >= 0.0)
        .map(Duration::from_secs_f64)
}

/// 把原始响应解释为 data 或错误
pub fn interpret(response: TransportResponse) -> Result<Value> {
    let TransportResponse {
        status,
        retry_after,
        mut body,
    } = response;

    // 新版 errors 数组，旧版顶层 error_code
    let raw_errors = body.get_mut("errors").map(Value::take);
    let errors: Vec<Value> = match raw_errors {
        Some(Value::Array(errors)) if !errors.is_empty() => errors,
        _ if body.get("error_code").is_some() => vec![body.clone()],
        _ => Vec::new(),
    };

    let limited = errors
        .iter()
        .find(|e| error_code(e).is_some_and(is_rate_limit_code));

    if status == 429 || limited.is_some() {
        let hint = retry_after.or_else(|| limited.and_then(retry_hint));
        return Err(ReportError::RateLimited { retry_after: hint });
    }

    if !errors.is_empty() {
        let message = errors
            .iter()
            .map(|e| {
                e.get("message")
                    .or_else(|| e.get("error_message"))
                    .and_then(Value::as_str)
                    .unwrap_or("unknown error")
            })
            .collect::<Vec<_>>()
            .join(", ");
        tracing::error!("Monday GraphQL errors: {}", message);
        return Err(ReportError::Upstream {
            message,
            details: Value::Array(errors),
        });
    }

    if !(200..300).contains(&status) {
        return Err(ReportError::Upstream {
            message: format!("HTTP {status}"),
            details: body,
        });
    }

    let data = body.get_mut("data").map(Value::take);
    match data {
        Some(data) if !data.is_null() => Ok(data),
        _ => Err(ReportError::Upstream {
            message: "no data in response".to_string(),
            details: body,
        }),
    }
}

/// monday GraphQL 客户端 (带限流重试)
#[derive(Clone)]
pub struct MondayClient {
    transport: Arc<dyn GraphqlTransport>,
    retry: RetryPolicy,
}

impl MondayClient {
    pub fn new(transport: Arc<dyn GraphqlTransport>, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }

    pub fn from_config(config: &MondayConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(
            Arc::new(transport),
            RetryPolicy::with_max_attempts(config.max_attempts),
        ))
    }

    /// 执行查询并反序列化 data
    pub async fn query<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let request = GraphqlRequest {
            query: query.to_string(),
            variables,
        };
        let transport = self.transport.as_ref();
        let request = &request;

        let data = retry_transient(&self.retry, move || async move {
            interpret(transport.send(request).await?)
        })
        .await?;

        Ok(serde_json::from_value(data)?)
    }
}
