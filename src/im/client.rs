//! 火山引擎 IM OpenAPI 客户端核心实现
//!
//! 负责请求构建、签名与 HTTP 发送，各业务 API 通过 [`ImClient`] 发起调用。

use crate::im::auth::{self, AppToken};
use crate::im::config::VolcConfig;
use crate::im::conversation::ConversationApi;
use crate::im::message::MessageApi;
use crate::im::sign::{self, Credentials};
use crate::im::types::{handle_http_response, ImResponse};
use crate::im::user::UserApi;
use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// 服务名（参与签名）
pub const SERVICE_NAME: &str = "im";
/// OpenAPI 版本
pub const API_VERSION: &str = "2020-12-01";
/// 默认 OpenAPI 地址
pub const DEFAULT_ENDPOINT: &str = "https://open.volcengineapi.com";
/// 默认区域
pub const DEFAULT_REGION: &str = "cn-north-1";
/// 支持的区域
pub const SUPPORTED_REGIONS: &[&str] = &["cn-north-1", "ap-southeast-1"];
/// 默认超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const JSON_CONTENT_TYPE: &str = "application/json";

/// 客户端配置
#[derive(Clone)]
pub struct ClientConfig {
    /// 应用 ID
    pub app_id: i64,
    /// 应用密钥（base64），仅用于生成 AppToken
    pub app_key: String,
    /// 访问凭证（包含区域与服务名）
    pub credentials: Credentials,
    /// OpenAPI 地址，例如 `https://open.volcengineapi.com`
    pub endpoint: String,
    /// OpenAPI 版本
    pub version: String,
    /// 请求超时
    pub timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("app_id", &self.app_id)
            .field("app_key", &"***")
            .field("credentials", &self.credentials)
            .field("endpoint", &self.endpoint)
            .field("version", &self.version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    /// 创建默认配置（cn-north-1）
    pub fn new(
        app_id: i64,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            app_id,
            app_key: String::new(),
            credentials: Credentials {
                access_key_id: access_key_id.into(),
                secret_access_key: secret_access_key.into(),
                session_token: None,
                region: DEFAULT_REGION.to_string(),
                service: SERVICE_NAME.to_string(),
            },
            endpoint: DEFAULT_ENDPOINT.to_string(),
            version: API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// 切换区域，不支持的区域返回错误
    pub fn with_region(mut self, region: &str) -> Result<Self> {
        if !SUPPORTED_REGIONS.contains(&region) {
            return Err(anyhow::anyhow!("Im not support region {}", region));
        }
        self.credentials.region = region.to_string();
        Ok(self)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_app_key(mut self, app_key: impl Into<String>) -> Self {
        self.app_key = app_key.into();
        self
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.credentials.session_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 由 volcengine.yml / 环境变量配置构建
    pub fn from_volc_config(cfg: &VolcConfig) -> Result<Self> {
        let mut config = Self::new(
            cfg.im.app_id,
            cfg.creds.access_key_id.clone(),
            cfg.creds.secret_access_key.clone(),
        )
        .with_app_key(cfg.im.app_key.clone())
        .with_region(cfg.region.as_deref().unwrap_or(DEFAULT_REGION))?;

        if let Some(endpoint) = &cfg.endpoint {
            config = config.with_endpoint(endpoint.clone());
        }
        if let Some(token) = &cfg.creds.session_token {
            config = config.with_session_token(token.clone());
        }
        if let Some(secs) = cfg.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }
}

/// 火山引擎 IM 客户端
///
/// 可廉价克隆，内部共享连接池。
#[derive(Clone)]
pub struct ImClient {
    config: Arc<ClientConfig>,
    http: reqwest::Client,
}

impl ImClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Url::parse(&config.endpoint)
            .with_context(|| format!("无效的 endpoint: {}", config.endpoint))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(100)
            .pool_idle_timeout(Duration::from_secs(60))
            .build()
            .context("创建 HTTP 客户端失败")?;

        info!(
            "[ImAPI] 客户端已创建: appId={}, region={}, endpoint={}",
            config.app_id, config.credentials.region, config.endpoint
        );

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn app_id(&self) -> i64 {
        self.config.app_id
    }

    /// 用户相关 API
    pub fn users(&self) -> UserApi {
        UserApi::new(self.clone())
    }

    /// 会话相关 API
    pub fn conversations(&self) -> ConversationApi {
        ConversationApi::new(self.clone())
    }

    /// 消息相关 API
    pub fn messages(&self) -> MessageApi {
        MessageApi::new(self.clone())
    }

    /// 使用配置中的 AppId/AppKey 为用户签发 AppToken
    pub fn app_token(&self, user_id: i64, ttl_minutes: Option<i64>) -> Result<AppToken> {
        let app_id = i32::try_from(self.config.app_id)
            .with_context(|| format!("AppId 超出 int32 范围: {}", self.config.app_id))?;
        if self.config.app_key.is_empty() {
            return Err(anyhow::anyhow!("未配置 AppKey，无法生成 token"));
        }
        auth::issue_app_token(app_id, &self.config.app_key, user_id, ttl_minutes)
    }

    /// 发送一次 OpenAPI 调用并返回统一包装结构
    pub(crate) async fn call<B, T>(&self, action: &str, body: &B) -> Result<ImResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let operation_id = Uuid::new_v4().to_string();
        let mut url = Url::parse(&self.config.endpoint)
            .with_context(|| format!("无效的 endpoint: {}", self.config.endpoint))?;
        url.query_pairs_mut()
            .append_pair("Action", action)
            .append_pair("Version", &self.config.version);

        let payload = serde_json::to_vec(body).context("序列化请求体失败")?;

        info!("[ImAPI] 📡 请求 {}", action);
        debug!("[ImAPI]   请求URL: {}, 操作ID: {}", url, operation_id);
        debug!(
            "[ImAPI]   请求Body: {}",
            String::from_utf8_lossy(&payload)
        );

        let signed = sign::sign_request(
            &self.config.credentials,
            "POST",
            &url,
            JSON_CONTENT_TYPE,
            &payload,
            chrono::Utc::now(),
        );

        let mut request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(ACCEPT, JSON_CONTENT_TYPE);
        match signed {
            Some(signed) => {
                request = request
                    .header("X-Date", signed.x_date)
                    .header("X-Content-Sha256", signed.x_content_sha256)
                    .header(AUTHORIZATION, signed.authorization);
                if let Some(token) = signed.security_token {
                    request = request.header("X-Security-Token", token);
                }
            }
            None => debug!("[ImAPI]   未配置 AK/SK，跳过签名"),
        }

        let response = request
            .body(payload)
            .send()
            .await
            .with_context(|| format!("{} 请求失败", action))?;

        let resp = handle_http_response::<T>(response, action).await?;
        info!(
            "[ImAPI] ✅ {} 完成，Code: {}, Message: {}",
            action, resp.code, resp.message
        );
        Ok(resp)
    }
}
