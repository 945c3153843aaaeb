//! 火山引擎配置（volcengine.yml 或环境变量）

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::info;

/// volcengine.yml 的结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolcConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub creds: Creds,
    #[serde(default)]
    pub im: ImSettings,
    /// 区域，缺省 cn-north-1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// OpenAPI 地址，缺省 https://open.volcengineapi.com
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Creds {
    #[serde(rename = "accessKeyId", default)]
    pub access_key_id: String,
    #[serde(rename = "secretAccessKey", default)]
    pub secret_access_key: String,
    #[serde(rename = "sessionToken", default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

impl std::fmt::Debug for Creds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Creds")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .finish()
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ImSettings {
    #[serde(rename = "appid", default)]
    pub app_id: i64,
    #[serde(rename = "appkey", default)]
    pub app_key: String,
}

impl std::fmt::Debug for ImSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImSettings")
            .field("app_id", &self.app_id)
            .field("app_key", &"***")
            .finish()
    }
}

fn default_name() -> String {
    "volcengine".to_string()
}

impl VolcConfig {
    /// 解析 YAML 文本
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("parse volcengine.yml failed")
    }

    /// 读取并解析 volcengine.yml
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read {} failed", path.display()))?;
        let config = Self::from_yaml_str(&text)?;
        info!("[Config] 已加载配置文件: {}", path.display());
        Ok(config)
    }

    /// 从环境变量读取（先加载 .env）
    ///
    /// 必需：VOLC_ACCESS_KEY_ID、VOLC_SECRET_ACCESS_KEY、VOLC_IM_APP_ID、VOLC_IM_APP_KEY
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let required = |key: &str| env::var(key).with_context(|| format!("缺少环境变量 {}", key));
        let app_id = required("VOLC_IM_APP_ID")?
            .trim()
            .parse::<i64>()
            .context("VOLC_IM_APP_ID 必须是整数")?;

        Ok(Self {
            name: default_name(),
            creds: Creds {
                access_key_id: required("VOLC_ACCESS_KEY_ID")?,
                secret_access_key: required("VOLC_SECRET_ACCESS_KEY")?,
                session_token: env::var("VOLC_SESSION_TOKEN").ok(),
            },
            im: ImSettings {
                app_id,
                app_key: required("VOLC_IM_APP_KEY")?,
            },
            region: env::var("VOLC_REGION").ok(),
            endpoint: env::var("VOLC_IM_ENDPOINT").ok(),
            timeout_secs: env::var("VOLC_IM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok()),
        })
    }
}
