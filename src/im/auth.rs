//! 客户端鉴权：生成火山引擎 IM 的 AppToken
//!
//! 接口文档: https://www.volcengine.com/docs/6348/435387

use aes::{Aes128, Aes192, Aes256};
use anyhow::{Context, Result};
use base64::Engine;
use cbc::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// 默认过期时长（分钟）
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 3600;

const TOKEN_VERSION: u16 = 1;
const TOKEN_TYPE: u16 = 1;

const STANDARD_BASE: u32 = 256;
const TARGET_BASE: u32 = 62;

const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// getAppToken 的参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppTokenParams {
    pub user_id: i64,
    /// 过期时长（分钟）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_time: Option<i64>,
}

/// 生成的 AppToken
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AppToken {
    pub token: String,
    pub user_id: i64,
    pub app_id: i32,
    /// 过期时间戳（毫秒）
    pub expire_time: i64,
}

/// 生成 AppToken
///
/// `expire_at_ms` 为过期时间戳（毫秒），`app_key` 为 base64 编码的应用密钥。
pub fn generate_token(app_id: i32, user_id: i64, expire_at_ms: i64, app_key: &str) -> Result<String> {
    let mut plain = Vec::with_capacity(24);
    plain.extend_from_slice(&TOKEN_VERSION.to_be_bytes());
    plain.extend_from_slice(&TOKEN_TYPE.to_be_bytes());
    plain.extend_from_slice(&app_id.to_be_bytes());
    plain.extend_from_slice(&user_id.to_be_bytes());
    plain.extend_from_slice(&expire_at_ms.to_be_bytes());

    let key = base64::engine::general_purpose::STANDARD
        .decode(app_key.trim())
        .context("AppKey 不是合法的 base64")?;
    let encrypted = encrypt_cbc(&key, &plain)?;

    let crc = crc32fast::hash(&encrypted);
    let mut output = Vec::with_capacity(8 + encrypted.len());
    output.extend_from_slice(&crc.to_be_bytes());
    output.extend_from_slice(&app_id.to_be_bytes());
    output.extend_from_slice(&encrypted);

    debug!(
        "[Auth] 生成 token: appId={}, userId={}, expireTime={}",
        app_id, user_id, expire_at_ms
    );
    Ok(encode_base62(&output))
}

/// 生成带过期时间的 AppToken，`ttl_minutes` 缺省为 [`DEFAULT_TOKEN_TTL_MINUTES`]
pub fn issue_app_token(
    app_id: i32,
    app_key: &str,
    user_id: i64,
    ttl_minutes: Option<i64>,
) -> Result<AppToken> {
    let expire_time = expire_time_after(ttl_minutes.unwrap_or(DEFAULT_TOKEN_TTL_MINUTES))?;
    let token = generate_token(app_id, user_id, expire_time, app_key)?;
    info!("[Auth] 🔐 已签发 AppToken: userId={}", user_id);
    Ok(AppToken {
        token,
        user_id,
        app_id,
        expire_time,
    })
}

/// 当前时间之后 `minutes` 分钟的毫秒时间戳，`minutes` 必须为正且不溢出
pub fn expire_time_after(minutes: i64) -> Result<i64> {
    if minutes <= 0 {
        return Err(anyhow::anyhow!("ExpireTime 必须大于 0（分钟）: {}", minutes));
    }
    minutes
        .checked_mul(60 * 1000)
        .and_then(|ms| chrono::Utc::now().timestamp_millis().checked_add(ms))
        .with_context(|| format!("ExpireTime 超出范围（分钟）: {}", minutes))
}

/// AES-CBC + PKCS#7，IV 为密钥前 16 字节
fn encrypt_cbc(key: &[u8], plain: &[u8]) -> Result<Vec<u8>> {
    if key.len() < 16 {
        return Err(anyhow::anyhow!("AppKey 长度无效: {} 字节", key.len()));
    }
    let iv = &key[..16];
    let invalid = |_| anyhow::anyhow!("AppKey 长度无效: {} 字节", key.len());
    let encrypted = match key.len() {
        16 => cbc::Encryptor::<Aes128>::new_from_slices(key, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<Pkcs7>(plain),
        24 => cbc::Encryptor::<Aes192>::new_from_slices(key, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<Pkcs7>(plain),
        32 => cbc::Encryptor::<Aes256>::new_from_slices(key, iv)
            .map_err(invalid)?
            .encrypt_padded_vec_mut::<Pkcs7>(plain),
        n => return Err(anyhow::anyhow!("AppKey 长度无效: {} 字节", n)),
    };
    Ok(encrypted)
}

/// 将字节编码为 base62 字符串，前导 0 字节保留为前导 '0'
pub(crate) fn encode_base62(input: &[u8]) -> String {
    convert(input, STANDARD_BASE, TARGET_BASE)
        .into_iter()
        .map(|digit| ALPHABET[digit as usize] as char)
        .collect()
}

/// 任意进制之间的转换，输入输出均为"数位"序列（高位在前）
pub(crate) fn convert(input: &[u8], source_base: u32, target_base: u32) -> Vec<u8> {
    let zero_count = input.iter().take_while(|&&b| b == 0).count();
    let mut output = Vec::with_capacity(estimate_output_length(
        input.len(),
        source_base,
        target_base,
    ));

    let mut current = input.to_vec();
    while !current.is_empty() {
        let mut quotient = Vec::with_capacity(current.len());
        let mut remainder: u32 = 0;
        for &b in &current {
            let accumulator = b as u32 + remainder * source_base;
            let digit = accumulator / target_base;
            remainder = accumulator % target_base;
            if !quotient.is_empty() || digit > 0 {
                quotient.push(digit as u8);
            }
        }
        output.push(remainder as u8);
        current = quotient;
    }

    output.extend(std::iter::repeat(0).take(zero_count));
    output.reverse();
    output
}

fn estimate_output_length(input_length: usize, source_base: u32, target_base: u32) -> usize {
    ((source_base as f64).ln() / (target_base as f64).ln() * input_length as f64).ceil() as usize
}
