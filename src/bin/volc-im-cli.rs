//! 火山引擎 IM 命令行工具
//!
//! 通过 `volc.im.<method>` 处理器调用 OpenAPI，结果以 JSON 输出到 stdout

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use volc_im_sdk::im::process::{self, GROUP, METHODS};
use volc_im_sdk::{ClientConfig, ImClient, VolcConfig};

/// 火山引擎 IM CLI
#[derive(Parser, Debug)]
#[command(name = "volc-im-cli")]
#[command(about = "火山引擎 IM CLI - 调用服务端 OpenAPI", long_about = None)]
struct Args {
    /// volcengine.yml 路径，不指定时从环境变量（.env）读取
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别（默认: warn,volc_im_sdk=info）
    #[arg(long, default_value = "warn,volc_im_sdk=info")]
    log_level: String,

    /// 额外把日志写入该文件
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 调用处理器，例如: call sendMessage '{"ConversationShortId":1,...}'
    Call {
        /// 方法名，可带 volc.im. 前缀
        method: String,
        /// JSON 参数
        #[arg(default_value = "{}")]
        args: String,
    },
    /// 为用户签发 AppToken
    Token {
        #[arg(long)]
        user_id: i64,
        /// 过期时长（分钟），默认 3600
        #[arg(long)]
        expire_minutes: Option<i64>,
    },
    /// 列出所有方法
    Methods,
}

/// 初始化日志（stderr，可选同时输出到文件）
fn init_logger(log_level: &str, log_file: Option<&PathBuf>) -> Result<()> {
    use std::fs::OpenOptions;
    use std::io;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    // 优先使用环境变量 RUST_LOG（如果设置了），否则使用命令行参数
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // stdout 留给 JSON 结果，日志走 stderr
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(true);

    // 文件不需要颜色
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("无法创建日志文件 {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_file(true)
                    .with_line_number(true)
                    .with_target(false)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(path) = log_file {
        info!("[CLI] 📝 日志已同时输出到文件: {}", path.display());
    }
    Ok(())
}

fn load_client(config: Option<&PathBuf>) -> Result<ImClient> {
    let volc = match config {
        Some(path) => VolcConfig::from_yaml_file(path)?,
        None => VolcConfig::from_env()?,
    };
    ImClient::new(ClientConfig::from_volc_config(&volc)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(&args.log_level, args.log_file.as_ref())?;

    match args.command {
        Command::Methods => {
            for method in METHODS {
                println!("{}.{}", GROUP, method);
            }
        }
        Command::Token {
            user_id,
            expire_minutes,
        } => {
            let client = load_client(args.config.as_ref())?;
            let token = client.app_token(user_id, expire_minutes)?;
            println!("{}", serde_json::to_string_pretty(&token)?);
        }
        Command::Call { method, args: raw } => {
            let client = load_client(args.config.as_ref())?;
            let params: serde_json::Value =
                serde_json::from_str(&raw).context("参数不是合法的 JSON")?;

            info!("[CLI] 🚀 调用 {}", method);
            let value = process::run(&client, &method, params).await?;

            if let Some(code) = value.get("Code").and_then(|c| c.as_i64()) {
                if code != 0 {
                    warn!(
                        "[CLI] ⚠️ 服务端返回错误: Code={}, Message={}",
                        code,
                        value.get("Message").and_then(|m| m.as_str()).unwrap_or_default()
                    );
                }
            }
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}
