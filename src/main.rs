// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 最小 HTTP/1.1 服务器
//!
//! 基于 Tokio 运行时的多线程服务器，每个连接只处理一个请求。
//! 核心功能包括：
//! - 健康检查、文本回显与 User-Agent 回显
//! - 文件目录下的文件读取与写入
//! - 基于 `Accept-Encoding` 的 gzip 压缩

use std::process;

use clap::Parser;
use log::{error, info};
use tokio::runtime::Builder;

use http_server::{Config, Server};

const LOG_CONFIG: &str = "config/log4rs.yaml";
const DEFAULT_CONFIG: &str = "config/development.toml";

/// Minimal HTTP/1.1 echo and file server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML 配置文件
    #[arg(long, default_value = DEFAULT_CONFIG)]
    config: String,

    /// 覆盖配置文件中的文件目录
    #[arg(long)]
    directory: Option<String>,
}

fn main() {
    let args = Args::parse();

    // 1. 初始化日志系统：log4rs 通过外部 YAML 配置级别与输出目的地
    if let Err(e) = log4rs::init_file(LOG_CONFIG, Default::default()) {
        eprintln!("无法加载日志配置{}：{}", LOG_CONFIG, e);
    }

    // 2. 配置加载：TOML 文件 + 命令行覆盖
    let mut config = Config::from_toml(&args.config);
    if let Some(directory) = &args.directory {
        config = config.with_directory(directory);
    }
    info!("配置文件已载入：{}", args.config);

    // 3. 异步运行时：按配置分配工作线程数
    let runtime = match Builder::new_multi_thread()
        .worker_threads(config.worker_threads())
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("无法创建Tokio运行时：{}", e);
            process::exit(1);
        }
    };

    let result = runtime.block_on(async {
        let server = Server::bind(&config).await?;
        server.run().await
    });

    if let Err(e) = result {
        error!("服务器退出：{}", e);
        process::exit(1);
    }
}
