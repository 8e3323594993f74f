use serde_derive::Deserialize;
use serde_derive::Serialize;

use log::{error, warn};
use std::fs::File;
use std::io::prelude::*;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_directory")]
    directory: String,
    #[serde(default)]
    worker_threads: usize,
    #[serde(default = "default_read_buffer_size")]
    read_buffer_size: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4221
}

fn default_directory() -> String {
    "./".to_string()
}

fn default_read_buffer_size() -> usize {
    1024
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            directory: default_directory(),
            worker_threads: num_cpus::get(),
            read_buffer_size: default_read_buffer_size(),
        }
    }

    /// 从 TOML 文件读取配置。文件不存在或格式错误时使用默认配置。
    pub fn from_toml(filename: &str) -> Self {
        let mut str_val = String::new();
        let read = File::open(filename).and_then(|mut file| file.read_to_string(&mut str_val));
        if let Err(e) = read {
            warn!("无法读取配置文件{}：{}，使用默认配置", filename, e);
            return Config::new();
        }

        match toml::from_str::<Config>(&str_val) {
            Ok(raw_config) => raw_config.normalized(),
            Err(e) => {
                error!("无法成功从配置文件构建配置对象，使用默认配置：{}", e);
                Config::new()
            }
        }
    }

    /// 用命令行给出的目录覆盖配置文件中的目录
    pub fn with_directory(mut self, directory: &str) -> Self {
        self.directory = directory.to_string();
        self.normalized()
    }

    fn normalized(mut self) -> Self {
        if self.worker_threads == 0 {
            self.worker_threads = num_cpus::get();
        }
        if self.read_buffer_size == 0 {
            warn!("read_buffer_size被设置为0，该值将被改为{}。", default_read_buffer_size());
            self.read_buffer_size = default_read_buffer_size();
        }
        // 文件路径由目录与文件名直接拼接
        if !self.directory.ends_with('/') {
            self.directory.push('/');
        }
        self
    }
}

impl Config {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// 监听地址，形如 `0.0.0.0:4221`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    pub fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }
}
