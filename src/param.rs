// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 协议参数与常量模块
//!
//! 该模块定义了服务器遵循的 HTTP 协议相关常量和数据结构，包括：
//! - 服务器会用到的 HTTP 状态码及其原因短语（Reason Phrase）。
//! - 响应中使用的 MIME 类型与标头名称。
//! - 受支持的内容编码（压缩）格式。

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;

/// HTTP 协议规定的换行符（Carriage Return Line Feed）
pub const CRLF: &str = "\r\n";

/// 响应状态行中使用的协议版本
pub const HTTP_VERSION: &str = "HTTP/1.1";

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_ENCODING: &str = "Content-Encoding";
pub const ACCEPT_ENCODING: &str = "Accept-Encoding";
pub const USER_AGENT: &str = "User-Agent";

pub const MIME_TEXT_PLAIN: &str = "text/plain";
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";

/// 服务器当前支持的压缩编码
pub const SUPPORTED_ENCODINGS: [HttpEncoding; 1] = [HttpEncoding::Gzip];

lazy_static! {
    /// HTTP 状态码与其对应的原因短语映射表。
    ///
    /// 500 沿用了服务器一直以来对外发送的 `Server Error` 短语。
    pub static ref STATUS_CODES: HashMap<u16, &'static str> = {
        let mut map = HashMap::new();
        map.insert(200, "OK");
        map.insert(201, "Created");
        map.insert(400, "Bad Request");
        map.insert(404, "Not Found");
        map.insert(500, "Server Error");
        map
    };
}

/// 支持的内容编码（压缩）格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpEncoding {
    /// GNU zip 压缩
    Gzip,
}

impl HttpEncoding {
    /// 将 `Accept-Encoding` 中的单个编码标识转换为枚举，不认识的标识返回 `None`。
    pub fn from_token(token: &str) -> Option<Self> {
        SUPPORTED_ENCODINGS
            .iter()
            .copied()
            .find(|encoding| encoding.as_str() == token)
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            HttpEncoding::Gzip => "gzip",
        }
    }
}

impl fmt::Display for HttpEncoding {
    /// 将枚举格式化为 `Content-Encoding` 头所使用的标识符
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
