// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # Exception 模块
//!
//! 该模块定义了服务器在一次请求/响应周期中可能出现的各类异常情况。
//!
//! ## 设计意图
//! - **错误分类**：涵盖报文解析错误、压缩编码错误以及文件读写错误。
//! - **语义映射**：每个变体都可以通过 [`Exception::status_code`] 转化为对应的 HTTP 状态码。
//! - **用户友好**：通过实现 `std::fmt::Display`，确保错误信息可以被安全地记录到日志中。

use std::fmt;

/// 服务器处理请求过程中发生的异常类型。
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Exception {
    /// 请求行缺失（找不到第一个 CRLF），或者请求行中没有方法和路径两个字段。
    MalformedRequestLine,
    /// `Content-Length` 标头无法解析为非负整数。
    InvalidContentLength,
    /// `Content-Length` 声明的长度超过了缓冲区中实际剩余的字节数。
    BodyOutOfRange,
    /// 请求的压缩编码不受支持（目前仅支持 gzip）。
    UnsupportedEncoding,
    /// 压缩器在写入或收尾时失败。
    CompressionFailed,
    /// 在文件目录下未找到所请求的文件。对应 `404 Not Found`。
    FileNotFound,
    /// 写入文件失败。对应 `500 Server Error`。
    FileWriteFailed,
    /// 路由需要的路径分段不存在，例如 `/echo` 后面没有内容。对应 `400 Bad Request`。
    MissingPathSegment,
}

use Exception::*;

impl Exception {
    /// 该异常在需要产生响应时所对应的状态码。
    pub fn status_code(&self) -> u16 {
        match self {
            MalformedRequestLine | InvalidContentLength | BodyOutOfRange | MissingPathSegment => {
                400
            }
            FileNotFound => 404,
            UnsupportedEncoding | CompressionFailed | FileWriteFailed => 500,
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedRequestLine => write!(f, "malformed request line"),
            InvalidContentLength => write!(f, "invalid Content-Length"),
            BodyOutOfRange => write!(f, "Content-Length exceeds the received body"),
            UnsupportedEncoding => write!(f, "unsupported"),
            CompressionFailed => write!(f, "An error occurred while compressing the body"),
            FileNotFound => write!(f, "File not found (404)"),
            FileWriteFailed => write!(f, "Couldn't write file (500)"),
            MissingPathSegment => write!(f, "Missing path segment (400)"),
        }
    }
}

impl std::error::Error for Exception {}
