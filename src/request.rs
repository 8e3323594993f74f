// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HTTP 请求处理模块
//!
//! 该模块负责将 TCP 流中读取的原始字节解析为 `Request` 结构体。它涵盖了：
//! 1. 请求行（Request-Line）的解析（方法、路径）。
//! 2. 标头（Headers）的提取，键名大小写敏感，重复时以最后一次出现为准。
//! 3. 基于 `Content-Length` 的请求体截取。
//!
//! 解析器只处理驱动层交给它的那一块固定大小的缓冲区，超出缓冲区的数据会被截断。

use std::collections::HashMap;

use bytes::Bytes;
use log::{error, warn};

use crate::{exception::Exception, param::*};

/// 表示一个完整的 HTTP 请求。
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP 请求方法，除了必须存在以外不做任何校验
    method: String,
    /// 请求的资源路径，总是以 `/` 开头
    path: String,
    /// 请求标头，键名保持客户端发送时的大小写
    headers: HashMap<String, String>,
    /// 请求体
    body: Bytes,
}

impl Request {
    /// 从原始字节缓冲区尝试构建 `Request` 实例。
    ///
    /// # 逻辑步骤
    /// 1. 在第一个 CRLF 处切分出请求行，找不到 CRLF 即视为请求行非法。
    /// 2. 按单个空格切分请求行，取前两项作为方法和路径。
    /// 3. 按 CRLF 切分剩余部分，最后一段是请求体片段，其余非空行都是标头。
    /// 4. 若存在 `Content-Length`，请求体为片段的前 N 个字节；否则为整个片段（包括缓冲区的填充字节）。
    ///
    /// # 参数
    /// * `buffer` - 从网络 Socket 读取的原始数据。
    /// * `id` - 连接 ID，用于在多线程环境下追踪日志。
    pub fn try_from(buffer: &[u8], id: u128) -> Result<Self, Exception> {
        let (request_line, rest) = match split_once_crlf(buffer) {
            Some(parts) => parts,
            None => {
                error!("[ID{}]HTTP请求中找不到请求行", id);
                return Err(Exception::MalformedRequestLine);
            }
        };

        // 1. 解析请求行 (e.g., "GET /index.html HTTP/1.1")
        let request_line = String::from_utf8_lossy(request_line);
        let mut first_line_parts = request_line.split(' ');
        let method = first_line_parts.next().filter(|m| !m.is_empty());
        let path = first_line_parts.next().filter(|p| p.starts_with('/'));
        let (method, path) = match (method, path) {
            (Some(method), Some(path)) => (method.to_string(), path.to_string()),
            _ => {
                error!("[ID{}]HTTP请求行格式不正确：{}", id, request_line);
                return Err(Exception::MalformedRequestLine);
            }
        };

        // 2. 最后一段是请求体片段，之前的都是标头行
        let mut lines = split_crlf(rest);
        let fragment = lines.pop().unwrap_or_default();

        let mut headers = HashMap::new();
        for line in lines {
            // 空行是标头与请求体之间的分隔
            if line.is_empty() {
                continue;
            }
            let line = String::from_utf8_lossy(line);
            match line.split_once(':') {
                Some((name, value)) => {
                    headers.insert(name.to_string(), value.trim().to_string());
                }
                None => warn!("[ID{}]忽略无法解析的标头行：{}", id, line),
            }
        }

        // 3. 截取请求体
        let body = match headers.get(CONTENT_LENGTH) {
            None => Bytes::copy_from_slice(fragment),
            Some(value) => {
                let length = match value.parse::<usize>() {
                    Ok(length) => length,
                    Err(_) => {
                        error!("[ID{}]无法解析Content-Length：{}", id, value);
                        return Err(Exception::InvalidContentLength);
                    }
                };
                match fragment.get(..length) {
                    Some(body) => Bytes::copy_from_slice(body),
                    None => {
                        error!(
                            "[ID{}]Content-Length为{}，但只收到了{}字节",
                            id,
                            length,
                            fragment.len()
                        );
                        return Err(Exception::BodyOutOfRange);
                    }
                }
            }
        };

        Ok(Self {
            method,
            path,
            headers,
            body,
        })
    }
}

// --- Getter 访问器实现 ---

impl Request {
    /// 获取请求方法
    pub fn method(&self) -> &str {
        &self.method
    }

    /// 获取请求路径
    pub fn path(&self) -> &str {
        &self.path
    }

    /// 获取全部请求标头
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// 按名称（大小写敏感）获取单个标头
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// 获取请求体
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// 获取用户代理字符串，缺失时为空串
    pub fn user_agent(&self) -> &str {
        self.header(USER_AGENT).unwrap_or("")
    }

    /// 获取客户端可接受且服务器支持的压缩算法，保持客户端给出的顺序
    pub fn accept_encoding(&self) -> Vec<HttpEncoding> {
        match self.header(ACCEPT_ENCODING) {
            Some(value) => value
                .split(", ")
                .filter_map(HttpEncoding::from_token)
                .collect(),
            None => vec![],
        }
    }
}

fn split_once_crlf(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let position = bytes
        .windows(CRLF.len())
        .position(|window| window == CRLF.as_bytes())?;
    Some((&bytes[..position], &bytes[position + CRLF.len()..]))
}

/// 按 CRLF 切分，结果至少包含一段（最后一段可能为空）。
fn split_crlf(bytes: &[u8]) -> Vec<&[u8]> {
    let mut segments = Vec::new();
    let mut rest = bytes;
    while let Some((head, tail)) = split_once_crlf(rest) {
        segments.push(head);
        rest = tail;
    }
    segments.push(rest);
    segments
}
