// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HTTP 响应构建模块
//!
//! `Response` 在每个请求中被全新构建，标头在序列化之前都可以修改。
//! 序列化时依次完成：
//! 1. 根据请求的 `Accept-Encoding` 进行内容协商并压缩响应体；
//! 2. 按（可能已压缩的）响应体长度设置 `Content-Length`；
//! 3. 渲染状态行、标头、空行和原始响应体字节。

use std::collections::HashMap;

use bytes::Bytes;
use log::{debug, error};

use crate::{compress::compress_with, exception::Exception, param::*, request::Request};

#[derive(Debug, Clone)]
pub struct Response {
    status_code: u16,
    information: String,
    headers: HashMap<String, String>,
    content: Bytes,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    pub fn new() -> Self {
        Self {
            status_code: 200,
            information: "OK".to_string(),
            headers: HashMap::new(),
            content: Bytes::new(),
        }
    }

    /// 构建只有状态行、没有响应体的响应
    pub fn from_status_code(code: u16) -> Self {
        let mut response = Self::new();
        response.set_code(code);
        response
    }

    /// `200 OK`，`text/plain` 响应体
    pub fn text(content: impl Into<Bytes>) -> Self {
        let mut response = Self::new();
        response
            .set_header(CONTENT_TYPE, MIME_TEXT_PLAIN)
            .set_content(content);
        response
    }

    /// `200 OK`，`application/octet-stream` 响应体
    pub fn octet_stream(content: impl Into<Bytes>) -> Self {
        let mut response = Self::new();
        response
            .set_header(CONTENT_TYPE, MIME_OCTET_STREAM)
            .set_content(content);
        response
    }

    pub fn response_400() -> Self {
        Self::from_status_code(400)
    }

    pub fn response_404() -> Self {
        Self::from_status_code(404)
    }

    pub fn response_500() -> Self {
        Self::from_status_code(500)
    }

    pub fn set_code(&mut self, code: u16) -> &mut Self {
        self.status_code = code;
        self.information = match STATUS_CODES.get(&code) {
            Some(&information) => information.to_string(),
            None => {
                error!("非法的状态码：{}。这条错误说明代码编写出现了错误。", code);
                "Unknown".to_string()
            }
        };
        self
    }

    pub fn set_header(&mut self, name: &str, value: &str) -> &mut Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    pub fn set_content(&mut self, content: impl Into<Bytes>) -> &mut Self {
        self.content = content.into();
        self
    }

    /// 按请求标头协商压缩编码，成功时替换响应体并设置 `Content-Encoding`。
    ///
    /// 压缩失败时响应体与标头都保持原样，错误交由调用方处理。
    pub fn negotiate_encoding(
        &mut self,
        request: &Request,
        id: u128,
    ) -> Result<Option<HttpEncoding>, Exception> {
        self.negotiate_with(request, id, compress_with)
    }

    fn negotiate_with<C>(
        &mut self,
        request: &Request,
        id: u128,
        codec: C,
    ) -> Result<Option<HttpEncoding>, Exception>
    where
        C: FnOnce(&[u8], HttpEncoding) -> Result<Vec<u8>, Exception>,
    {
        let encoding = match decide_encoding(&request.accept_encoding()) {
            Some(encoding) => encoding,
            None => {
                debug!("[ID{}]不进行压缩", id);
                return Ok(None);
            }
        };
        debug!("[ID{}]使用{}压缩编码", id, encoding);
        let compressed = codec(&self.content, encoding)?;
        self.content = Bytes::from(compressed);
        self.set_header(CONTENT_ENCODING, encoding.as_str());
        Ok(Some(encoding))
    }

    /// 总是在压缩之后调用，使长度与最终发送的响应体一致
    pub fn set_content_length(&mut self) -> &mut Self {
        let length = self.content.len().to_string();
        self.set_header(CONTENT_LENGTH, &length)
    }

    /// 完整的序列化流程：内容协商、设置长度、渲染。
    ///
    /// 压缩失败不会丢弃响应，而是退回到未压缩的响应体。
    pub fn serialize(self, request: &Request, id: u128) -> Vec<u8> {
        self.serialize_with(request, id, compress_with)
    }

    fn serialize_with<C>(mut self, request: &Request, id: u128, codec: C) -> Vec<u8>
    where
        C: FnOnce(&[u8], HttpEncoding) -> Result<Vec<u8>, Exception>,
    {
        if let Err(e) = self.negotiate_with(request, id, codec) {
            error!("[ID{}]压缩响应体失败：{}，改为发送未压缩的内容", id, e);
        }
        self.into_bytes()
    }

    /// 不做内容协商，直接设置长度并渲染。用于没有可用请求的场合。
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.set_content_length();
        self.as_bytes()
    }

    /// 按当前状态渲染报文，不修改任何字段。
    pub fn as_bytes(&self) -> Vec<u8> {
        let mut header = format!(
            "{} {} {}{}",
            HTTP_VERSION, self.status_code, self.information, CRLF
        );
        for (name, value) in &self.headers {
            // 值后面的空格是线上格式的一部分
            header.push_str(&format!("{}: {} {}", name, value, CRLF));
        }
        header.push_str(CRLF);
        [header.as_bytes(), self.content.as_ref()].concat()
    }
}

impl Response {
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn information(&self) -> &str {
        &self.information
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

/// 按请求中出现的顺序选出第一个服务器支持的编码
fn decide_encoding(accept_encoding: &[HttpEncoding]) -> Option<HttpEncoding> {
    accept_encoding
        .iter()
        .copied()
        .find(|encoding| SUPPORTED_ENCODINGS.contains(encoding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn request(raw: &str) -> Request {
        Request::try_from(raw.as_bytes(), 0).unwrap()
    }

    /// 将响应报文拆成状态行、标头表和响应体
    fn split_response(bytes: &[u8]) -> (String, HashMap<String, String>, Vec<u8>) {
        let separator = bytes
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("missing header terminator");
        let head = String::from_utf8(bytes[..separator].to_vec()).unwrap();
        let body = bytes[separator + 4..].to_vec();
        let mut lines = head.split(CRLF);
        let status_line = lines.next().unwrap().to_string();
        let headers = lines
            .map(|line| {
                let (name, value) = line.split_once(": ").unwrap();
                (name.to_string(), value.to_string())
            })
            .collect();
        (status_line, headers, body)
    }

    #[test]
    fn test_response_new() {
        let response = Response::new();

        assert_eq!(response.status_code(), 200);
        assert_eq!(response.information(), "OK");
        assert!(response.content().is_empty());
    }

    #[test]
    fn test_response_into_bytes_basic() {
        let bytes = Response::new().into_bytes();

        assert_eq!(bytes, b"HTTP/1.1 200 OK\r\nContent-Length: 0 \r\n\r\n".to_vec());
    }

    /// 标头行在 CRLF 之前带一个空格，状态行没有
    #[test]
    fn test_header_line_trailing_space() {
        let bytes = Response::text("abc").into_bytes();
        let response_str = String::from_utf8(bytes).unwrap();

        assert!(response_str.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response_str.contains("Content-Type: text/plain \r\n"));
        assert!(response_str.contains("Content-Length: 3 \r\n"));
        assert!(response_str.ends_with(" \r\n\r\nabc"));
    }

    #[test]
    fn test_response_status_code_various() {
        for (code, expected_info) in [
            (200, "OK"),
            (201, "Created"),
            (400, "Bad Request"),
            (404, "Not Found"),
            (500, "Server Error"),
        ] {
            let response = Response::from_status_code(code);
            assert_eq!(response.status_code(), code);
            assert_eq!(response.information(), expected_info);
        }
    }

    #[test]
    fn test_unknown_status_code_does_not_panic() {
        let response = Response::from_status_code(299);

        assert_eq!(response.status_code(), 299);
        assert_eq!(response.information(), "Unknown");
    }

    #[test]
    fn test_serialize_with_gzip() {
        let req = request("GET /echo/abc HTTP/1.1\r\nAccept-Encoding: gzip\r\n\r\n");

        let bytes = Response::text("abc").serialize(&req, 0);
        let (status_line, headers, body) = split_response(&bytes);

        assert_eq!(status_line, "HTTP/1.1 200 OK");
        assert_eq!(headers.get("Content-Encoding").unwrap(), "gzip ");
        assert_eq!(headers.get("Content-Type").unwrap(), "text/plain ");
        assert_eq!(
            headers.get("Content-Length").unwrap(),
            &format!("{} ", body.len())
        );

        let mut decoded = String::new();
        GzDecoder::new(&body[..]).read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded, "abc");
    }

    #[test]
    fn test_serialize_picks_gzip_among_unsupported() {
        let req = request("GET / HTTP/1.1\r\nAccept-Encoding: invalid-1, gzip, br\r\n\r\n");

        let bytes = Response::text("hello").serialize(&req, 0);
        let (_, headers, _) = split_response(&bytes);

        assert_eq!(headers.get("Content-Encoding").unwrap(), "gzip ");
    }

    #[test]
    fn test_serialize_without_supported_encoding() {
        let req = request("GET / HTTP/1.1\r\nAccept-Encoding: br, deflate\r\n\r\n");

        let bytes = Response::text("hello").serialize(&req, 0);
        let (_, headers, body) = split_response(&bytes);

        assert!(!headers.contains_key("Content-Encoding"));
        assert_eq!(headers.get("Content-Length").unwrap(), "5 ");
        assert_eq!(body, b"hello");
    }

    #[test]
    fn test_serialize_without_accept_encoding() {
        let req = request("GET / HTTP/1.1\r\n\r\n");

        let bytes = Response::new().serialize(&req, 0);

        assert!(bytes.starts_with(b"HTTP/1.1 200 OK\r\n"));
        let (_, headers, body) = split_response(&bytes);
        assert_eq!(headers.get("Content-Length").unwrap(), "0 ");
        assert!(body.is_empty());
    }

    /// 多余的空白让 gzip 标识不再匹配，响应保持未压缩
    #[test]
    fn test_serialize_with_irregular_separator() {
        let req = request("GET / HTTP/1.1\r\nAccept-Encoding: br,  gzip\r\n\r\n");

        let bytes = Response::text("hello").serialize(&req, 0);
        let (_, headers, body) = split_response(&bytes);

        assert!(!headers.contains_key("Content-Encoding"));
        assert_eq!(body, b"hello");
    }

    fn failing_codec(_: &[u8], _: HttpEncoding) -> Result<Vec<u8>, Exception> {
        Err(Exception::CompressionFailed)
    }

    #[test]
    fn test_negotiate_failure_leaves_response_untouched() {
        let req = request("GET / HTTP/1.1\r\nAccept-Encoding: gzip\r\n\r\n");
        let mut response = Response::text("abc");

        let result = response.negotiate_with(&req, 0, failing_codec);

        assert_eq!(result.unwrap_err(), Exception::CompressionFailed);
        assert_eq!(response.header(CONTENT_ENCODING), None);
        assert_eq!(response.content().as_ref(), b"abc");
    }

    /// 压缩失败时仍然发送响应，只是不压缩
    #[test]
    fn test_serialize_falls_back_when_compression_fails() {
        let req = request("GET /echo/abc HTTP/1.1\r\nAccept-Encoding: gzip\r\n\r\n");

        let bytes = Response::text("abc").serialize_with(&req, 0, failing_codec);
        let (status_line, headers, body) = split_response(&bytes);

        assert_eq!(status_line, "HTTP/1.1 200 OK");
        assert!(!headers.contains_key("Content-Encoding"));
        assert_eq!(headers.get("Content-Length").unwrap(), "3 ");
        assert_eq!(body, b"abc");
    }

    #[test]
    fn test_negotiate_replaces_content() {
        let req = request("GET / HTTP/1.1\r\nAccept-Encoding: gzip\r\n\r\n");
        let mut response = Response::text("abcabcabc");

        let encoding = response.negotiate_encoding(&req, 0).unwrap();

        assert_eq!(encoding, Some(HttpEncoding::Gzip));
        assert_eq!(response.header(CONTENT_ENCODING), Some("gzip"));
        assert_eq!(&response.content()[0..2], &[0x1f, 0x8b]);
    }

    #[test]
    fn test_binary_content_is_not_reencoded() {
        let data = vec![0x00, 0xff, 0x80, 0x0d, 0x0a];
        let bytes = Response::octet_stream(data.clone()).into_bytes();
        let (_, headers, body) = split_response(&bytes);

        assert_eq!(headers.get("Content-Type").unwrap(), "application/octet-stream ");
        assert_eq!(body, data);
    }

    /// 同一个响应渲染两次，字节完全一致
    #[test]
    fn test_as_bytes_is_idempotent() {
        let req = request("GET / HTTP/1.1\r\nAccept-Encoding: gzip\r\n\r\n");
        let mut response = Response::text("repeat me");
        response.negotiate_encoding(&req, 0).unwrap();
        response.set_content_length();

        assert_eq!(response.as_bytes(), response.as_bytes());
    }

    #[test]
    fn test_content_length_overrides_stale_value() {
        let mut response = Response::text("four");
        response.set_header(CONTENT_LENGTH, "999");

        let (_, headers, _) = split_response(&response.into_bytes());

        assert_eq!(headers.get("Content-Length").unwrap(), "4 ");
    }

    #[test]
    fn test_decide_encoding() {
        assert_eq!(decide_encoding(&[HttpEncoding::Gzip]), Some(HttpEncoding::Gzip));
        assert_eq!(decide_encoding(&[]), None);
    }
}
