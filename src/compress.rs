// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! 响应体压缩。

use std::io::Write;

use flate2::{write::GzEncoder, Compression};
use log::{debug, error};

use crate::{exception::Exception, param::HttpEncoding};

/// 按编码名称压缩数据，目前只认识 `gzip`。
pub fn compress(data: &[u8], encoding: &str) -> Result<Vec<u8>, Exception> {
    match HttpEncoding::from_token(encoding) {
        Some(mode) => compress_with(data, mode),
        None => {
            error!("不支持的压缩编码：{}", encoding);
            Err(Exception::UnsupportedEncoding)
        }
    }
}

/// 使用指定编码压缩数据。
///
/// 压缩器会被完整地 `finish`，产出的字节是一个可以独立解码的完整流。
pub fn compress_with(data: &[u8], mode: HttpEncoding) -> Result<Vec<u8>, Exception> {
    let original_size = data.len();
    let compressed = match mode {
        HttpEncoding::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder
                .write_all(data)
                .and_then(|_| encoder.finish())
                .map_err(|e| {
                    error!("gzip压缩失败：{}", e);
                    Exception::CompressionFailed
                })?
        }
    };

    let compressed_size = compressed.len();
    let ratio = if original_size > 0 {
        ((original_size as i64 - compressed_size as i64) as f64 / original_size as f64) * 100.0
    } else {
        0.0
    };
    debug!(
        "压缩完成: {}, 原始大小: {} bytes, 压缩后: {} bytes, 压缩率: {:.1}%",
        mode, original_size, compressed_size, ratio
    );

    Ok(compressed)
}
