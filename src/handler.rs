// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 路由模块
//!
//! 按固定顺序把请求分发到四种行为之一，先匹配者生效：
//! 1. `/` -> 200 空响应，用于健康检查。
//! 2. 路径含 `echo` -> 回显 `/echo/` 之后的那一段。
//! 3. `/user-agent`（不区分大小写）-> 回显 `User-Agent` 标头。
//! 4. 路径含 `file` -> `POST` 写文件，其余方法读文件。
//!
//! 其余路径一律 404。路由本身不保存任何状态，可以被所有连接共享。

use log::{debug, error, warn};

use crate::{
    exception::Exception,
    fileio::FileIo,
    request::Request,
    response::Response,
};

pub struct Router<F: FileIo> {
    /// 文件目录，文件路径由它与文件名直接拼接而成
    directory: String,
    file_io: F,
}

impl<F: FileIo> Router<F> {
    pub fn new(directory: impl Into<String>, file_io: F) -> Self {
        Self {
            directory: directory.into(),
            file_io,
        }
    }

    /// 为请求生成响应。路由过程中的异常会被转换为对应状态码的空响应。
    pub fn handle(&self, request: &Request, id: u128) -> Response {
        match self.route(request, id) {
            Ok(response) => response,
            Err(e) => {
                warn!("[ID{}]处理{}时出现异常：{}", id, request.path(), e);
                Response::from_status_code(e.status_code())
            }
        }
    }

    fn route(&self, request: &Request, id: u128) -> Result<Response, Exception> {
        let path = request.path();
        let target = path.strip_prefix('/').unwrap_or(path);

        if path == "/" {
            return Ok(Response::new());
        }

        if path.contains("echo") {
            let text = path_segment(target, 1)?;
            debug!("[ID{}]回显：{}", id, text);
            return Ok(Response::text(text.to_string()));
        }

        if target.eq_ignore_ascii_case("user-agent") {
            return Ok(Response::text(request.user_agent().to_string()));
        }

        if target.contains("file") {
            let filename = path_segment(target, 1)?;
            let file_path = format!("{}{}", self.directory, filename);

            if request.method() == "POST" {
                debug!("[ID{}]写入文件：{}", id, file_path);
                return match self.file_io.write_file(&file_path, request.body()) {
                    Ok(()) => Ok(Response::from_status_code(201)),
                    Err(e) => {
                        error!("[ID{}]写入文件{}失败：{}", id, file_path, e);
                        Ok(Response::response_500())
                    }
                };
            }

            debug!("[ID{}]读取文件：{}", id, file_path);
            let content = self.file_io.read_file(&file_path)?;
            return Ok(Response::octet_stream(content));
        }

        Ok(Response::response_404())
    }
}

/// 取按 `/` 切分后的第 `index` 段，不存在时返回异常而不是越界
fn path_segment(target: &str, index: usize) -> Result<&str, Exception> {
    target
        .split('/')
        .nth(index)
        .ok_or(Exception::MissingPathSegment)
}
