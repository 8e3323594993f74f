// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! 文件读写能力。
//!
//! 路由层只依赖 [`FileIo`] 这个抽象，生产环境使用直接访问本地文件系统的 [`LocalFs`]。
//! 对同一个文件的并发读写不做任何协调：最后一次写入生效。

use std::{
    fs::{self, OpenOptions},
    io::Write,
};

use log::{debug, warn};

use crate::exception::Exception;

/// 新建文件时使用的权限位
pub const FILE_MODE: u32 = 0o644;

#[cfg_attr(test, mockall::automock)]
pub trait FileIo: Send + Sync {
    /// 读取整个文件。任何读取失败都视为文件不存在。
    fn read_file(&self, path: &str) -> Result<Vec<u8>, Exception>;

    /// 创建或覆盖文件。
    fn write_file(&self, path: &str, content: &[u8]) -> Result<(), Exception>;
}

/// 本地文件系统
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileIo for LocalFs {
    fn read_file(&self, path: &str) -> Result<Vec<u8>, Exception> {
        match fs::read(path) {
            Ok(content) => {
                debug!("读取文件{}，共{}字节", path, content.len());
                Ok(content)
            }
            Err(e) => {
                warn!("无法读取文件{}：{}", path, e);
                Err(Exception::FileNotFound)
            }
        }
    }

    fn write_file(&self, path: &str, content: &[u8]) -> Result<(), Exception> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(FILE_MODE);
        }

        match options.open(path).and_then(|mut file| file.write_all(content)) {
            Ok(()) => {
                debug!("写入文件{}，共{}字节", path, content.len());
                Ok(())
            }
            Err(e) => {
                warn!("无法写入文件{}：{}", path, e);
                Err(Exception::FileWriteFailed)
            }
        }
    }
}
