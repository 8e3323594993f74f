// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 连接驱动
//!
//! 接受 TCP 连接并为每个连接派生一个 Tokio 任务。每个任务只处理一个请求：
//! 读取一次、解析、路由、序列化、写回，然后关闭连接。
//! 任务之间只共享只读的路由对象，不需要任何锁。

use std::{io, net::SocketAddr, sync::Arc, time::Instant};

use log::{debug, error, info, warn};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

use crate::{
    config::Config,
    exception::Exception,
    fileio::{FileIo, LocalFs},
    handler::Router,
    request::Request,
    response::Response,
};

pub struct Server {
    listener: TcpListener,
    router: Arc<Router<LocalFs>>,
    read_buffer_size: usize,
}

impl Server {
    /// 绑定配置中的监听地址
    pub async fn bind(config: &Config) -> io::Result<Self> {
        let listener = TcpListener::bind(config.address()).await?;
        info!("服务端将在{}上监听Socket连接", config.address());
        info!("文件目录：{}", config.directory());
        Ok(Self {
            listener,
            router: Arc::new(Router::new(config.directory(), LocalFs)),
            read_buffer_size: config.read_buffer_size(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// 主事件循环 (Accept Loop)
    ///
    /// 只有监听器本身出错时才会返回，这意味着整个服务器已经无法继续工作。
    pub async fn run(self) -> io::Result<()> {
        let mut id: u128 = 0;
        loop {
            let (mut stream, addr) = match self.listener.accept().await {
                Ok(connection) => connection,
                Err(e) => {
                    error!("无法接受新的连接：{}", e);
                    return Err(e);
                }
            };
            debug!("[ID{}]新的连接：{}", id, addr);

            let router = Arc::clone(&self.router);
            let read_buffer_size = self.read_buffer_size;
            tokio::spawn(async move {
                handle_connection(&mut stream, id, &router, read_buffer_size).await;
                debug!("[ID{}]连接关闭", id);
            });
            id += 1;
        }
    }
}

/// # 连接处理器
///
/// 只读取一次，读到的内容就是整个请求；超出缓冲区的部分会被截断。
pub async fn handle_connection<F: FileIo>(
    stream: &mut TcpStream,
    id: u128,
    router: &Router<F>,
    read_buffer_size: usize,
) {
    let mut buffer = vec![0; read_buffer_size];

    match stream.read(&mut buffer).await {
        Ok(0) => return, // 客户端主动关闭连接
        Ok(n) => debug!("[ID{}]HTTP请求接收完毕，共{}字节", id, n),
        Err(e) => {
            error!("[ID{}]读取TCPStream时遇到错误: {}", id, e);
            return;
        }
    }

    let start_time = Instant::now();

    // 1. 解析整个缓冲区
    let request = match Request::try_from(&buffer, id) {
        Ok(request) => request,
        Err(Exception::MalformedRequestLine) => {
            warn!("[ID{}]无法提取请求行，直接关闭连接", id);
            return;
        }
        Err(e) => {
            warn!("[ID{}]解析HTTP请求失败: {}，返回400", id, e);
            let response_bytes = Response::response_400().into_bytes();
            write_response(stream, id, &response_bytes).await;
            return;
        }
    };

    // 2. 路由
    let response = router.handle(&request, id);

    info!(
        "[ID{}] {}, {}, {}, {}, {}",
        id,
        request.method(),
        request.path(),
        response.status_code(),
        response.information(),
        request.user_agent(),
    );

    // 3. 内容协商与序列化
    let response_bytes = response.serialize(&request, id);
    debug!(
        "[ID{}]HTTP响应构建完成，服务端用时{}ms。",
        id,
        start_time.elapsed().as_millis()
    );

    write_response(stream, id, &response_bytes).await;
}

async fn write_response(stream: &mut TcpStream, id: u128, response_bytes: &[u8]) {
    debug!("[ID{}]发送响应，长度: {}", id, response_bytes.len());
    if let Err(e) = stream.write_all(response_bytes).await {
        error!("[ID{}]发送响应失败: {}", id, e);
        return;
    }
    let _ = stream.flush().await;
}
