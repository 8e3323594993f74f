pub mod compress;
pub mod config;
pub mod exception;
pub mod fileio;
pub mod handler;
pub mod param;
pub mod request;
pub mod response;
pub mod server;

pub use config::Config;
pub use exception::Exception;
pub use fileio::{FileIo, LocalFs};
pub use handler::Router;
pub use param::HttpEncoding;
pub use request::Request;
pub use response::Response;
pub use server::Server;
