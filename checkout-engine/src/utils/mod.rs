//! 工具模块 - 日志等通用工具

pub mod logger;

pub use logger::init_logger_with_file;
