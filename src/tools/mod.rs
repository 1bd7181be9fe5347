//! 工具模块集合
//!
//! 包含CLI、文件扫描、终端进度显示、常量与路径工具，支持main.rs的流程控制。

pub mod cli;
pub mod constants;
pub mod progress;
pub mod scanner;
pub mod utils;

// 重新导出主要的公共接口
pub use cli::{AppConfig, parse_args, parse_args_from, show_startup_info};
pub use scanner::{count, discover};
