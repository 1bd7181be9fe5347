//! DarkAges MP3 转换工具 - 主程序入口
//!
//! 纯流程控制器：解析参数、初始化日志、构建应用上下文，
//! 按模式同步运行批处理或在后台运行并显示进度条。

use darkages_mp3::{
    AppConfig, BatchStart, ChannelSink, ConsoleSink, ConvertError, ErrorCategory, FfmpegCodec,
    Scheduler,
    tools::{self, constants::messages, progress},
};
use std::io::IsTerminal;
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// 错误退出码定义
mod exit_codes {
    /// 通用错误
    pub const GENERAL_ERROR: i32 = 1;
    /// 参数/配置错误
    pub const INPUT_ERROR: i32 = 2;
    /// 编解码器不可用或失败
    pub const CODEC_ERROR: i32 = 3;
    /// 资源错误（线程等）
    pub const RESOURCE_ERROR: i32 = 5;
}

/// 应用上下文：一次构建，传给各处理函数
struct AppContext {
    config: AppConfig,
    scheduler: Scheduler,
}

impl AppContext {
    fn new(config: AppConfig) -> Result<Self, ConvertError> {
        let codec = match &config.ffmpeg_path {
            Some(path) => FfmpegCodec::with_path(path)?,
            None => FfmpegCodec::locate()?,
        }
        .with_xing_header(config.write_xing);

        Ok(Self {
            scheduler: Scheduler::new(Arc::new(codec)),
            config,
        })
    }
}

/// 获取错误建议文本
fn get_error_suggestion(error: &ConvertError) -> &'static str {
    match ErrorCategory::from_error(error) {
        ErrorCategory::Input => "Check the command-line arguments, use --help to see full usage",
        ErrorCategory::Io => "Check that the folders exist and are writable",
        ErrorCategory::Format | ErrorCategory::Codec => {
            "Make sure ffmpeg with libmp3lame is installed, or pass --ffmpeg <PATH>"
        }
        ErrorCategory::Resource => "System resources unavailable, please retry",
    }
}

/// 错误处理和建议
fn handle_error(error: ConvertError) -> ! {
    eprintln!("[ERROR] {error}");
    eprintln!("[INFO] Suggestion: {}", get_error_suggestion(&error));

    let exit_code = match ErrorCategory::from_error(&error) {
        ErrorCategory::Input => exit_codes::INPUT_ERROR,
        ErrorCategory::Format | ErrorCategory::Codec => exit_codes::CODEC_ERROR,
        ErrorCategory::Resource => exit_codes::RESOURCE_ERROR,
        ErrorCategory::Io => exit_codes::GENERAL_ERROR,
    };

    process::exit(exit_code);
}

/// 默认日志过滤规则
///
/// symphonia 通过 `log` 报告的探测细节（如读到文件末尾）不是转换错误，默认关闭。
fn default_log_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("{level},symphonia=off")
}

/// 初始化诊断日志（stderr，RUST_LOG 优先）
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}

/// 同步模式：阻塞直到批次完成，日志和进度直接输出到stdout
fn run_batch(ctx: &AppContext) -> Result<(), ConvertError> {
    let Some((input, output)) = ctx.config.folders() else {
        return Err(ConvertError::InvalidInput(messages::MISSING_FOLDERS.to_string()));
    };

    println!("Running in CLI mode.");
    let sink = Arc::new(ConsoleSink::stdout());
    ctx.scheduler
        .start(input, output, sink, &ctx.config.profile, ctx.config.mode)?;
    Ok(())
}

/// 异步模式：后台运行批次，主线程渲染进度条直到接收端断开
fn run_interactive(ctx: &AppContext) -> Result<(), ConvertError> {
    let Some((input, output)) = ctx.config.folders() else {
        return Err(ConvertError::InvalidInput(messages::MISSING_FOLDERS.to_string()));
    };

    let (sink, receiver) = ChannelSink::new();
    let start = ctx
        .scheduler
        .start(input, output, Arc::new(sink), &ctx.config.profile, ctx.config.mode)?;

    let pb = progress::create_percent_bar();
    let observed = progress::observe(&receiver, &pb, std::io::stdout());
    tracing::debug!(?observed, "observer finished");

    if let BatchStart::Spawned(handle) = start {
        handle.join()?;
    }
    Ok(())
}

/// 应用程序主逻辑
fn run() -> Result<(), ConvertError> {
    // 1. 解析命令行参数
    let config = tools::parse_args()?;

    // 2. 初始化日志并显示启动信息
    init_logging(config.verbose);
    tools::show_startup_info(&config);

    if config.folders().is_none() {
        return Err(ConvertError::InvalidInput(messages::MISSING_FOLDERS.to_string()));
    }

    // 3. 构建上下文并按模式执行
    let ctx = AppContext::new(config)?;
    if ctx.config.is_interactive() {
        run_interactive(&ctx)
    } else {
        run_batch(&ctx)
    }
}

fn main() {
    if let Err(error) = run() {
        handle_error(error);
    }
}
