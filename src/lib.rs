//! DarkAges MP3 批量转换工具
//!
//! 将目录树中的 M4A / WAV / MP3 文件统一转换为 DarkAges MP3
//! （128 kbit/s, 22050 Hz, 16 bit）。
//!
//! ## 组成
//! - 文件扫描：递归查找候选文件并预先统计数量
//! - 编解码适配：外部编解码服务（FFmpeg + libmp3lame）的封装，失败转换为结果
//! - 日志/进度接收端：流水线唯一的输出通道
//! - 批处理流水线：按发现顺序逐个转换并报告进度
//! - 执行调度：同步运行或交给后台线程

pub mod audio;
pub mod error;
pub mod processing;
pub mod tools;

// 重新导出核心类型
pub use audio::{Codec, ConversionOutcome, ConversionRequest, FfmpegCodec, TargetProfile};
pub use error::{ConvertError, ConvertResult, ErrorCategory};
pub use processing::{
    BatchHandle, BatchPipeline, BatchStart, BatchSummary, ChannelSink, ConsoleSink,
    ExecutionMode, NullSink, ProgressSink, Scheduler, SinkEvent,
};
pub use tools::AppConfig;
