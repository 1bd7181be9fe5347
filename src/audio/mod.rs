//! 音频编解码模块
//!
//! 目标配置、转换请求/结果、编解码器抽象以及FFmpeg实现。

pub mod codec;
pub mod ffmpeg_bridge;
pub mod format;
pub mod profile;

pub use codec::{Codec, ConversionOutcome, ConversionRequest, convert};
pub use ffmpeg_bridge::FfmpegCodec;
pub use format::{AudioFormat, probe_format};
pub use profile::TargetProfile;
