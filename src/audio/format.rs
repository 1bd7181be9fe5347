//! 音频格式信息模块
//!
//! 使用symphonia探测音频文件的流参数，用于确认编码输出是否符合目标配置。

use crate::error::{self, ConvertError, ConvertResult};
use std::path::Path;
use symphonia::core::codecs::{CODEC_TYPE_NULL, CodecParameters};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// 探测得到的音频格式信息
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    /// 声道数（容器未声明时为0）
    pub channels: u16,
    /// 源位深度；有损格式通常未声明，此时按编解码器类型推断
    pub bits_per_sample: u16,
    /// 帧数（每声道样本数），未知时为0
    pub sample_count: u64,
}

impl AudioFormat {
    pub fn new(sample_rate: u32, channels: u16, bits_per_sample: u16, sample_count: u64) -> Self {
        Self {
            sample_rate,
            channels,
            bits_per_sample,
            sample_count,
        }
    }

    /// 获取持续时长（秒）
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.sample_count as f64 / self.sample_rate as f64
    }
}

/// 探测音频文件的格式参数
///
/// 只读取容器头部和首个音频轨道的编解码参数，不解码音频数据。
pub fn probe_format(path: &Path) -> ConvertResult<AudioFormat> {
    let file = std::fs::File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension() {
        hint.with_extension(&extension.to_string_lossy());
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| error::format_error("format probe failed", e))?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| ConvertError::FormatError("no audio track found".to_string()))?;

    let codec_params = &track.codec_params;
    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| ConvertError::FormatError("sample rate not declared".to_string()))?;
    let channels = codec_params
        .channels
        .map(|ch| ch.count() as u16)
        .unwrap_or(0);

    Ok(AudioFormat::new(
        sample_rate,
        channels,
        detect_bit_depth(codec_params),
        codec_params.n_frames.unwrap_or(0),
    ))
}

/// 检测位深度
fn detect_bit_depth(codec_params: &CodecParameters) -> u16 {
    use symphonia::core::codecs::{
        CODEC_TYPE_PCM_F32BE, CODEC_TYPE_PCM_F32LE, CODEC_TYPE_PCM_S16BE, CODEC_TYPE_PCM_S16LE,
        CODEC_TYPE_PCM_S24BE, CODEC_TYPE_PCM_S24LE, CODEC_TYPE_PCM_S32BE, CODEC_TYPE_PCM_S32LE,
        CODEC_TYPE_PCM_U8,
    };

    if let Some(bits) = codec_params.bits_per_sample {
        return bits as u16;
    }

    match codec_params.codec {
        CODEC_TYPE_PCM_U8 => 8,
        CODEC_TYPE_PCM_S16LE | CODEC_TYPE_PCM_S16BE => 16,
        CODEC_TYPE_PCM_S24LE | CODEC_TYPE_PCM_S24BE => 24,
        CODEC_TYPE_PCM_S32LE | CODEC_TYPE_PCM_S32BE | CODEC_TYPE_PCM_F32LE
        | CODEC_TYPE_PCM_F32BE => 32,
        _ => 16, // 有损格式按16位处理
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_seconds() {
        let format = AudioFormat::new(22050, 2, 16, 44100);
        assert!((format.duration_seconds() - 2.0).abs() < f64::EPSILON);

        let unknown = AudioFormat::new(0, 0, 16, 100);
        assert_eq!(unknown.duration_seconds(), 0.0);
    }

    #[test]
    fn test_probe_missing_file_is_io_error() {
        let missing = std::env::temp_dir().join("darkages_probe_missing_7f3a.wav");
        let _ = std::fs::remove_file(&missing);

        let result = probe_format(&missing);
        assert!(matches!(result, Err(ConvertError::IoError(_))));
    }

    #[test]
    fn test_probe_garbage_is_format_error() {
        let path = std::env::temp_dir().join("darkages_probe_garbage_91bc.mp3");
        std::fs::write(&path, b"definitely not audio").unwrap();

        let result = probe_format(&path);
        assert!(result.is_err());

        let _ = std::fs::remove_file(&path);
    }
}
