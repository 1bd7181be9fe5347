//! 目标编码配置
//!
//! 描述输出MP3的码率、采样率与位深度。批处理期间不可变。

use crate::error::{ConvertError, ConvertResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// DarkAges MP3 默认码率（kbit/s）
pub const DARKAGES_BITRATE_KBPS: u32 = 128;

/// DarkAges MP3 默认采样率（Hz）
pub const DARKAGES_SAMPLE_RATE: u32 = 22050;

/// DarkAges MP3 默认位深度（bit）
pub const DARKAGES_BIT_DEPTH: u16 = 16;

/// 允许的位深度（必须是8的倍数，且编码器能接受）
const SUPPORTED_BIT_DEPTHS: &[u16] = &[8, 16, 24, 32];

/// 输出编码配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetProfile {
    /// 码率（kbit/s）
    pub bitrate_kbps: u32,
    /// 采样率（Hz）
    pub sample_rate: u32,
    /// 位深度（bit）
    pub bit_depth: u16,
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self::darkages()
    }
}

impl TargetProfile {
    /// DarkAges MP3 配置：128 kbit/s, 22050 Hz, 16 bit
    pub const fn darkages() -> Self {
        Self {
            bitrate_kbps: DARKAGES_BITRATE_KBPS,
            sample_rate: DARKAGES_SAMPLE_RATE,
            bit_depth: DARKAGES_BIT_DEPTH,
        }
    }

    /// 从JSON文件加载配置，缺失字段取默认值
    pub fn from_json_file(path: &Path) -> ConvertResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let profile: Self = serde_json::from_str(&text).map_err(|e| {
            ConvertError::InvalidInput(format!("profile {}: {e}", path.display()))
        })?;
        profile.validate()?;
        Ok(profile)
    }

    /// 验证配置参数
    pub fn validate(&self) -> ConvertResult<()> {
        if self.bitrate_kbps == 0 {
            return Err(ConvertError::InvalidInput(
                "bitrate must be positive".to_string(),
            ));
        }
        if self.sample_rate == 0 {
            return Err(ConvertError::InvalidInput(
                "sample rate must be positive".to_string(),
            ));
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&self.bit_depth) {
            return Err(ConvertError::InvalidInput(format!(
                "bit depth {} not supported (expected one of 8/16/24/32)",
                self.bit_depth
            )));
        }
        Ok(())
    }

    /// 每样本字节数
    #[inline]
    pub fn sample_width_bytes(&self) -> u16 {
        self.bit_depth / 8
    }

    /// 编码器码率参数，例如 `128k`
    pub fn bitrate_arg(&self) -> String {
        format!("{}k", self.bitrate_kbps)
    }
}
