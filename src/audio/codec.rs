//! 编解码适配层
//!
//! 定义转换请求/结果以及外部编解码服务的抽象接口。
//! [`convert`] 是边界：任何失败（包括实现内部的panic）都会被转换为失败结果，
//! 保证批处理可以继续处理下一个文件。

use super::profile::TargetProfile;
use crate::error::{self, ConvertError, ConvertResult, ErrorCategory};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// 单个文件的转换请求（构造后不可变）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    source: PathBuf,
    destination: PathBuf,
    profile: TargetProfile,
}

impl ConversionRequest {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        profile: TargetProfile,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            profile,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn profile(&self) -> &TargetProfile {
        &self.profile
    }
}

/// 单个文件的转换结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutcome {
    source: PathBuf,
    destination: PathBuf,
    success: bool,
    message: String,
    category: Option<ErrorCategory>,
}

impl ConversionOutcome {
    /// 成功结果："Converted A to B"
    pub fn succeeded(request: &ConversionRequest) -> Self {
        Self {
            message: format!(
                "Converted {} to {}",
                request.source().display(),
                request.destination().display()
            ),
            source: request.source.clone(),
            destination: request.destination.clone(),
            success: true,
            category: None,
        }
    }

    /// 失败结果："Failed to convert A: <error>"
    pub fn failed(request: &ConversionRequest, error: &ConvertError) -> Self {
        Self {
            message: format!(
                "Failed to convert {}: {error}",
                request.source().display()
            ),
            source: request.source.clone(),
            destination: request.destination.clone(),
            success: false,
            category: Some(ErrorCategory::from_error(error)),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// 失败类别（成功时为None）
    pub fn error_category(&self) -> Option<ErrorCategory> {
        self.category
    }

    /// 写入日志的一行文本
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// 外部编解码服务
///
/// 实现者负责把 `request.source()` 解码并按 `request.profile()` 编码为MP3，
/// 写入 `request.destination()`。失败时返回错误，不需要清理残留文件。
pub trait Codec: Send + Sync {
    /// 编解码器名称（用于日志）
    fn name(&self) -> &str;

    /// 执行一次转换
    fn transcode(&self, request: &ConversionRequest) -> ConvertResult<()>;
}

/// 通过编解码器转换单个文件，永不失败
pub fn convert(codec: &dyn Codec, request: &ConversionRequest) -> ConversionOutcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| codec.transcode(request)));

    match result {
        Ok(Ok(())) => ConversionOutcome::succeeded(request),
        Ok(Err(e)) => {
            tracing::debug!(
                codec = codec.name(),
                source = %request.source().display(),
                error = %e,
                "transcode failed"
            );
            ConversionOutcome::failed(request, &e)
        }
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            tracing::warn!(
                codec = codec.name(),
                source = %request.source().display(),
                "codec panicked: {reason}"
            );
            let error = error::encoding_error("codec panicked", reason);
            ConversionOutcome::failed(request, &error)
        }
    }
}

/// 提取panic载荷中的文本
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
