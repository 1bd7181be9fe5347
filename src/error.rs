//! 统一错误处理框架
//!
//! 转换流程中的错误类型定义。单文件错误在编解码边界被转换为失败结果，
//! 只有致命错误（如输出目录无法创建）会从批处理中传播出去。

use std::fmt;
use std::io;

/// 转换相关的统一错误类型
#[derive(Debug)]
pub enum ConvertError {
    /// 输入验证错误（参数、目标配置）
    InvalidInput(String),

    /// 文件I/O错误
    IoError(io::Error),

    /// 容器/格式探测错误
    FormatError(String),

    /// 源文件解码失败
    DecodingError(String),

    /// MP3编码失败
    EncodingError(String),

    /// 外部编解码服务不可用
    CodecUnavailable(String),

    /// 资源访问错误（线程创建等）
    ResourceError(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            ConvertError::IoError(err) => write!(f, "I/O error: {err}"),
            ConvertError::FormatError(msg) => write!(f, "format error: {msg}"),
            ConvertError::DecodingError(msg) => write!(f, "decoding failed: {msg}"),
            ConvertError::EncodingError(msg) => write!(f, "encoding failed: {msg}"),
            ConvertError::CodecUnavailable(msg) => write!(f, "codec unavailable: {msg}"),
            ConvertError::ResourceError(msg) => write!(f, "resource error: {msg}"),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ConvertError {
    fn from(err: io::Error) -> Self {
        ConvertError::IoError(err)
    }
}

/// 转换操作的标准Result类型
pub type ConvertResult<T> = Result<T, ConvertError>;

// ==================== 错误转换Helper函数 ====================

/// 创建格式错误的helper函数
#[inline]
pub fn format_error<E: fmt::Display>(context: &str, err: E) -> ConvertError {
    ConvertError::FormatError(format!("{context}: {err}"))
}

/// 创建解码错误的helper函数
#[inline]
pub fn decoding_error<E: fmt::Display>(context: &str, err: E) -> ConvertError {
    ConvertError::DecodingError(format!("{context}: {err}"))
}

/// 创建编码错误的helper函数
#[inline]
pub fn encoding_error<E: fmt::Display>(context: &str, err: E) -> ConvertError {
    ConvertError::EncodingError(format!("{context}: {err}"))
}

// ==================== 错误分类系统 ====================

/// 错误类别枚举（用于批量统计和退出码映射）
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum ErrorCategory {
    /// 参数或配置不合法
    Input,
    /// 文件不存在、权限不足等
    Io,
    /// 容器/格式无法识别
    Format,
    /// 解码或编码失败、编解码器不可用
    Codec,
    /// 线程等系统资源
    Resource,
}

impl ErrorCategory {
    /// 从ConvertError提取错误类别
    pub fn from_error(e: &ConvertError) -> Self {
        match e {
            ConvertError::InvalidInput(_) => Self::Input,
            ConvertError::IoError(_) => Self::Io,
            ConvertError::FormatError(_) => Self::Format,
            ConvertError::DecodingError(_)
            | ConvertError::EncodingError(_)
            | ConvertError::CodecUnavailable(_) => Self::Codec,
            ConvertError::ResourceError(_) => Self::Resource,
        }
    }

    /// 获取错误类别的显示名称
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Input => "input error",
            Self::Io => "I/O error",
            Self::Format => "format error",
            Self::Codec => "codec error",
            Self::Resource => "resource error",
        }
    }
}
