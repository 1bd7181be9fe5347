//! 工具函数模块
//!
//! 文件路径处理等通用工具函数。

/// 文件路径处理工具函数
pub mod path {
    use std::path::Path;

    /// 提取文件名（返回String，用于日志显示）
    #[inline]
    pub fn extract_filename_lossy(path: &Path) -> String {
        path.file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// 提取文件stem（不含最后一个扩展名）
    ///
    /// 以点开头且没有其他点的文件名（如 `.mp3`）整体作为stem。
    #[inline]
    pub fn extract_file_stem_lossy(path: &Path) -> String {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string())
    }
}

pub use path::{extract_file_stem_lossy, extract_filename_lossy};
