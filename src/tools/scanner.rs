//! 文件扫描模块
//!
//! 递归遍历目录，按扩展名（不区分大小写）收集待转换的音频文件。
//! 每个目录先列出自身文件再进入子目录，同层顺序沿用文件系统的遍历顺序，不做全局排序。

use super::constants::formats::INPUT_EXTENSIONS;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// 文件名是否匹配支持的输入扩展名
pub fn is_supported_file_name(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    INPUT_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// 遍历目录并按顺序产出候选文件
///
/// 目录不存在或不是目录时产出为空；遍历中无法访问的条目被跳过。
fn walk_candidates(root: &Path) -> impl Iterator<Item = PathBuf> {
    let walker = root.is_dir().then(|| {
        WalkDir::new(root)
            .follow_links(false)
            // 稳定排序：同一目录内文件在前、子目录在后，各自保持读取顺序
            .sort_by(|a, b| a.file_type().is_dir().cmp(&b.file_type().is_dir()))
            .into_iter()
    });

    walker
        .into_iter()
        .flatten()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {e}");
                None
            }
        })
        .filter(is_candidate)
        .map(DirEntry::into_path)
}

fn is_candidate(entry: &DirEntry) -> bool {
    // 指向文件的符号链接也算文件
    let is_file = entry.file_type().is_file()
        || (entry.path_is_symlink() && entry.path().is_file());

    is_file && is_supported_file_name(&entry.file_name().to_string_lossy())
}

/// 扫描目录中的音频文件（保持遍历顺序）
pub fn discover(root: &Path) -> Vec<PathBuf> {
    let files: Vec<PathBuf> = walk_candidates(root).collect();
    tracing::debug!(root = %root.display(), count = files.len(), "discovered audio files");
    files
}

/// 统计待转换文件数量，与 [`discover`] 的结果长度一致
pub fn count(root: &Path) -> usize {
    walk_candidates(root).count()
}
