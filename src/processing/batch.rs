//! 批处理流水线
//!
//! 对一个输入目录中发现的文件逐个转换，按发现顺序把结果和进度推送给接收端。
//! 单个文件失败只记录为失败结果；只有输出目录无法创建这类致命错误会中止批次。

use super::batch_state::{BatchState, BatchSummary};
use super::sink::ProgressSink;
use crate::audio::{self, Codec, ConversionRequest, TargetProfile};
use crate::error::ConvertResult;
use crate::tools::constants::{formats, messages};
use crate::tools::{scanner, utils};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// 输出路径：`output_dir / <源文件stem>.mp3`
///
/// 输出目录总是扁平的；不同子目录中的同名文件会映射到同一路径，后者覆盖前者。
pub fn destination_for(source: &Path, output_dir: &Path) -> PathBuf {
    let stem = utils::extract_file_stem_lossy(source);
    output_dir.join(format!("{stem}.{}", formats::OUTPUT_EXTENSION))
}

/// 批处理流水线
pub struct BatchPipeline<'a> {
    codec: &'a dyn Codec,
}

impl<'a> BatchPipeline<'a> {
    pub fn new(codec: &'a dyn Codec) -> Self {
        Self { codec }
    }

    /// 运行一个批次
    ///
    /// `total_count` 必须由调用方通过 [`scanner::count`] 预先计算且大于0。
    pub fn run(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        sink: &dyn ProgressSink,
        profile: &TargetProfile,
        total_count: usize,
    ) -> ConvertResult<BatchSummary> {
        // 输出目录创建失败属于致命错误，在处理任何文件之前中止
        std::fs::create_dir_all(output_dir)?;

        let files = scanner::discover(input_dir);
        if files.len() != total_count {
            tracing::warn!(
                expected = total_count,
                found = files.len(),
                "input changed between counting and conversion"
            );
        }

        self.run_files(&files, output_dir, sink, profile, total_count)
    }

    /// 按给定顺序转换文件列表（输出目录须已存在）
    pub fn run_files(
        &self,
        files: &[PathBuf],
        output_dir: &Path,
        sink: &dyn ProgressSink,
        profile: &TargetProfile,
        total_count: usize,
    ) -> ConvertResult<BatchSummary> {
        tracing::info!(
            total = total_count,
            codec = self.codec.name(),
            output = %output_dir.display(),
            "batch started"
        );
        sink.append_log(messages::STARTING);

        let started = Instant::now();
        let mut state = BatchState::new(total_count);
        let mut destinations = HashSet::new();

        for source in files {
            let destination = destination_for(source, output_dir);
            if !destinations.insert(destination.clone()) {
                tracing::debug!(
                    destination = %destination.display(),
                    "output name collision, later file overwrites"
                );
            }

            let request = ConversionRequest::new(source.as_path(), destination, *profile);
            let file_started = Instant::now();
            let outcome = audio::convert(self.codec, &request);
            tracing::debug!(
                source = %source.display(),
                success = outcome.is_success(),
                elapsed_ms = file_started.elapsed().as_millis() as u64,
                "file processed"
            );

            sink.append_log(outcome.message());
            let percentage = state.record(&outcome);
            sink.set_progress(percentage);
        }

        sink.append_log(messages::FINISHED);

        let summary = state.summary();
        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "batch finished"
        );
        for (category, names) in &summary.failures {
            tracing::info!("{}: {}", category.display_name(), names.join(", "));
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_is_flat_stem_mp3() {
        let out = Path::new("out");
        assert_eq!(
            destination_for(Path::new("in/sub/deep/Track 01.M4A"), out),
            out.join("Track 01.mp3")
        );
        assert_eq!(destination_for(Path::new("in/a.wav"), out), out.join("a.mp3"));
        assert_eq!(destination_for(Path::new("in/a.mp3"), out), out.join("a.mp3"));
    }

    #[test]
    fn test_multi_dot_names_keep_inner_dots() {
        let out = Path::new("out");
        assert_eq!(
            destination_for(Path::new("in/live.2024.wav"), out),
            out.join("live.2024.mp3")
        );
    }
}
