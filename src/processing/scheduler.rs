//! 执行调度
//!
//! 决定批处理在调用线程上同步运行，还是交给后台线程异步运行。
//! 两种模式都先在调用线程上统计文件数；为0时直接报告"没有文件"，不启动流水线。

use super::batch::BatchPipeline;
use super::batch_state::BatchSummary;
use super::sink::ProgressSink;
use crate::audio::{Codec, TargetProfile};
use crate::error::{ConvertError, ConvertResult};
use crate::tools::constants::{messages, threads};
use crate::tools::scanner;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// 执行模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// 阻塞调用方直到批次完成（非交互调用）
    Synchronous,
    /// 后台线程执行，调用方立即返回（交互调用）
    Asynchronous,
}

/// 启动结果
#[derive(Debug)]
pub enum BatchStart {
    /// 没有发现文件，流水线未启动
    NoFiles,
    /// 同步模式下批次已完成
    Completed(BatchSummary),
    /// 异步模式下批次已在后台启动
    Spawned(BatchHandle),
}

/// 后台批次句柄
///
/// 可选择等待；直接丢弃则线程继续运行至结束。不支持取消。
#[derive(Debug)]
pub struct BatchHandle {
    total: usize,
    inner: JoinHandle<ConvertResult<BatchSummary>>,
}

impl BatchHandle {
    /// 批次的文件总数
    pub fn total(&self) -> usize {
        self.total
    }

    /// 后台线程是否已结束
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }

    /// 等待批次结束并取回结果
    pub fn join(self) -> ConvertResult<BatchSummary> {
        self.inner.join().unwrap_or_else(|_| {
            Err(ConvertError::ResourceError(
                "batch thread panicked".to_string(),
            ))
        })
    }
}

/// 批处理调度器
#[derive(Clone)]
pub struct Scheduler {
    codec: Arc<dyn Codec>,
}

impl Scheduler {
    pub fn new(codec: Arc<dyn Codec>) -> Self {
        Self { codec }
    }

    /// 启动一个批次
    pub fn start(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        sink: Arc<dyn ProgressSink>,
        profile: &TargetProfile,
        mode: ExecutionMode,
    ) -> ConvertResult<BatchStart> {
        profile.validate()?;

        let total = scanner::count(input_dir);
        if total == 0 {
            tracing::info!(input = %input_dir.display(), "no convertible files");
            sink.append_log(messages::NO_FILES);
            return Ok(BatchStart::NoFiles);
        }

        match mode {
            ExecutionMode::Synchronous => {
                let pipeline = BatchPipeline::new(self.codec.as_ref());
                let summary = pipeline.run(input_dir, output_dir, sink.as_ref(), profile, total)?;
                Ok(BatchStart::Completed(summary))
            }
            ExecutionMode::Asynchronous => {
                sink.set_progress(0.0);
                let handle = self.spawn(
                    input_dir.to_path_buf(),
                    output_dir.to_path_buf(),
                    sink,
                    *profile,
                    total,
                )?;
                Ok(BatchStart::Spawned(handle))
            }
        }
    }

    fn spawn(
        &self,
        input_dir: PathBuf,
        output_dir: PathBuf,
        sink: Arc<dyn ProgressSink>,
        profile: TargetProfile,
        total: usize,
    ) -> ConvertResult<BatchHandle> {
        let codec = Arc::clone(&self.codec);

        let inner = thread::Builder::new()
            .name(threads::BATCH_THREAD_NAME.to_string())
            .spawn(move || {
                let pipeline = BatchPipeline::new(codec.as_ref());
                let result = pipeline.run(&input_dir, &output_dir, sink.as_ref(), &profile, total);
                if let Err(e) = &result {
                    tracing::error!("batch aborted: {e}");
                    // 观察者只能通过接收端得知结束
                    sink.append_log(&format!("{}: {e}", messages::ABORTED_PREFIX));
                }
                result
            })
            .map_err(|e| ConvertError::ResourceError(format!("failed to spawn batch thread: {e}")))?;

        Ok(BatchHandle { total, inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::ConversionRequest;
    use crate::processing::sink::{ChannelSink, SinkEvent};

    struct TouchCodec;

    impl Codec for TouchCodec {
        fn name(&self) -> &str {
            "touch"
        }

        fn transcode(&self, request: &ConversionRequest) -> ConvertResult<()> {
            std::fs::write(request.destination(), b"mp3")?;
            Ok(())
        }
    }

    fn scheduler() -> Scheduler {
        Scheduler::new(Arc::new(TouchCodec))
    }

    #[test]
    fn test_invalid_profile_rejected_before_anything() {
        let (sink, receiver) = ChannelSink::new();
        let profile = TargetProfile {
            bit_depth: 12,
            ..TargetProfile::default()
        };

        let result = scheduler().start(
            Path::new("."),
            Path::new("."),
            Arc::new(sink),
            &profile,
            ExecutionMode::Synchronous,
        );

        assert!(matches!(result, Err(ConvertError::InvalidInput(_))));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_empty_input_reports_no_files_in_both_modes() {
        let missing = std::env::temp_dir().join("darkages_sched_missing_c4d2");
        let _ = std::fs::remove_dir_all(&missing);

        for mode in [ExecutionMode::Synchronous, ExecutionMode::Asynchronous] {
            let (sink, receiver) = ChannelSink::new();
            let result = scheduler()
                .start(
                    &missing,
                    &missing.join("out"),
                    Arc::new(sink),
                    &TargetProfile::default(),
                    mode,
                )
                .unwrap();

            assert!(matches!(result, BatchStart::NoFiles));
            let events: Vec<SinkEvent> = receiver.iter().collect();
            assert_eq!(events, vec![SinkEvent::Log(messages::NO_FILES.to_string())]);
            assert!(!missing.join("out").exists());
        }
    }
}
