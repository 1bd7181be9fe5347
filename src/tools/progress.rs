//! 终端观察者
//!
//! 交互模式下在主线程消费 [`ChannelSink`](crate::processing::ChannelSink) 的事件，
//! 用 `indicatif` 进度条显示百分比，日志行打印在进度条上方。
//! 进度条不可见（stderr不是终端）时日志行照常写出。

use crate::processing::SinkEvent;
use crate::tools::constants::messages;
use crossbeam_channel::Receiver;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;

/// 创建百分比进度条（0-100）
pub fn create_percent_bar() -> ProgressBar {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// 观察结果
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ObservedBatch {
    /// 收到的日志行数
    pub log_lines: usize,
    /// 最后一次进度值
    pub last_progress: Option<f64>,
    /// 是否收到结束行
    pub finished: bool,
}

/// 消费事件直到通道断开（批处理线程结束后所有发送端被释放）
///
/// 日志行写入 `out`，写入期间暂停进度条的绘制。
pub fn observe<W: Write>(
    receiver: &Receiver<SinkEvent>,
    pb: &ProgressBar,
    mut out: W,
) -> ObservedBatch {
    let mut observed = ObservedBatch::default();

    for event in receiver.iter() {
        match event {
            SinkEvent::Log(line) => {
                observed.log_lines += 1;
                if line == messages::FINISHED {
                    observed.finished = true;
                    pb.set_message("done");
                }
                pb.suspend(|| {
                    // 输出失败（如管道关闭）不影响转换本身
                    let _ = writeln!(out, "{line}");
                    let _ = out.flush();
                });
            }
            SinkEvent::Progress(percentage) => {
                observed.last_progress = Some(percentage);
                pb.set_position(percentage.clamp(0.0, 100.0).round() as u64);
            }
        }
    }

    pb.finish();
    observed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::{ChannelSink, ProgressSink};
    use indicatif::ProgressDrawTarget;

    #[test]
    fn test_observe_until_disconnect() {
        let (sink, receiver) = ChannelSink::new();
        let worker = std::thread::spawn(move || {
            sink.set_progress(0.0);
            sink.append_log(messages::STARTING);
            sink.append_log("Converted a.wav to out/a.mp3");
            sink.set_progress(100.0);
            sink.append_log(messages::FINISHED);
        });

        let pb = ProgressBar::hidden();
        let mut out = Vec::new();
        let observed = observe(&receiver, &pb, &mut out);
        worker.join().unwrap();

        assert_eq!(observed.log_lines, 3);
        assert_eq!(observed.last_progress, Some(100.0));
        assert!(observed.finished);
        assert_eq!(pb.position(), 100);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 3);
    }

    #[test]
    fn test_observe_without_finished_line() {
        let (sink, receiver) = ChannelSink::new();
        sink.append_log(messages::NO_FILES);
        drop(sink);

        let mut out = Vec::new();
        let observed = observe(&receiver, &ProgressBar::hidden(), &mut out);
        assert_eq!(observed.log_lines, 1);
        assert_eq!(String::from_utf8(out).unwrap(), format!("{}\n", messages::NO_FILES));
        assert!(!observed.finished);
        assert_eq!(observed.last_progress, None);
    }

    #[test]
    fn test_log_lines_written_when_bar_not_drawn() {
        let (sink, receiver) = ChannelSink::new();
        sink.set_progress(0.0);
        sink.append_log(messages::STARTING);
        sink.append_log("Converted in/a.wav to out/a.mp3");
        sink.set_progress(50.0);
        sink.append_log("Failed to convert in/b.m4a: decoding failed: ffmpeg: bad");
        sink.set_progress(100.0);
        sink.append_log(messages::FINISHED);
        drop(sink);

        // stderr被重定向时indicatif的终端目标不会绘制
        let pb = ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::hidden());
        assert!(pb.is_hidden());

        let mut out = Vec::new();
        let observed = observe(&receiver, &pb, &mut out);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                messages::STARTING,
                "Converted in/a.wav to out/a.mp3",
                "Failed to convert in/b.m4a: decoding failed: ffmpeg: bad",
                messages::FINISHED,
            ]
        );
        assert_eq!(observed.log_lines, 4);
        assert!(observed.finished);
    }
}
