//! 日志/进度接收端
//!
//! 流水线只通过 [`ProgressSink`] 报告日志行和进度百分比。
//! 具体实现由调用方选择：控制台输出、空实现，或转发给观察者线程的通道。

use crossbeam_channel::{Receiver, Sender};
use std::io::{self, Write};
use std::sync::Mutex;

/// 日志与进度接收端
///
/// 批处理可能运行在后台线程，实现者需自行保证写入端线程安全。
pub trait ProgressSink: Send + Sync {
    /// 追加一行日志（不含换行符）
    fn append_log(&self, line: &str);

    /// 设置进度百分比（0-100）
    fn set_progress(&self, percentage: f64);
}

/// 丢弃所有输出
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn append_log(&self, _line: &str) {}

    fn set_progress(&self, _percentage: f64) {}
}

/// 纯文本输出流接收端（非交互模式）
#[derive(Debug)]
pub struct ConsoleSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl ConsoleSink<io::Stdout> {
    /// 输出到标准输出
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// 取回内部writer
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_line(&self, line: &str) {
        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        // 输出失败（如管道关闭）不影响转换本身
        let _ = writeln!(writer, "{line}");
        let _ = writer.flush();
    }
}

impl<W: Write + Send> ProgressSink for ConsoleSink<W> {
    fn append_log(&self, line: &str) {
        self.write_line(line);
    }

    fn set_progress(&self, percentage: f64) {
        self.write_line(&format!("Progress: {percentage:.2}%"));
    }
}

/// 接收端事件
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Log(String),
    Progress(f64),
}

/// 通道接收端（交互模式）
///
/// 事件按调用顺序发送给观察者；所有 `ChannelSink` 被释放后通道断开，
/// 观察者可据此结束事件循环。
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<SinkEvent>,
}

impl ChannelSink {
    /// 创建接收端和对应的事件接收器
    pub fn new() -> (Self, Receiver<SinkEvent>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self { sender }, receiver)
    }

    fn send(&self, event: SinkEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("sink observer disconnected, event dropped");
        }
    }
}

impl ProgressSink for ChannelSink {
    fn append_log(&self, line: &str) {
        self.send(SinkEvent::Log(line.to_string()));
    }

    fn set_progress(&self, percentage: f64) {
        self.send(SinkEvent::Progress(percentage));
    }
}
