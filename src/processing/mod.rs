//! 批处理模块
//!
//! 流水线、调度器、批次状态以及日志/进度接收端。

pub mod batch;
pub mod batch_state;
pub mod scheduler;
pub mod sink;

pub use batch::{BatchPipeline, destination_for};
pub use batch_state::{BatchState, BatchSummary};
pub use scheduler::{BatchHandle, BatchStart, ExecutionMode, Scheduler};
pub use sink::{ChannelSink, ConsoleSink, NullSink, ProgressSink, SinkEvent};
