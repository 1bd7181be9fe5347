//! 批处理状态管理模块
//!
//! 单个批次内的进度计数与结果统计，由批处理流水线独占。

use crate::audio::ConversionOutcome;
use crate::error::ErrorCategory;
use crate::tools::utils;
use std::collections::HashMap;

/// 批处理进度状态
///
/// `completed` 从0单调递增到 `total`，百分比由两者推导，不能单独设置。
#[derive(Debug)]
pub struct BatchState {
    total: usize,
    completed: usize,
    succeeded: usize,
    failures: HashMap<ErrorCategory, Vec<String>>,
}

impl BatchState {
    /// 创建新的批次状态，总数在首个转换开始前固定
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: 0,
            succeeded: 0,
            failures: HashMap::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    /// 当前百分比（0-100，total为0时为0）
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed as f64 / self.total as f64 * 100.0).min(100.0)
    }

    /// 记录一个文件的结果并返回新的百分比
    pub fn record(&mut self, outcome: &ConversionOutcome) -> f64 {
        self.completed += 1;

        match outcome.error_category() {
            None => self.succeeded += 1,
            Some(category) => {
                let name = utils::extract_filename_lossy(outcome.source());
                self.failures.entry(category).or_default().push(name);
            }
        }

        self.percentage()
    }

    /// 获取统计快照
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            total: self.total,
            completed: self.completed,
            succeeded: self.succeeded,
            failed: self.completed - self.succeeded,
            failures: self.failures.clone(),
        }
    }
}

/// 批处理统计快照
///
/// 仅用于诊断；批次本身没有整体成败状态。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    /// 预先统计的文件总数
    pub total: usize,
    /// 已产生结果的文件数
    pub completed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// 错误分类统计（错误类型 -> 失败文件名列表）
    pub failures: HashMap<ErrorCategory, Vec<String>>,
}
