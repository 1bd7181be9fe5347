//! 常量和默认配置集中管理
//!
//! 将用户可见文本和格式常量集中定义，避免重复和漂移

/// 批处理日志文本
pub mod messages {
    /// 批次开始
    pub const STARTING: &str = "Starting conversion...";

    /// 批次结束（异步模式下唯一的完成信号）
    pub const FINISHED: &str = "Conversion finished!";

    /// 没有发现可转换的文件
    pub const NO_FILES: &str = "No valid audio files found for conversion.";

    /// 缺少输入/输出目录
    pub const MISSING_FOLDERS: &str = "Please select both input and output folders.";

    /// 批次因致命错误中止（后接错误描述）
    pub const ABORTED_PREFIX: &str = "Conversion aborted";
}

/// 输入/输出格式
pub mod formats {
    /// 输入文件扩展名（小写，带点，按文件名后缀匹配）
    pub const INPUT_EXTENSIONS: &[&str] = &[".m4a", ".wav", ".mp3"];

    /// 输出文件扩展名
    pub const OUTPUT_EXTENSION: &str = "mp3";
}

/// 线程命名
pub mod threads {
    /// 异步批处理线程名
    pub const BATCH_THREAD_NAME: &str = "darkages-batch";
}
