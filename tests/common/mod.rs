//! 集成测试共用工具
//!
//! 临时目录、WAV固件生成、假编解码器和记录型接收端。

#![allow(dead_code)]

use darkages_mp3::{Codec, ConversionRequest, ConvertError, ConvertResult, ProgressSink, SinkEvent};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn log(msg_zh: impl AsRef<str>, msg_en: impl AsRef<str>) {
    println!("{} / {}", msg_zh.as_ref(), msg_en.as_ref());
}

/// 每个测试独立的临时目录（进程号 + 序号），创建前清空
pub fn temp_dir(name: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "darkages_it_{name}_{}_{seq}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("无法创建临时目录");
    dir
}

/// 写入一个占位文件（内容无关紧要，假编解码器不读取）
pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("无法创建父目录");
    }
    std::fs::write(path, b"placeholder").expect("无法写入占位文件");
}

/// 生成正弦波WAV固件
pub fn write_sine_wav(path: &Path, sample_rate: u32, channels: u16, bits: u16, seconds: f32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("无法创建父目录");
    }

    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: bits,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).expect("无法创建WAV文件");

    let amplitude = ((1i64 << (bits - 1)) - 1) as f32 * 0.5;
    let frames = (sample_rate as f32 * seconds) as u32;
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let value = (t * 440.0 * 2.0 * std::f32::consts::PI).sin() * amplitude;
        for _ in 0..channels {
            writer.write_sample(value as i32).expect("写入样本失败");
        }
    }
    writer.finalize().expect("WAV文件收尾失败");
}

/// 假编解码器：写入固定内容；文件名包含 "corrupt" 时返回解码错误
#[derive(Default)]
pub struct FakeCodec {
    calls: AtomicUsize,
}

impl FakeCodec {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Codec for FakeCodec {
    fn name(&self) -> &str {
        "fake"
    }

    fn transcode(&self, request: &ConversionRequest) -> ConvertResult<()> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        let name = request.source().to_string_lossy().to_lowercase();
        if name.contains("corrupt") {
            return Err(ConvertError::DecodingError(
                "Invalid data found when processing input".to_string(),
            ));
        }

        let body = format!("mp3 from {}", request.source().display());
        std::fs::write(request.destination(), body)?;
        Ok(())
    }
}

/// 记录所有事件的接收端
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn logs(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Log(line) => Some(line),
                SinkEvent::Progress(_) => None,
            })
            .collect()
    }

    pub fn progress(&self) -> Vec<f64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SinkEvent::Progress(p) => Some(p),
                SinkEvent::Log(_) => None,
            })
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn append_log(&self, line: &str) {
        self.events.lock().unwrap().push(SinkEvent::Log(line.to_string()));
    }

    fn set_progress(&self, percentage: f64) {
        self.events.lock().unwrap().push(SinkEvent::Progress(percentage));
    }
}

/// 目录中的文件名（排序后）
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
