//! FFmpeg桥接编解码器
//!
//! 通过FFmpeg子进程完成 解码 → 位深/采样率归一化 → libmp3lame编码。
//! 输入容器（M4A/WAV/MP3）全部交给FFmpeg处理，本模块只负责参数构建和结果判定。

use super::codec::{Codec, ConversionRequest};
use super::format;
use crate::error::{self, ConvertError, ConvertResult};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// 指定的MP3编码器
pub const MP3_ENCODER: &str = "libmp3lame";

/// FFmpeg安装指南（跨平台）
const FFMPEG_INSTALL_GUIDE: &str = r#"
FFmpeg with libmp3lame is required for MP3 encoding.

Installation:
  macOS:   brew install ffmpeg
  Windows: https://www.gyan.dev/ffmpeg/builds/
           or: winget install Gyan.FFmpeg
  Linux:
    - Ubuntu/Debian: sudo apt install ffmpeg
    - Fedora/RHEL:   sudo dnf install ffmpeg
    - Arch:          sudo pacman -S ffmpeg

Official site: https://ffmpeg.org/download.html
"#;

/// 表示输入端（解码）失败的FFmpeg输出片段
const INPUT_FAILURE_MARKERS: &[&str] = &[
    "Invalid data found when processing input",
    "Error opening input",
    "could not find codec parameters",
    "does not contain any stream",
    "Output file does not contain any stream",
];

/// FFmpeg MP3编码器
#[derive(Debug, Clone)]
pub struct FfmpegCodec {
    /// FFmpeg可执行文件路径
    ffmpeg_path: PathBuf,
    /// 是否写入Xing头（关闭后重复编码的输出逐字节一致）
    write_xing: bool,
}

impl FfmpegCodec {
    /// 检测FFmpeg是否可用且带有libmp3lame
    pub fn is_available() -> bool {
        Self::find_ffmpeg_path()
            .map(|p| Self::supports_mp3_encoding(&p))
            .unwrap_or(false)
    }

    /// 自动查找FFmpeg并验证MP3编码支持
    pub fn locate() -> ConvertResult<Self> {
        let path = Self::find_ffmpeg_path()
            .ok_or_else(|| ConvertError::CodecUnavailable(FFMPEG_INSTALL_GUIDE.to_string()))?;
        Self::with_path(path)
    }

    /// 使用指定的FFmpeg可执行文件
    pub fn with_path(path: impl Into<PathBuf>) -> ConvertResult<Self> {
        let ffmpeg_path = path.into();
        if !Self::supports_mp3_encoding(&ffmpeg_path) {
            return Err(ConvertError::CodecUnavailable(format!(
                "{} cannot run or lacks the {MP3_ENCODER} encoder\n{FFMPEG_INSTALL_GUIDE}",
                ffmpeg_path.display()
            )));
        }

        tracing::debug!(path = %ffmpeg_path.display(), "using ffmpeg");
        Ok(Self {
            ffmpeg_path,
            write_xing: true,
        })
    }

    /// 设置是否写入Xing头
    pub fn with_xing_header(mut self, write_xing: bool) -> Self {
        self.write_xing = write_xing;
        self
    }

    pub fn ffmpeg_path(&self) -> &Path {
        &self.ffmpeg_path
    }

    /// 查找FFmpeg可执行文件路径（跨平台）
    fn find_ffmpeg_path() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            let mut candidates = vec![
                PathBuf::from("ffmpeg.exe"),
                PathBuf::from(r"C:\Program Files\ffmpeg\bin\ffmpeg.exe"),
                PathBuf::from(r"C:\ffmpeg\bin\ffmpeg.exe"),
            ];
            // 便携部署：与可执行文件同目录
            if let Some(dir) = std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(Path::to_path_buf))
            {
                candidates.push(dir.join("ffmpeg.exe"));
            }

            candidates.into_iter().find(|p| Self::runs(p))
        }

        #[cfg(not(target_os = "windows"))]
        {
            let path = PathBuf::from("ffmpeg");
            Self::runs(&path).then_some(path)
        }
    }

    fn runs(path: &Path) -> bool {
        Command::new(path)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// 检查 `ffmpeg -encoders` 是否列出libmp3lame
    fn supports_mp3_encoding(path: &Path) -> bool {
        Command::new(path)
            .args(["-hide_banner", "-encoders"])
            .stdin(Stdio::null())
            .output()
            .map(|o| o.status.success() && String::from_utf8_lossy(&o.stdout).contains(MP3_ENCODER))
            .unwrap_or(false)
    }

    /// 构建FFmpeg参数
    ///
    /// 样本宽度通过 `aformat` 强制为 `bit_depth/8` 字节，采样率通过 `-ar` 设置，
    /// 编码器固定为libmp3lame。
    pub fn build_args(&self, request: &ConversionRequest) -> Vec<OsString> {
        self.build_args_to(request, request.destination())
    }

    /// 构建FFmpeg参数，输出写入 `output`（而非请求的目标路径）
    fn build_args_to(&self, request: &ConversionRequest, output: &Path) -> Vec<OsString> {
        let profile = request.profile();

        let mut args: Vec<OsString> = ["-hide_banner", "-nostdin", "-y", "-v", "error", "-i"]
            .iter()
            .map(OsString::from)
            .collect();
        args.push(request.source().as_os_str().to_owned());

        args.extend(
            [
                "-vn".to_string(),
                "-map_metadata".to_string(),
                "-1".to_string(),
                "-af".to_string(),
                format!(
                    "aformat=sample_fmts={}",
                    sample_format(profile.sample_width_bytes())
                ),
                "-ar".to_string(),
                profile.sample_rate.to_string(),
                "-acodec".to_string(),
                MP3_ENCODER.to_string(),
                "-b:a".to_string(),
                profile.bitrate_arg(),
            ]
            .into_iter()
            .map(OsString::from),
        );

        if !self.write_xing {
            args.extend(
                [
                    "-write_xing",
                    "0",
                    "-fflags",
                    "+bitexact",
                    "-flags:a",
                    "+bitexact",
                ]
                .iter()
                .map(OsString::from),
            );
        }

        args.push(OsString::from("-f"));
        args.push(OsString::from("mp3"));
        args.push(output.as_os_str().to_owned());
        args
    }

    /// 运行FFmpeg，把请求编码到 `output` 并检查输出非空，返回写入字节数
    fn encode_to(&self, request: &ConversionRequest, output: &Path) -> ConvertResult<u64> {
        let args = self.build_args_to(request, output);
        tracing::debug!(?args, "spawning ffmpeg");

        let result = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ConvertError::CodecUnavailable(format!("failed to spawn ffmpeg: {e}")))?;

        if !result.status.success() {
            return Err(classify_failure(&String::from_utf8_lossy(&result.stderr)));
        }

        let written = std::fs::metadata(output).map(|m| m.len()).unwrap_or(0);
        if written == 0 {
            return Err(ConvertError::EncodingError(
                "ffmpeg produced no output".to_string(),
            ));
        }
        Ok(written)
    }

    /// 原地转换：先编码到同目录的临时文件，成功后替换源文件
    fn encode_in_place(&self, request: &ConversionRequest) -> ConvertResult<u64> {
        let staging = staging_path(request.destination());
        tracing::debug!(
            path = %request.destination().display(),
            staging = %staging.display(),
            "source and destination are the same file, encoding via staging file"
        );

        let written = match self.encode_to(request, &staging) {
            Ok(written) => written,
            Err(e) => {
                let _ = std::fs::remove_file(&staging);
                return Err(e);
            }
        };

        if let Err(e) = std::fs::rename(&staging, request.destination()) {
            let _ = std::fs::remove_file(&staging);
            return Err(e.into());
        }
        Ok(written)
    }
}

/// 两个路径是否指向同一个已存在的文件
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// 原地转换使用的临时文件：`.<文件名>.part`，与目标位于同一目录
///
/// 扩展名不属于任何输入格式，残留文件不会被下一次扫描当作输入。
fn staging_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    destination.with_file_name(format!(".{name}.part"))
}

/// 样本宽度（字节）对应的FFmpeg样本格式
fn sample_format(width_bytes: u16) -> &'static str {
    match width_bytes {
        1 => "u8",
        2 => "s16",
        _ => "s32", // FFmpeg没有打包的24位格式，24/32位都用s32承载
    }
}

/// 根据stderr判断失败发生在解码端还是编码端
fn classify_failure(stderr: &str) -> ConvertError {
    let text = stderr.trim();
    let text = if text.is_empty() {
        "ffmpeg exited with an error".to_string()
    } else {
        text.lines().last().unwrap_or(text).to_string()
    };

    if INPUT_FAILURE_MARKERS.iter().any(|m| stderr.contains(m)) {
        error::decoding_error("ffmpeg", text)
    } else {
        error::encoding_error("ffmpeg", text)
    }
}

impl Codec for FfmpegCodec {
    fn name(&self) -> &str {
        "ffmpeg/libmp3lame"
    }

    fn transcode(&self, request: &ConversionRequest) -> ConvertResult<()> {
        let written = if is_same_file(request.source(), request.destination()) {
            self.encode_in_place(request)?
        } else {
            self.encode_to(request, request.destination())?
        };

        match format::probe_format(request.destination()) {
            Ok(produced) => tracing::debug!(
                sample_rate = produced.sample_rate,
                channels = produced.channels,
                seconds = produced.duration_seconds(),
                bytes = written,
                "encoded {}",
                request.destination().display()
            ),
            Err(e) => tracing::debug!("could not probe encoded output: {e}"),
        }

        Ok(())
    }
}
