//! 命令行接口模块
//!
//! 负责命令行参数解析、配置管理和程序信息展示。

use crate::audio::TargetProfile;
use crate::error::{ConvertError, ConvertResult};
use crate::processing::ExecutionMode;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// 应用程序版本信息
const VERSION: &str = env!("CARGO_PKG_VERSION");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// 应用程序配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 输入目录（递归扫描）
    pub input_folder: Option<PathBuf>,

    /// 输出目录（扁平，不存在时自动创建）
    pub output_folder: Option<PathBuf>,

    /// 目标编码配置
    pub profile: TargetProfile,

    /// 同步（批处理）或异步（交互进度条）
    pub mode: ExecutionMode,

    /// 是否写入Xing头
    pub write_xing: bool,

    /// 显式指定的FFmpeg路径
    pub ffmpeg_path: Option<PathBuf>,

    /// 是否显示详细信息
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_folder: None,
            output_folder: None,
            profile: TargetProfile::default(),
            mode: ExecutionMode::Synchronous,
            write_xing: true,
            ffmpeg_path: None,
            verbose: false,
        }
    }
}

impl AppConfig {
    /// 输入与输出目录都已指定时返回两者
    pub fn folders(&self) -> Option<(&Path, &Path)> {
        match (&self.input_folder, &self.output_folder) {
            (Some(input), Some(output)) => Some((input.as_path(), output.as_path())),
            _ => None,
        }
    }

    /// 是否为交互模式
    #[inline]
    pub fn is_interactive(&self) -> bool {
        self.mode == ExecutionMode::Asynchronous
    }
}

/// 构建命令行定义
fn build_command() -> Command {
    Command::new("darkages-mp3")
        .version(VERSION)
        .about(DESCRIPTION)
        .author("DarkAges Tools Team")
        .arg(
            Arg::new("input_folder")
                .long("input-folder")
                .alias("input_folder")
                .short('i')
                .help("Input folder, scanned recursively for M4A/WAV/MP3 files")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output_folder")
                .long("output-folder")
                .alias("output_folder")
                .short('o')
                .help("Output folder for the converted MP3 files (created if missing)")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("profile")
                .long("profile")
                .help("JSON file with bitrate_kbps / sample_rate / bit_depth")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("bitrate")
                .long("bitrate")
                .help("MP3 bitrate in kbit/s [default: 128]")
                .value_name("KBPS")
                .value_parser(value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new("sample_rate")
                .long("sample-rate")
                .help("Output sample rate in Hz [default: 22050]")
                .value_name("HZ")
                .value_parser(value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new("bit_depth")
                .long("bit-depth")
                .help("Sample width in bits: 8, 16, 24 or 32 [default: 16]")
                .value_name("BITS")
                .value_parser(value_parser!(u16)),
        )
        .arg(
            Arg::new("interactive")
                .long("interactive")
                .help("Run the batch in the background and show a live progress bar")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no_xing")
                .long("no-xing")
                .help("Omit the Xing header so re-encodes are byte-identical")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ffmpeg")
                .long("ffmpeg")
                .help("Path to the ffmpeg executable (default: search PATH)")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show detailed diagnostics")
                .action(ArgAction::SetTrue),
        )
}

/// 从解析结果构建配置；显式参数覆盖配置文件中的值
fn config_from_matches(matches: &ArgMatches) -> ConvertResult<AppConfig> {
    let mut profile = match matches.get_one::<PathBuf>("profile") {
        Some(path) => TargetProfile::from_json_file(path)?,
        None => TargetProfile::default(),
    };

    if let Some(&bitrate) = matches.get_one::<u32>("bitrate") {
        profile.bitrate_kbps = bitrate;
    }
    if let Some(&sample_rate) = matches.get_one::<u32>("sample_rate") {
        profile.sample_rate = sample_rate;
    }
    if let Some(&bit_depth) = matches.get_one::<u16>("bit_depth") {
        profile.bit_depth = bit_depth;
    }
    profile.validate()?;

    let mode = if matches.get_flag("interactive") {
        ExecutionMode::Asynchronous
    } else {
        ExecutionMode::Synchronous
    };

    Ok(AppConfig {
        input_folder: matches.get_one::<PathBuf>("input_folder").cloned(),
        output_folder: matches.get_one::<PathBuf>("output_folder").cloned(),
        profile,
        mode,
        write_xing: !matches.get_flag("no_xing"),
        ffmpeg_path: matches.get_one::<PathBuf>("ffmpeg").cloned(),
        verbose: matches.get_flag("verbose"),
    })
}

/// 解析命令行参数并创建配置（`--help`/参数错误时由clap直接退出）
pub fn parse_args() -> ConvertResult<AppConfig> {
    config_from_matches(&build_command().get_matches())
}

/// 从给定参数解析配置（首个元素为程序名）
pub fn parse_args_from<I, T>(args: I) -> ConvertResult<AppConfig>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command()
        .try_get_matches_from(args)
        .map_err(|e| ConvertError::InvalidInput(e.to_string()))?;
    config_from_matches(&matches)
}

/// 显示程序启动信息
pub fn show_startup_info(config: &AppConfig) {
    println!("DarkAges MP3 Converter v{VERSION}");
    if config.verbose {
        let p = &config.profile;
        println!(
            "Target profile: {} kbit/s, {} Hz, {}-bit{}",
            p.bitrate_kbps,
            p.sample_rate,
            p.bit_depth,
            if config.write_xing { "" } else { ", no Xing header" }
        );
    }
}
