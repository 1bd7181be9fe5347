//! FFmpeg 参数与原地转换流程测试（使用脚本模拟的ffmpeg）
//!
//! 模拟程序与真实ffmpeg一样拒绝输入输出为同一文件，
//! 因此可以在未安装ffmpeg的环境中验证原地转换走临时文件。

#![cfg(unix)]

mod common;

use common::{file_names, log, temp_dir};
use darkages_mp3::{ConversionRequest, FfmpegCodec, TargetProfile};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const FAKE_FFMPEG: &str = r#"#!/bin/sh
for last; do :; done
case "$*" in
  *-encoders*) echo " A..... libmp3lame          libmp3lame MP3"; exit 0 ;;
esac
prev=""
for arg; do
  if [ "$prev" = "-i" ] && [ "$arg" = "$last" ]; then
    echo "Output $last same as Input #0 - exiting" >&2
    exit 1
  fi
  prev="$arg"
done
printf 'encoded by fake ffmpeg' > "$last"
"#;

fn install_fake_ffmpeg(dir: &Path) -> PathBuf {
    let script = dir.join("ffmpeg");
    std::fs::write(&script, FAKE_FFMPEG).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[test]
fn test_same_source_and_destination_goes_through_staging() {
    log("原地转换流程测试", "In-place conversion through staging file");

    let tools = temp_dir("stub_tools");
    let codec = FfmpegCodec::with_path(install_fake_ffmpeg(&tools)).unwrap();

    let dir = temp_dir("stub_in_place");
    let song = dir.join("song.mp3");
    std::fs::write(&song, b"original mp3").unwrap();

    // 路径写法不同但指向同一文件
    let request = ConversionRequest::new(
        song.clone(),
        dir.join(".").join("song.mp3"),
        TargetProfile::default(),
    );
    let outcome = darkages_mp3::audio::convert(&codec, &request);

    assert!(outcome.is_success(), "{}", outcome.message());
    assert_eq!(
        std::fs::read_to_string(&song).unwrap(),
        "encoded by fake ffmpeg"
    );
    assert_eq!(file_names(&dir), vec!["song.mp3"], "临时文件应被替换掉");

    // 不同文件时直接写入目标
    let other = dir.join("other.mp3");
    let request = ConversionRequest::new(song.clone(), other.clone(), TargetProfile::default());
    assert!(darkages_mp3::audio::convert(&codec, &request).is_success());
    assert!(other.is_file());
}
