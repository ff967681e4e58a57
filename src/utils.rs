use std::path::{Path, PathBuf};

use image::{GrayImage, ImageError, ImageReader};
use indicatif::ProgressStyle;
use log::{debug, info};
use regex::Regex;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// 读取图片并转换为单通道灰度图
pub fn imread(path: impl AsRef<Path>) -> Result<GrayImage> {
    let path = path.as_ref();
    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| Error::io(path, e))?
        .decode()
        .map_err(|source| match source {
            ImageError::IoError(e) => Error::io(path, e),
            source => Error::Decode { path: path.to_owned(), source },
        })?;
    debug!("读取图片 {} ({}x{})", path.display(), image.width(), image.height());
    Ok(image.to_luma8())
}

/// 保存灰度图，格式由文件后缀决定
pub fn imwrite(path: impl AsRef<Path>, image: &GrayImage) -> Result<()> {
    let path = path.as_ref();
    image.save(path).map_err(|source| match source {
        ImageError::IoError(e) => Error::io(path, e),
        source => Error::Encode { path: path.to_owned(), source },
    })
}

/// 按文件名顺序扫描目录下所有后缀匹配的图片
pub fn scan_images(dir: impl AsRef<Path>, regex_suf: &Regex) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    info!("开始扫描目录: {}", dir.display());
    let mut entries = vec![];
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_owned();
            Error::io(path, e.into())
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(ext) = path.extension() else {
            continue;
        };
        if regex_suf.is_match(&ext.to_string_lossy()) {
            entries.push(path.to_owned());
        }
    }
    info!("扫描完成，共 {} 张图片", entries.len());
    Ok(entries)
}

/// 从 `subjectId_rest...` 形式的文件名中取出受试者编号
pub fn subject_of(name: &str) -> &str {
    name.split_once('_').map_or(name, |(subject, _)| subject)
}

/// 把逗号分隔的后缀列表编译为不区分大小写的正则
pub fn suffix_regex(suffix: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!("(?i)^({})$", suffix.replace(',', "|")))
}

pub fn pb_style() -> ProgressStyle {
    ProgressStyle::with_template("[{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len} {msg}")
        .expect("invalid progress bar template")
        .progress_chars("##-")
}
