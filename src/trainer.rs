use std::path::{Path, PathBuf};

use indicatif::{ParallelProgressIterator, ProgressBar};
use log::info;
use rayon::prelude::*;
use regex::Regex;

use crate::digest::digest_file;
use crate::error::{Error, Result};
use crate::index::{DigestIndex, DigestRecord, DuplicatePolicy};
use crate::utils::{scan_images, subject_of};

/// 计算一张训练图片的摘要，标签取文件名中第一个 `_` 之前的部分
pub fn train_record(path: &Path) -> Result<DigestRecord> {
    let digest = digest_file(path)?;
    let name = path.file_name().map(|s| s.to_string_lossy()).unwrap_or_default();
    Ok(DigestRecord::new(digest, subject_of(&name)))
}

/// 并行计算所有图片的摘要并构建模型
///
/// 结果按输入顺序收集，所以同样的输入总是得到同样的模型。
pub fn train_files(files: &[PathBuf], policy: DuplicatePolicy, pb: &ProgressBar) -> Result<DigestIndex> {
    pb.set_length(files.len() as u64);
    let records = files
        .par_iter()
        .progress_with(pb.clone())
        .map(|path| train_record(path))
        .collect::<Result<Vec<_>>>()?;
    info!("已计算 {} 张图片的摘要", records.len());
    Ok(DigestIndex::build(records, policy))
}

/// 扫描目录并训练
pub fn train_dir(
    dir: impl AsRef<Path>,
    regex_suf: &Regex,
    policy: DuplicatePolicy,
    pb: &ProgressBar,
) -> Result<DigestIndex> {
    let dir = dir.as_ref();
    let files = scan_images(dir, regex_suf)?;
    if files.is_empty() {
        return Err(Error::EmptyDataset(dir.to_owned()));
    }
    train_files(&files, policy, pb)
}
