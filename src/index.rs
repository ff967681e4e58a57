use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use log::{debug, info, warn};

use crate::error::{Error, Result};

/// 训练时产生的一条记录
#[derive(Debug, Clone, PartialEq)]
pub struct DigestRecord {
    pub digest: f64,
    pub subject: String,
}

impl DigestRecord {
    pub fn new(digest: f64, subject: impl Into<String>) -> Self {
        Self { digest, subject: subject.into() }
    }
}

/// 多个样本得到完全相同的摘要时，保留哪个标签
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// 训练顺序中最后一个样本的标签覆盖其它样本
    #[default]
    Last,
    /// 训练顺序中第一个样本的标签覆盖其它样本
    First,
}

/// 按摘要升序排列的 (摘要, 标签) 表，即训练得到的模型
///
/// 摘要和标签分别存放在两个等长数组中，下标一一对应。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DigestIndex {
    digests: Vec<f64>,
    labels: Vec<String>,
}

impl DigestIndex {
    /// 对记录做稳定排序并按 `policy` 处理重复摘要
    pub fn build(mut records: Vec<DigestRecord>, policy: DuplicatePolicy) -> Self {
        records.sort_by(|a, b| a.digest.total_cmp(&b.digest));

        let mut collisions = 0;
        let mut start = 0;
        while start < records.len() {
            let digest = records[start].digest;
            let end = start + records[start..].iter().take_while(|r| r.digest == digest).count();
            if end - start > 1 {
                collisions += 1;
                let keep = match policy {
                    DuplicatePolicy::Last => end - 1,
                    DuplicatePolicy::First => start,
                };
                let label = records[keep].subject.clone();
                let others = records[start..end].iter().map(|r| r.subject.as_str()).collect::<Vec<_>>();
                warn!("{} 个样本的摘要均为 {:.6}: {:?}，统一使用标签 {}", end - start, digest, others, label);
                for record in &mut records[start..end] {
                    record.subject.clone_from(&label);
                }
            }
            start = end;
        }
        if collisions > 0 {
            warn!("共有 {} 组摘要冲突", collisions);
        }

        let (digests, labels) = records.into_iter().map(|r| (r.digest, r.subject)).unzip();
        Self { digests, labels }
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    pub fn digests(&self) -> &[f64] {
        &self.digests
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &str)> {
        self.digests.iter().copied().zip(self.labels.iter().map(String::as_str))
    }

    /// 返回与 `query` 距离最近的下标，距离相同时取较小的下标
    pub fn nearest(&self, query: f64) -> Option<usize> {
        nearest(&self.digests, query)
    }

    /// 返回与 `query` 最接近的摘要对应的标签
    pub fn lookup(&self, query: f64) -> Result<&str> {
        let i = self.nearest(query).ok_or(Error::EmptyModel)?;
        Ok(&self.labels[i])
    }

    /// 保存为每行一条 `digest:label` 的文本文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut tmp_file = path.to_owned();
        tmp_file.set_extension("tmp");

        let file = File::create(&tmp_file).map_err(|e| Error::io(&tmp_file, e))?;
        let mut writer = BufWriter::new(file);
        for (digest, label) in self.iter() {
            writeln!(writer, "{:.6}:{}", digest, label).map_err(|e| Error::io(&tmp_file, e))?;
        }
        writer.flush().map_err(|e| Error::io(&tmp_file, e))?;
        drop(writer);

        fs::rename(&tmp_file, path).map_err(|e| Error::io(path, e))?;
        info!("模型已保存到 {}，共 {} 条记录", path.display(), self.len());
        Ok(())
    }

    /// 从 [`DigestIndex::save`] 生成的文件中加载模型
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;

        let mut index = Self::default();
        for (no, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| Error::io(path, e))?;
            let no = no + 1;
            if line.trim().is_empty() {
                continue;
            }
            let (digest, label) =
                line.split_once(':').ok_or_else(|| Error::parse(path, no, "缺少分隔符 ':'"))?;
            let digest = digest
                .trim()
                .parse::<f64>()
                .map_err(|e| Error::parse(path, no, format!("无效的摘要 {digest:?}: {e}")))?;
            // 摘要总是有限值，NaN 会绕过下面的顺序检查
            if !digest.is_finite() {
                return Err(Error::parse(path, no, format!("无效的摘要 {digest}")));
            }
            if label.is_empty() {
                return Err(Error::parse(path, no, "标签为空"));
            }
            if index.digests.last().is_some_and(|&prev| prev > digest) {
                return Err(Error::parse(path, no, "模型中的摘要未按升序排列"));
            }
            index.digests.push(digest);
            index.labels.push(label.to_owned());
        }

        if index.is_empty() {
            return Err(Error::EmptyModel);
        }
        debug!("从 {} 加载了 {} 条记录", path.display(), index.len());
        Ok(index)
    }
}

/// 在升序数组中二分查找最近邻
///
/// - 大于最大值时返回最后一个下标
/// - 小于最小值时返回第一个下标
/// - 否则找到第一个 >= query 的位置，与前一个位置比较距离，相等时取前一个
pub fn nearest(digests: &[f64], query: f64) -> Option<usize> {
    let last = digests.len().checked_sub(1)?;
    if query > digests[last] {
        return Some(last);
    }
    if query < digests[0] {
        return Some(0);
    }
    let i = digests.partition_point(|&d| d < query);
    if i == 0 || i > last {
        return Some(i.min(last));
    }
    if query - digests[i - 1] <= digests[i] - query { Some(i - 1) } else { Some(i) }
}
