use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::info;

use crate::error::{Error, Result};
use crate::matcher::WorkItem;

/// 从标签文件中读取测试样本
///
/// 每行格式为 `image:label`，`image` 是相对于 `base_dir` 的路径。
pub fn load_label_file(path: impl AsRef<Path>, base_dir: impl AsRef<Path>) -> Result<Vec<WorkItem>> {
    let path = path.as_ref();
    let base_dir = base_dir.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;

    let mut items = vec![];
    for (no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| Error::io(path, e))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (image, label) =
            line.split_once(':').ok_or_else(|| Error::parse(path, no + 1, "缺少分隔符 ':'"))?;
        if image.is_empty() || label.is_empty() {
            return Err(Error::parse(path, no + 1, "图片路径和标签都不能为空"));
        }
        items.push(WorkItem { path: base_dir.join(image), label: label.to_owned() });
    }
    info!("从 {} 读取了 {} 条标签", path.display(), items.len());
    Ok(items)
}

/// 没有标签文件时，直接用文件名作为标签
pub fn label_by_file_name(files: Vec<PathBuf>) -> Vec<WorkItem> {
    files
        .into_iter()
        .map(|path| {
            let label = path.file_name().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
            WorkItem { path, label }
        })
        .collect()
}

/// 在开始匹配之前确认所有图片都存在，避免跑到一半才失败
pub fn ensure_exists(items: &[WorkItem]) -> Result<()> {
    for item in items {
        if let Err(e) = std::fs::metadata(&item.path) {
            return Err(Error::io(&item.path, e));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_load_label_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let labels = dir.path().join("labels.txt");
        fs::write(&labels, "00000.bmp:64__M_Right_index_finger\n\n00001.bmp:452__F_Left_index_finger\n")
            .unwrap();

        let items = load_label_file(&labels, "images").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].path, Path::new("images/00000.bmp"));
        assert_eq!(items[0].label, "64__M_Right_index_finger");
        assert_eq!(items[1].label, "452__F_Left_index_finger");
    }

    #[test]
    fn test_load_label_file_malformed() {
        let dir = tempfile::TempDir::new().unwrap();
        let labels = dir.path().join("labels.txt");
        fs::write(&labels, "00000.bmp:1_a\n00001.bmp\n").unwrap();
        assert!(matches!(load_label_file(&labels, "."), Err(Error::Parse { line: 2, .. })));

        fs::write(&labels, ":1_a\n").unwrap();
        assert!(matches!(load_label_file(&labels, "."), Err(Error::Parse { line: 1, .. })));
    }

    #[test]
    fn test_label_by_file_name() {
        let items = label_by_file_name(vec![PathBuf::from("a/12__M_Left_thumb_finger.bmp")]);
        assert_eq!(items[0].label, "12__M_Left_thumb_finger.bmp");
        assert_eq!(items[0].path, Path::new("a/12__M_Left_thumb_finger.bmp"));
    }

    #[test]
    fn test_ensure_exists() {
        let dir = tempfile::TempDir::new().unwrap();
        let present = dir.path().join("1_a.bmp");
        fs::write(&present, b"").unwrap();
        let mut items = vec![WorkItem { path: present, label: "1_a".into() }];
        assert!(ensure_exists(&items).is_ok());

        items.push(WorkItem { path: dir.path().join("2_b.bmp"), label: "2_b".into() });
        assert!(matches!(ensure_exists(&items), Err(Error::Io { .. })));
    }
}
