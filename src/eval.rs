use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::utils::subject_of;

/// 准确率统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AccuracyReport {
    pub total: usize,
    pub pass: usize,
}

impl AccuracyReport {
    pub fn failed(&self) -> usize {
        self.total - self.pass
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 { 0.0 } else { self.pass as f64 / self.total as f64 }
    }

    /// 统计一条 `predicted:label` 记录
    pub fn add(&mut self, predicted: &str, label: &str) {
        if predicted == subject_of(label) {
            self.pass += 1;
        }
        self.total += 1;
    }
}

/// 逐行读取预测结果文件并统计准确率
pub fn evaluate(path: impl AsRef<Path>) -> Result<AccuracyReport> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    evaluate_reader(BufReader::new(file), path)
}

pub fn evaluate_reader(reader: impl BufRead, path: &Path) -> Result<AccuracyReport> {
    let mut report = AccuracyReport::default();
    for (no, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| Error::io(path, e))?;
        if line.is_empty() {
            continue;
        }
        let (predicted, label) =
            line.split_once(':').ok_or_else(|| Error::parse(path, no + 1, "缺少分隔符 ':'"))?;
        report.add(predicted, label);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn eval_str(s: &str) -> Result<AccuracyReport> {
        evaluate_reader(Cursor::new(s), Path::new("predictions.txt"))
    }

    #[test]
    fn test_one_of_two() {
        let report = eval_str("A:A_1\nB:C_2\n").unwrap();
        assert_eq!(report, AccuracyReport { total: 2, pass: 1 });
        assert_eq!(report.failed(), 1);
        assert_eq!(report.ratio(), 0.5);
    }

    #[test]
    fn test_composite_labels() {
        let report = eval_str("64:64__M_Right_index_finger\n452:45__F_Left_index_finger\n7:7\n").unwrap();
        assert_eq!(report, AccuracyReport { total: 3, pass: 2 });
    }

    #[test]
    fn test_empty() {
        let report = eval_str("").unwrap();
        assert_eq!(report, AccuracyReport::default());
        assert_eq!(report.ratio(), 0.0);
    }

    #[test]
    fn test_malformed_line() {
        assert!(matches!(eval_str("A:A_1\nbroken\n"), Err(Error::Parse { line: 2, .. })));
    }

    #[test]
    fn test_evaluate_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("model.predictions.txt");
        std::fs::write(&path, "A:A_1\nB:C_2\n").unwrap();
        assert_eq!(evaluate(&path).unwrap(), AccuracyReport { total: 2, pass: 1 });
        assert!(matches!(evaluate(dir.path().join("missing")), Err(Error::Io { .. })));
    }
}
