use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::bounded;
use indicatif::ProgressBar;
use log::{debug, error};

use crate::digest::digest_file;
use crate::error::{Error, Result};
use crate::index::DigestIndex;

/// 一个待测试的样本，图片路径与真实标签放在一起传递
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub path: PathBuf,
    pub label: String,
}

/// 一条预测结果，保存为 `predicted:label`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRecord {
    pub predicted: String,
    pub label: String,
}

impl fmt::Display for PredictionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.predicted, self.label)
    }
}

/// 使用固定数量的工作线程批量匹配样本
pub struct Matcher<'a> {
    index: &'a DigestIndex,
    workers: usize,
}

impl<'a> Matcher<'a> {
    pub fn new(index: &'a DigestIndex, workers: usize) -> Self {
        Self { index, workers: workers.max(1) }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// 计算单个样本的摘要并在模型中查找最近的标签
    pub fn predict(&self, item: &WorkItem) -> Result<PredictionRecord> {
        let digest = digest_file(&item.path)?;
        let predicted = self.index.lookup(digest)?;
        debug!("{} -> {:.6} -> {}", item.path.display(), digest, predicted);
        Ok(PredictionRecord { predicted: predicted.to_owned(), label: item.label.clone() })
    }

    /// 匹配所有样本，按完成顺序把结果写入 `output`，返回样本数量
    pub fn run_to_file(
        &self,
        items: Vec<WorkItem>,
        output: impl AsRef<Path>,
        pb: &ProgressBar,
    ) -> Result<usize> {
        let output = output.as_ref();
        let file = File::create(output).map_err(|e| Error::io(output, e))?;
        let mut writer = BufWriter::new(file);

        let count = process(
            self.workers,
            items,
            |item| self.predict(item),
            |record| {
                writeln!(writer, "{record}").map_err(|e| Error::io(output, e))?;
                pb.inc(1);
                Ok(())
            },
        )?;

        writer.flush().map_err(|e| Error::io(output, e))?;
        Ok(count)
    }
}

/// 生产者 + 工作线程池
///
/// 生产者线程向容量为 `workers` 的队列发送样本，队列满时阻塞；工作线程从队列中取样本，
/// 调用 `predict` 并把结果交给调用线程上的 `sink`。队列关闭且取空后工作线程退出。
/// 任何一个错误都会立刻终止整个流程：调用线程停止接收，工作线程和生产者随之退出。
pub fn process<I, P, F>(workers: usize, items: I, predict: P, mut sink: F) -> Result<usize>
where
    I: IntoIterator<Item = WorkItem>,
    I::IntoIter: Send,
    P: Fn(&WorkItem) -> Result<PredictionRecord> + Sync,
    F: FnMut(PredictionRecord) -> Result<()>,
{
    let workers = workers.max(1);
    let items = items.into_iter();

    thread::scope(|s| {
        let (job_tx, job_rx) = bounded::<WorkItem>(workers);
        let (res_tx, res_rx) = bounded::<Result<PredictionRecord>>(workers);

        let feeder = s.spawn(move || {
            let mut sent = 0usize;
            for item in items {
                // 所有工作线程都已退出，说明流程已被终止
                if job_tx.send(item).is_err() {
                    break;
                }
                sent += 1;
            }
            sent
        });

        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let res_tx = res_tx.clone();
            let predict = &predict;
            s.spawn(move || {
                for item in job_rx {
                    if res_tx.send(predict(&item)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(job_rx);
        drop(res_tx);

        let mut received = 0usize;
        for result in res_rx {
            match result {
                Ok(record) => sink(record)?,
                Err(e) => {
                    error!("匹配失败，终止测试: {e}");
                    return Err(e);
                }
            }
            received += 1;
        }

        let sent = feeder.join().map_err(|_| Error::WorkerLost)?;
        if sent != received {
            return Err(Error::WorkerLost);
        }
        Ok(received)
    })
}
