use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::*;

#[derive(Parser, Debug, Clone)]
pub struct ScanOptions {
    /// 扫描的文件后缀名，多个后缀用逗号分隔
    #[arg(short, long, default_value = "bmp")]
    pub suffix: String,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "fpdigest", version)]
pub struct Opts {
    #[command(subcommand)]
    pub subcmd: SubCommand,
    /// 模型和预测结果所在目录
    #[arg(short, long, global = true, default_value = ".")]
    pub work_dir: WorkDir,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SubCommand {
    /// 计算目录中所有图片的摘要并保存模型
    Train(TrainCommand),
    /// 使用已保存的模型批量识别图片并统计准确率
    Test(TestCommand),
    /// 重新统计已有预测结果的准确率
    Eval(EvalCommand),
    /// 显示单张图片的频率分布和摘要
    Show(ShowCommand),
}

#[derive(Debug, Clone)]
pub struct WorkDir {
    path: PathBuf,
}

impl WorkDir {
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// 返回模型文件的路径
    pub fn model(&self) -> PathBuf {
        self.path.join("model.cache.txt")
    }

    /// 返回预测结果文件的路径
    pub fn predictions(&self) -> PathBuf {
        self.path.join("model.predictions.txt")
    }
}

impl FromStr for WorkDir {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self { path: PathBuf::from(s) })
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}
