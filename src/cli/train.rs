use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::ProgressBar;
use log::info;

use crate::cli::SubCommandExtend;
use crate::config::{Opts, ScanOptions};
use crate::index::DuplicatePolicy;
use crate::trainer::train_dir;
use crate::utils::{pb_style, suffix_regex};

#[derive(Parser, Debug, Clone)]
pub struct TrainCommand {
    #[command(flatten)]
    pub scan: ScanOptions,
    /// 训练图片所在目录，文件名格式为 `受试者编号_其它信息`
    pub path: PathBuf,
    /// 多张图片摘要相同时保留哪一张的标签
    #[arg(long, value_enum, default_value_t = DuplicatePolicy::Last)]
    pub on_duplicate: DuplicatePolicy,
}

impl SubCommandExtend for TrainCommand {
    fn run(&self, opts: &Opts) -> Result<()> {
        let re_suf = suffix_regex(&self.scan.suffix).context("无效的后缀名")?;
        fs::create_dir_all(opts.work_dir.path())
            .with_context(|| format!("无法创建目录 {}", opts.work_dir.path().display()))?;

        info!("开始训练");
        let pb = ProgressBar::no_length().with_style(pb_style());
        let index = train_dir(&self.path, &re_suf, self.on_duplicate, &pb)?;
        pb.finish_with_message("训练完成");

        info!("保存模型");
        index.save(opts.work_dir.model())?;
        Ok(())
    }
}
