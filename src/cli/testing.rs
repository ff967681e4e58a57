use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::ProgressBar;
use log::info;

use super::print_report;
use crate::cli::SubCommandExtend;
use crate::config::{Opts, OutputFormat, ScanOptions};
use crate::eval::evaluate;
use crate::index::DigestIndex;
use crate::labels::{ensure_exists, label_by_file_name, load_label_file};
use crate::matcher::Matcher;
use crate::utils::{pb_style, scan_images, suffix_regex};

#[derive(Parser, Debug, Clone)]
pub struct TestCommand {
    #[command(flatten)]
    pub scan: ScanOptions,
    /// 测试图片所在目录
    pub path: PathBuf,
    /// 标签文件，每行为 `图片:标签`，图片路径相对于测试目录
    /// 不指定时扫描整个目录，并以文件名作为标签
    #[arg(short, long, value_name = "FILE", verbatim_doc_comment)]
    pub labels: Option<PathBuf>,
    /// 工作线程数量，默认为 CPU 核心数
    #[arg(short = 'j', long, value_name = "N")]
    pub workers: Option<usize>,
    /// 输出格式
    #[arg(long, value_name = "FORMAT", value_enum, default_value_t = OutputFormat::Table)]
    pub output_format: OutputFormat,
}

impl SubCommandExtend for TestCommand {
    fn run(&self, opts: &Opts) -> Result<()> {
        let model = opts.work_dir.model();
        let index = DigestIndex::load(&model)
            .with_context(|| format!("无法加载模型 {}", model.display()))?;

        let items = match &self.labels {
            Some(labels) => load_label_file(labels, &self.path)?,
            None => {
                let re_suf = suffix_regex(&self.scan.suffix).context("无效的后缀名")?;
                label_by_file_name(scan_images(&self.path, &re_suf)?)
            }
        };
        ensure_exists(&items)?;

        let matcher = Matcher::new(&index, self.workers.unwrap_or_else(num_cpus::get));
        info!("开始测试，共 {} 张图片，{} 个工作线程", items.len(), matcher.workers());

        let start = Instant::now();
        let pb = ProgressBar::new(items.len() as u64).with_style(pb_style());
        let predictions = opts.work_dir.predictions();
        let count = matcher.run_to_file(items, &predictions, &pb)?;
        pb.finish_with_message("测试完成");
        info!("测试结束，处理 {} 张图片，耗时 {:.2?}", count, start.elapsed());

        let report = evaluate(&predictions)?;
        print_report(&report, self.output_format)
    }
}
