use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use super::print_report;
use crate::cli::SubCommandExtend;
use crate::config::{Opts, OutputFormat};
use crate::eval::evaluate;

#[derive(Parser, Debug, Clone)]
pub struct EvalCommand {
    /// 预测结果文件，默认为工作目录下的 model.predictions.txt
    pub predictions: Option<PathBuf>,
    /// 输出格式
    #[arg(long, value_name = "FORMAT", value_enum, default_value_t = OutputFormat::Table)]
    pub output_format: OutputFormat,
}

impl SubCommandExtend for EvalCommand {
    fn run(&self, opts: &Opts) -> Result<()> {
        let path = self.predictions.clone().unwrap_or_else(|| opts.work_dir.predictions());
        let report = evaluate(path)?;
        print_report(&report, self.output_format)
    }
}
