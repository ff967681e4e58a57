use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::cli::SubCommandExtend;
use crate::config::{Opts, OutputFormat};
use crate::digest::extract;
use crate::utils;

#[derive(Parser, Debug, Clone)]
pub struct ShowCommand {
    /// 图片路径
    pub image: PathBuf,
    /// 保存边缘滤波后的图片，格式由后缀名决定
    pub output: Option<PathBuf>,
    /// 输出格式
    #[arg(long, value_name = "FORMAT", value_enum, default_value_t = OutputFormat::Table)]
    pub output_format: OutputFormat,
}

impl SubCommandExtend for ShowCommand {
    fn run(&self, _opts: &Opts) -> Result<()> {
        let image = utils::imread(&self.image)?;
        let (filtered, extraction) = extract(&image);

        if let Some(output) = &self.output {
            utils::imwrite(output, &filtered)?;
        }

        match self.output_format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&extraction)?)
            }
            OutputFormat::Table => {
                println!("size\t{}x{}", extraction.width, extraction.height);
                for (value, count) in extraction.profile.entries() {
                    println!("{}\t{}", value, count);
                }
                println!("digest\t{:.6}", extraction.digest);
            }
        }
        Ok(())
    }
}
