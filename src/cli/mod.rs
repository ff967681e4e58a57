mod eval;
mod show;
mod testing;
mod train;

pub use eval::*;
pub use show::*;
pub use testing::*;
pub use train::*;

use crate::config::{Opts, OutputFormat};
use crate::eval::AccuracyReport;

pub trait SubCommandExtend {
    fn run(&self, opts: &Opts) -> anyhow::Result<()>;
}

fn print_report(report: &AccuracyReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "total": report.total,
                "pass": report.pass,
                "failed": report.failed(),
                "accuracy": report.ratio(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?)
        }
        OutputFormat::Table => {
            println!(
                "Total samples = {}, Pass := {}/{}, Failed := {}/{}",
                report.total,
                report.pass,
                report.total,
                report.failed(),
                report.total
            );
            println!("Accuracy = {:.2}%", 100. * report.ratio());
        }
    }
    Ok(())
}
