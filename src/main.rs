use clap::Parser;
use fpdigest::cli::SubCommandExtend;
use fpdigest::config::{Opts, SubCommand};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let opts = Opts::parse();

    match &opts.subcmd {
        SubCommand::Train(config) => config.run(&opts),
        SubCommand::Test(config) => config.run(&opts),
        SubCommand::Eval(config) => config.run(&opts),
        SubCommand::Show(config) => config.run(&opts),
    }
}
