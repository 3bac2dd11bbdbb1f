use anyhow::Result;
use clap::Parser;

use boardlens_cli::{Args, render, run};
use boardlens_observability::{LogConfig, init_with};

fn main() -> Result<()> {
    let args = Args::parse();
    init_with(&LogConfig::default().with_format(args.log_format));

    let bundle = run(&args).inspect_err(|e| tracing::error!(error = %format!("{e:#}"), "analysis failed"))?;
    println!("{}", render(&bundle, args.pretty)?);
    Ok(())
}
