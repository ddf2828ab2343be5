use clap::Parser;
use sitecheck::cli::{run, Cli};
use sitecheck::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
