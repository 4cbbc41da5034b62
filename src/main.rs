mod capture;
mod cli;
mod config;
mod event;
mod shell;

use anyhow::Result;

fn main() -> Result<()> {
    cli::run()
}
