//! rhombus-preview binary entry point

use anyhow::Result;
use rhombus_preview::cli::run_cli;

fn main() -> Result<()> {
    run_cli()
}
