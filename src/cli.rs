use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "algoblocks-rs",
    about = "Algorand TypeScript generator for block-built contract programs."
)]
pub struct Args {
    #[arg(value_name = "WORKSPACE")]
    pub input: Option<PathBuf>,

    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        help = "Write the block palette toolbox XML to this path."
    )]
    pub emit_toolbox: Option<PathBuf>,
}
