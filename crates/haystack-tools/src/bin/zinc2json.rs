use clap::Parser;
use haystack_core::zinc::ZincReader;
use haystack_tools::{read_input, render_json};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "zinc2json", about = "Convert a Zinc grid or value to JSON")]
struct Args {
    /// Zinc file to read; standard input when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let text = read_input(args.input.as_deref())?;
    let val = ZincReader::new(&text)?.read_val()?;
    log::debug!("read {:?} value", val.kind());
    println!("{}", render_json(&val, args.pretty)?);
    Ok(())
}
