use clap::Parser;
use haystack_tools::{json_to_zinc, read_input};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "json2zinc", about = "Convert Haystack JSON to Zinc")]
struct Args {
    /// JSON file to read; standard input when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let text = read_input(args.input.as_deref())?;
    let zinc = json_to_zinc(&text)?;
    print!("{zinc}");
    if !zinc.ends_with('\n') {
        println!();
    }
    Ok(())
}
