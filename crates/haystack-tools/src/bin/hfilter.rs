use clap::Parser;
use haystack_core::{zinc, Filter, Grid};
use haystack_store::{MemoryStore, RecordStore};
use haystack_tools::{read_input, OutputFormat};
use log::debug;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hfilter", about = "Select records from a Zinc grid with a filter")]
struct Args {
    /// Filter expression, e.g. `point and equipRef->siteRef->dis == "HQ"`.
    #[arg(long)]
    filter: String,
    /// Zinc grid of records; standard input when omitted.
    #[arg(long)]
    input: Option<PathBuf>,
    #[arg(long)]
    limit: Option<usize>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Zinc)]
    format: OutputFormat,
    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let filter = Filter::parse(&args.filter)?;
    let text = read_input(args.input.as_deref())?;
    let store = MemoryStore::from_grid(&zinc::read_grid(&text)?)?;
    debug!("loaded {} records, filter {filter}", store.len()?);

    let hits = store.read(&filter, args.limit)?;
    let grid = Grid::from_dicts(&hits)?;
    let out = args.format.render(&grid, args.pretty)?;
    print!("{out}");
    if !out.ends_with('\n') {
        println!();
    }
    Ok(())
}
