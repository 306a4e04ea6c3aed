use clap::Parser;
use store_sales_summary::{Result, SummaryConfig, logging, pipeline};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    logging::init_logging(cli.verbose)?;

    let config = SummaryConfig::default();
    pipeline::run(&config)?;

    println!("Summary has been saved to {}", config.output_path.display());
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Summarise monthly store sales workbooks into one report."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}
