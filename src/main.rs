use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use tuonella_groups::config::Config;
use tuonella_groups::constants::VERBOSITY_VERBOSE;
use tuonella_groups::utils;
use tuonella_groups::GroupingProcessor;

#[derive(Parser, Debug)]
#[command(name = "tuonella-groups")]
#[command(about = "Tuonella Groups - gathers delimited records that share any field value into groups")]
#[command(version)]
struct Args {
    #[arg(help = "Input file, one ';'-delimited record per line")]
    input: PathBuf,

    #[arg(short, long, help = "Report file (defaults to groups.txt)")]
    output: Option<PathBuf>,

    #[arg(short, long, help = "Configuration file (JSON)")]
    config: Option<PathBuf>,

    #[arg(long, help = "Keep record texts in a temporary file instead of RAM")]
    spill: bool,

    #[arg(short, long, help = "Verbose output")]
    verbose: bool,
}

impl Args {
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(output) = &self.output {
            config.io.output_file = output.clone();
        }
        if self.spill {
            config.processing.spill_to_disk = true;
        }
        if self.verbose {
            config.logging.verbosity = VERBOSITY_VERBOSE.to_string();
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let start_time = Instant::now();

    let config = args.resolve_config()?;
    utils::setup_logging(&config.logging.verbosity)?;

    info!("Starting Tuonella Groups");
    let output = config.io.output_file.clone();
    let processor = GroupingProcessor::new(config)?;

    let stats = processor.process(&args.input, &output)?;

    info!("Lines read: {}", stats.lines_read);
    info!("Unique records: {}", stats.records);
    info!("Duplicates removed: {}", stats.duplicates_removed);
    info!("Invalid lines skipped: {}", stats.invalid_lines);
    info!("Report written to: {}", output.display());

    println!("Groups count: {}", stats.groups);
    println!("Time: {} ms", start_time.elapsed().as_millis());

    Ok(())
}
