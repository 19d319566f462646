use std::io::BufReader;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::ValueEnum;
use spantab::config::Settings;
use spantab::cost::Catalog;
use spantab::cost::TableFormat;
use spantab::emit::OutputMode;
use spantab::error::Error;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogOutputFormat {
    Json,
    Pretty,
}

/// Command line arguments for the table compiler.
#[derive(Debug, Parser)]
#[clap(name = "spantab", version)]
struct Args {
    /// File with one `HEX` or `HEX..HEX` range per line, sorted ascending.
    /// Reads standard input when omitted.
    input: Option<PathBuf>,

    /// Emit data tables and dispatch code labelled with this name instead
    /// of the symbolic listing.
    #[clap(long, value_name = "NAME")]
    asm: Option<String>,

    /// Table format to consider, as `BASExSPAN` bit widths. Repeat to build
    /// a catalog; earlier formats win ties. Overrides the configured catalog.
    #[clap(short = 'f', long = "format", value_name = "BxS")]
    formats: Vec<TableFormat>,

    /// Optional path to the configuration file.
    #[clap(short = 'c', long, required = false)]
    config: Option<PathBuf>,

    /// Reject inputs with more intervals than this after merging.
    #[clap(long, value_name = "N")]
    max_intervals: Option<NonZeroUsize>,

    #[clap(short = 'o', long = "output-format", default_value = "pretty")]
    output_format: Option<LogOutputFormat>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let pretty = matches!(args.output_format, Some(LogOutputFormat::Pretty));
    spantab::logging::setup_logging(spantab::logging::DEFAULT_DIRECTIVES, pretty);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "table compilation failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    let settings = Settings::new(args.config.as_deref())?;

    let catalog = if args.formats.is_empty() {
        settings.catalog()?
    } else {
        Catalog::new(args.formats)?
    };
    let max_intervals = args
        .max_intervals
        .map_or(settings.max_intervals, NonZeroUsize::get);
    let mode = match args.asm {
        Some(name) => OutputMode::Assembly { name },
        None => OutputMode::Symbolic,
    };

    tracing::debug!(
        catalog = ?catalog.as_slice(),
        max_intervals,
        input = ?args.input,
        "compiling lookup tables"
    );

    let document = match &args.input {
        Some(path) => {
            let file = std::fs::File::open(path)?;
            spantab::compile(BufReader::new(file), &catalog, max_intervals, &mode)?
        }
        None => spantab::compile(std::io::stdin().lock(), &catalog, max_intervals, &mode)?,
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(document.as_bytes())?;
    stdout.flush()?;

    Ok(())
}
