use clap::Parser;
use tracing_subscriber::EnvFilter;

use pg_copy_csv::config::{ConvertConfig, LineTerminator, DEFAULT_OUTPUT_DIR, DEFAULT_SOURCE_PATH};
use pg_copy_csv::convert;
use pg_copy_csv::error::Result;
use pg_copy_csv::report::ConsoleReporter;

#[derive(Parser, Debug)]
#[command(name = "pg_copy_csv", version, about = "PostgreSQL dump to CSV converter")]
struct Args {
    /// Plain-text (optionally gzip/zstd compressed) dump to read
    #[arg(short, long, default_value = DEFAULT_SOURCE_PATH)]
    source: String,

    /// Directory that receives one <table>.csv per table
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: String,

    /// Schema qualifier of the COPY statements to extract
    #[arg(long, default_value = "public")]
    schema: String,

    /// Fail on malformed COPY blocks instead of skipping them
    #[arg(long)]
    strict: bool,

    /// CSV record terminator (lf, crlf)
    #[arg(long, default_value = "lf")]
    line_terminator: String,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("pg_copy_csv error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let line_terminator: LineTerminator = args.line_terminator.parse()?;
    let config = ConvertConfig::new(args.source, args.output_dir)
        .with_schema(args.schema)
        .with_strict(args.strict)
        .with_line_terminator(line_terminator);

    let mut reporter = ConsoleReporter::stdout();
    convert(&config, &mut reporter)?;

    Ok(())
}
