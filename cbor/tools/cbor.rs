/*!
A CLI for working with CBOR data

# Commands

- `inspect`: Display CBOR data as diagnostic notation, JSON or hex
- `compose`: Convert JSON (or hex text) to CBOR binary

# Examples

```bash
# Inspect a CBOR file in diagnostic notation
cbor inspect data.cbor

# Inspect untrusted input with tighter limits
cbor inspect --max-length 1024 --max-depth 8 data.cbor

# Inspect as JSON (lossy)
cbor inspect --format json data.cbor

# Convert JSON to CBOR
echo '{"name": "Alice", "age": 30}' | cbor compose -o data.cbor -

# Round-trip
cbor compose doc.json | cbor inspect -
```
*/

use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

mod compose;
mod inspect;
mod io;

/// A CLI tool for working with CBOR data
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "A CLI tool for inspecting and composing CBOR data"
)]
struct Cli {
    /// Logging level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_name = "LEVEL")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect and display CBOR data in various formats
    Inspect(inspect::Command),

    /// Convert JSON or hex text to CBOR binary
    Compose(compose::Command),
}

fn init_logger(log_level: LevelFilter) {
    // stdout carries the command output
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(log_level > LevelFilter::INFO)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    match cli.command {
        Commands::Inspect(args) => args.exec(),
        Commands::Compose(args) => args.exec(),
    }
}
