use std::io::IsTerminal as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing::Level;

/// Flatten a layered `.icon` folder into a 1024x1024 PNG without alpha.
#[derive(Parser, Debug)]
#[command(name = "flatten-icon", version)]
struct Cli {
    /// Icon folder containing `icon.json` and an `Assets/` directory.
    icon_folder: PathBuf,

    /// Output PNG path.
    output: PathBuf,

    /// Log every step, including metadata-only layers.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::WARN
        } else {
            Level::INFO
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Usage errors exit 1; --help and --version exit 0.
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_target(false)
        .without_time()
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();

    let report = icon_flattener::flatten_icon(&cli.icon_folder, &cli.output)
        .with_context(|| format!("flatten '{}'", cli.icon_folder.display()))?;

    let skipped = report.skipped().count();
    println!(
        "wrote {} ({} layers, {} skipped)",
        cli.output.display(),
        report.composited_count(),
        skipped
    );
    Ok(())
}
