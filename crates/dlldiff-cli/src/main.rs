use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod paths;

use output::OutputFormat;
use paths::ProjectLayout;

#[derive(Parser)]
#[command(name = "dlldiff")]
#[command(about = "Finds differences between an original and rebuilt DLL")]
struct Args {
    /// The root of the project
    #[arg(long, env = "DLLDIFF_BASE_DIR", default_value = ".")]
    base_dir: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// The number of the DLL to diff. Don't specify to diff all DLLs.
    dlls: Vec<String>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Logs go to stderr so stdout only carries results
    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("dlldiff={}", level).parse()?)
                .add_directive(format!("dlldiff_core={}", level).parse()?),
        )
        .init();

    let layout = ProjectLayout::new(&args.base_dir);
    info!("Diffing DLLs under {}", layout.base_dir().display());

    let all_ok = commands::diff::run(&layout, args.dlls, args.format)?;

    Ok(if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
