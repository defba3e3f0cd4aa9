use std::{io::Write, path::PathBuf, process::ExitCode};

use anyhow::ensure;
use clap::Parser;
use stencil::{RenderOptions, render_file};
use tracing::info;

/// stencil compiles a template unit, runs it and prints what its `render`
/// function returns.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Adds a directory to search for imported units. May be repeated.
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    include: Vec<PathBuf>,

    /// Extra search directories, separated by ':'.
    #[arg(long, env = "STENCIL_PATH", value_delimiter = ':', hide = true)]
    search_path: Vec<PathBuf>,

    /// Logs loader and compiler steps to stderr.
    #[arg(short, long)]
    verbose: bool,

    /// The entry template.
    file: PathBuf,
}

impl Args {
    fn options(&self) -> RenderOptions {
        RenderOptions { include_dirs: self.include
                                          .iter()
                                          .chain(&self.search_path)
                                          .filter(|dir| !dir.as_os_str().is_empty())
                                          .cloned()
                                          .collect() }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()
                                                  .add_directive(level.into()))
                             .with_writer(std::io::stderr)
                             .without_time()
                             .init();

    match run(&args) {
        Ok(output) => {
            let mut stdout = std::io::stdout().lock();
            match write!(stdout, "{output}").and_then(|()| stdout.flush()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Failed to write the rendered output: {e}");
                    ExitCode::FAILURE
                },
            }
        },
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        },
    }
}

fn run(args: &Args) -> anyhow::Result<String> {
    ensure!(args.file.is_file(),
            "Failed to read the template file '{}'. Perhaps this file does not exist?",
            args.file.display());

    let options = args.options();
    info!(include_dirs = ?options.include_dirs, "search path configured");

    let rendered = render_file(&args.file, &options)?;
    Ok(rendered.output)
}
