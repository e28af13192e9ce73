//! yapp CLI - convert a PDF document to Markdown.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use yapp::{render, Error, JsonFormat, ParseResult};

#[derive(Parser)]
#[command(name = "yapp")]
#[command(version)]
#[command(about = "Convert PDF documents to Markdown", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(long = "in", value_name = "PATH")]
    input: PathBuf,

    /// Output Markdown file
    #[arg(long = "out", value_name = "PATH")]
    output: PathBuf,

    /// Pretty-print the document AST to stdout
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    // Missing required flags exit 1 with clap's usage text.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    ExitCode::SUCCESS
                }
                _ => ExitCode::FAILURE,
            };
        }
    };

    if let Err(err) = run(&cli) {
        eprintln!("{} {}", "yapp failed:".red().bold(), err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: &Cli) -> yapp::Result<()> {
    let ParseResult { document, markdown } = yapp::parse_file(&cli.input)?;

    if cli.debug {
        let pretty = render::to_json(&document, JsonFormat::Pretty)?;
        println!("{}", pretty);
    }

    write_markdown(&cli.output, &markdown)?;
    log::info!(
        "wrote Markdown for {} pages to {}",
        document.page_count(),
        cli.output.display()
    );

    Ok(())
}

fn write_markdown(path: &Path, content: &str) -> yapp::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    let mut file = options
        .open(path)
        .map_err(|e| Error::Write(format!("{}: {}", path.display(), e)))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::Write(format!("{}: {}", path.display(), e)))
}
