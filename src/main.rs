use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use segmark::{Config, Error, Reply};

#[derive(Parser)]
#[command(name = "segmark")]
#[command(about = "Render assistant replies with emphasis and SQL code blocks")]
struct Cli {
    /// Reply text file, or `-` for stdin
    input: PathBuf,

    /// Output file (pdf defaults to the input name with .pdf; other formats default to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Pdf)]
    format: Format,

    /// Config file
    #[arg(short, long, default_value = "segmark.toml")]
    config: PathBuf,

    /// Treat the input as the assistant endpoint's JSON body
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pdf,
    Typst,
    Segments,
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> segmark::Result<()> {
    let config = Config::load(&cli.config)?;

    let raw = read_input(&cli.input)?;
    let text = if cli.json {
        Reply::from_json(&raw)?.into_text()
    } else {
        raw
    };

    match cli.format {
        Format::Pdf => {
            let pdf_bytes = segmark::response_to_pdf_with_config(&text, &config)?;
            let output = cli.output.clone().unwrap_or_else(|| default_pdf_path(&cli.input));
            write_file(&output, &pdf_bytes)?;
            println!("Created {}", output.display());
        }
        Format::Typst => {
            let markup = segmark::response_to_typst_with_config(&text, &config)?;
            emit(cli.output.as_deref(), markup.as_bytes())?;
        }
        Format::Segments => {
            let segments = config.segmenter()?.parse(&text);
            let json = serde_json::to_string_pretty(&segments)?;
            emit(cli.output.as_deref(), format!("{json}\n").as_bytes())?;
        }
    }
    Ok(())
}

fn read_input(path: &Path) -> segmark::Result<String> {
    let io_error = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(io_error)?;
        Ok(text)
    } else {
        fs::read_to_string(path).map_err(io_error)
    }
}

fn default_pdf_path(input: &Path) -> PathBuf {
    if input == Path::new("-") {
        PathBuf::from("reply.pdf")
    } else {
        input.with_extension("pdf")
    }
}

fn emit(output: Option<&Path>, bytes: &[u8]) -> segmark::Result<()> {
    match output {
        Some(path) => write_file(path, bytes),
        None => io::stdout().write_all(bytes).map_err(|source| Error::Io {
            path: PathBuf::from("<stdout>"),
            source,
        }),
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> segmark::Result<()> {
    log::info!("writing {} bytes to {}", bytes.len(), path.display());
    fs::write(path, bytes).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}
