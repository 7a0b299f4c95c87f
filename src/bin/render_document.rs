//! Render a JSON document description to PDF.
//!
//! Usage:
//!   cargo run --release --bin render_document -- report.json report.pdf
//!   cargo run --release --bin render_document -- report.json report.pdf --compress
//!
//! Set `RUST_LOG=debug` to see the publish phases.

use pdf_scribe::{Document, PublishConfig};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

struct RenderConfig {
    input: PathBuf,
    output: PathBuf,
    compress: bool,
}

impl RenderConfig {
    fn from_args() -> Option<Self> {
        let mut paths = Vec::new();
        let mut compress = false;

        for arg in std::env::args().skip(1) {
            match arg.as_str() {
                "--compress" | "-c" => {
                    compress = true;
                },
                _ => paths.push(PathBuf::from(arg)),
            }
        }

        if paths.len() != 2 {
            return None;
        }
        let output = paths.pop()?;
        let input = paths.pop()?;
        Some(Self {
            input,
            output,
            compress,
        })
    }
}

fn render(config: &RenderConfig) -> Result<usize, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(&config.input)?;
    let mut doc = Document::from_json(&json)?;
    if config.compress {
        doc = doc.with_config(PublishConfig::new().with_compress(true));
    }
    let pages = doc.pages.len();

    let file = File::create(&config.output)?;
    doc.publish(BufWriter::new(file))?;
    Ok(pages)
}

fn main() -> ExitCode {
    env_logger::init();

    let Some(config) = RenderConfig::from_args() else {
        eprintln!("Usage: render_document <input.json> <output.pdf> [--compress]");
        return ExitCode::from(2);
    };

    let start = Instant::now();
    match render(&config) {
        Ok(pages) => {
            println!(
                "Wrote {} ({} pages) in {:.2}ms",
                config.output.display(),
                pages,
                start.elapsed().as_secs_f64() * 1000.0
            );
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        },
    }
}
