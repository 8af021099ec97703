// src/main.rs

//! Command-line front end: runs scripts through a headless loop.
//!
//! ```text
//! painter [--config <file.json>] [--out <frame.ppm>] <script>...
//! ```
//! A script path of `-` reads standard input. Scripts share one drawing
//! session, so later scripts can move figures declared by earlier ones.

use painter::config::{Config, CONFIG};
use painter::display::HeadlessDisplay;
use painter::event_loop::Loop;
use painter::lang::Parser;
use painter::surface::BufferProvider;

use anyhow::{bail, Context};
use log::{error, info};
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

const USAGE: &str = "usage: painter [--config <file.json>] [--out <frame.ppm>] <script>...";

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    scripts: Vec<String>,
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--out" => {
                let path = args.next().context("--out needs a path")?;
                parsed.out = Some(PathBuf::from(path));
            }
            "-h" | "--help" => bail!(USAGE),
            flag if flag.starts_with("--") => bail!("unknown option {}\n{}", flag, USAGE),
            _ => parsed.scripts.push(arg),
        }
    }
    if parsed.scripts.is_empty() {
        bail!(USAGE);
    }
    Ok(parsed)
}

fn run_script(parser: &mut Parser, painter: &Loop, script: &str) -> anyhow::Result<()> {
    let ops = if script == "-" {
        parser.parse(std::io::stdin().lock())
    } else {
        let file = std::fs::File::open(script)
            .with_context(|| format!("Failed to open script {}", script))?;
        parser.parse(BufReader::new(file))
    }
    .with_context(|| format!("Failed to parse script {}", script))?;

    info!("Posting {} operations from {}", ops.len(), script);
    painter.post_all(ops);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::clone(&CONFIG),
    };

    let display = Arc::new(HeadlessDisplay::new());
    let painter = Loop::new(display.clone()).with_surface_size(config.canvas.size());
    painter
        .start(&BufferProvider)
        .context("Failed to start painter loop")?;

    let mut parser = Parser::with_config(&config);
    let mut outcome = Ok(());
    for script in &args.scripts {
        if let Err(e) = run_script(&mut parser, &painter, script) {
            error!("{:#}", e);
            outcome = Err(e);
            break;
        }
    }
    painter.stop_and_wait();
    outcome?;

    info!("Presented {} frames", display.frames_presented());
    if let Some(out) = &args.out {
        if !display.write_ppm(out)? {
            bail!("No frame was presented; nothing written to {}", out.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> anyhow::Result<Args> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_options_and_scripts() {
        let parsed = args(&["--out", "f.ppm", "a.txt", "--config", "c.json", "-"]).unwrap();
        assert_eq!(parsed.out, Some(PathBuf::from("f.ppm")));
        assert_eq!(parsed.config, Some(PathBuf::from("c.json")));
        assert_eq!(parsed.scripts, vec!["a.txt".to_string(), "-".to_string()]);
    }

    #[test]
    fn rejects_missing_scripts_and_bad_flags() {
        assert!(args(&[]).is_err());
        assert!(args(&["--out"]).is_err());
        assert!(args(&["--frobnicate", "a.txt"]).is_err());
    }
}
