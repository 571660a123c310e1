//! CLI tool for datagrid - renders one frame of a dataset and prints the draw list
//!
//! Usage:
//!   datagrid_cli <dataset.json> <config.json>                  # 800x600 at dpr 1
//!   datagrid_cli <dataset.json> <config.json> --size 1024x768 --dpr 2 --scroll 0,300
//!   datagrid_cli <dataset.json> <config.json> --summary        # counts only
//!
//! Logs go to stderr; set `RUST_LOG=debug` for frame details.

#![allow(clippy::exit)]

use std::env;
use std::fs;
use std::io::{self, Write};

use datagrid::{Dataset, DrawOp, FrameOutcome, GridConfig, GridView, RecordingSurface};
use serde::Serialize;

const USAGE: &str = "Usage: datagrid_cli <dataset.json> <config.json> \
[--size WxH] [--dpr N] [--scroll X,Y] [--summary]";

struct Options {
    dataset_path: String,
    config_path: String,
    width: f64,
    height: f64,
    dpr: f64,
    scroll: Option<(f64, f64)>,
    summary: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    outcome: FrameOutcome,
    surface_width: u32,
    surface_height: u32,
    scroll_x: f64,
    scroll_y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    ops: Option<&'a [DrawOp]>,
    op_count: usize,
    text_count: usize,
}

fn fail(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn parse_pair(value: &str, sep: char) -> Option<(f64, f64)> {
    let (a, b) = value.split_once(sep)?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

fn parse_args(args: &[String]) -> Option<Options> {
    let mut positional = Vec::new();
    let mut options = Options {
        dataset_path: String::new(),
        config_path: String::new(),
        width: 800.0,
        height: 600.0,
        dpr: 1.0,
        scroll: None,
        summary: false,
    };
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--size" => {
                let (w, h) = parse_pair(iter.next()?, 'x')?;
                options.width = w;
                options.height = h;
            }
            "--dpr" => options.dpr = iter.next()?.parse().ok()?,
            "--scroll" => options.scroll = Some(parse_pair(iter.next()?, ',')?),
            "--summary" => options.summary = true,
            _ => positional.push(arg.clone()),
        }
    }
    let mut positional = positional.into_iter();
    options.dataset_path = positional.next()?;
    options.config_path = positional.next()?;
    Some(options)
}

fn read(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| fail(&format!("Error reading {path}: {e}")))
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(options) = parse_args(&args) else {
        fail(USAGE);
    };

    let dataset = Dataset::from_json(&read(&options.dataset_path))
        .unwrap_or_else(|e| fail(&format!("Error loading dataset: {e}")));
    let config = GridConfig::from_json(&read(&options.config_path))
        .unwrap_or_else(|e| fail(&format!("Error loading config: {e}")));

    let mut view =
        GridView::new(config).unwrap_or_else(|e| fail(&format!("Error creating grid: {e}")));
    view.set_dataset(dataset);
    let size = view.resize(options.width, options.height, options.dpr);
    if let Some((x, y)) = options.scroll {
        view.set_scroll(x, y);
    }

    let mut surface = RecordingSurface::new();
    let outcome = view
        .paint_now(&mut surface)
        .unwrap_or_else(|e| fail(&format!("Error rendering: {e}")));

    let (scroll_x, scroll_y) = view.scroll_offset();
    let report = Report {
        outcome,
        surface_width: size.width,
        surface_height: size.height,
        scroll_x,
        scroll_y,
        ops: (!options.summary).then(|| surface.ops()),
        op_count: surface.ops().len(),
        text_count: surface.texts().len(),
    };
    let json = serde_json::to_string_pretty(&report)
        .unwrap_or_else(|e| fail(&format!("Error serializing JSON: {e}")));

    let mut stdout = io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{json}") {
        fail(&format!("Error writing output: {e}"));
    }
}
