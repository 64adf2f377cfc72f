//! mdpro - command line entry point
//!
//! Renders, counts and outlines markdown files with the same pipeline the
//! editor preview uses.

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use mdpro::config::{Settings, SettingsStore, ThemeMode};
use mdpro::editor::{compute_stats, extract_outline, OutlineNode};
use mdpro::error::{Error, Result};
use mdpro::export::export_html;
use mdpro::preview::PreviewRenderer;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Application name constant.
const APP_NAME: &str = "mdpro";

#[derive(Parser, Debug)]
#[command(name = "mdpro", version, about = "Markdown preview pipeline")]
struct Cli {
    #[command(subcommand)]
    command: RunCmd,
}

#[derive(Subcommand, Debug)]
enum RunCmd {
    /// Render a markdown file to a standalone HTML document.
    Render {
        file: PathBuf,
        /// Use the dark palette (defaults to the saved preference)
        #[arg(long)]
        dark: bool,
        /// Output path (defaults to FILE with an .html extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Open the result in the default browser
        #[arg(long)]
        open: bool,
    },
    /// Print document statistics.
    Stats {
        file: PathBuf,
        /// Word goal to report progress against
        #[arg(long, default_value_t = 0)]
        goal: u32,
    },
    /// Print the heading outline.
    Outline { file: PathBuf },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: RunCmd) -> Result<()> {
    match command {
        RunCmd::Render {
            file,
            dark,
            output,
            open,
        } => render(&file, dark, output, open),
        RunCmd::Stats { file, goal } => stats(&file, goal),
        RunCmd::Outline { file } => outline(&file),
    }
}

fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Saved settings, or defaults when there is no config directory.
fn load_settings() -> Settings {
    match SettingsStore::default_location() {
        Ok(path) => SettingsStore::open(path).settings().clone(),
        Err(e) => {
            warn!("{}; using default settings", e);
            Settings::default()
        }
    }
}

fn render(file: &Path, dark: bool, output: Option<PathBuf>, open: bool) -> Result<()> {
    let text = read_document(file)?;
    let settings = load_settings();
    let theme = if dark { ThemeMode::Dark } else { settings.theme() };
    let output = output.unwrap_or_else(|| file.with_extension("html"));

    info!("{} rendering {} ({:?})", APP_NAME, file.display(), theme);
    let renderer = PreviewRenderer::from_settings(&settings);
    let rendered = export_html(&renderer, &text, theme, Some(file), &output)?;
    if rendered.degraded {
        warn!("Markdown conversion failed; the output shows the raw text");
    }
    println!("{}", output.display());

    if open {
        open::that(&output).map_err(|e| {
            Error::Application(format!("Failed to open {}: {}", output.display(), e))
        })?;
    }
    Ok(())
}

fn stats(file: &Path, goal: u32) -> Result<()> {
    let stats = compute_stats(&read_document(file)?);

    println!("{}", stats.format_compact());
    println!("characters (no spaces): {}", stats.characters_no_spaces);
    println!("paragraphs: {}", stats.paragraphs);
    println!("headings: {}", stats.headings);
    println!("links: {}, images: {}", stats.links, stats.images);
    println!(
        "code blocks: {} ({} diagrams)",
        stats.code_blocks, stats.diagram_blocks
    );
    println!("reading time: {} min", stats.read_time_minutes);
    if let Some(progress) = stats.goal_progress(goal) {
        println!("goal: {:.0}% of {} words", progress * 100.0, goal);
    }
    Ok(())
}

fn outline(file: &Path) -> Result<()> {
    let outline = extract_outline(&read_document(file)?);
    if outline.is_empty() {
        println!("{}", outline.summary());
        return Ok(());
    }
    for root in &outline.roots {
        print_node(root, 0);
    }
    Ok(())
}

fn print_node(node: &OutlineNode, depth: usize) {
    println!(
        "{}{} (line {})",
        "  ".repeat(depth),
        node.title,
        node.source_line + 1
    );
    for child in &node.children {
        print_node(child, depth + 1);
    }
}
