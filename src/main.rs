use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use lumina_draw::{
    Config, InputState, clipboard, draw::BackgroundMode, export, history::RestoreWorker, script,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "lumina-draw")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("LUMINA_GIT_HASH"), ")"))]
#[command(about = "Raster annotation surface with freehand ink, shapes, text and undo/redo")]
struct Cli {
    /// Replay a JSON gesture script against a headless surface
    #[arg(long, short = 's', value_name = "FILE")]
    script: Option<PathBuf>,

    /// Write the exported PNG here instead of the configured export directory
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Surface width in pixels
    #[arg(long, default_value_t = 800)]
    width: i32,

    /// Surface height in pixels
    #[arg(long, default_value_t = 600)]
    height: i32,

    /// Background mode (transparent, light, dark, or grid)
    #[arg(long, short = 'b', value_name = "MODE")]
    background: Option<String>,

    /// Image file to use as the background layer
    #[arg(long, value_name = "FILE")]
    background_image: Option<PathBuf>,

    /// Use the clipboard image as the background layer
    #[arg(long, action = ArgAction::SetTrue)]
    paste_background: bool,

    /// Composite the background underneath the drawing in the export
    #[arg(long, action = ArgAction::SetTrue)]
    include_background: bool,

    /// Decode history restores on a background worker
    #[arg(long, action = ArgAction::SetTrue)]
    async_restore: bool,

    /// Write a documented default config file and exit
    #[arg(long, action = ArgAction::SetTrue)]
    init_config: bool,

    /// Config file (defaults to ~/.config/lumina-draw/config.toml)
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = Config::create_default_file()?;
        println!("Created {}", path.display());
        return Ok(());
    }

    let Some(script_path) = cli.script.as_deref() else {
        print_usage();
        return Ok(());
    };

    if let Err(err) = run_script(&cli, script_path) {
        log::error!("{:#}", err);
        return Err(err);
    }
    Ok(())
}

fn run_script(cli: &Cli, script_path: &Path) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if cli.include_background {
        config.export.include_background = true;
    }
    if let Some(mode) = &cli.background {
        config.background.default_mode = mode
            .parse::<BackgroundMode>()
            .map_err(anyhow::Error::msg)
            .context("Invalid --background")?;
    }

    let mut state = InputState::from_config(&config);
    state
        .mount(cli.width, cli.height)
        .context("Failed to create drawing surface")?;

    // Kept alive until the replay has settled every restore.
    let runtime = if cli.async_restore {
        let runtime = tokio::runtime::Runtime::new().context("Failed to start restore worker")?;
        state.attach_restore_worker(RestoreWorker::new(runtime.handle()));
        Some(runtime)
    } else {
        None
    };

    if let Some(path) = &cli.background_image {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read background image {}", path.display()))?;
        state
            .set_background_image(Some(&bytes))
            .with_context(|| format!("Failed to decode background image {}", path.display()))?;
    }

    if cli.paste_background {
        let (mime, bytes) =
            clipboard::read_clipboard_image().context("Failed to read clipboard image")?;
        if !state.on_paste(&mime, &bytes) {
            anyhow::bail!("Clipboard {} could not be used as a background", mime);
        }
    }

    let source = std::fs::read_to_string(script_path)
        .with_context(|| format!("Failed to read script {}", script_path.display()))?;
    let events = script::parse_script(&source)
        .with_context(|| format!("Failed to parse script {}", script_path.display()))?;
    let base_dir = script_path.parent().unwrap_or(Path::new("."));
    let summary = script::replay(&mut state, &events, base_dir)?;
    if summary.restore_failures > 0 {
        log::warn!("{} history restore(s) failed", summary.restore_failures);
    }

    let png = state.export_current_frame().context("Failed to export frame")?;
    drop(runtime);

    let written = match &cli.output {
        Some(path) => {
            std::fs::write(path, &png)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            path.clone()
        }
        None => export::save_frame(&png, &config.export)?,
    };

    println!(
        "Replayed {} event(s), history {}/{}; wrote {}",
        summary.events,
        summary.history_index + 1,
        summary.history_len,
        written.display()
    );
    Ok(())
}

fn print_usage() {
    println!("lumina-draw: Raster annotation surface with snapshot undo/redo");
    println!();
    println!("Usage:");
    println!("  lumina-draw --script gestures.json --output frame.png");
    println!("  lumina-draw --init-config    Write ~/.config/lumina-draw/config.toml");
    println!("  lumina-draw --help           Show help");
    println!();
    println!("Script events (JSON array, tagged by \"event\"):");
    println!("  resize, tool, style, background, down, move, up, leave,");
    println!("  key, text, paste, blur, undo, redo, clear, settle");
}
