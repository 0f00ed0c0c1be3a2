use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cozymark::{
    animation::TransitionPlayer, MarkerDescription, MarkerRenderer, MarkerRendererBuilder,
    MarkerTransition, RenderOptions,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render map markers and marker transitions to PNG",
    long_about = None
)]
struct Cli {
    /// TrueType/OpenType font for label text
    #[arg(long, global = true)]
    font: Option<PathBuf>,
    /// JSON file with render options
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one marker description
    Render {
        description: PathBuf,
        output: PathBuf,
    },
    /// Render every frame of a transition into a directory
    Animate {
        start: PathBuf,
        end: PathBuf,
        output_dir: PathBuf,
    },
    /// Print the laid out element set as JSON
    Layout { description: PathBuf },
}

fn read_description(path: &Path) -> Result<MarkerDescription> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading description {}", path.display()))?;
    MarkerDescription::from_json(&json)
        .with_context(|| format!("parsing description {}", path.display()))
}

fn build_renderer(args: &Cli) -> Result<MarkerRenderer> {
    let mut builder = MarkerRendererBuilder::new();
    if let Some(path) = &args.config {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading options {}", path.display()))?;
        builder = builder.with_options(RenderOptions::from_json(&json)?);
    }
    if let Some(font) = &args.font {
        builder = builder.with_font_path(font);
    }
    Ok(builder.build()?)
}

/// Renders marker descriptions to PNG files
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Cli::parse();
    let renderer = Arc::new(build_renderer(&args)?);

    match &args.command {
        Command::Render {
            description,
            output,
        } => {
            let description = read_description(description)?;
            let image = renderer.render(&description)?;
            image
                .save_png(output)
                .with_context(|| format!("writing {}", output.display()))?;
            log::info!(
                "Wrote {}x{} marker to {}",
                image.width(),
                image.height(),
                output.display()
            );
        }
        Command::Animate {
            start,
            end,
            output_dir,
        } => {
            let start = read_description(start)?;
            let end = read_description(end)?;
            std::fs::create_dir_all(output_dir)
                .with_context(|| format!("creating {}", output_dir.display()))?;

            let transition = MarkerTransition::new(start, end, &renderer.options().animation);
            if transition.is_shrinking(renderer.layout())? {
                log::info!("Marker shrinks during this transition");
            }

            let player = TransitionPlayer::new(Arc::clone(&renderer));
            let (mut frames, handle) = player.play(transition);
            while let Some(frame) = frames.recv().await {
                let frame = frame?;
                let path = output_dir.join(format!("frame_{:04}.png", frame.index));
                frame
                    .image
                    .save_png(&path)
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            handle.await?;

            let stats = renderer.stats();
            log::info!(
                "Rendered {} composites ({} cache hits) into {}",
                stats.composites(),
                stats.cache_hits(),
                output_dir.display()
            );
        }
        Command::Layout { description } => {
            let description = read_description(description)?;
            let set = renderer.build(&description)?;
            println!("{}", serde_json::to_string_pretty(&set)?);
        }
    }

    Ok(())
}
