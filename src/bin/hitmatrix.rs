use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use hitmatrix::{DataSource as _, FearTable, IntersectionEntry, Page, SceneId, StoryConfig};

#[derive(Parser, Debug)]
#[command(name = "hitmatrix", version)]
struct Cli {
    /// Log scene transitions and card activations.
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay scroll positions against a story and write the final chart.
    Replay(ReplayArgs),
    /// List the scene identifiers cards may declare.
    Scenes,
    /// Validate a story and its datasets, printing a summary.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Story JSON.
    #[arg(long)]
    story: PathBuf,

    /// Scroll offsets to visit in order (document pixels).
    #[arg(long = "scroll")]
    scroll: Vec<f64>,

    /// Override the story's viewport height.
    #[arg(long)]
    viewport_height: Option<f64>,

    /// Output path; `.png` rasterizes, anything else writes SVG.
    #[arg(long)]
    out: PathBuf,

    /// Raster scale for PNG output.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Story JSON.
    #[arg(long)]
    story: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Replay(args) => cmd_replay(args),
        Command::Scenes => cmd_scenes(),
        Command::Check(args) => cmd_check(args),
    }
}

fn load_story(path: &Path) -> anyhow::Result<StoryConfig> {
    let story = StoryConfig::from_path(path)?;
    story
        .validate()
        .with_context(|| format!("validate story '{}'", path.display()))?;
    Ok(story)
}

fn story_root(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("."))
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let story = load_story(&args.story)?;
    let source = story.data_source(story_root(&args.story));
    let viewport_height = args.viewport_height.unwrap_or(story.viewport_height);

    let mut page = Page::new(source, story.cards, story.opts, viewport_height)?;
    page.on_intersection(IntersectionEntry {
        is_intersecting: true,
        ratio: 1.0,
    });
    page.settle();
    for y in args.scroll {
        page.on_scroll(y);
        page.settle();
    }

    let svg = hitmatrix::to_svg(page.surface());
    let is_png = args
        .out
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));
    if is_png {
        hitmatrix::write_png(&svg, args.scale, &args.out)?;
    } else {
        if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        std::fs::write(&args.out, svg)
            .with_context(|| format!("write svg '{}'", args.out.display()))?;
    }

    let state = page.state();
    eprintln!(
        "scene {:?}, active card {:?}",
        state.visual_state(),
        state.active_card().and_then(|i| page.cards().get(i)).map(|c| c.id.as_str())
    );
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_scenes() -> anyhow::Result<()> {
    for scene in SceneId::all() {
        println!("{scene}");
    }
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let story = load_story(&args.story)?;
    let mut source = story.data_source(story_root(&args.story));
    hitmatrix::validate_supergroup_mapping()?;

    let genres = source.load_genre_rows()?;
    let aggregates = hitmatrix::aggregate_categories(&genres);
    println!(
        "genres: {} rows, {} categories with >= {} titles",
        genres.len(),
        aggregates.len(),
        hitmatrix::MIN_CATEGORY_COUNT
    );
    for agg in &aggregates {
        println!(
            "  {:<16} count {:>6}  quality {:>5.2}  reach {:>14.0}",
            agg.label, agg.count, agg.avg_quality, agg.total_reach
        );
    }

    let corrected = source.load_fear_rows(FearTable::Corrected)?;
    println!("fears (corrected): {} rows", corrected.len());
    for c in hitmatrix::count_fears(&corrected) {
        println!("  {:<16} {:>6}", c.label, c.count);
    }

    let base = source.load_fear_rows(FearTable::Base)?;
    println!("fears (grouped): {} rows", base.len());
    for c in hitmatrix::count_fears_grouped(&base)? {
        println!("  {:<16} {:>6}", c.label, c.count);
    }

    for card in &story.cards {
        if card.scene == SceneId::Noop {
            println!("card '{}' declares no known scene", card.id);
        }
    }
    println!("ok: {} cards", story.cards.len());
    Ok(())
}
