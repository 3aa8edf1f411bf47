mod script;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use show_sequencer_core::{AssetCatalog, Exporter, SequencerConfig, Show, ShowDocument};
use tracing_subscriber::EnvFilter;

fn main() -> show_sequencer_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            catalog,
            config,
            output,
            seed,
        } => run_build(&catalog, config.as_deref(), output, seed),
        Commands::Preview {
            catalog,
            config,
            seed,
            beat,
        } => run_preview(&catalog, config.as_deref(), seed, beat),
        Commands::Catalog { catalog } => run_catalog(&catalog),
    }
}

fn run_build(
    catalog_path: &Path,
    config_path: Option<&Path>,
    output: Option<PathBuf>,
    seed: Option<u64>,
) -> show_sequencer_core::Result<()> {
    let mut config = load_config(config_path, seed)?;
    if let Some(output) = output {
        config.export.output_directory = output;
    }

    let document = build_show(catalog_path, &config)?;
    let path = Exporter::new(config.export).write(&document)?;
    tracing::info!(?path, "show written");
    Ok(())
}

/// Prints where every animated track sits at `beat`.
fn run_preview(
    catalog_path: &Path,
    config_path: Option<&Path>,
    seed: Option<u64>,
    beat: f64,
) -> show_sequencer_core::Result<()> {
    let config = load_config(config_path, seed)?;
    let document = build_show(catalog_path, &config)?;

    for animation in &document.animations {
        let Some(pose) = animation.pose_at(beat) else {
            println!("{:<14} starts at beat {}", animation.track, animation.beat);
            continue;
        };
        let properties = [
            ("position", pose.position),
            ("localPosition", pose.local_position),
            ("scale", pose.scale),
            ("rotation", pose.rotation),
        ];
        for (name, value) in properties {
            if let Some([x, y, z]) = value {
                println!("{:<14} {name:<13} [{x:.3}, {y:.3}, {z:.3}]", animation.track);
            }
        }
    }
    Ok(())
}

fn load_config(
    config_path: Option<&Path>,
    seed: Option<u64>,
) -> show_sequencer_core::Result<SequencerConfig> {
    let mut config = match config_path {
        Some(path) => SequencerConfig::load(path)?,
        None => SequencerConfig::default(),
    };
    if seed.is_some() {
        config.seed = seed;
    }
    Ok(config)
}

fn build_show(
    catalog_path: &Path,
    config: &SequencerConfig,
) -> show_sequencer_core::Result<ShowDocument> {
    tracing::info!(catalog = ?catalog_path, seed = ?config.seed, "building show");

    let catalog = AssetCatalog::load(catalog_path)?;
    let mut show = Show::with_catalog(catalog.clone(), config);
    script::build_intro(&mut show, &catalog)?;
    Ok(show.finish())
}

fn run_catalog(catalog_path: &Path) -> show_sequencer_core::Result<()> {
    let catalog = AssetCatalog::load(catalog_path)?;
    for name in catalog.prefab_names() {
        println!("prefab   {name}");
    }
    for name in catalog.material_names() {
        println!("material {name}");
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Beat-synchronised show sequencer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the intro show script and export the resulting event set.
    Build {
        /// Bundle manifest listing the available prefabs and materials.
        #[arg(short, long)]
        catalog: PathBuf,
        /// Optional sequencer configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Directory the show document is written to.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Seed for reproducible layouts.
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Build the intro show and print each animated track's transform at a beat.
    Preview {
        /// Bundle manifest listing the available prefabs and materials.
        #[arg(short, long)]
        catalog: PathBuf,
        /// Optional sequencer configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Seed for reproducible layouts.
        #[arg(short, long)]
        seed: Option<u64>,
        /// Beat to evaluate the animations at.
        #[arg(short, long)]
        beat: f64,
    },
    /// List the prefabs and materials in a bundle manifest.
    Catalog {
        /// Bundle manifest to inspect.
        catalog: PathBuf,
    },
}
