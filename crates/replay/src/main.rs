//! Strata replay binary.
//!
//! Loads a scene file, runs one render pass of the decoration sweep over it,
//! and prints what the sweep decided for every drawn row.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use strata_sweep::{IdentityResolver, SweepConfig};
use tracing::info;

mod render;
mod scene;

/// Replay command line arguments.
#[derive(Parser, Debug)]
#[command(name = "strata-replay")]
#[command(about = "Replay a decoration scene through the sweep")]
struct Args {
	/// Scene file (TOML)
	#[arg(value_name = "SCENE")]
	scene: PathBuf,

	/// Sweep configuration file, replacing the scene's `[sweep]` table
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	setup_tracing(args.verbose);

	let scene = scene::Scene::load(&args.scene)?;
	let config = match &args.config {
		Some(path) => SweepConfig::load(path).with_context(|| format!("loading sweep config {}", path.display()))?,
		None => scene.sweep.clone(),
	};
	info!(scene = %args.scene.display(), rows = scene.rows, cols = scene.cols, "loaded scene");

	for report in render::replay(&scene, config, &mut IdentityResolver)? {
		println!("{report}");
	}
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("strata_sweep=trace,strata_replay=debug,info")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
