use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, error, info};

mod assemble;
mod cluster;
mod config;
mod constants;
mod engine;
mod ffmpeg;
mod frame;
mod image_set;
mod logging;
mod player;
mod state;
mod stop;
mod window;

use crate::assemble::assemble;
use crate::config::{AssembleConfig, ClusterArgs, ConfigArgs, PlaybackConfig};
use crate::logging::init_logging;
use crate::player::{play_file, wait};
use crate::state::Phase;
use crate::stop::StopSignal;

#[derive(Parser)]
#[command(
    name = "kmeans-slideshow",
    version,
    about = "Turn a folder of PNG frames into a video and play it back"
)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the image folder into the video, play it, then wait (default)
    Show,

    /// Assemble the image folder into the video file only
    Assemble,

    /// Play an existing video file, then wait
    Play,

    /// Refill the image folder with one plot per k-means iteration, then show it
    Cluster(ClusterArgs),
}

fn main() -> Result<()> {
    // Variables already present in the environment take precedence over .env
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging()?;
    match dotenv {
        Ok(path) => debug!("loaded {}", path.display()),
        Err(e) if e.not_found() => debug!("no .env file"),
        Err(e) => return Err(e).context("failed to load .env"),
    }

    let stop = StopSignal::new();
    stop.install_ctrlc()?;

    match cli.command.unwrap_or(Commands::Show) {
        Commands::Show => {
            let assembly = cli.config.assemble()?;
            let playback = cli.config.playback()?;
            run_phases(Phase::Assembling, Some(&assembly), &playback, &stop)
        }
        Commands::Assemble => {
            assemble(&cli.config.assemble()?, &stop)?;
            Ok(())
        }
        Commands::Play => run_phases(Phase::Playing, None, &cli.config.playback()?, &stop),
        Commands::Cluster(args) => {
            let cluster = args.cluster(cli.config.img_folder()?)?;
            // Check the slideshow settings before the folder gets wiped
            let show = if args.no_show {
                None
            } else {
                Some((cli.config.assemble()?, cli.config.playback()?))
            };

            cluster::generate(&cluster, &mut rand::rng(), &stop)?;
            match show {
                Some((assembly, playback)) => {
                    run_phases(Phase::Assembling, Some(&assembly), &playback, &stop)
                }
                None => Ok(()),
            }
        }
    }
}

/// Runs the slideshow from `start` to `Phase::Done`. A playback failure is
/// returned only after the post-playback wait.
fn run_phases(
    start: Phase,
    assembly: Option<&AssembleConfig>,
    playback: &PlaybackConfig,
    stop: &StopSignal,
) -> Result<()> {
    let mut outcome = Ok(());
    let mut phase = start;

    while phase != Phase::Done {
        debug!(%phase, "entering phase");
        match phase {
            Phase::Assembling => {
                if let Some(config) = assembly {
                    assemble(config, stop)?;
                }
            }
            Phase::Playing => match play_file(playback, stop) {
                Ok(summary) => {
                    info!(
                        "playback finished after {} frames ({:?})",
                        summary.frames_shown, summary.end
                    )
                }
                Err(e) => {
                    error!("playback failed: {:#}", e);
                    outcome = Err(e);
                }
            },
            Phase::Waiting => {
                if !wait(playback.post_wait, stop) {
                    info!("wait cut short");
                }
            }
            Phase::Done => {}
        }
        phase = phase.next();
    }

    outcome
}
