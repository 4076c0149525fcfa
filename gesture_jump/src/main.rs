//! gesture_jump — interactive entry point.

use std::path::PathBuf;

use clap::Parser;
use gesture_jump::app::{run, AppConfig, ShutdownReason};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "gesture_jump", about = "Hand-gesture controlled jumping entity")]
struct Cli {
    /// Replay recorded landmarks (JSON Lines) instead of the keyboard simulator
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Mirror replayed hands horizontally
    #[arg(long)]
    mirror: bool,

    /// Hide the diagnostic landmark window
    #[arg(long)]
    no_landmarks: bool,

    /// Target loop rate in ticks per second
    #[arg(long, default_value_t = 30)]
    tick_rate: u32,

    /// Ticks a gesture must persist before it is acted on (0 = immediately)
    #[arg(long, default_value_t = 0)]
    dwell: u32,

    /// No windows, unpaced; requires --replay
    #[arg(long)]
    headless: bool,

    /// Skip the startup banner
    #[arg(long)]
    no_banner: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gesture_jump=info,hand_gesture=info".into()),
        )
        .init();

    if !cli.no_banner && !cli.headless {
        println!();
        println!("╔══════════════════════════════════════════════════════╗");
        println!("║          Gesture Jump — Hand-Controlled Entity       ║");
        println!("╚══════════════════════════════════════════════════════╝");
        println!();
        match &cli.replay {
            Some(p) => println!("  Mode: replay {}", p.display()),
            None    => println!("  Mode: keyboard simulation  (O=open  A=pinky  D=thumb  H=hide)"),
        }
        println!();
    }

    let cfg = AppConfig {
        tick_rate:      cli.tick_rate,
        dwell_ticks:    cli.dwell,
        replay:         cli.replay,
        mirror:         cli.mirror,
        show_landmarks: !cli.no_landmarks,
        headless:       cli.headless,
        ..AppConfig::default()
    };

    info!("gesture_jump v{} starting", env!("CARGO_PKG_VERSION"));
    let summary = run(cfg)?;

    if summary.reason == ShutdownReason::Interrupted {
        println!("Interrupted by user. Exiting...");
    }
    println!(
        "  {} ticks ({} over budget), stopped: {}; entity at x={:.1} y={:.1} ({:?})",
        summary.ticks,
        summary.overruns,
        summary.reason.as_str(),
        summary.final_state.x(),
        summary.final_state.y(),
        summary.final_state.vertical(),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_banner_flag_parses() {
        let cli = Cli::try_parse_from(["gesture_jump", "--no-banner"]).unwrap();
        assert!(cli.no_banner);
        assert!(!cli.headless);
        assert!(Cli::try_parse_from(["gesture_jump", "--quick"]).is_err());
    }
}
