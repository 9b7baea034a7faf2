use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::fs::File;
use std::path::PathBuf;
use std::process;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use xgo_lib::XgoRider;
use xgo_lib::config::RiderConfig;
use xgo_lib::types::{Led, MoveDirection, Rgb, RotateDirection};

/// Drive an XGO Rider robot over its serial link.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file; missing fields take their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Serial device, overrides the config file.
    #[arg(short, long)]
    port: Option<String>,
    /// UART speed, overrides the config file.
    #[arg(short, long)]
    baud: Option<u32>,
    /// Cruise speed percentage used by `ride` and `turn`.
    #[arg(long)]
    cruise_speed: Option<u8>,
    /// Do not run the initialization handshake before the command.
    #[arg(long)]
    skip_init: bool,
    /// Optional path to a file to write logs to, in addition to the console.
    #[arg(short, long)]
    log_file: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the initialization handshake only.
    Init,
    /// Print the device status byte.
    Status,
    /// Set body height in millimetres (-20 to 20).
    Height {
        #[arg(allow_negative_numbers = true)]
        mm: i32,
    },
    /// Raise the body (0 to 20 mm).
    Stretch { mm: i32 },
    /// Lower the body (0 to 20 mm).
    Shrink { mm: i32 },
    /// Set raw lean value (-100 to 100).
    Lean {
        #[arg(allow_negative_numbers = true)]
        angle: i32,
    },
    /// Lean left (0 to 45 degrees).
    LeanLeft { degrees: i32 },
    /// Lean right (0 to 45 degrees).
    LeanRight { degrees: i32 },
    /// Translate; speed defaults to the cruise speed.
    Move {
        direction: MoveDirection,
        #[arg(short, long)]
        speed: Option<i32>,
    },
    /// Rotate; speed defaults to the cruise speed.
    Rotate {
        direction: RotateDirection,
        #[arg(short, long)]
        speed: Option<i32>,
    },
    /// Stop rotating, then ride at the cruise speed.
    Ride { direction: MoveDirection },
    /// Stop translating, then turn at the cruise speed.
    Turn { direction: RotateDirection },
    /// Stop rotating.
    TurnStop,
    /// Stop translating and rotating.
    Stop,
    /// Set LED colour, e.g. `led all '#ff8000'`.
    Led { led: Led, color: Rgb },
}

fn setup_logging(log_file_path: Option<PathBuf>, verbosity: &Verbosity<InfoLevel>) -> Result<Option<WorkerGuard>> {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_thread_ids(false)
        .without_time();

    let (file_layer, guard) = if let Some(ref path) = log_file_path {
        let log_file = File::create(path).with_context(|| format!("Failed to create log file at: {:?}", path))?;
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(log_file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking_writer)
            .with_ansi(false)
            .with_target(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    // INFO by default, DEBUG with -v shows every frame
    let filter = EnvFilter::builder()
        .with_default_directive(verbosity.tracing_level_filter().into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some(path) = log_file_path {
        info!("Logging to file: {:?}", path);
    }

    Ok(guard)
}

fn load_config(cli: &Cli) -> Result<RiderConfig> {
    let mut config = match &cli.config {
        Some(path) => RiderConfig::load(path).with_context(|| format!("Failed to load config from {:?}", path))?,
        None => RiderConfig::default(),
    };
    if let Some(port) = &cli.port {
        config.port = port.clone();
    }
    if let Some(baud) = cli.baud {
        config.baud_rate = baud;
    }
    if let Some(speed) = cli.cruise_speed {
        config.cruise_speed = speed;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = setup_logging(cli.log_file.clone(), &cli.verbose)?;

    if let Err(e) = run(cli).await {
        error!("Command failed: {:?}", e);
        process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let mut rider =
        XgoRider::connect(&config).with_context(|| format!("Failed to open serial port {}", config.port))?;

    let handshake_first = !cli.skip_init && !matches!(cli.command, Command::Init | Command::Status);
    if handshake_first {
        rider.initialize().await.context("Initialization handshake failed")?;
    }

    let cruise_speed = rider.cruise_speed() as i32;
    match cli.command {
        Command::Init => {
            if rider.initialize().await? {
                println!("Device initialized");
            } else {
                println!("Device already active");
            }
        }
        Command::Status => {
            let status = rider.status().await?;
            println!("Status: {:#04x}", status);
        }
        Command::Height { mm } => rider.set_height(mm.clamp(-20, 20)).await?,
        Command::Stretch { mm } => rider.stretch(mm).await?,
        Command::Shrink { mm } => rider.shrink(mm).await?,
        Command::Lean { angle } => rider.set_lean_angle(angle.clamp(-100, 100)).await?,
        Command::LeanLeft { degrees } => rider.lean_left(degrees).await?,
        Command::LeanRight { degrees } => rider.lean_right(degrees).await?,
        Command::Move { direction, speed } => {
            let speed = speed.unwrap_or(cruise_speed).clamp(0, 100);
            rider.move_at(direction, speed).await?
        }
        Command::Rotate { direction, speed } => {
            let speed = speed.unwrap_or(cruise_speed).clamp(-100, 100);
            rider.rotate(direction, speed).await?
        }
        Command::Ride { direction } => rider.ride(direction).await?,
        Command::Turn { direction } => rider.turn(direction).await?,
        Command::TurnStop => rider.turn_stop().await?,
        Command::Stop => rider.stop().await?,
        Command::Led { led, color } => rider.set_led_color(led, color).await?,
    }

    info!("Done.");
    Ok(())
}
