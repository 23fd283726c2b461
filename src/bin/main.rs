//! Greenhouse lighting controller - Main Entry Point
//!
//! Runs the controller either behind the terminal UI or headless, printing
//! each data refresh to stdout.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use chrono::{Local, Timelike};
use clap::Parser;
use greenhouse_lights::display;
use greenhouse_lights::scheduler::{Scheduler, Tick};
use greenhouse_lights::tui::TuiApp;
use greenhouse_lights::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "greenhouse")]
#[command(about = "Greenhouse lighting controller simulator")]
struct Args {
    /// Run without the terminal UI, printing each refresh to stdout
    #[arg(long)]
    headless: bool,

    /// Headless: stop after this many data refreshes
    #[arg(long, value_name = "N")]
    ticks: Option<u64>,

    /// Print the final controller state as JSON on exit
    #[arg(long)]
    json: bool,

    /// Write diagnostics to this file (the TUI owns the terminal otherwise)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn init_tracing(args: &Args) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    match (&args.log_file, args.headless) {
        (Some(path), _) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        (None, true) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        // No log file and a TUI on screen: diagnostics are dropped
        (None, false) => {}
    }
    Ok(())
}

async fn run_headless(controller: &SharedController, ticks: Option<u64>) {
    let mut scheduler = Scheduler::new(Instant::now());
    let mut rng = StdRng::from_entropy();
    let mut refreshed = 0u64;

    for entry in controller.read().log().entries().rev() {
        println!("{}", entry);
    }

    while ticks.map_or(true, |limit| refreshed < limit) {
        let now = Instant::now();
        tokio::time::sleep(scheduler.until_next(now)).await;

        for tick in scheduler.poll(Instant::now()) {
            if tick != Tick::Data {
                continue;
            }
            let now = Local::now();
            let mut c = controller.write();
            if let TickOutcome::Updated { event: Some(event), .. } = c.data_tick(now, &mut rng) {
                println!("[{}] {}", now.format("%H:%M:%S"), event);
            }
            let model = display::render(c.state(), c.log(), now.hour());
            println!("{} | indoor {} | outdoor {}", model.footer, model.indoor_text, model.outdoor_text);
            refreshed += 1;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    let controller = create_controller();
    info!(headless = args.headless, "starting greenhouse lighting controller");

    if args.headless {
        run_headless(&controller, args.ticks).await;
        controller.write().shutdown(Local::now());
    } else {
        let mut app = TuiApp::new(controller.clone());
        app.run().await?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&*controller.read())?);
    }

    Ok(())
}
