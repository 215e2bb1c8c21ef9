use clap::Parser;

use pathfinding_stepper::config::Config;
use pathfinding_stepper::controller::state::State;
use pathfinding_stepper::controller::Controller;
use pathfinding_stepper::error::TransitionError;
use pathfinding_stepper::view::{HeadlessView, TerminalView, View};
use std::thread;
use tracing_subscriber::EnvFilter;

fn main() {
    let config = Config::parse();

    let default_level = if config.quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = match config.settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if !config.quiet {
        println!("Starting step-through search...");
        println!("Grid size: {}x{}", settings.cols, settings.rows);
        println!("Walls: {}", config.num_walls);
        println!("Algorithm: {}", config.algorithm);
        if config.no_visualization {
            println!("Visualization disabled - replaying without delay");
        } else {
            println!("Visualization enabled with {}ms delay", config.delay_ms);
        }
        println!();
    }

    let result = if config.no_visualization {
        let view = HeadlessView::new().with_colorize_duration(config.animation());
        run(Controller::new(settings, view), &config, |_| {})
    } else {
        let title = format!("STEP-THROUGH SEARCH ({})", config.algorithm);
        let view = TerminalView::new(title, config.animation());
        run(Controller::new(settings, view), &config, TerminalView::draw)
    };

    if let Err(e) = result {
        eprintln!("Search session failed: {}", e);
        std::process::exit(1);
    }
}

/// Builds the board, runs one search and replays it step by step.
fn run<V: View>(
    mut controller: Controller<V>,
    config: &Config,
    redraw: impl Fn(&V),
) -> Result<(), TransitionError> {
    controller.init()?;
    controller.scatter_walls(config.num_walls, config.seed)?;
    controller.start()?;

    let animate = !config.no_visualization;
    if animate {
        redraw(controller.view());
        thread::sleep(config.delay());
    }

    while controller.is(State::Paused) {
        controller.resume()?;
        if animate {
            redraw(controller.view());
            thread::sleep(config.delay());
        }
    }

    print_results(&controller, config.quiet);
    Ok(())
}

fn print_results<V: View>(controller: &Controller<V>, quiet: bool) {
    println!("\n=== FINAL RESULTS ===");
    match controller.summary() {
        Some(stats) => {
            print!("{}", stats);
            if !stats.found() {
                println!(
                    "No path between {} and {} - try fewer --num-walls",
                    controller.start_pos(),
                    controller.end_pos()
                );
            }
        }
        None => println!("No search was run"),
    }
    println!("Steps replayed: {}", controller.steps_taken());

    if quiet {
        return;
    }

    println!("\n=== OPEN SET ===");
    for line in controller.open_lines() {
        println!("{}", line);
    }
    println!("\n=== CLOSED SET ===");
    for line in controller.closed_lines() {
        println!("{}", line);
    }
}
