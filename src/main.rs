use std::process;

use anyhow::{bail, Context, Result};

use robot_sim::{
    config::SimConfig,
    engine::{program::Program, TickOutcome},
    player::Player,
    robot::{catalog, RobotConfig},
    session::{FrameSink, Session},
    types::FrameView,
};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const RUN_USAGE: &str = "robot-sim run <program.json> [--config <sim.json>]";
const TRACE_USAGE: &str = "robot-sim trace <program.json> [--config <sim.json>]";
const INSPECT_USAGE: &str = "robot-sim inspect <robot.json>";

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("run") => {
            let program_path = args.next().context(RUN_USAGE)?;
            let config = load_config(&mut args, RUN_USAGE)?;
            play(&program_path, config)
        }
        Some("trace") => {
            let program_path = args.next().context(TRACE_USAGE)?;
            let config = load_config(&mut args, TRACE_USAGE)?;
            trace(&program_path, config)
        }
        Some("inspect") => {
            let path = args.next().context(INSPECT_USAGE)?;
            inspect(&path)
        }
        _ => bail!(
            "Robot Sim — terminal robot playback\n\nUsage:\n  {RUN_USAGE}\n  {TRACE_USAGE}\n  {INSPECT_USAGE}"
        ),
    }
}

/// Parse an optional trailing `--config <path>`; without it the user config
/// (or defaults) apply.
fn load_config(args: &mut impl Iterator<Item = String>, usage: &str) -> Result<SimConfig> {
    match args.next().as_deref() {
        None => Ok(SimConfig::load()),
        Some("--config") => {
            let path = args.next().context(usage.to_string())?;
            SimConfig::load_from(&path).with_context(|| format!("Failed to load config {path}"))
        }
        Some(other) => bail!("Unexpected argument {other}\n\nUsage:\n  {usage}"),
    }
}

fn play(program_path: &str, config: SimConfig) -> Result<()> {
    let program = Program::load(program_path)
        .with_context(|| format!("Failed to load program {program_path}"))?;
    let mut player = Player::new(config, program, program_path)?;
    player.play()
}

/// Discards frames; used when playing back without a terminal.
struct Headless;

impl FrameSink for Headless {
    fn present(&mut self, _view: &FrameView<'_>) -> Result<()> {
        Ok(())
    }
}

fn trace(program_path: &str, config: SimConfig) -> Result<()> {
    let program = Program::load(program_path)
        .with_context(|| format!("Failed to load program {program_path}"))?;
    let ticks_per_command = (1.0 / config.step).ceil() as usize;
    let ceiling = (program.len() + 1) * ticks_per_command;

    let mut session = Session::from_config(&config, Headless)?;
    let commands = program.commands.clone();
    session.load_program(program);
    session.start();

    let pose = session.pose();
    println!("start        ({:>8.2}, {:>8.2}) {:>7.1}°", pose.x, pose.y, pose.heading);

    let mut ticks = 0;
    while !session.is_finished() && ticks < ceiling {
        let outcome = session.tick()?;
        ticks += 1;
        match outcome {
            TickOutcome::Completed { index } => {
                let pose = session.pose();
                println!(
                    "{:<12} ({:>8.2}, {:>8.2}) {:>7.1}°",
                    commands[index].name(),
                    pose.x,
                    pose.y,
                    pose.heading,
                );
            }
            TickOutcome::Stalled { index } => {
                bail!("Command {index} has no known motion; playback cannot continue");
            }
            _ => {}
        }
    }

    eprintln!("{} commands in {ticks} ticks", commands.len());
    Ok(())
}

fn inspect(path: &str) -> Result<()> {
    let robot = RobotConfig::load(path).with_context(|| format!("Failed to load robot {path}"))?;
    let stats = robot.stats();

    println!("{} ({:?})", robot.name, robot.chassis);
    if robot.sensors.is_empty() {
        println!("  no sensors fitted");
    }
    for &kind in &robot.sensors {
        let spec = catalog::spec(kind);
        match robot.settings(kind) {
            Some(settings) => println!(
                "  {:<18} {:>3} power {:>3} g  {}",
                spec.name, spec.power, spec.weight, settings
            ),
            None => println!("  {:<18} {:>3} power {:>3} g", spec.name, spec.power, spec.weight),
        }
    }
    println!(
        "total power {}  total weight {} g",
        stats.total_power, stats.total_weight
    );
    Ok(())
}
