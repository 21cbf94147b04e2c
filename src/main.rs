use balloon_defense::config::{self, WINDOW_HEIGHT, WINDOW_WIDTH};
use balloon_defense::env::TowerDefenseEnv;
use balloon_defense::error::ParseError;
use balloon_defense::game::Game;
use balloon_defense::logging;
use balloon_defense::render::Renderer;
use balloon_defense::runner::Runner;
use balloon_defense::types::Vector2;
use balloon_defense::wave::Wave;
use clap::Parser;
use log::{error, info, warn};
use macroquad::prelude::Conf;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::process::ExitCode;

// --- Command Line Arguments ---
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Playfield width in pixels.
    #[arg(long, default_value_t = config::DEFAULT_WIDTH)]
    width: f64,

    /// Playfield height in pixels.
    #[arg(long, default_value_t = config::DEFAULT_HEIGHT)]
    height: f64,

    /// Starting lives.
    #[arg(long, default_value_t = config::STARTING_LIVES)]
    lives: i32,

    /// Starting cash.
    #[arg(long, default_value_t = config::STARTING_CASH)]
    cash: i32,

    /// Place a tower before the first tick, as X,Y. May be repeated.
    #[arg(long = "tower", value_name = "X,Y", value_parser = parse_placement)]
    towers: Vec<Vector2>,

    /// A wave as KIND:COUNT entries, e.g. "RED:6,BLUE:2". May be repeated;
    /// replaces the built-in wave.
    #[arg(long = "wave", value_name = "ENTRIES")]
    waves: Vec<Wave>,

    /// Run without a window and print a summary.
    #[arg(long)]
    headless: bool,

    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = config::DEFAULT_MAX_TICKS)]
    max_ticks: u64,

    /// Print the final snapshot as JSON instead of the summary (headless only).
    #[arg(long)]
    json: bool,

    /// Play episodes with uniformly random actions and report the rewards.
    #[arg(long)]
    random_agent: bool,

    /// Episodes to play with --random-agent.
    #[arg(long, default_value_t = 1)]
    episodes: u32,

    /// Seed for --random-agent.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Debug filter to specify log topics (e.g., "spawn,tower,wave")
    /// Available topics: spawn, balloon, tower, projectile, wave
    #[arg(long)]
    debug_filter: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

// Parses "X,Y" into a playfield point
fn parse_placement(s: &str) -> Result<Vector2, ParseError> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| ParseError::Placement(s.to_string()))?;
    let x = x.trim().parse::<f64>().map_err(|_| ParseError::Placement(s.to_string()))?;
    let y = y.trim().parse::<f64>().map_err(|_| ParseError::Placement(s.to_string()))?;
    if !x.is_finite() || !y.is_finite() {
        return Err(ParseError::Placement(s.to_string()));
    }
    Ok(Vector2::new(x, y))
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Balloon Defense".to_owned(),
        window_width: WINDOW_WIDTH,
        window_height: WINDOW_HEIGHT,
        window_resizable: false,
        ..Default::default()
    }
}

fn build_game(args: &Args) -> Result<Game, balloon_defense::error::SetupError> {
    let mut game = if args.waves.is_empty() {
        Game::new(args.width, args.height, args.lives, args.cash)
    } else {
        Game::with_schedule(
            args.width,
            args.height,
            args.lives,
            args.cash,
            config::DEFAULT_PATH.to_vec(),
            args.waves.clone(),
            config::SPAWN_DELAY,
        )?
    };

    for point in &args.towers {
        if !game.place_tower(point.x, point.y) {
            warn!("Tower at {} rejected", point);
        }
    }
    Ok(game)
}

fn run_random_agent(args: &Args) {
    let mut env = TowerDefenseEnv::new(args.width as u32, args.height as u32);
    let mut rng = StdRng::seed_from_u64(args.seed);

    for episode in 1..=args.episodes {
        env.reset();
        let mut total_reward = 0.0;
        loop {
            let action = env.sample_action(&mut rng);
            let result = env.step(action);
            total_reward += result.reward;
            if result.terminated || result.truncated {
                info!(
                    "Episode {} ended {:?} after {} steps, {} towers, total reward {:.1}",
                    episode,
                    result.state,
                    env.step_count(),
                    env.game.towers().len(),
                    total_reward
                );
                break;
            }
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = logging::parse_level(&args.log_level);
    if let Err(e) = logging::init_logger(log_level, args.debug_filter.clone()) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    if let Some(filter) = &args.debug_filter {
        for topic in filter.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if !logging::TOPICS.contains(&topic) {
                warn!("Unknown debug topic '{}'", topic);
            }
        }
    }

    info!("Initializing Balloon Defense...");

    if args.random_agent {
        run_random_agent(&args);
        return ExitCode::SUCCESS;
    }

    let game = match build_game(&args) {
        Ok(game) => game,
        Err(e) => {
            error!("Failed to create game: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut runner = Runner::new(game);

    if args.headless {
        let summary = runner.run_headless(args.max_ticks);
        let output = if args.json {
            runner.game.snapshot().to_json()
        } else {
            serde_json::to_string_pretty(&summary)
        };
        match output {
            Ok(text) => println!("{}", text),
            Err(e) => {
                error!("Failed to serialize result: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    let max_ticks = args.max_ticks;
    macroquad::Window::from_config(window_conf(), async move {
        let mut renderer = Renderer::new();
        info!("Renderer initialized.");
        runner.run_windowed(&mut renderer, max_ticks).await;
    });
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use balloon_defense::balloon::BalloonKind;

    #[test]
    fn test_parse_placement() {
        assert_eq!(parse_placement("305,255"), Ok(Vector2::new(305.0, 255.0)));
        assert_eq!(parse_placement(" 12.5 , 40 "), Ok(Vector2::new(12.5, 40.0)));
        assert!(matches!(parse_placement("305"), Err(ParseError::Placement(_))));
        assert!(matches!(parse_placement("a,b"), Err(ParseError::Placement(_))));
        assert!(matches!(parse_placement("inf,1"), Err(ParseError::Placement(_))));
    }

    #[test]
    fn test_args_parse_towers_and_waves() {
        let args = Args::try_parse_from([
            "balloon_defense",
            "--headless",
            "--tower",
            "300,250",
            "--tower",
            "500,250",
            "--wave",
            "RED:6,BLUE:2",
        ])
        .unwrap();
        assert!(args.headless);
        assert_eq!(args.towers.len(), 2);
        assert_eq!(args.waves.len(), 1);
        assert_eq!(args.waves[0].entries[1].kind, BalloonKind::Blue);
        assert_eq!(args.waves[0].total_balloons(), 8);
    }

    #[test]
    fn test_args_reject_bad_wave() {
        assert!(Args::try_parse_from(["balloon_defense", "--wave", "PURPLE:3"]).is_err());
        assert!(Args::try_parse_from(["balloon_defense", "--tower", "nope"]).is_err());
    }

    #[test]
    fn test_build_game_with_waves() {
        let args = Args::try_parse_from([
            "balloon_defense",
            "--wave",
            "RED:1",
            "--wave",
            "BLUE:1",
            "--tower",
            "305,255",
        ])
        .unwrap();
        let game = build_game(&args).unwrap();
        assert_eq!(game.spawner().schedule().len(), 2);
        assert_eq!(game.towers().len(), 1);
    }
}
