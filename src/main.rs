//! Metal Chase headless driver
//!
//! Runs one autopilot session through the menu, intro and chase until the
//! game ends or the frame cap is hit, logging what happens on the way.
//!
//! Usage: `metal-chase [SEED] [--tuning PATH] [--dump-level]`

use std::path::PathBuf;

use clap::Parser;
use metal_chase::platform::InputProvider;
use metal_chase::renderer::{LogUi, NullRenderer, Presenter};
use metal_chase::sim::{Form, GameContext, GameMode, TickInput, tick};
use metal_chase::{Tuning, TuningError};

/// Three minutes at the reference rate
const FRAME_CAP: u64 = 60 * 60 * 3;

/// Headless Metal Chase run driven by a demo player
#[derive(Parser, Debug)]
#[command(name = "metal-chase")]
#[command(version, about, long_about = None)]
struct Options {
    /// Level generation seed
    #[arg(default_value_t = 1)]
    seed: u64,

    /// JSON file overriding tuning values
    #[arg(long, value_name = "PATH")]
    tuning: Option<PathBuf>,

    /// Print the first generated level as JSON and exit
    #[arg(long)]
    dump_level: bool,
}

fn load_tuning(path: Option<&PathBuf>) -> Tuning {
    let Some(path) = path else {
        return Tuning::default();
    };
    match Tuning::load(path) {
        Ok(tuning) => tuning,
        Err(err @ TuningError::Invalid { .. }) => {
            log::warn!("Rejected tuning {}: {err}; using defaults", path.display());
            Tuning::default()
        }
        Err(err) => {
            log::warn!("Failed to read tuning {}: {err}; using defaults", path.display());
            Tuning::default()
        }
    }
}

/// Demo player: runs at the nearest piece and hops up to it
#[derive(Debug, Default)]
struct Autopilot {
    input: TickInput,
}

impl Autopilot {
    fn plan(ctx: &GameContext) -> Self {
        let mut input = TickInput::default();
        match ctx.mode {
            GameMode::Menu => input.start = true,
            GameMode::Playing => Self::chase_pieces(ctx, &mut input),
            _ => {}
        }
        Self { input }
    }

    fn chase_pieces(ctx: &GameContext, input: &mut TickInput) {
        let player = &ctx.player;
        // Suit up before the first move; standing still keeps the policeman unarmed
        if player.form == Form::Hero && !ctx.pursuer.activated {
            input.transform = !player.is_transforming();
            return;
        }
        if player.is_transforming() {
            return;
        }
        let center = player.body.center();

        let target = ctx
            .level
            .collectibles
            .iter()
            .filter(|c| !c.collected)
            .min_by(|a, b| {
                let dist_a = (a.pos.x - center.x).abs();
                let dist_b = (b.pos.x - center.x).abs();
                dist_a
                    .partial_cmp(&dist_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        let Some(target) = target else {
            return;
        };

        let dx = target.pos.x + target.size.x * 0.5 - center.x;
        if dx > 4.0 {
            input.right = true;
        } else if dx < -4.0 {
            input.left = true;
        }

        let above = target.pos.y + target.size.y < player.body.pos.y - 10.0;
        input.jump = player.body.grounded && above && dx.abs() < 160.0;

        // Strike the policeman when he gets close; release between strikes
        let pursuer = &ctx.pursuer;
        if player.form == Form::Robot
            && !player.is_attacking()
            && pursuer.can_catch()
            && pursuer.distance_to(&player.body) < ctx.tuning.pursuit.catch_distance * 2.0
        {
            input.attack = true;
        }
    }
}

impl InputProvider for Autopilot {
    fn is_left(&self) -> bool {
        self.input.left
    }

    fn is_right(&self) -> bool {
        self.input.right
    }

    fn is_jump(&self) -> bool {
        self.input.jump
    }

    fn is_transform(&self) -> bool {
        self.input.transform
    }

    fn is_attack(&self) -> bool {
        self.input.attack
    }

    fn is_start(&self) -> bool {
        self.input.start
    }

    fn is_restart(&self) -> bool {
        self.input.restart
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = Options::parse();
    let tuning = load_tuning(options.tuning.as_ref());
    let mut ctx = GameContext::new(options.seed, tuning);

    if options.dump_level {
        ctx.start_level();
        match serde_json::to_string_pretty(&ctx.level) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                log::error!("Failed to serialize level: {err}");
                std::process::exit(1);
            }
        }
        return;
    }

    log::info!("Metal Chase (headless) starting with seed {}", options.seed);
    let mut presenter = Presenter::new();
    let mut render = NullRenderer;
    let mut ui = LogUi;

    while ctx.frame < FRAME_CAP {
        let pilot = Autopilot::plan(&ctx);
        let input = TickInput::poll(&pilot);
        tick(&mut ctx, &input, 1.0);
        presenter.present(&mut ctx, &mut render, &mut ui);
        if matches!(ctx.mode, GameMode::Win | GameMode::Lose) {
            break;
        }
    }

    let collected = ctx.level.collected_count();
    let total = ctx.level.total_collectibles();
    match ctx.end_reason {
        Some(reason) => log::info!(
            "Finished after {} frames: {} ({collected}/{total})",
            ctx.frame,
            reason.message()
        ),
        None => log::info!("Frame cap reached in {} ({collected}/{total})", ctx.mode.as_str()),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
