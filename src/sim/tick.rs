//! Game tick logic
//!
//! `tick` advances a [`GameContext`] by one frame. Each mode has its own
//! update; cutscene modes suspend player control and run their own camera
//! choreography.

use super::animation::Animator;
use super::level::{BonusObject, Level, PlatformHandle};
use super::physics::{Bounds, DynamicBody, apply_gravity, check_overlap, resolve_collisions};
use super::state::{EndReason, GameContext, GameEvent, GameMode, IntroPhase};
use crate::lerp;
use crate::tuning::PhysicsTuning;

/// Input snapshot for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Toggle hero/robot form
    pub transform: bool,
    /// Robot strike
    pub attack: bool,
    /// Leave the menu
    pub start: bool,
    /// New level from the end screen
    pub restart: bool,
}

/// Advance the session by `dt` reference frames
pub fn tick(ctx: &mut GameContext, input: &TickInput, dt: f32) {
    ctx.frame += 1;

    match ctx.mode {
        GameMode::Menu => update_menu(ctx, input),
        GameMode::Intro => update_intro(ctx, dt),
        GameMode::Playing => update_playing(ctx, input, dt),
        GameMode::Arrest => update_arrest(ctx, dt),
        GameMode::Celebration => update_celebration(ctx, dt),
        GameMode::Win | GameMode::Lose => update_game_over(ctx, input),
    }

    if ctx.mode != GameMode::Menu {
        ctx.player.animator.advance(&ctx.clips, dt);
        ctx.pursuer.animator.advance(&ctx.clips, dt);
        advance_bonus_splash(ctx, dt);
    }
}

/// Play out the bonus splash, then report the prop gone
fn advance_bonus_splash(ctx: &mut GameContext, dt: f32) {
    let Some(splash) = ctx.bonus_splash.as_mut() else {
        return;
    };
    splash.advance(&ctx.clips, dt);
    // A missing clip never finishes
    if splash.is_finished() || ctx.clips.get(splash.clip()).is_none() {
        ctx.bonus_splash = None;
        ctx.push_event(GameEvent::BonusSplashFinished);
    }
}

fn update_menu(ctx: &mut GameContext, input: &TickInput) {
    if !input.start {
        return;
    }
    ctx.start_level();

    let zoom = ctx.tuning.cutscene.intro_zoom;
    ctx.camera.zoom = zoom;
    ctx.camera.target_zoom = zoom;
    ctx.camera.snap_to(ctx.player.body.pos, &ctx.tuning);
    ctx.intro_phase = IntroPhase::Opening;
    ctx.aperture = Some(0.0);
    ctx.set_mode(GameMode::Intro);
}

fn update_intro(ctx: &mut GameContext, dt: f32) {
    let params = ctx.tuning.cutscene.clone();
    ctx.mode_timer += dt;

    match ctx.intro_phase {
        IntroPhase::Opening => {
            let t = (ctx.mode_timer / params.intro_open).min(1.0);
            ctx.aperture = Some(params.intro_aperture * t);
            if ctx.mode_timer >= params.intro_open {
                ctx.intro_phase = IntroPhase::Holding;
                ctx.mode_timer = 0.0;
            }
        }
        IntroPhase::Holding => {
            if ctx.mode_timer >= params.intro_hold {
                ctx.intro_phase = IntroPhase::Revealing;
                ctx.mode_timer = 0.0;
                ctx.camera
                    .zoom_to(ctx.tuning.camera.zoom, None, Some(params.intro_lerp));
            }
        }
        IntroPhase::Revealing => {
            let t = (ctx.mode_timer / params.intro_reveal).min(1.0);
            let full = full_aperture(ctx);
            ctx.aperture = Some(lerp(params.intro_aperture, full, t));
            if ctx.mode_timer >= params.intro_reveal {
                finish_intro(ctx);
                return;
            }
        }
    }

    ctx.camera.update(ctx.player.body.pos, &ctx.tuning, dt);
}

/// Radius that uncovers the whole screen
fn full_aperture(ctx: &GameContext) -> f32 {
    glam::Vec2::new(ctx.tuning.world.screen_width, ctx.tuning.world.screen_height).length() * 0.5
}

fn finish_intro(ctx: &mut GameContext) {
    ctx.aperture = None;
    ctx.camera
        .zoom_to(ctx.tuning.camera.zoom, None, Some(ctx.tuning.camera.lerp));
    ctx.controls_visible = true;
    ctx.set_mode(GameMode::Playing);
}

fn update_playing(ctx: &mut GameContext, input: &TickInput, dt: f32) {
    let update = ctx.player.update(input, &ctx.tuning, dt);
    if update.deliberate && !ctx.pursuer.activated {
        ctx.pursuer.activate();
        ctx.push_event(GameEvent::PursuerActivated);
    }
    if let Some(form) = update.transformed {
        ctx.push_event(GameEvent::PlayerTransformed { form });
    }

    apply_gravity(&mut ctx.player.body, &ctx.tuning.physics, dt);
    resolve_collisions(&mut ctx.player.body, &ctx.level);

    ctx.pursuer
        .record_target(&ctx.player.body, ctx.player.facing_right, dt);
    if ctx
        .pursuer
        .update(&ctx.level, &ctx.player.body, &ctx.tuning, dt)
    {
        ctx.push_event(GameEvent::PursuerRevealed);
    }

    sink_platforms(ctx, dt);

    if collect_pickups(ctx) {
        begin_celebration(ctx);
        return;
    }

    if let Some(strike) = ctx.player.strike_box(ctx.tuning.player.attack_reach) {
        if ctx.pursuer.can_catch() && strike.overlaps(&ctx.pursuer.body.bounds()) {
            log::debug!("Robot strike lands at x={:.0}", strike.left());
            ctx.pursuer.play_shock();
            ctx.push_event(GameEvent::PursuerShocked);
        }
    }

    if ctx.pursuer.can_catch()
        && ctx.pursuer.distance_to(&ctx.player.body) < ctx.tuning.pursuit.catch_distance
    {
        begin_arrest(ctx);
        return;
    }

    if ctx.player.body.pos.y > ctx.tuning.world.height + ctx.tuning.world.pit_margin {
        end_session(ctx, EndReason::Fell);
        return;
    }

    ctx.camera.update(ctx.player.body.pos, &ctx.tuning, dt);
}

/// Sink occupied platforms and carry whatever rests on them
fn sink_platforms(ctx: &mut GameContext, dt: f32) {
    let player_on = ctx.player.body.grounded_platform;
    let pursuer_on = if ctx.pursuer.active {
        ctx.pursuer.body.grounded_platform
    } else {
        None
    };
    let mut occupied: Vec<PlatformHandle> = [player_on, pursuer_on].into_iter().flatten().collect();
    occupied.dedup();

    let speed = ctx.tuning.level.sink_speed;
    let ground_y = ctx.tuning.world.ground_y;
    for handle in occupied {
        let Some(plat) = ctx.level.platform_mut(handle) else {
            continue;
        };
        let delta = plat.sink(speed, dt, ground_y);
        if delta == 0.0 {
            continue;
        }
        if player_on == Some(handle) {
            ctx.player.body.pos.y += delta;
        }
        if pursuer_on == Some(handle) {
            ctx.pursuer.body.pos.y += delta;
        }
        for collectible in ctx
            .level
            .collectibles
            .iter_mut()
            .filter(|c| c.platform == handle.index)
        {
            collectible.pos.y += delta;
        }
        if let Some(bonus) = ctx.level.bonus.as_mut().filter(|b| b.platform == handle.index) {
            bonus.pos.y += delta;
        }
    }
}

/// Pick up touched collectibles and trigger the bonus. Returns true once all are collected.
fn collect_pickups(ctx: &mut GameContext) -> bool {
    let mut picked = Vec::new();
    for (index, collectible) in ctx.level.collectibles.iter_mut().enumerate() {
        if !collectible.collected
            && check_overlap(&ctx.player.body, &*collectible)
            && collectible.collect()
        {
            picked.push(index);
        }
    }

    let total = ctx.level.total_collectibles();
    for &index in &picked {
        let collected = ctx.level.collected_count();
        log::debug!("Collected piece {index} ({collected}/{total})");
        ctx.push_event(GameEvent::CollectiblePicked {
            index,
            collected,
            total,
        });
    }

    let player_box = ctx.player.body.bounds();
    let mut triggered = None;
    if let Some(bonus) = ctx.level.bonus.as_mut() {
        if bonus.bounds().overlaps(&player_box) && bonus.trigger() {
            triggered = Some(bonus.pos);
        }
    }
    if let Some(pos) = triggered {
        let mut splash = Animator::new(BonusObject::SPLASH_CLIP);
        splash.play(BonusObject::SPLASH_CLIP, false);
        ctx.bonus_splash = Some(splash);
        ctx.push_event(GameEvent::BonusTriggered { pos });
    }

    !picked.is_empty() && ctx.level.collected_count() == total
}

fn begin_arrest(ctx: &mut GameContext) {
    log::info!("Player caught at x={:.0}", ctx.player.body.pos.x);
    ctx.end_reason = Some(EndReason::Caught);
    ctx.player.halt_horizontal();
    ctx.pursuer.halt_horizontal();
    ctx.set_mode(GameMode::Arrest);
}

fn begin_celebration(ctx: &mut GameContext) {
    log::info!("All {} pieces collected", ctx.level.total_collectibles());
    ctx.end_reason = Some(EndReason::AllCollected);
    ctx.player.halt_horizontal();
    ctx.pursuer.halt_horizontal();
    ctx.set_mode(GameMode::Celebration);
}

/// Let a frozen actor finish falling
fn settle(body: &mut DynamicBody, physics: &PhysicsTuning, level: &Level, dt: f32) {
    body.vel.x = 0.0;
    apply_gravity(body, physics, dt);
    resolve_collisions(body, level);
}

fn update_arrest(ctx: &mut GameContext, dt: f32) {
    ctx.mode_timer += dt;

    match ctx.cutscene_timer {
        None => {
            settle(&mut ctx.player.body, &ctx.tuning.physics, &ctx.level, dt);
            settle(&mut ctx.pursuer.body, &ctx.tuning.physics, &ctx.level, dt);
            ctx.player.settle_anim();

            let landed = ctx.player.body.grounded && ctx.pursuer.body.grounded;
            if landed || ctx.mode_timer >= ctx.tuning.cutscene.landing_timeout {
                ctx.pursuer.play_arrest();
                ctx.player.play_captured();
                let focus = ctx.actors_midpoint();
                ctx.camera.zoom_to(
                    ctx.tuning.cutscene.arrest_zoom,
                    Some(focus),
                    Some(ctx.tuning.cutscene.cutscene_lerp),
                );
                ctx.cutscene_timer = Some(0.0);
                ctx.push_event(GameEvent::CaptureStarted);
            }
        }
        Some(elapsed) => {
            let elapsed = elapsed + dt;
            ctx.cutscene_timer = Some(elapsed);
            if elapsed >= ctx.tuning.cutscene.arrest_duration {
                end_session(ctx, EndReason::Caught);
                return;
            }
        }
    }

    ctx.camera.update(ctx.player.body.pos, &ctx.tuning, dt);
}

fn update_celebration(ctx: &mut GameContext, dt: f32) {
    ctx.mode_timer += dt;

    match ctx.cutscene_timer {
        None => {
            settle(&mut ctx.player.body, &ctx.tuning.physics, &ctx.level, dt);
            settle(&mut ctx.pursuer.body, &ctx.tuning.physics, &ctx.level, dt);
            ctx.player.settle_anim();

            if ctx.player.body.grounded || ctx.mode_timer >= ctx.tuning.cutscene.landing_timeout {
                ctx.player.play_celebration();
                let focus = ctx.player.body.center();
                ctx.camera.zoom_to(
                    ctx.tuning.cutscene.celebration_zoom,
                    Some(focus),
                    Some(ctx.tuning.cutscene.cutscene_lerp),
                );
                ctx.cutscene_timer = Some(0.0);
                ctx.push_event(GameEvent::CelebrationStarted);
            }
        }
        Some(elapsed) => {
            let elapsed = elapsed + dt;
            ctx.cutscene_timer = Some(elapsed);
            if elapsed >= ctx.tuning.cutscene.celebration_duration {
                end_session(ctx, EndReason::AllCollected);
                return;
            }
        }
    }

    ctx.camera.update(ctx.player.body.pos, &ctx.tuning, dt);
}

fn end_session(ctx: &mut GameContext, reason: EndReason) {
    ctx.end_reason = Some(reason);
    log::info!("Session over after {} frames: {}", ctx.frame, reason.message());
    let mode = match reason {
        EndReason::AllCollected => GameMode::Win,
        EndReason::Caught | EndReason::Fell => GameMode::Lose,
    };
    ctx.set_mode(mode);
}

fn update_game_over(ctx: &mut GameContext, input: &TickInput) {
    if !input.restart {
        return;
    }
    ctx.start_level();
    ctx.controls_visible = true;
    ctx.set_mode(GameMode::Playing);
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::level::{BonusObject, Collectible, Platform};
    use crate::sim::player::{Form, Player, PlayerAnim};
    use crate::sim::pursuit::{Pursuer, PursuerAnim};
    use crate::tuning::Tuning;

    const RIGHT: TickInput = TickInput {
        left: false,
        right: true,
        jump: false,
        transform: false,
        attack: false,
        start: false,
        restart: false,
    };

    fn idle() -> TickInput {
        TickInput::default()
    }

    /// Playing session on a bare ground strip with the player at x = 100
    fn flat_ctx() -> GameContext {
        let mut ctx = GameContext::new(3, Tuning::default());
        ctx.start_level();
        let tuning = ctx.tuning.clone();
        let ground = Platform::new(
            Vec2::new(0.0, tuning.world.ground_y),
            Vec2::new(tuning.world.width, tuning.world.ground_height),
            false,
        );
        ctx.level = Level::from_platforms(ctx.level.generation, vec![ground]);
        let start = Vec2::new(100.0, tuning.world.ground_y - tuning.player.height);
        ctx.level.start_position = start;
        ctx.player = Player::new(start, &tuning);
        ctx.pursuer = Pursuer::new(start, &tuning);
        ctx.set_mode(GameMode::Playing);
        ctx.drain_events();
        ctx
    }

    fn add_collectible(ctx: &mut GameContext, x: f32) {
        ctx.level.collectibles.push(Collectible {
            pos: Vec2::new(x, ctx.tuning.world.ground_y - 24.0),
            size: Vec2::new(24.0, 24.0),
            platform: 0,
            collected: false,
        });
    }

    fn run_until(ctx: &mut GameContext, input: TickInput, mode: GameMode, max: usize) -> usize {
        for frame in 1..=max {
            tick(ctx, &input, 1.0);
            if ctx.mode == mode {
                return frame;
            }
        }
        panic!("never reached {:?}, stuck in {:?}", mode, ctx.mode);
    }

    #[test]
    fn test_menu_waits_for_start() {
        let mut ctx = GameContext::new(5, Tuning::default());
        tick(&mut ctx, &idle(), 1.0);
        assert_eq!(ctx.mode, GameMode::Menu);

        let start = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut ctx, &start, 1.0);
        assert_eq!(ctx.mode, GameMode::Intro);
        assert_eq!(ctx.level.platforms.len(), 11);
        assert_eq!(ctx.aperture, Some(0.0));
        assert_eq!(ctx.camera.zoom, ctx.tuning.cutscene.intro_zoom);
    }

    #[test]
    fn test_intro_reveals_then_plays() {
        let mut ctx = GameContext::new(5, Tuning::default());
        tick(
            &mut ctx,
            &TickInput {
                start: true,
                ..Default::default()
            },
            1.0,
        );

        let mut last_aperture = 0.0;
        let mut frames = 0;
        while ctx.mode == GameMode::Intro {
            tick(&mut ctx, &idle(), 1.0);
            frames += 1;
            if let Some(radius) = ctx.aperture {
                assert!(radius >= last_aperture);
                last_aperture = radius;
            }
            assert!(frames < 1000);
        }

        let cut = &ctx.tuning.cutscene;
        assert_eq!(frames as f32, cut.intro_open + cut.intro_hold + cut.intro_reveal);
        assert_eq!(ctx.mode, GameMode::Playing);
        assert!(ctx.controls_visible);
        assert!(ctx.aperture.is_none());
        assert_eq!(ctx.camera.target_zoom, ctx.tuning.camera.zoom);
        assert!(ctx.camera.zoom < cut.intro_zoom);
    }

    #[test]
    fn test_pursuer_arms_on_movement_only() {
        let mut ctx = flat_ctx();
        tick(&mut ctx, &idle(), 1.0);
        tick(
            &mut ctx,
            &TickInput {
                transform: true,
                ..Default::default()
            },
            1.0,
        );
        assert!(!ctx.pursuer.activated);
        // Movement keys are ignored mid-transform and don't arm him either
        for _ in 0..10 {
            tick(&mut ctx, &RIGHT, 1.0);
        }
        assert!(ctx.player.is_transforming());
        assert!(!ctx.pursuer.activated);

        let mut ctx = flat_ctx();
        tick(&mut ctx, &RIGHT, 1.0);
        assert!(ctx.pursuer.activated);
        assert!(ctx.drain_events().contains(&GameEvent::PursuerActivated));

        let delay = ctx.tuning.pursuit.activation_delay as usize;
        let mut revealed = false;
        for _ in 0..delay {
            tick(&mut ctx, &RIGHT, 1.0);
            revealed |= ctx.drain_events().contains(&GameEvent::PursuerRevealed);
        }
        assert!(revealed);
        assert!(ctx.pursuer.active);
    }

    #[test]
    fn test_collecting_everything_celebrates_then_wins() {
        let mut ctx = flat_ctx();
        add_collectible(&mut ctx, 110.0);
        add_collectible(&mut ctx, 200.0);

        run_until(&mut ctx, RIGHT, GameMode::Celebration, 60);
        let events = ctx.drain_events();
        let picks: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::CollectiblePicked { collected, total, .. } => Some((*collected, *total)),
                _ => None,
            })
            .collect();
        assert_eq!(picks, vec![(1, 2), (2, 2)]);
        assert_eq!(ctx.player.body.vel.x, 0.0);

        tick(&mut ctx, &RIGHT, 1.0);
        assert!(ctx.drain_events().contains(&GameEvent::CelebrationStarted));
        assert_eq!(ctx.player.anim, PlayerAnim::Winning);
        assert!(ctx.camera.focus_override.is_some());

        let frames = run_until(&mut ctx, RIGHT, GameMode::Win, 400);
        assert_eq!(frames as f32, ctx.tuning.cutscene.celebration_duration);
        assert_eq!(ctx.end_reason, Some(EndReason::AllCollected));
    }

    #[test]
    fn test_level_without_collectibles_never_wins() {
        let mut ctx = flat_ctx();
        for _ in 0..50 {
            tick(&mut ctx, &RIGHT, 1.0);
        }
        assert_eq!(ctx.mode, GameMode::Playing);
    }

    #[test]
    fn test_catch_runs_arrest_then_loses() {
        let mut ctx = flat_ctx();
        ctx.pursuer.activated = true;
        ctx.pursuer.active = true;
        ctx.pursuer.body.pos.x = 110.0;

        tick(&mut ctx, &idle(), 1.0);
        assert_eq!(ctx.mode, GameMode::Arrest);
        assert_eq!(ctx.end_reason, Some(EndReason::Caught));

        tick(&mut ctx, &idle(), 1.0);
        assert!(ctx.drain_events().contains(&GameEvent::CaptureStarted));
        assert_eq!(ctx.pursuer.anim, PursuerAnim::Arrest);
        let focus = ctx.camera.focus_override.unwrap();
        assert!((focus - ctx.actors_midpoint()).length() < 1e-3);

        let frames = run_until(&mut ctx, idle(), GameMode::Lose, 400);
        assert_eq!(frames as f32, ctx.tuning.cutscene.arrest_duration);
        assert_eq!(ctx.end_reason, Some(EndReason::Caught));
    }

    #[test]
    fn test_arrest_waits_for_landing() {
        let mut ctx = flat_ctx();
        ctx.player.body.pos.y = 300.0;
        ctx.pursuer.body.pos.y = 300.0;
        ctx.pursuer.active = true;
        ctx.set_mode(GameMode::Arrest);

        tick(&mut ctx, &idle(), 1.0);
        assert!(ctx.cutscene_timer.is_none());
        assert_eq!(ctx.player.anim, PlayerAnim::Jumping);

        for _ in 0..100 {
            tick(&mut ctx, &idle(), 1.0);
            if ctx.cutscene_timer.is_some() {
                break;
            }
        }
        assert!(ctx.cutscene_timer.is_some());
        assert!(ctx.player.body.grounded && ctx.pursuer.body.grounded);
        assert_eq!(ctx.player.body.pos.x, 100.0);
    }

    #[test]
    fn test_arrest_landing_timeout() {
        let mut ctx = flat_ctx();
        ctx.level.platforms.clear();
        ctx.set_mode(GameMode::Arrest);

        let timeout = ctx.tuning.cutscene.landing_timeout as usize;
        for _ in 0..timeout - 1 {
            tick(&mut ctx, &idle(), 1.0);
        }
        assert!(ctx.cutscene_timer.is_none());
        tick(&mut ctx, &idle(), 1.0);
        assert_eq!(ctx.cutscene_timer, Some(0.0));
    }

    #[test]
    fn test_falling_into_pit_loses() {
        let mut ctx = flat_ctx();
        ctx.level.platforms.clear();
        run_until(&mut ctx, idle(), GameMode::Lose, 300);
        assert_eq!(ctx.end_reason, Some(EndReason::Fell));
        assert!(ctx.player.body.pos.y > ctx.tuning.world.height + ctx.tuning.world.pit_margin);
    }

    #[test]
    fn test_restart_skips_intro() {
        let mut ctx = flat_ctx();
        let generation = ctx.level.generation;
        ctx.end_reason = Some(EndReason::Fell);
        ctx.set_mode(GameMode::Lose);

        tick(&mut ctx, &idle(), 1.0);
        assert_eq!(ctx.mode, GameMode::Lose);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut ctx, &restart, 1.0);
        assert_eq!(ctx.mode, GameMode::Playing);
        assert_eq!(ctx.level.generation, generation + 1);
        assert!(ctx.end_reason.is_none());
        assert!(ctx.controls_visible);
        assert!(!ctx.pursuer.activated);
        assert_eq!(ctx.camera.zoom, ctx.tuning.camera.zoom);
    }

    #[test]
    fn test_robot_strike_shocks_pursuer() {
        let mut ctx = flat_ctx();
        ctx.player.form = Form::Robot;
        ctx.pursuer.activated = true;
        ctx.pursuer.active = true;
        ctx.pursuer.body.pos.x = 140.0;

        let attack = TickInput {
            attack: true,
            ..Default::default()
        };
        tick(&mut ctx, &attack, 1.0);
        assert!(ctx.drain_events().contains(&GameEvent::PursuerShocked));
        assert!(ctx.pursuer.is_shocked());

        // A stunned pursuer standing on the player doesn't catch
        ctx.pursuer.body.pos.x = 100.0;
        tick(&mut ctx, &idle(), 1.0);
        assert_eq!(ctx.mode, GameMode::Playing);
    }

    #[test]
    fn test_sinking_platform_carries_player() {
        let mut ctx = flat_ctx();
        ctx.level
            .platforms
            .push(Platform::new(Vec2::new(50.0, 400.0), Vec2::new(200.0, 20.0), true));
        add_collectible(&mut ctx, 500.0);
        ctx.level.collectibles[0].platform = 1;
        ctx.level.collectibles[0].pos.y = 376.0;
        ctx.player.body.pos.y = 350.0;

        tick(&mut ctx, &idle(), 1.0);
        let plat = &ctx.level.platforms[1];
        assert!(plat.pos.y > 400.0);
        assert!(ctx.player.body.grounded);
        assert_eq!(ctx.player.body.feet(), plat.pos.y);
        assert_eq!(ctx.level.collectibles[0].pos.y + 24.0, plat.pos.y);

        // Nobody on the ground strip: it never moves
        assert_eq!(ctx.level.platforms[0].pos.y, ctx.tuning.world.ground_y);
    }

    #[test]
    fn test_bonus_triggers_once() {
        let mut ctx = flat_ctx();
        add_collectible(&mut ctx, 3000.0);
        ctx.level.bonus = Some(BonusObject {
            pos: Vec2::new(110.0, ctx.tuning.world.ground_y - 24.0),
            size: Vec2::new(24.0, 24.0),
            platform: 0,
            triggered: false,
        });

        tick(&mut ctx, &idle(), 1.0);
        let events = ctx.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::BonusTriggered { .. })));

        tick(&mut ctx, &idle(), 1.0);
        let events = ctx.drain_events();
        assert!(!events.iter().any(|e| matches!(e, GameEvent::BonusTriggered { .. })));
        assert_eq!(ctx.mode, GameMode::Playing);
    }

    #[test]
    fn test_bonus_splash_plays_out_once() {
        let mut ctx = flat_ctx();
        add_collectible(&mut ctx, 3000.0);
        ctx.level.bonus = Some(BonusObject {
            pos: Vec2::new(110.0, ctx.tuning.world.ground_y - 24.0),
            size: Vec2::new(24.0, 24.0),
            platform: 0,
            triggered: false,
        });

        tick(&mut ctx, &idle(), 1.0);
        assert!(ctx.bonus_splash.is_some());
        ctx.drain_events();

        let mut finished = 0;
        for _ in 0..120 {
            tick(&mut ctx, &idle(), 1.0);
            finished += ctx
                .drain_events()
                .iter()
                .filter(|e| **e == GameEvent::BonusSplashFinished)
                .count();
        }
        assert_eq!(finished, 1);
        assert!(ctx.bonus_splash.is_none());
    }
}
