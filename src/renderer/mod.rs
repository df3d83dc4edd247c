//! Presentation contract
//!
//! The simulation never draws. Each frame the [`Presenter`] drains the
//! context's events and pushes numeric state through two write-only
//! collaborators: a [`RenderProxy`] for the scene and a [`UiSink`] for
//! on-screen text and widgets.

use glam::Vec2;

use crate::sim::{BonusObject, GameContext, GameEvent, GameMode};

/// Scene object addressed by the proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderHandle {
    Player,
    Pursuer,
    Platform(usize),
    Collectible(usize),
    Bonus,
}

/// Scene-graph side of rendering
pub trait RenderProxy {
    fn set_position(&mut self, handle: RenderHandle, pos: Vec2);
    /// Negative x mirrors the sprite
    fn set_scale(&mut self, handle: RenderHandle, scale: Vec2);
    fn set_animation(&mut self, handle: RenderHandle, clip: &str, looping: bool);
    fn set_frame(&mut self, handle: RenderHandle, frame: usize);
    fn set_visible(&mut self, handle: RenderHandle, visible: bool);
    /// World pan offset and zoom
    fn set_view(&mut self, offset: Vec2, zoom: f32);
    /// Intro reveal radius; `None` removes the mask
    fn set_aperture(&mut self, radius: Option<f32>);
}

/// HUD, overlays and touch controls
pub trait UiSink {
    fn update_counter(&mut self, collected: usize, total: usize);
    fn show(&mut self, message: &str);
    fn hide(&mut self);
    fn show_menu(&mut self, visible: bool);
    fn show_controls(&mut self, visible: bool);
}

/// Proxy that discards everything (headless runs)
#[derive(Debug, Default)]
pub struct NullRenderer;

impl RenderProxy for NullRenderer {
    fn set_position(&mut self, _handle: RenderHandle, _pos: Vec2) {}
    fn set_scale(&mut self, _handle: RenderHandle, _scale: Vec2) {}
    fn set_animation(&mut self, _handle: RenderHandle, _clip: &str, _looping: bool) {}
    fn set_frame(&mut self, _handle: RenderHandle, _frame: usize) {}
    fn set_visible(&mut self, _handle: RenderHandle, _visible: bool) {}
    fn set_view(&mut self, _offset: Vec2, _zoom: f32) {}
    fn set_aperture(&mut self, _radius: Option<f32>) {}
}

/// UI sink that writes to the log
#[derive(Debug, Default)]
pub struct LogUi;

impl UiSink for LogUi {
    fn update_counter(&mut self, collected: usize, total: usize) {
        log::info!("Metal: {collected}/{total}");
    }

    fn show(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn hide(&mut self) {}

    fn show_menu(&mut self, visible: bool) {
        if visible {
            log::info!("Press start");
        }
    }

    fn show_controls(&mut self, visible: bool) {
        log::debug!("Touch controls visible: {visible}");
    }
}

/// Pushes simulation state to the presentation collaborators
#[derive(Debug, Default)]
pub struct Presenter {
    player_clip: Option<&'static str>,
    pursuer_clip: Option<&'static str>,
    controls_visible: bool,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Present one frame; drains the context's events
    pub fn present(
        &mut self,
        ctx: &mut GameContext,
        render: &mut dyn RenderProxy,
        ui: &mut dyn UiSink,
    ) {
        for event in ctx.drain_events() {
            self.apply_event(ctx, event, render, ui);
        }

        if ctx.controls_visible != self.controls_visible {
            self.controls_visible = ctx.controls_visible;
            ui.show_controls(self.controls_visible);
        }
        if ctx.mode == GameMode::Menu {
            return;
        }

        self.push_actors(ctx, render);

        for (index, plat) in ctx.level.platforms.iter().enumerate() {
            if plat.sinkable {
                render.set_position(RenderHandle::Platform(index), plat.pos);
            }
        }
        for (index, collectible) in ctx.level.collectibles.iter().enumerate() {
            if !collectible.collected {
                render.set_position(RenderHandle::Collectible(index), collectible.pos);
            }
        }
        if let Some(bonus) = &ctx.level.bonus {
            render.set_position(RenderHandle::Bonus, bonus.pos);
        }

        render.set_view(ctx.camera.offset, ctx.camera.zoom);
        render.set_aperture(ctx.aperture);
    }

    fn apply_event(
        &mut self,
        ctx: &GameContext,
        event: GameEvent,
        render: &mut dyn RenderProxy,
        ui: &mut dyn UiSink,
    ) {
        match event {
            GameEvent::ModeChanged { to, .. } => match to {
                GameMode::Menu => ui.show_menu(true),
                GameMode::Intro => {
                    ui.show_menu(false);
                    ui.hide();
                }
                GameMode::Playing => ui.hide(),
                GameMode::Win | GameMode::Lose => {
                    if let Some(reason) = ctx.end_reason {
                        ui.show(reason.message());
                    }
                }
                GameMode::Arrest | GameMode::Celebration => {}
            },
            GameEvent::LevelStarted { total, .. } => {
                self.player_clip = None;
                self.pursuer_clip = None;
                self.build_scene(ctx, render);
                ui.update_counter(0, total);
            }
            GameEvent::CollectiblePicked {
                index,
                collected,
                total,
            } => {
                render.set_visible(RenderHandle::Collectible(index), false);
                ui.update_counter(collected, total);
            }
            GameEvent::BonusTriggered { .. } => {
                render.set_animation(RenderHandle::Bonus, BonusObject::SPLASH_CLIP, false);
            }
            GameEvent::BonusSplashFinished => render.set_visible(RenderHandle::Bonus, false),
            GameEvent::PursuerRevealed => render.set_visible(RenderHandle::Pursuer, true),
            other => log::debug!("{other:?}"),
        }
    }

    /// Place every object of a freshly generated level
    fn build_scene(&self, ctx: &GameContext, render: &mut dyn RenderProxy) {
        let clips = &ctx.clips;
        for (index, plat) in ctx.level.platforms.iter().enumerate() {
            let handle = RenderHandle::Platform(index);
            render.set_position(handle, plat.pos);
            render.set_visible(handle, true);
        }
        for (index, collectible) in ctx.level.collectibles.iter().enumerate() {
            let handle = RenderHandle::Collectible(index);
            let scale = clips.display_scale("metal", collectible.size.y);
            render.set_position(handle, collectible.pos);
            render.set_scale(handle, Vec2::splat(scale));
            render.set_animation(handle, "metal", true);
            render.set_visible(handle, true);
        }
        match &ctx.level.bonus {
            Some(bonus) => {
                render.set_position(RenderHandle::Bonus, bonus.pos);
                render.set_visible(RenderHandle::Bonus, true);
            }
            None => render.set_visible(RenderHandle::Bonus, false),
        }
        render.set_visible(RenderHandle::Player, true);
        render.set_visible(RenderHandle::Pursuer, ctx.pursuer.active);
    }

    fn push_actors(&mut self, ctx: &GameContext, render: &mut dyn RenderProxy) {
        let clips = &ctx.clips;

        let player = &ctx.player;
        let clip = player.animator.clip();
        if self.player_clip != Some(clip) {
            self.player_clip = Some(clip);
            render.set_animation(RenderHandle::Player, clip, player.animator.is_looping());
        }
        let scale = clips.display_scale(clip, player.body.size.y);
        let flip = if player.facing_right { 1.0 } else { -1.0 };
        render.set_position(RenderHandle::Player, player.body.pos);
        render.set_scale(RenderHandle::Player, Vec2::new(scale * flip, scale));
        render.set_frame(RenderHandle::Player, player.animator.frame());

        let pursuer = &ctx.pursuer;
        if !pursuer.active {
            return;
        }
        let clip = pursuer.animator.clip();
        if self.pursuer_clip != Some(clip) {
            self.pursuer_clip = Some(clip);
            render.set_animation(RenderHandle::Pursuer, clip, pursuer.animator.is_looping());
        }
        let scale = clips.display_scale(clip, pursuer.body.size.y);
        let flip = if pursuer.facing_right { 1.0 } else { -1.0 };
        render.set_position(RenderHandle::Pursuer, pursuer.body.pos);
        render.set_scale(RenderHandle::Pursuer, Vec2::new(scale * flip, scale));
        render.set_frame(RenderHandle::Pursuer, pursuer.animator.frame());
    }
}
