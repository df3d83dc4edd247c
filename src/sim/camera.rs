//! Smoothed follow camera with scripted zooms
//!
//! The camera stores a pan offset in world units (negative while scrolled
//! right/down) and a zoom factor. Zoom and pan are both smoothed with the
//! frame-rate independent factor from [`crate::smoothing_factor`].

use glam::Vec2;

use super::physics::Aabb;
use crate::{approach, smoothing_factor};
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct Camera {
    /// Pan offset applied to the world (world units)
    pub offset: Vec2,
    pub zoom: f32,
    pub target_zoom: f32,
    /// Point to centre on while a cutscene runs
    pub focus_override: Option<Vec2>,
    /// Smoothing rate applied to zoom
    pub zoom_lerp: f32,
}

impl Camera {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: tuning.camera.zoom,
            target_zoom: tuning.camera.zoom,
            focus_override: None,
            zoom_lerp: tuning.camera.lerp,
        }
    }

    /// Visible world extent at the current zoom
    pub fn view_size(&self, tuning: &Tuning) -> Vec2 {
        Vec2::new(tuning.world.screen_width, tuning.world.screen_height) / self.zoom
    }

    /// Rectangle of the world currently on screen
    pub fn visible_rect(&self, tuning: &Tuning) -> Aabb {
        let view = self.view_size(tuning);
        Aabb::new(-self.offset.x, -self.offset.y, view.x, view.y)
    }

    /// Follow `focus` (the player's position) for one frame
    pub fn update(&mut self, focus: Vec2, tuning: &Tuning, dt: f32) {
        self.zoom = approach(self.zoom, self.target_zoom, self.zoom_lerp, dt);
        let pan_factor = smoothing_factor(tuning.camera.lerp, dt);
        let view = self.view_size(tuning);

        let target = match self.focus_override {
            Some(point) => Vec2::new(-point.x + view.x * 0.5, -point.y + view.y * 0.5),
            None => self.follow_target(focus, view, tuning),
        };
        let target = self.clamp_to_world(target, tuning);

        self.offset += (target - self.offset) * pan_factor;
        // Zoom may have grown the view since the target was clamped
        self.offset = self.clamp_to_world(self.offset, tuning);
    }

    /// Pan target for normal play: biased ahead, damped vertically
    fn follow_target(&self, focus: Vec2, view: Vec2, tuning: &Tuning) -> Vec2 {
        let baseline = tuning.world.ground_y - tuning.player.height;
        let focus_y = baseline + (focus.y - baseline) * tuning.camera.vertical_follow;
        Vec2::new(
            -focus.x + view.x * tuning.camera.offset_x,
            -focus_y + view.y * 0.5,
        )
    }

    fn clamp_to_world(&self, offset: Vec2, tuning: &Tuning) -> Vec2 {
        let view = self.view_size(tuning);
        Vec2::new(
            offset.x.max(-(tuning.world.width - view.x)).min(0.0),
            offset.y.max(-(tuning.world.height - view.y)).min(0.0),
        )
    }

    /// Begin a scripted zoom; `focus` overrides the follow target until cleared
    pub fn zoom_to(&mut self, zoom: f32, focus: Option<Vec2>, rate: Option<f32>) {
        self.target_zoom = zoom;
        self.focus_override = focus;
        if let Some(rate) = rate {
            self.zoom_lerp = rate;
        }
    }

    pub fn clear_focus(&mut self) {
        self.focus_override = None;
    }

    /// Jump straight to the follow position for `focus`, no smoothing
    pub fn snap_to(&mut self, focus: Vec2, tuning: &Tuning) {
        let view = self.view_size(tuning);
        let target = self.follow_target(focus, view, tuning);
        self.offset = self.clamp_to_world(target, tuning);
    }
}
