//! Shared animated-state machine
//!
//! Entities pick a clip by name; the animator owns the frame cursor. Clip data
//! comes from the asset layer and may be incomplete: a missing clip keeps the
//! state change but never advances frames.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Playback rate of the shipped sheets (24 fps against the 60 Hz reference)
pub const DEFAULT_CLIP_SPEED: f32 = 24.0 / 60.0;

/// Frame data for one animation sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub frame_count: u32,
    /// Source frame height (pixels), used to derive display scale
    pub frame_height: f32,
    /// Frames advanced per reference frame
    pub speed: f32,
    /// Extra display scale on top of height fitting
    pub scale: f32,
}

impl Clip {
    pub fn new(frame_count: u32, frame_height: f32) -> Self {
        Self {
            frame_count,
            frame_height,
            speed: DEFAULT_CLIP_SPEED,
            scale: 1.0,
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

/// Clips keyed by state name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClipLibrary {
    clips: HashMap<String, Clip>,
}

impl ClipLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, clip: Clip) {
        self.clips.insert(name.into(), clip);
    }

    pub fn get(&self, name: &str) -> Option<&Clip> {
        self.clips.get(name)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Layout of the stock sprite sheets (6x6 and 4x4 grids)
    pub fn standard() -> Self {
        let mut lib = Self::new();
        // Hero
        lib.insert("standing", Clip::new(36, 256.0));
        lib.insert("running", Clip::new(36, 256.0));
        lib.insert("jumping", Clip::new(16, 384.0).with_scale(1.25));
        lib.insert("winning", Clip::new(36, 256.0));
        // Robot
        lib.insert("robot_standing", Clip::new(36, 256.0).with_scale(1.2));
        lib.insert("robot_running", Clip::new(36, 256.0).with_scale(1.4));
        lib.insert("robot_jumping", Clip::new(16, 384.0).with_scale(1.3));
        lib.insert("robot_transform", Clip::new(36, 256.0).with_scale(1.25));
        lib.insert("robot_transform_back", Clip::new(36, 256.0).with_scale(1.25));
        lib.insert("robot_die", Clip::new(36, 256.0).with_scale(1.25));
        lib.insert("robot_attack", Clip::new(16, 256.0).with_scale(1.25));
        // Policeman
        lib.insert("police_running", Clip::new(36, 256.0).with_scale(1.2));
        lib.insert("police_jumping", Clip::new(16, 384.0).with_scale(1.2));
        lib.insert("police_arrest", Clip::new(36, 256.0).with_scale(1.2));
        lib.insert("police_shock", Clip::new(16, 256.0).with_scale(1.25));
        // Props
        lib.insert("metal", Clip::new(36, 128.0).with_scale(1.6).with_speed(12.0 / 60.0));
        lib.insert("paint_splash", Clip::new(16, 128.0).with_scale(1.5));
        lib
    }

    /// Display scale that fits `clip` to `target_height`; 1.0 when the clip is missing
    pub fn display_scale(&self, name: &str, target_height: f32) -> f32 {
        match self.get(name) {
            Some(clip) if clip.frame_height > 0.0 => target_height / clip.frame_height * clip.scale,
            _ => 1.0,
        }
    }
}

/// Frame cursor over the current clip
#[derive(Debug, Clone)]
pub struct Animator {
    clip: &'static str,
    looping: bool,
    cursor: f32,
    finished: bool,
}

impl Animator {
    pub fn new(clip: &'static str) -> Self {
        Self {
            clip,
            looping: true,
            cursor: 0.0,
            finished: false,
        }
    }

    /// Switch clip if it differs from the current one. Returns true on change.
    pub fn set_state(&mut self, clip: &'static str, looping: bool) -> bool {
        if self.clip == clip && self.looping == looping {
            return false;
        }
        self.play(clip, looping);
        true
    }

    /// Start `clip` from its first frame even if it is already playing
    pub fn play(&mut self, clip: &'static str, looping: bool) {
        self.clip = clip;
        self.looping = looping;
        self.cursor = 0.0;
        self.finished = false;
    }

    /// Advance the frame cursor by `dt` reference frames
    pub fn advance(&mut self, library: &ClipLibrary, dt: f32) {
        let Some(clip) = library.get(self.clip) else {
            return;
        };
        if self.finished || clip.frame_count == 0 {
            return;
        }
        let frames = clip.frame_count as f32;
        self.cursor += clip.speed * dt;
        if self.looping {
            self.cursor %= frames;
        } else if self.cursor >= frames - 1.0 {
            self.cursor = frames - 1.0;
            self.finished = true;
        }
    }

    pub fn clip(&self) -> &'static str {
        self.clip
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn frame(&self) -> usize {
        self.cursor as usize
    }

    /// Non-looping clip reached its last frame
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
