//! Level data and procedural generation
//!
//! Platforms are placed column by column. Each new platform is anchored to an
//! already placed one inside a jump/fall band, so the whole level is reachable
//! from the ground by construction.

use glam::Vec2;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use super::physics::{Aabb, Bounds};
use crate::tuning::Tuning;

/// Non-owning reference to a platform of a specific level
///
/// Resolves only against the level it was issued by; after a restart the
/// generation no longer matches and lookups return `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformHandle {
    pub index: usize,
    pub generation: u32,
}

/// A solid platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub pos: Vec2,
    pub size: Vec2,
    /// Descends while occupied
    pub sinkable: bool,
}

impl Platform {
    pub fn new(pos: Vec2, size: Vec2, sinkable: bool) -> Self {
        Self { pos, size, sinkable }
    }

    /// Sink by `speed * dt`, never below ground level. Returns the y delta applied.
    pub fn sink(&mut self, speed: f32, dt: f32, ground_y: f32) -> f32 {
        if !self.sinkable {
            return 0.0;
        }
        let floor = ground_y - self.size.y;
        let new_y = (self.pos.y + speed * dt).min(floor.max(self.pos.y));
        let delta = new_y - self.pos.y;
        self.pos.y = new_y;
        delta
    }

    /// Horizontal gap to a span, zero when they overlap
    pub fn horizontal_gap(&self, x: f32, width: f32) -> f32 {
        0.0_f32
            .max(x - (self.pos.x + self.size.x))
            .max(self.pos.x - (x + width))
    }
}

impl Bounds for Platform {
    fn bounds(&self) -> Aabb {
        Aabb {
            min: self.pos,
            size: self.size,
        }
    }
}

/// A metal piece to collect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub pos: Vec2,
    pub size: Vec2,
    /// Index of the platform it sits on
    pub platform: usize,
    pub collected: bool,
}

impl Collectible {
    /// Mark as collected. Returns true only on the first call.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }
}

impl Bounds for Collectible {
    fn bounds(&self) -> Aabb {
        Aabb {
            min: self.pos,
            size: self.size,
        }
    }
}

/// One-shot bonus prop (paint bucket); doesn't count toward the win
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusObject {
    pub pos: Vec2,
    pub size: Vec2,
    pub platform: usize,
    pub triggered: bool,
}

impl BonusObject {
    /// One-shot clip played when the bonus is triggered
    pub const SPLASH_CLIP: &'static str = "paint_splash";

    /// Returns true only on the first trigger
    pub fn trigger(&mut self) -> bool {
        if self.triggered {
            return false;
        }
        self.triggered = true;
        true
    }
}

impl Bounds for BonusObject {
    fn bounds(&self) -> Aabb {
        Aabb {
            min: self.pos,
            size: self.size,
        }
    }
}

/// A generated level; platform 0 is always the ground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub generation: u32,
    pub platforms: Vec<Platform>,
    pub collectibles: Vec<Collectible>,
    pub bonus: Option<BonusObject>,
    pub start_position: Vec2,
}

impl Level {
    /// Level with the given platforms and nothing else
    pub fn from_platforms(generation: u32, platforms: Vec<Platform>) -> Self {
        Self {
            generation,
            platforms,
            collectibles: Vec::new(),
            bonus: None,
            start_position: Vec2::ZERO,
        }
    }

    /// Empty placeholder used before the first level is generated
    pub fn empty() -> Self {
        Self::from_platforms(0, Vec::new())
    }

    pub fn handle(&self, index: usize) -> PlatformHandle {
        PlatformHandle {
            index,
            generation: self.generation,
        }
    }

    /// Resolve a handle; `None` if it belongs to another level
    pub fn platform(&self, handle: PlatformHandle) -> Option<&Platform> {
        if handle.generation != self.generation {
            return None;
        }
        self.platforms.get(handle.index)
    }

    pub fn platform_mut(&mut self, handle: PlatformHandle) -> Option<&mut Platform> {
        if handle.generation != self.generation {
            return None;
        }
        self.platforms.get_mut(handle.index)
    }

    /// Platforms above ground level
    pub fn floating(&self, ground_y: f32) -> impl Iterator<Item = (usize, &Platform)> {
        self.platforms
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.pos.y < ground_y)
    }

    pub fn collected_count(&self) -> usize {
        self.collectibles.iter().filter(|c| c.collected).count()
    }

    pub fn total_collectibles(&self) -> usize {
        self.collectibles.len()
    }
}

/// Random y for a platform at `[x, x + width)` reachable from an existing platform
///
/// Returns `None` when no platform is horizontally close enough or the
/// reachability band of the chosen reference is empty.
pub fn find_reachable_y<R: Rng + ?Sized>(
    x: f32,
    width: f32,
    platforms: &[Platform],
    tuning: &Tuning,
    rng: &mut R,
) -> Option<f32> {
    let level = &tuning.level;
    let candidates: Vec<&Platform> = platforms
        .iter()
        .filter(|p| p.horizontal_gap(x, width) < level.max_horizontal)
        .collect();

    let reference = candidates.choose(rng)?;
    let (min_y, max_y) = reachability_band(reference.pos.y, tuning);
    if min_y >= max_y {
        return None;
    }
    Some(rng.random_range(min_y..max_y))
}

/// Vertical band a new platform may occupy relative to a reference platform top
pub fn reachability_band(reference_y: f32, tuning: &Tuning) -> (f32, f32) {
    let level = &tuning.level;
    let min_y = level.min_platform_y.max(reference_y - level.max_jump_height);
    let max_y = (tuning.world.ground_y - level.platform_height).min(reference_y + level.max_fall);
    (min_y, max_y)
}

/// Generate a complete level
pub fn generate_level<R: Rng + ?Sized>(tuning: &Tuning, generation: u32, rng: &mut R) -> Level {
    let world = &tuning.world;
    let params = &tuning.level;

    let mut platforms = vec![Platform::new(
        Vec2::new(0.0, world.ground_y),
        Vec2::new(world.width, world.ground_height),
        false,
    )];

    let column_width = if params.platform_count > 0 {
        (world.width - params.safe_zone) / params.platform_count as f32
    } else {
        0.0
    };
    let mut fallbacks = 0;

    for column in 0..params.platform_count {
        let col_x = params.safe_zone + column as f32 * column_width;
        let mut placed = None;

        for _ in 0..params.placement_attempts {
            let width = rng.random_range(params.min_width..=params.max_width);
            let slack = (column_width - width).max(0.0);
            let x = col_x + rng.random_range(0.0..=slack);
            if let Some(y) = find_reachable_y(x, width, &platforms, tuning, rng) {
                placed = Some(Platform::new(
                    Vec2::new(x, y),
                    Vec2::new(width, params.platform_height),
                    true,
                ));
                break;
            }
        }

        let platform = placed.unwrap_or_else(|| {
            fallbacks += 1;
            log::warn!("Column {column}: no reachable placement, using fallback platform");
            Platform::new(
                Vec2::new(
                    col_x + params.fallback_offset,
                    world.ground_y - 2.0 * params.platform_height,
                ),
                Vec2::new(params.fallback_width, params.platform_height),
                true,
            )
        });
        platforms.push(platform);
    }

    let mut level = Level::from_platforms(generation, platforms);
    place_collectibles(&mut level, tuning, rng);
    level.start_position = Vec2::new(params.start_x, world.ground_y - tuning.player.height);

    log::info!(
        "Level {}: {} platforms ({} fallback), {} collectibles, bonus: {}",
        generation,
        level.platforms.len(),
        fallbacks,
        level.collectibles.len(),
        level.bonus.is_some()
    );
    level
}

/// Put one collectible on each of K random floating platforms
fn place_collectibles<R: Rng + ?Sized>(level: &mut Level, tuning: &Tuning, rng: &mut R) {
    let params = &tuning.level;
    let mut floating: Vec<usize> = level
        .floating(tuning.world.ground_y)
        .map(|(index, _)| index)
        .collect();
    floating.shuffle(rng);
    let count = params.collectible_count.min(floating.len());
    let size = Vec2::new(params.collectible_width, params.collectible_height);

    for &index in &floating[..count] {
        let plat = &level.platforms[index];
        level.collectibles.push(Collectible {
            pos: Vec2::new(plat.pos.x + plat.size.x / 2.0 - size.x / 2.0, plat.pos.y - size.y),
            size,
            platform: index,
            collected: false,
        });
    }

    if !params.bonus || count == 0 {
        return;
    }
    let index = floating[count - 1];
    let plat = &level.platforms[index];
    let bonus_size = Vec2::new(params.bonus_width, params.bonus_height);
    level.bonus = Some(BonusObject {
        pos: Vec2::new(
            plat.pos.x + plat.size.x / 2.0 - bonus_size.x / 2.0,
            plat.pos.y - bonus_size.y,
        ),
        size: bonus_size,
        platform: index,
        triggered: false,
    });
    // Lift the shared platform's collectible above the bonus
    if let Some(collectible) = level.collectibles.last_mut() {
        collectible.pos.y = plat.pos.y - bonus_size.y - params.bonus_clearance - size.y;
    }
}
