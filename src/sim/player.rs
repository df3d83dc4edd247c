//! Player controller
//!
//! Movement and jumping for the hero, plus the robot form reached through a
//! timed transform. The robot can attack; a strike that lands on the policeman
//! shocks him.

use glam::Vec2;

use super::animation::Animator;
use super::physics::{Aabb, DynamicBody};
use super::tick::TickInput;
use crate::tuning::Tuning;

/// Which character set is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Hero,
    Robot,
}

/// Player animation states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAnim {
    Standing,
    Running,
    Jumping,
    Winning,
    Transform,
    Attack,
    Die,
}

impl PlayerAnim {
    /// Clip name for this state in the given form
    pub fn clip(self, form: Form) -> &'static str {
        match (form, self) {
            (Form::Hero, PlayerAnim::Standing) => "standing",
            (Form::Hero, PlayerAnim::Running) => "running",
            (Form::Hero, PlayerAnim::Jumping) => "jumping",
            (_, PlayerAnim::Winning) => "winning",
            (Form::Hero, PlayerAnim::Transform) => "robot_transform",
            (Form::Robot, PlayerAnim::Transform) => "robot_transform_back",
            (Form::Robot, PlayerAnim::Standing) => "robot_standing",
            (Form::Robot, PlayerAnim::Running) => "robot_running",
            (Form::Robot, PlayerAnim::Jumping) => "robot_jumping",
            (_, PlayerAnim::Attack) => "robot_attack",
            (_, PlayerAnim::Die) => "robot_die",
        }
    }

    fn looping(self) -> bool {
        !matches!(self, PlayerAnim::Transform | PlayerAnim::Attack | PlayerAnim::Die)
    }
}

/// What happened during one control update
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerUpdate {
    /// Left, right or jump was pressed
    pub deliberate: bool,
    /// Transform finished this frame, with the new form
    pub transformed: Option<Form>,
    pub attack_started: bool,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: DynamicBody,
    pub facing_right: bool,
    pub form: Form,
    pub anim: PlayerAnim,
    pub animator: Animator,
    /// Set on the frame a jump starts
    pub just_jumped: bool,
    transform_timer: Option<f32>,
    attack_timer: Option<f32>,
    /// Key state seen last frame; transform and attack fire on press only
    held_transform: bool,
    held_attack: bool,
}

impl Player {
    pub fn new(start: Vec2, tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.player.width, tuning.player.height);
        Self {
            body: DynamicBody::new(start, size),
            facing_right: true,
            form: Form::Hero,
            anim: PlayerAnim::Standing,
            animator: Animator::new(PlayerAnim::Standing.clip(Form::Hero)),
            just_jumped: false,
            transform_timer: None,
            attack_timer: None,
            held_transform: false,
            held_attack: false,
        }
    }

    pub fn is_transforming(&self) -> bool {
        self.transform_timer.is_some()
    }

    pub fn is_attacking(&self) -> bool {
        self.attack_timer.is_some()
    }

    /// Apply control input for one frame (gravity and collisions are separate)
    pub fn update(&mut self, input: &TickInput, tuning: &Tuning, dt: f32) -> PlayerUpdate {
        let params = &tuning.player;
        let mut result = PlayerUpdate::default();
        self.just_jumped = false;

        let transform_pressed = input.transform && !self.held_transform;
        let attack_pressed = input.attack && !self.held_attack;
        self.held_transform = input.transform;
        self.held_attack = input.attack;

        if let Some(timer) = self.transform_timer.as_mut() {
            *timer += dt;
            self.body.vel.x = 0.0;
            if *timer >= params.transform_duration {
                self.transform_timer = None;
                self.form = match self.form {
                    Form::Hero => Form::Robot,
                    Form::Robot => Form::Hero,
                };
                result.transformed = Some(self.form);
                log::debug!("Player transformed into {:?}", self.form);
                self.set_anim(PlayerAnim::Standing);
            }
            return result;
        }

        if transform_pressed {
            self.start_transform();
            return result;
        }

        result.deliberate = input.left || input.right || input.jump;
        if attack_pressed && self.form == Form::Robot && !self.is_attacking() {
            self.attack_timer = Some(0.0);
            self.set_anim(PlayerAnim::Attack);
            result.attack_started = true;
        }

        if input.left {
            self.body.vel.x = -params.speed;
            self.facing_right = false;
        } else if input.right {
            self.body.vel.x = params.speed;
            self.facing_right = true;
        } else {
            self.body.vel.x = 0.0;
        }

        if input.jump && self.body.grounded {
            self.body.vel.y = params.jump_force;
            self.body.grounded = false;
            self.just_jumped = true;
        }

        self.body.pos.x += self.body.vel.x * dt;
        self.body.clamp_to_world(tuning.world.width);

        if let Some(timer) = self.attack_timer.as_mut() {
            *timer += dt;
            if *timer >= params.attack_duration {
                self.attack_timer = None;
            }
        }

        if !self.is_attacking() {
            let next = if !self.body.grounded {
                PlayerAnim::Jumping
            } else if self.body.vel.x != 0.0 {
                PlayerAnim::Running
            } else {
                PlayerAnim::Standing
            };
            self.set_anim(next);
        }
        result
    }

    fn start_transform(&mut self) {
        self.transform_timer = Some(0.0);
        self.attack_timer = None;
        self.body.vel.x = 0.0;
        self.set_anim(PlayerAnim::Transform);
    }

    fn set_anim(&mut self, anim: PlayerAnim) {
        self.anim = anim;
        let clip = anim.clip(self.form);
        if matches!(anim, PlayerAnim::Transform | PlayerAnim::Attack) {
            self.animator.play(clip, anim.looping());
        } else {
            self.animator.set_state(clip, anim.looping());
        }
    }

    /// Box in front of the robot that lands an attack
    pub fn strike_box(&self, reach: f32) -> Option<Aabb> {
        if !self.is_attacking() {
            return None;
        }
        let body = &self.body;
        let x = if self.facing_right {
            body.pos.x + body.size.x
        } else {
            body.pos.x - reach
        };
        Some(Aabb::new(x, body.pos.y, reach, body.size.y))
    }

    pub fn halt_horizontal(&mut self) {
        self.body.vel.x = 0.0;
    }

    /// Victory pose
    pub fn play_celebration(&mut self) {
        self.transform_timer = None;
        self.attack_timer = None;
        self.anim = PlayerAnim::Winning;
        self.animator.play(PlayerAnim::Winning.clip(self.form), true);
    }

    /// Pose while being arrested: the hero stands still, the robot collapses
    pub fn play_captured(&mut self) {
        self.transform_timer = None;
        self.attack_timer = None;
        let anim = match self.form {
            Form::Hero => PlayerAnim::Standing,
            Form::Robot => PlayerAnim::Die,
        };
        self.anim = anim;
        self.animator.play(anim.clip(self.form), anim.looping());
    }

    /// Airborne pose while a cutscene waits for landing
    pub fn settle_anim(&mut self) {
        let anim = if self.body.grounded {
            PlayerAnim::Standing
        } else {
            PlayerAnim::Jumping
        };
        self.anim = anim;
        self.animator.set_state(anim.clip(self.form), true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded_player(tuning: &Tuning) -> Player {
        let mut player = Player::new(Vec2::new(100.0, 490.0), tuning);
        player.body.grounded = true;
        player
    }

    fn input(f: impl FnOnce(&mut TickInput)) -> TickInput {
        let mut input = TickInput::default();
        f(&mut input);
        input
    }

    #[test]
    fn test_running_and_facing() {
        let tuning = Tuning::default();
        let mut player = grounded_player(&tuning);

        let result = player.update(&input(|i| i.left = true), &tuning, 1.0);
        assert!(result.deliberate);
        assert_eq!(player.body.pos.x, 96.0);
        assert!(!player.facing_right);
        assert_eq!(player.anim, PlayerAnim::Running);

        player.update(&TickInput::default(), &tuning, 1.0);
        assert_eq!(player.body.vel.x, 0.0);
        assert_eq!(player.anim, PlayerAnim::Standing);
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let tuning = Tuning::default();
        let mut player = grounded_player(&tuning);
        player.update(&input(|i| i.jump = true), &tuning, 1.0);
        assert_eq!(player.body.vel.y, tuning.player.jump_force);
        assert!(player.just_jumped);
        assert_eq!(player.anim, PlayerAnim::Jumping);

        player.body.vel.y = 2.0;
        player.update(&input(|i| i.jump = true), &tuning, 1.0);
        assert_eq!(player.body.vel.y, 2.0);
        assert!(!player.just_jumped);
    }

    #[test]
    fn test_clamped_to_world() {
        let tuning = Tuning::default();
        let mut player = grounded_player(&tuning);
        player.body.pos.x = 1.0;
        player.update(&input(|i| i.left = true), &tuning, 1.0);
        assert_eq!(player.body.pos.x, 0.0);
    }

    #[test]
    fn test_transform_round_trip() {
        let tuning = Tuning::default();
        let mut player = grounded_player(&tuning);

        player.update(&input(|i| i.transform = true), &tuning, 1.0);
        assert!(player.is_transforming());
        assert_eq!(player.animator.clip(), "robot_transform");

        // Control input is ignored while transforming
        let mut done = None;
        for _ in 0..200 {
            let result = player.update(&input(|i| i.right = true), &tuning, 1.0);
            if result.transformed.is_some() {
                done = result.transformed;
                break;
            }
            assert_eq!(player.body.vel.x, 0.0);
        }
        assert_eq!(done, Some(Form::Robot));
        assert_eq!(player.animator.clip(), "robot_standing");

        player.update(&input(|i| i.transform = true), &tuning, 1.0);
        assert_eq!(player.animator.clip(), "robot_transform_back");
    }

    #[test]
    fn test_attack_requires_robot() {
        let tuning = Tuning::default();
        let mut player = grounded_player(&tuning);
        let result = player.update(&input(|i| i.attack = true), &tuning, 1.0);
        assert!(!result.attack_started);
        assert!(player.strike_box(30.0).is_none());

        player.form = Form::Robot;
        player.update(&TickInput::default(), &tuning, 1.0);
        let result = player.update(&input(|i| i.attack = true), &tuning, 1.0);
        assert!(result.attack_started);
        let strike = player.strike_box(30.0).unwrap();
        assert_eq!(strike.left(), player.body.pos.x + player.body.size.x);

        for _ in 0..(tuning.player.attack_duration as usize + 1) {
            player.update(&TickInput::default(), &tuning, 1.0);
        }
        assert!(!player.is_attacking());
        assert_eq!(player.anim, PlayerAnim::Standing);
    }

    #[test]
    fn test_held_transform_changes_form_once() {
        let tuning = Tuning::default();
        let mut player = grounded_player(&tuning);
        let mut forms = Vec::new();
        for _ in 0..200 {
            let result = player.update(&input(|i| i.transform = true), &tuning, 1.0);
            forms.extend(result.transformed);
        }
        assert_eq!(forms, vec![Form::Robot]);
        assert!(!player.is_transforming());

        // Releasing and pressing again transforms back
        player.update(&TickInput::default(), &tuning, 1.0);
        player.update(&input(|i| i.transform = true), &tuning, 1.0);
        assert!(player.is_transforming());
    }

    #[test]
    fn test_held_attack_strikes_once() {
        let tuning = Tuning::default();
        let mut player = grounded_player(&tuning);
        player.form = Form::Robot;
        let mut strikes = 0;
        for _ in 0..(tuning.player.attack_duration as usize * 3) {
            if player.update(&input(|i| i.attack = true), &tuning, 1.0).attack_started {
                strikes += 1;
            }
        }
        assert_eq!(strikes, 1);
        assert!(!player.is_attacking());
    }

    #[test]
    fn test_input_during_transform_is_not_deliberate() {
        let tuning = Tuning::default();
        let mut player = grounded_player(&tuning);
        let result = player.update(&input(|i| i.transform = true), &tuning, 1.0);
        assert!(!result.deliberate);

        let result = player.update(&input(|i| i.right = true), &tuning, 1.0);
        assert!(player.is_transforming());
        assert!(!result.deliberate);
    }

    #[test]
    fn test_captured_pose_depends_on_form() {
        let tuning = Tuning::default();
        let mut player = grounded_player(&tuning);
        player.play_captured();
        assert_eq!(player.animator.clip(), "standing");

        player.form = Form::Robot;
        player.play_captured();
        assert_eq!(player.animator.clip(), "robot_die");
        assert!(!player.animator.is_looping());
    }
}
