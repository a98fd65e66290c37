//! `RoverGame`: one run of the rover game.
//!
//! The caller owns the session and drives it:
//!
//! ```text
//! new/start ──▶ update()* / render()* ──▶ stop()
//!                    │
//!                    ├─ handle_key(KeyEvent)   input between ticks
//!                    ├─ toggle_pause()
//!                    └─ submit_score(name)     once is_game_over
//! ```
//!
//! ## Tick order
//!
//! | Step | Work |
//! |------|------|
//! | 1 | Particles, zones, impacts, obstacles, power-ups advance |
//! | 2 | Rover: shield countdown, movement, exhaust, temperature |
//! | 3 | Collisions: obstacles (AABB), power-ups (circle), impact events |
//! | 4 | Spawning: obstacles, power-ups, zones, impacts |
//! | 5 | Score +1, milestones |
//!
//! While the rover is crashed only step 1 runs and the death-animation
//! countdown ticks; at zero the run is over.  `update()` does no I/O and all
//! randomness comes from the session's seeded `StdRng`.

use crate::archetype::{archetype, ArchetypeId, RoverArchetype};
use crate::config::{Difficulty, DifficultyParams, GameConfig};
use crate::constants::EXHAUST_INTERVAL;
use crate::draw::{RenderSurface, Renderer};
use crate::error::GameResult;
use crate::impacts::{should_spawn_impact, AsteroidImpact, ImpactTick};
use crate::leaderboard::{self, validate_name, ScoreEntry, ScoreStore};
use crate::obstacles::{
    aabb_overlap, circles_touch, update_obstacles, update_powerups, Obstacle, PowerUp, PowerUpKind,
};
use crate::particles::{self, update_particles, Particle};
use crate::progression::{self, Celebration, Notice};
use crate::rover::{
    activate_shield, break_shield, move_rover, tick_shield, CrashCause, InputAction, KeyEvent,
    Rover, RoverState,
};
use crate::thermal;
use crate::zones::{maybe_spawn_zone, update_zones, HazardZone};
use bevy::color::Srgba;
use bevy::log::{debug, info};
use bevy::math::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct RoverGame {
    pub config: GameConfig,
    pub difficulty: Difficulty,
    pub params: DifficultyParams,
    pub archetype: ArchetypeId,

    pub rover: Rover,
    pub zones: Vec<HazardZone>,
    pub impacts: Vec<AsteroidImpact>,
    pub obstacles: Vec<Obstacle>,
    pub powerups: Vec<PowerUp>,
    pub particles: Vec<Particle>,
    pub celebration: Option<Celebration>,
    pub notice: Option<Notice>,

    /// Ticks survived while `Normal`.
    pub score: u64,
    pub frame_count: u64,
    pub is_paused: bool,
    pub is_game_over: bool,
    /// Cleared by [`RoverGame::stop`]; a stopped session ignores `update()`.
    pub running: bool,
    pub last_milestone_score: u64,
    pub last_asteroid_score: u64,
    pub score_submitted: bool,

    rng: StdRng,
}

impl RoverGame {
    pub fn new(config: GameConfig, difficulty: Difficulty, archetype_id: ArchetypeId, seed: u64) -> Self {
        let rover = Rover::from_archetype(archetype(archetype_id), config.canvas_height);
        let params = config.difficulty(difficulty);
        info!(
            "Run start: {} rover on {} (seed {seed})",
            archetype(archetype_id).name,
            difficulty
        );
        Self {
            config,
            difficulty,
            params,
            archetype: archetype_id,
            rover,
            zones: Vec::new(),
            impacts: Vec::new(),
            obstacles: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            celebration: None,
            notice: None,
            score: 0,
            frame_count: 0,
            is_paused: false,
            is_game_over: false,
            running: true,
            last_milestone_score: 0,
            last_asteroid_score: 0,
            score_submitted: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Start from raw labels; unknown values fall back to medium / Atlas with
    /// a logged warning.
    pub fn start(config: GameConfig, difficulty: &str, archetype_id: &str, seed: u64) -> Self {
        Self::new(
            config,
            Difficulty::parse_or_default(difficulty),
            ArchetypeId::lookup_or_default(archetype_id),
            seed,
        )
    }

    /// Fresh run with the same difficulty and archetype.
    pub fn restart(&mut self) {
        let seed = self.rng.gen();
        *self = Self::new(self.config.clone(), self.difficulty, self.archetype, seed);
    }

    /// Hard stop: freeze the run and drop any active shield.
    pub fn stop(&mut self) {
        self.running = false;
        self.is_paused = false;
        self.rover.has_shield = false;
        self.rover.shield_remaining = 0;
        self.rover.intent = Default::default();
    }

    pub fn toggle_pause(&mut self) {
        if !self.running || self.is_game_over {
            return;
        }
        self.is_paused = !self.is_paused;
        debug!("Paused: {}", self.is_paused);
    }

    pub fn handle_key(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Down(InputAction::TogglePause) => self.toggle_pause(),
            KeyEvent::Down(InputAction::ActivateShield) => {
                if self.running && !self.is_paused {
                    let duration = self.config.shield_duration;
                    activate_shield(&mut self.rover, duration, &mut self.particles);
                }
            }
            KeyEvent::Up(InputAction::TogglePause | InputAction::ActivateShield) => {}
            _ => {
                if self.rover.is_normal() {
                    self.rover.intent.apply(event);
                }
            }
        }
    }

    // ── Read-only views ──────────────────────────────────────────────────────

    #[inline]
    pub fn canvas(&self) -> Vec2 {
        Vec2::new(self.config.canvas_width, self.config.canvas_height)
    }

    pub fn archetype_info(&self) -> &'static RoverArchetype {
        archetype(self.archetype)
    }

    pub fn evolution_stage(&self) -> u8 {
        progression::evolution_stage(self.score)
    }

    /// Hull colour for the current temperature.
    pub fn rover_color(&self) -> Srgba {
        thermal::temperature_color(self.rover.temperature, self.archetype_info().color)
    }

    /// Draw the current frame.  Works while paused or over.
    pub fn render(&self, renderer: &mut Renderer, surface: &mut dyn RenderSurface) {
        renderer.render(self, surface);
    }

    // ── Tick ─────────────────────────────────────────────────────────────────

    pub fn update(&mut self) {
        if !self.running || self.is_paused || self.is_game_over {
            return;
        }
        self.frame_count += 1;

        update_particles(&mut self.particles);
        update_zones(&mut self.zones);
        self.update_impacts();
        update_obstacles(&mut self.obstacles);
        update_powerups(&mut self.powerups);
        self.tick_banners();

        match self.rover.state {
            RoverState::Normal => {
                self.update_rover();
                if self.rover.is_normal() {
                    self.resolve_obstacles();
                    self.collect_powerups();
                }
                self.spawn_entities();
                if self.rover.is_normal() {
                    self.score += 1;
                    self.check_milestones();
                }
            }
            RoverState::Crashed => {
                self.rover.state_timer = self.rover.state_timer.saturating_sub(1);
                if self.rover.state_timer == 0 {
                    self.is_game_over = true;
                    info!(
                        "Run over after {} points: {}",
                        self.score,
                        self.rover
                            .crash_cause
                            .map(CrashCause::caption)
                            .unwrap_or("unknown cause")
                    );
                }
            }
        }
    }

    fn tick_banners(&mut self) {
        if let Some(c) = &mut self.celebration {
            c.remaining = c.remaining.saturating_sub(1);
            if c.remaining == 0 {
                self.celebration = None;
            }
        }
        if let Some(n) = &mut self.notice {
            n.remaining = n.remaining.saturating_sub(1);
            if n.remaining == 0 {
                self.notice = None;
            }
        }
    }

    fn update_rover(&mut self) {
        tick_shield(&mut self.rover, &mut self.particles, &mut self.rng);
        let canvas = self.canvas();
        move_rover(&mut self.rover, canvas);

        if self.rover.velocity != Vec2::ZERO && self.frame_count % EXHAUST_INTERVAL == 0 {
            let rear = Vec2::new(self.rover.pos.x, self.rover.center().y + 6.0);
            let tint = self.rover_color();
            particles::spawn_exhaust(&mut self.particles, &mut self.rng, rear, tint);
        }

        let terminal = thermal::step_temperature(
            &mut self.rover,
            &self.zones,
            self.params.zone_intensity,
            &self.config,
        );
        if terminal {
            let frozen = self.rover.temperature <= crate::constants::TEMP_MIN;
            let cause = if frozen {
                CrashCause::Freeze
            } else {
                CrashCause::Meltdown
            };
            let center = self.rover.center();
            particles::spawn_failure_burst(&mut self.particles, &mut self.rng, center, frozen);
            self.crash(cause);
        }
    }

    /// Enter the crashed state with debris.  No-op when already crashed.
    fn crash(&mut self, cause: CrashCause) {
        let hull = self.rover_color();
        if self.rover.crash(cause, self.config.death_animation_ticks) {
            let center = self.rover.center();
            particles::spawn_crash_debris(&mut self.particles, &mut self.rng, center, hull);
            info!("Rover crashed: {}", cause.caption());
        }
    }

    /// A hit lands on the rover: a raised shield absorbs it and breaks,
    /// otherwise the rover crashes.  Returns `true` when the shield took it.
    fn absorb_hit(&mut self, cause: CrashCause, at: Vec2) -> bool {
        particles::spawn_collision_sparks(&mut self.particles, &mut self.rng, at);
        if self.rover.has_shield {
            break_shield(&mut self.rover, true, &mut self.particles, &mut self.rng);
            debug!("Shield absorbed a hit ({cause:?})");
            true
        } else {
            self.crash(cause);
            false
        }
    }

    fn resolve_obstacles(&mut self) {
        let mut i = 0;
        while i < self.obstacles.len() && self.rover.is_normal() {
            if aabb_overlap(self.rover.bounds(), self.obstacles[i].bounds()) {
                let at = self.obstacles[i].center();
                if self.absorb_hit(CrashCause::Obstacle, at) {
                    self.obstacles.remove(i);
                    continue;
                }
            }
            i += 1;
        }
    }

    fn collect_powerups(&mut self) {
        let center = self.rover.center();
        let reach = self.rover.half_width();
        let mut powerups = std::mem::take(&mut self.powerups);
        powerups.retain(|p| {
            if circles_touch(center, reach, p.pos, p.radius) {
                self.apply_powerup(p.kind, p.pos);
                false
            } else {
                true
            }
        });
        self.powerups = powerups;
    }

    fn apply_powerup(&mut self, kind: PowerUpKind, at: Vec2) {
        match kind.upgrade() {
            None => {
                self.rover.shields += 1;
                particles::spawn_pickup_sparkle(&mut self.particles, &mut self.rng, at, kind.color());
                self.notice = Some(Notice::new("+1 SHIELD"));
            }
            Some(axis) if self.rover.upgrades.increment(axis) => {
                particles::spawn_pickup_sparkle(&mut self.particles, &mut self.rng, at, kind.color());
                self.notice = Some(Notice::new(format!("{} +1", axis.label())));
            }
            Some(axis) => {
                let gold = Srgba::rgb(1.0, 0.84, 0.2);
                particles::spawn_pickup_sparkle(&mut self.particles, &mut self.rng, at, gold);
                self.notice = Some(Notice::new(format!("{} MAXED", axis.label())));
            }
        }
    }

    fn update_impacts(&mut self) {
        let mut impacts = std::mem::take(&mut self.impacts);
        impacts.retain_mut(|impact| {
            let event = impact.tick();
            match event {
                ImpactTick::Struck => {
                    let (pos, radius) = (impact.pos, impact.target_radius);
                    particles::spawn_crater(&mut self.particles, &mut self.rng, pos, radius);
                    particles::spawn_impact_burst(&mut self.particles, &mut self.rng, pos, radius);
                    if self.rover.is_normal() && impact.is_direct_hit(self.rover.center()) {
                        impact.spent = true;
                        self.absorb_hit(CrashCause::Asteroid, self.rover.center());
                    }
                }
                ImpactTick::Detonated => {
                    let radius = impact.explosion_radius();
                    particles::spawn_explosion_burst(&mut self.particles, &mut self.rng, impact.pos, radius);
                }
                ImpactTick::Continue | ImpactTick::Finished => {}
            }
            let center = self.rover.center();
            if self.rover.is_normal() && impact.explosion_hits(center, self.rover.half_width()) {
                impact.spent = true;
                self.absorb_hit(CrashCause::Asteroid, center);
            }
            event != ImpactTick::Finished
        });
        self.impacts = impacts;
    }

    fn spawn_entities(&mut self) {
        let canvas = self.canvas();

        let cadence = progression::obstacle_cadence(self.params.obstacle_cadence, self.score);
        if self.frame_count % cadence as u64 == 0 {
            let speed = progression::obstacle_speed(self.score);
            self.obstacles.push(Obstacle::random(&mut self.rng, canvas, speed));
        }

        let chance = progression::powerup_chance(self.params.powerup_rate);
        if self.rng.gen_bool(chance.clamp(0.0, 1.0) as f64) {
            let kind = progression::choose_powerup_kind(&mut self.rng, &self.rover.upgrades);
            self.powerups.push(PowerUp::entering(&mut self.rng, canvas, kind));
        }

        maybe_spawn_zone(&mut self.zones, &mut self.rng, canvas, self.config.zone_cap);

        let interval = progression::asteroid_interval(self.params.asteroid_interval, self.score);
        if should_spawn_impact(
            self.score,
            self.last_asteroid_score,
            interval,
            self.impacts.len(),
            self.config.asteroid_max_active,
        ) {
            self.impacts.push(AsteroidImpact::random(&mut self.rng, canvas));
            self.last_asteroid_score = self.score;
            debug!("Asteroid inbound at score {}", self.score);
        }
    }

    fn check_milestones(&mut self) {
        while let Some(threshold) = progression::next_milestone(self.score, self.last_milestone_score) {
            let rewards = progression::apply_milestone(&mut self.rover, threshold);
            self.last_milestone_score = threshold;
            let center = self.rover.center();
            particles::spawn_milestone_burst(&mut self.particles, &mut self.rng, center);
            info!("Milestone {threshold}: {}", rewards.join(", "));
            self.celebration = Some(Celebration::new(threshold, &rewards));
        }
    }

    // ── Results ──────────────────────────────────────────────────────────────

    /// Record this run on the leaderboard.
    ///
    /// An invalid name is returned as an error and nothing is stored.  Store
    /// failures are logged inside [`leaderboard::submit`]; the returned board
    /// is always usable.  A second submission for the same run only returns
    /// the current board.
    pub fn submit_score(
        &mut self,
        name: &str,
        store: &mut dyn ScoreStore,
        date: u64,
    ) -> GameResult<Vec<ScoreEntry>> {
        let name = validate_name(name)?;
        if self.score_submitted {
            return Ok(leaderboard::load_or_empty(store));
        }
        let entry = ScoreEntry {
            name,
            score: self.score,
            difficulty: self.difficulty,
            archetype: self.archetype.id().to_string(),
            date,
        };
        self.score_submitted = true;
        Ok(leaderboard::submit(store, entry, self.config.leaderboard_cap))
    }
}
