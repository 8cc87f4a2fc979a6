use glam::Vec2;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::camera::Camera;
use crate::config::GameConfig;
use crate::entities::{
    BloodDrop, ENEMY_RADIUS, Enemy, FireOutcome, Gun, Pickup, PickupKind, Player, Projectile,
    Slash, SpawnSchedule, Sword, Terrain, WeaponKind, create_blood_splatter, move_with_collisions,
    pick_spawn_point,
};
use crate::geometry::{Aabb, angle_between, distance_to_segment, lerp_toward};

/// Where the weapons hang when idle, relative to the player
const SWORD_REST_OFFSET: Vec2 = Vec2::new(-4.0, -1.0);
const GUN_REST_OFFSET: Vec2 = Vec2::new(2.0, -1.0);
const WEAPON_LERP: f32 = 0.1;
/// Distance from the gun to where its projectiles appear
const MUZZLE_DISTANCE: f32 = 4.0;

pub const SHAKE_SECS: f32 = 0.2;
pub const DAMAGE_FLASH_SECS: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackKind {
    Melee,
    Ranged,
    Slash,
}

/// Things that happened during a frame, for audio and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    SwordSwung,
    ShotFired,
    GunEmpty,
    ReloadStarted,
    ReloadFinished,
    SlashStarted,
    ProjectileBlocked,
    EnemyHit { kind: AttackKind },
    EnemyKilled,
    PlayerHurt { health: u8 },
    PickupCollected(PickupKind),
    EncounterEnded(Outcome),
}

/// The main scene: everything that happens between pressing start and the
/// end screen.
pub struct Game {
    config: GameConfig,
    rng: StdRng,
    world: Aabb,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    pub blood: Vec<BloodDrop>,
    pub terrain: Vec<Terrain>,
    pub camera: Camera,
    pub sword: Sword,
    pub gun: Gun,
    pub slash: Slash,
    /// Lagging sprite positions of the idle weapons
    pub sword_position: Vec2,
    pub gun_position: Vec2,
    aim_target: Option<Vec2>,
    move_intent: Vec2,
    spawn_schedule: SpawnSchedule,
    pickup_timer: f32,
    next_enemy_id: u32,
    pub elapsed: f32,
    pub kills: u32,
    outcome: Option<Outcome>,
    pub shake_timer: f32,
    pub damage_flash: f32,
    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let world = Aabb::new(
            Vec2::ZERO,
            Vec2::new(config.world.width, config.world.height),
        );
        let start = world.center();
        let mut camera = Camera::new(world.size());
        camera.follow(start, &world);

        let initial = config.spawn.initial.clone();
        let mut game = Self {
            rng: StdRng::seed_from_u64(seed),
            world,
            player: Player::new(start, config.player.max_health),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            blood: Vec::new(),
            terrain: config.terrain.iter().map(Terrain::from).collect(),
            camera,
            sword: Sword::new(&config.weapons),
            gun: Gun::new(&config.weapons),
            slash: Slash::new(&config.weapons),
            sword_position: start + SWORD_REST_OFFSET,
            gun_position: start + GUN_REST_OFFSET,
            aim_target: None,
            move_intent: Vec2::ZERO,
            spawn_schedule: SpawnSchedule::new(&config.spawn),
            pickup_timer: config.pickups.interval_secs,
            next_enemy_id: 0,
            elapsed: 0.0,
            kills: 0,
            outcome: None,
            shake_timer: 0.0,
            damage_flash: 0.0,
            events: Vec::new(),
            config,
        };

        for [x, y] in initial {
            game.spawn_enemy(Vec2::new(x, y));
        }

        info!(
            "encounter started: seed {seed}, {} enemies, {}s to survive",
            game.enemies.len(),
            game.config.encounter_secs
        );
        game
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn world(&self) -> &Aabb {
        &self.world
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn wave(&self) -> u32 {
        self.spawn_schedule.wave(self.elapsed)
    }

    pub fn time_remaining(&self) -> f32 {
        (self.config.encounter_secs - self.elapsed).max(0.0)
    }

    pub fn aim_target(&self) -> Option<Vec2> {
        self.aim_target
    }

    pub fn alive_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    /// Takes the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Resizes the camera to the visible world extent
    pub fn set_viewport(&mut self, size: Vec2) {
        self.camera.set_size(size);
        self.camera.follow(self.player.position, &self.world);
    }

    pub fn set_move_intent(&mut self, direction: Vec2) {
        self.move_intent = direction;
    }

    pub fn aim_at(&mut self, target: Vec2) {
        self.aim_target = Some(target);
    }

    /// Angle toward the aim point, or along the facing direction without one
    pub fn aim_angle(&self) -> f32 {
        match self.aim_target {
            Some(target) if target.distance(self.player.position) > f32::EPSILON => {
                angle_between(self.player.position, target)
            }
            _ => self.player.facing.y.atan2(self.player.facing.x),
        }
    }

    pub fn spawn_enemy(&mut self, position: Vec2) -> u32 {
        let id = self.next_enemy_id;
        self.next_enemy_id += 1;
        self.enemies
            .push(Enemy::new(id, position, &self.config.enemy));
        id
    }

    pub fn melee_attack(&mut self) {
        if self.is_over() {
            return;
        }
        if self.sword.start_swing(self.aim_angle()) {
            self.events.push(GameEvent::SwordSwung);
        }
    }

    pub fn ranged_attack(&mut self) {
        if self.is_over() {
            return;
        }
        match self.gun.try_fire() {
            FireOutcome::Fired => {
                let angle = self.aim_angle();
                let weapons = &self.config.weapons;
                let origin = self.gun_position + Vec2::from_angle(angle) * MUZZLE_DISTANCE;
                self.projectiles.push(Projectile::new(
                    origin,
                    angle,
                    weapons.projectile_speed,
                    weapons.projectile_lifetime_secs,
                    weapons.projectile_damage,
                ));
                self.events.push(GameEvent::ShotFired);
            }
            FireOutcome::Empty => self.events.push(GameEvent::GunEmpty),
            FireOutcome::CoolingDown | FireOutcome::Reloading => {}
        }
    }

    /// Attacks with whichever weapon is in hand
    pub fn primary_attack(&mut self) {
        match self.player.active_weapon {
            WeaponKind::Sword => self.melee_attack(),
            WeaponKind::Gun => self.ranged_attack(),
        }
    }

    pub fn special_attack(&mut self) {
        if self.is_over() {
            return;
        }
        if self.slash.try_start(self.aim_angle()) {
            self.events.push(GameEvent::SlashStarted);
        }
    }

    pub fn switch_weapon(&mut self) {
        if !self.is_over() {
            self.player.switch_weapon();
        }
    }

    pub fn reload(&mut self) {
        if !self.is_over() && self.gun.start_reload() {
            self.events.push(GameEvent::ReloadStarted);
        }
    }

    /// Advances the scene by `dt` seconds. Once the encounter has ended only
    /// the visual effects keep fading.
    pub fn update(&mut self, dt: f32) {
        self.update_effects(dt);
        if self.is_over() {
            return;
        }

        self.elapsed += dt;
        self.player.update_timers(dt);
        self.sword.update(dt);
        self.slash.update(dt);
        if self.gun.update(dt) {
            self.events.push(GameEvent::ReloadFinished);
        }

        self.move_player(dt);
        self.move_weapons(dt);
        self.move_enemies(dt);
        self.move_projectiles(dt);
        self.spawn_enemies(dt);
        self.update_pickups(dt);

        self.resolve_attacks();
        self.resolve_contacts();
        self.collect_pickups();
        self.enemies.retain(|e| !e.should_despawn());

        self.check_outcome();
    }

    fn update_effects(&mut self, dt: f32) {
        self.shake_timer = (self.shake_timer - dt).max(0.0);
        self.damage_flash = (self.damage_flash - dt).max(0.0);

        for drop in &mut self.blood {
            drop.update(dt);
        }
        self.blood.retain(|d| !d.is_dead());
    }

    fn move_player(&mut self, dt: f32) {
        self.player
            .steer(self.move_intent, self.config.player.move_speed);
        let delta = self.player.velocity * dt;
        let size = self.player.size();
        self.player.position =
            move_with_collisions(self.player.position, size, delta, &self.terrain);

        // Keep the player on screen, and on the map when the screen is larger
        self.camera.follow(self.player.position, &self.world);
        let on_screen = self.camera.bounds().clamp_center(self.player.position, size);
        self.player.position = self.world.clamp_center(on_screen, size);
    }

    fn move_weapons(&mut self, dt: f32) {
        let anchor = self.player.position;
        self.sword_position =
            lerp_toward(self.sword_position, anchor + SWORD_REST_OFFSET, WEAPON_LERP, dt);
        self.gun_position =
            lerp_toward(self.gun_position, anchor + GUN_REST_OFFSET, WEAPON_LERP, dt);
    }

    fn move_enemies(&mut self, dt: f32) {
        let target = self.player.position;
        for enemy in &mut self.enemies {
            enemy.update_timers(dt);
            enemy.steer(target, dt, &mut self.rng);

            let size = enemy.bounds().size();
            let moved =
                move_with_collisions(enemy.position, size, enemy.velocity * dt, &self.terrain);
            enemy.position = self.world.clamp_center(moved, size);
        }
    }

    fn move_projectiles(&mut self, dt: f32) {
        for projectile in &mut self.projectiles {
            projectile.update(dt);
        }

        let world = self.world;
        let terrain = &self.terrain;
        let mut blocked = 0;
        self.projectiles.retain(|p| {
            if p.is_expired() || p.is_out_of_bounds(&world) {
                return false;
            }
            if terrain
                .iter()
                .any(|t| t.bounds.intersects_circle(p.position, p.radius()))
            {
                blocked += 1;
                return false;
            }
            true
        });

        for _ in 0..blocked {
            self.events.push(GameEvent::ProjectileBlocked);
        }
    }

    fn spawn_enemies(&mut self, dt: f32) {
        let count = self
            .spawn_schedule
            .tick(dt, self.elapsed, self.alive_enemies());
        if count == 0 {
            return;
        }

        let mut spawned = 0;
        for _ in 0..count {
            if let Some(point) = self.find_spawn_point() {
                self.spawn_enemy(point);
                spawned += 1;
            }
        }
        debug!(
            "wave {}: spawned {spawned} of {count} enemies, {} alive",
            self.wave(),
            self.alive_enemies()
        );
    }

    /// Enemies and timed pickups share one placement rule
    fn find_spawn_point(&mut self) -> Option<Vec2> {
        let spawn = &self.config.spawn;
        pick_spawn_point(
            &mut self.rng,
            &self.world,
            spawn.edge_margin,
            self.player.position,
            spawn.min_player_distance,
            ENEMY_RADIUS * 2.0,
            &self.terrain,
        )
    }

    fn update_pickups(&mut self, dt: f32) {
        for pickup in &mut self.pickups {
            pickup.update(dt);
        }
        self.pickups.retain(|p| !p.is_expired());

        self.pickup_timer -= dt;
        if self.pickup_timer > 0.0 {
            return;
        }
        self.pickup_timer += self.config.pickups.interval_secs;

        let pickups = &self.config.pickups;
        if !self.rng.random_bool(pickups.spawn_chance) {
            return;
        }
        let kind = if self.rng.random_bool(pickups.health_share) {
            PickupKind::Health
        } else {
            PickupKind::Ammo
        };
        let lifetime = pickups.lifetime_secs;
        if let Some(point) = self.find_spawn_point() {
            debug!("{kind:?} pickup at ({:.0}, {:.0})", point.x, point.y);
            self.pickups.push(Pickup::new(point, kind, lifetime));
        }
    }

    fn resolve_attacks(&mut self) {
        let origin = self.player.position;
        let blade = self.sword.blade(origin);
        let slash_active = self.slash.is_active();

        for index in 0..self.enemies.len() {
            let enemy = &self.enemies[index];
            if !enemy.is_alive() {
                continue;
            }
            let (id, position, radius) = (enemy.id, enemy.position, enemy.radius());

            if let Some((start, end)) = blade
                && distance_to_segment(position, start, end) <= radius
            {
                self.strike(index, AttackKind::Melee, self.sword.damage);
            }

            if slash_active
                && !self.slash.has_struck(id)
                && self.slash.covers(origin, position, radius)
                && self.strike(index, AttackKind::Slash, self.slash.damage)
            {
                self.slash.mark_struck(id);
            }
        }

        // A projectile is spent on the first live enemy it touches, even if
        // that enemy is still flashing from an earlier hit
        let mut projectiles_to_remove = Vec::new();
        let mut hits = Vec::new();
        for (p_idx, projectile) in self.projectiles.iter().enumerate() {
            let target = self.enemies.iter().position(|e| {
                e.is_alive()
                    && e.position.distance(projectile.position) <= e.radius() + projectile.radius()
            });
            if let Some(e_idx) = target {
                projectiles_to_remove.push(p_idx);
                hits.push((e_idx, projectile.damage));
            }
        }

        for (e_idx, damage) in hits {
            self.strike(e_idx, AttackKind::Ranged, damage);
        }

        // Remove in reverse order to avoid index issues
        projectiles_to_remove.sort_unstable();
        projectiles_to_remove.reverse();
        projectiles_to_remove.dedup();
        for idx in projectiles_to_remove {
            if idx < self.projectiles.len() {
                self.projectiles.remove(idx);
            }
        }
    }

    /// Damages one enemy; returns false if the hit was ignored
    fn strike(&mut self, index: usize, kind: AttackKind, damage: u8) -> bool {
        let enemy = &mut self.enemies[index];
        if !enemy.take_hit(damage) {
            return false;
        }
        let position = enemy.position;
        let killed = !enemy.is_alive();

        self.blood
            .extend(create_blood_splatter(position, &mut self.rng));
        self.events.push(GameEvent::EnemyHit { kind });

        if killed {
            self.kills += 1;
            self.events.push(GameEvent::EnemyKilled);

            let pickups = &self.config.pickups;
            if self.rng.random_bool(pickups.drop_chance) {
                self.pickups.push(Pickup::new(
                    position,
                    PickupKind::Health,
                    pickups.lifetime_secs,
                ));
            }
        }
        true
    }

    fn resolve_contacts(&mut self) {
        let bounds = self.player.bounds();
        let attacker = self
            .enemies
            .iter()
            .find(|e| e.is_alive() && bounds.intersects_circle(e.position, e.radius()))
            .map(|e| e.position);

        if let Some(from) = attacker
            && self.player.take_hit(from, &self.config.player)
        {
            self.shake_timer = SHAKE_SECS;
            self.damage_flash = DAMAGE_FLASH_SECS;
            self.events.push(GameEvent::PlayerHurt {
                health: self.player.health,
            });
            info!("player hit, {} health left", self.player.health);
        }
    }

    fn collect_pickups(&mut self) {
        let bounds = self.player.bounds();
        let mut collected = Vec::new();
        self.pickups.retain(|p| {
            if bounds.intersects_circle(p.position, p.radius()) {
                collected.push(p.kind);
                false
            } else {
                true
            }
        });

        for kind in collected {
            match kind {
                PickupKind::Health => {
                    self.player.heal(self.config.pickups.heal_amount);
                }
                PickupKind::Ammo => self.gun.refill(),
            }
            self.events.push(GameEvent::PickupCollected(kind));
        }
    }

    fn check_outcome(&mut self) {
        let outcome = if !self.player.is_alive() {
            Outcome::Defeat
        } else if self.elapsed >= self.config.encounter_secs {
            Outcome::Victory
        } else {
            return;
        };

        self.outcome = Some(outcome);
        self.player.velocity = Vec2::ZERO;
        for enemy in &mut self.enemies {
            enemy.halt();
        }
        self.events.push(GameEvent::EncounterEnded(outcome));
        info!(
            "encounter ended: {outcome:?} after {:.1}s, {} kills, wave {}",
            self.elapsed,
            self.kills,
            self.wave()
        );
    }
}
