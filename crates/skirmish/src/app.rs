//! Fixed-timestep application loop
//!
//! Drives a battle between two ship factions until one side is wiped out,
//! exercising the spatial index, collision resolution, targeting and view
//! culling together every tick.

use sim_core::prelude::*;

use crate::config::ScenarioConfig;
use crate::world::DemoWorld;

/// Skirmish demo application
pub struct SkirmishApp {
    config: ScenarioConfig,
    world: DemoWorld,
    service: SpatialQueryService,
    resolver: CollisionResolver,
    acquisition: TargetAcquisition,
    camera: Camera2D,
    culler: ViewCuller,
    timer: Timer,
}

impl SkirmishApp {
    /// Build the demo from a validated scenario configuration
    pub fn new(config: ScenarioConfig) -> Self {
        let world = DemoWorld::generate(config.sim.world_bounds, &config.spawn);
        let service = SpatialQueryService::from_config(&config.sim);
        let camera = Camera2D::from_config(&config.sim.camera);
        let culler = ViewCuller::from_config(&config.sim.camera);
        Self {
            config,
            world,
            service,
            resolver: CollisionResolver::new(),
            acquisition: TargetAcquisition::new(),
            camera,
            culler,
            timer: Timer::new(),
        }
    }

    /// Run until one faction is eliminated or the tick budget runs out
    pub fn run(&mut self) {
        let dt = 1.0 / self.config.run.tick_rate;
        log::info!(
            "Starting skirmish: up to {} ticks at {} Hz",
            self.config.run.ticks,
            self.config.run.tick_rate
        );

        for tick in 0..self.config.run.ticks {
            self.step(dt);

            if tick % self.config.run.log_every == 0 {
                self.report(tick);
            }

            let red = self.world.ship_count(FactionId::new(0));
            let blue = self.world.ship_count(FactionId::new(1));
            if red == 0 || blue == 0 {
                log::info!(
                    "Skirmish decided after {} ticks: {} red and {} blue ships remain",
                    tick + 1,
                    red,
                    blue
                );
                break;
            }
        }

        let stats = self.service.stats();
        log::info!(
            "Finished: {} entities indexed, {} ticks in {:.2} s ({:.1} ticks/sec average)",
            stats.entity_count,
            self.timer.tick_count(),
            self.timer.total_time().as_secs_f64(),
            self.timer.average_tps()
        );
    }

    /// Advance the simulation by one fixed timestep
    fn step(&mut self, dt: f32) {
        self.world.integrate(dt);
        self.service.rebuild(&self.world.snapshots());

        self.resolver.resolve_from_service(&self.service);
        self.world.apply_contacts(self.resolver.contacts());
        self.world.apply_triggers(self.resolver.triggers());

        self.steer_ships();
        self.world.remove_dead();

        if let Some(center) = self.world.center_of_action() {
            self.camera.set_position(center);
        }
        self.timer.update();
    }

    /// Point every ship at its best target's predicted position
    ///
    /// Targeting runs against the snapshots indexed at the top of the tick,
    /// so a ship destroyed this tick can still be chased for one frame. The
    /// next rebuild drops it.
    fn steer_ships(&mut self) {
        let targeting = &self.config.targeting;
        for (ship, faction) in self.world.armed_ships() {
            let profile = TargetingProfile::new(targeting.max_range)
                .with_excluded_faction(faction)
                .with_excluded_tags(EntityTags::STRUCTURE | EntityTags::PICKUP)
                .with_line_of_sight(targeting.require_line_of_sight)
                .with_projectile_speed(targeting.projectile_speed);

            let state = self.acquisition.acquire(&self.service, ship, &profile);
            if state.is_acquired() {
                self.world.steer(ship, state.lead_position);
            }
        }
    }

    fn report(&self, tick: u32) {
        let stats = self.service.stats();
        let visible = self
            .culler
            .visible_entities(&self.service, &self.camera)
            .len();
        log::info!(
            "tick {:4}: {} entities in {} nodes, rebuild {:.2} ms, {} in view, ships {}/{}",
            tick,
            stats.entity_count,
            stats.node_count,
            stats.last_rebuild.as_secs_f64() * 1000.0,
            visible,
            self.world.ship_count(FactionId::new(0)),
            self.world.ship_count(FactionId::new(1))
        );
    }
}
