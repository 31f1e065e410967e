//! Strata - headless demo
//!
//! Builds a small scene (a floor, a falling crate carrying an attached
//! marker, and a remotely driven sentry that keeps facing the crate), then
//! runs the configured number of fixed ticks and logs what happens.

use strata::config::AppConfig;
use strata::systems::SimulationSystem;
use strata_core::{
    CollisionFilter, ContactPhase, Entity, EntityContact, Euler, EulerOrder, RigidBody, SceneError,
    Vec3, World,
};

struct Demo {
    crate_body: Entity,
    marker: Entity,
    sentry: Entity,
}

fn build_scene(world: &mut World) -> Result<Demo, SceneError> {
    let floor = world.spawn()?;
    world
        .transforms_mut()
        .set_position(floor, Vec3::new(0.0, -0.5, 0.0))?;

    let crate_body = world.spawn()?;
    {
        let t = world.transforms_mut();
        t.set_position(crate_body, Vec3::new(0.0, 4.0, 0.0))?;
        t.set_rotation(crate_body, Euler::new(0.0, 0.6, 0.0, EulerOrder::Yxz))?;
    }

    // rides on top of the crate through the hierarchy only
    let marker = world.spawn_child(crate_body)?;
    world
        .transforms_mut()
        .set_position(marker, Vec3::new(0.0, 0.75, 0.0))?;

    let sentry = world.spawn()?;
    world
        .transforms_mut()
        .set_position(sentry, Vec3::new(4.0, 1.0, 4.0))?;
    world.authority_mut().set_networked(sentry, true)?;

    if world.physics().is_some() {
        world.add_rigid_body(
            floor,
            RigidBody::new_static_aabb(Vec3::ZERO, Vec3::new(10.0, 0.5, 10.0)),
        )?;
        world.add_rigid_body(
            crate_body,
            RigidBody::new_aabb(Vec3::ZERO, Vec3::new(0.5, 0.5, 0.5)).with_mass(2.0),
        )?;
        world.add_rigid_body(
            sentry,
            RigidBody::new_sphere(Vec3::ZERO, 0.5)
                .with_gravity(false)
                .with_filter(CollisionFilter::remote()),
        )?;
    }

    Ok(Demo {
        crate_body,
        marker,
        sentry,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    // Initialize logging, RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    log::info!("Starting Strata");

    let mut world = World::new(config.world.capacity).with_dirty_policy(config.world.dirty_policy);
    if let Some(physics) = config.physics.to_physics_config() {
        world = world.with_physics(physics);
    }

    let demo = build_scene(&mut world)?;
    log::info!("Scene built with {} entities", world.entity_count());

    let mut simulation = SimulationSystem::new(&config.simulation);
    let mut on_contact = |contact: EntityContact| {
        let describe = |e: Option<Entity>| e.map_or_else(|| "?".to_string(), |e| e.to_string());
        match contact.phase {
            ContactPhase::Started => log::info!(
                "contact started: {} <-> {}",
                describe(contact.first),
                describe(contact.second)
            ),
            ContactPhase::Stopped => log::debug!(
                "contact stopped: {} <-> {}",
                describe(contact.first),
                describe(contact.second)
            ),
        }
    };

    let timestep = simulation.timestep();
    for tick in 0..config.simulation.ticks {
        // the sentry is remote-driven: it orbits and keeps facing the crate
        let angle = tick as f32 * timestep;
        let crate_position = world.transforms().world_translation(demo.crate_body)?;
        {
            let t = world.transforms_mut();
            t.set_position(demo.sentry, Vec3::new(4.0 * angle.cos(), 1.0, 4.0 * angle.sin()))?;
            t.look_at(demo.sentry, crate_position)?;
        }

        simulation.advance(&mut world, timestep, &mut on_contact)?;
    }

    let t = world.transforms();
    log::info!(
        "after {} ticks: crate at {:?}, marker at {:?}, sentry at {:?}",
        simulation.total_ticks(),
        t.world_translation(demo.crate_body)?,
        t.world_translation(demo.marker)?,
        t.world_translation(demo.sentry)?
    );

    Ok(())
}
