//! # pulse_app — demo host
//!
//! Boots an [`EngineCore`] with a movement plugin: a `"position"`
//! component, a drift system that advances every mover each tick, and a
//! bus subscription that reports movers crossing a boundary. Runs for a
//! couple of seconds, pauses, and prints a summary.

use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pulse_component::{Component, Entity};
use pulse_core::{EngineConfig, EngineContext, EngineCore, Plugin};
use pulse_runtime::{Message, System};

/// A 2D position, stored under the `"position"` component name.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f64,
    y: f64,
}

impl Component for Position {}

/// Payload for `"mover.crossed"` messages.
#[derive(Debug, Clone, Copy)]
struct Crossed {
    entity: Entity,
    x: f64,
}

/// Where a mover counts as having crossed over.
const BOUNDARY_X: f64 = 10.0;

/// Drift speed in world units per second.
const DRIFT_SPEED: f64 = 20.0;

/// Spawns a handful of movers drifting right and publishes a
/// `"mover.crossed"` message the first time each one passes the boundary.
struct MovementPlugin {
    movers: u64,
}

impl Plugin for MovementPlugin {
    fn name(&self) -> &str {
        "movement"
    }

    fn label(&self) -> Option<&str> {
        Some("Movement demo")
    }

    fn version(&self) -> Option<&str> {
        Some("0.1.0")
    }

    fn setup(&mut self, context: &mut EngineContext) -> Result<()> {
        context.register_component::<Position>(
            "position",
            serde_json::json!({ "x": "f64", "y": "f64" }),
        )?;

        for i in 0..self.movers {
            let entity = context.entities.create();
            context.components.set_component_for_entity(
                "position",
                entity,
                Position {
                    x: i as f64,
                    y: 0.0,
                },
            )?;
        }

        context.bus.subscribe("mover.crossed", |message| {
            if let Some(crossed) = message.payload::<Crossed>() {
                info!(entity = %crossed.entity, x = crossed.x, "mover crossed the boundary");
            }
            Ok(())
        });

        context.register_system(
            System::new("drift")
                .with_label("Drift movers")
                .with_description("Advances every position and reports boundary crossings.")
                .on_update(|ctx| {
                    let mut crossings = Vec::new();
                    let store = ctx.components.store_mut::<Position>("position")?;
                    for (entity, position) in store.iter_mut() {
                        let before = position.x;
                        position.x += DRIFT_SPEED * ctx.dt;
                        if before < BOUNDARY_X && position.x >= BOUNDARY_X {
                            crossings.push(Crossed {
                                entity,
                                x: position.x,
                            });
                        }
                    }
                    for crossed in crossings {
                        ctx.bus
                            .publish(&Message::with_payload("mover.crossed", crossed))?;
                    }
                    Ok(())
                }),
        );

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("pulse_app=info".parse()?))
        .init();

    let config = EngineConfig::default().with_tick_interval(Duration::from_millis(50));
    let mut engine = EngineCore::new(config);
    engine.register_plugin(MovementPlugin { movers: 3 });

    engine.start().await?;
    tokio::time::sleep(Duration::from_secs(2)).await;
    engine.pause()?;

    let context = engine.context();
    let context = context.lock().await;
    info!(
        ticks = context.scheduler.tick_id(),
        entities = context.entities.len(),
        "demo finished"
    );

    Ok(())
}
