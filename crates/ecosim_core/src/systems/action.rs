use crate::config::AppConfig;
use crate::snapshot::TickContext;
use crate::terrain::TerrainLogic;
use ecosim_data::{Creature, Point, ACTION_LEN};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Decoded policy output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Action {
    /// Heading change in radians, within ±π/2.
    pub turn: f64,
    /// Fraction of the archetype's max speed, within [0, 1].
    pub speed: f64,
    pub sleep_intent: bool,
}

impl Action {
    /// Taken when the policy fails: no turn, no movement.
    pub const IDLE: Action = Action {
        turn: 0.0,
        speed: 0.0,
        sleep_intent: false,
    };

    #[must_use]
    pub fn from_outputs(outputs: &[f32; ACTION_LEN], config: &AppConfig) -> Self {
        Self {
            turn: turn_from_output(outputs[0]),
            speed: speed_from_output(outputs[1]),
            sleep_intent: outputs[2] > config.behavior.sleep_intent_threshold,
        }
    }

    /// Fixed steering used while heading home to sleep.
    #[must_use]
    pub fn toward(from: Point, heading: f64, to: Point, config: &AppConfig) -> Self {
        let bearing = (to.y - from.y).atan2(to.x - from.x);
        let diff = wrap_angle(bearing - heading);
        let turn_output = (diff / FRAC_PI_2).clamp(-1.0, 1.0) as f32;
        Self {
            turn: turn_from_output(turn_output),
            speed: speed_from_output(config.behavior.nest_approach_output),
            sleep_intent: false,
        }
    }
}

fn turn_from_output(o: f32) -> f64 {
    f64::from(o.clamp(-1.0, 1.0)) * FRAC_PI_2
}

fn speed_from_output(o: f32) -> f64 {
    (f64::from(o.clamp(-1.0, 1.0)) + 1.0) / 2.0
}

/// Maps an angle into [-π, π).
#[must_use]
pub fn wrap_angle(a: f64) -> f64 {
    (a + PI).rem_euclid(TAU) - PI
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoveOutcome {
    pub bounced: bool,
    pub speed: f64,
    pub energy_spent: f64,
}

/// Turns, then moves unless the step would leave the world, in which case the
/// heading is reversed and the creature stays put. Movement energy is charged
/// either way, at the cost of the cell the creature ends up on.
pub fn apply_move(
    creature: &mut Creature,
    action: &Action,
    max_speed: f64,
    ctx: &TickContext,
) -> MoveOutcome {
    let (width, height) = ctx.world_size();
    creature.heading += action.turn;
    let speed = max_speed * action.speed.clamp(0.0, 1.0);
    let next = creature
        .pos
        .offset(creature.heading.cos() * speed, creature.heading.sin() * speed);

    let inside = (0.0..width).contains(&next.x) && (0.0..height).contains(&next.y);
    if inside {
        creature.pos = next;
    } else {
        creature.heading += PI;
    }

    let cell_cost = ctx
        .terrain
        .kind_at(&creature.pos, ctx.config.world.cell_size)
        .energy_cost();
    let energy_spent = speed * ctx.config.metabolism.movement_cost * cell_cost;
    creature.energy -= energy_spent;

    MoveOutcome {
        bounced: !inside,
        speed,
        energy_spent,
    }
}
