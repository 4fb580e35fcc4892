//! Per-creature tick: metabolism, the sleep/flee state machine, perception,
//! policy evaluation and movement.
//!
//! Everything here writes only to the creature being stepped; other creatures
//! are read through the tick's [`CreatureView`](crate::snapshot::CreatureView)
//! snapshot, so steps can run in any order or in parallel.

use crate::archetypes::{Archetype, ArchetypeLogic};
use crate::brain::DecisionPolicy;
use crate::config::AppConfig;
use crate::error::PolicyError;
use crate::snapshot::TickContext;
use crate::systems::action::{self, Action};
use crate::systems::perception::{self, Perception};
use ecosim_data::{Creature, CreatureState, Target, ACTION_LEN};
use rand::Rng;
use std::f64::consts::TAU;
use std::panic::{self, AssertUnwindSafe};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Set when the policy failed and the idle action was taken instead.
    pub policy_error: Option<PolicyError>,
    pub bounced: bool,
}

/// Ageing, base decay, tiredness and urge growth.
pub fn update_common_state(c: &mut Creature, arch: &Archetype, config: &AppConfig) {
    let m = &config.metabolism;
    c.age += 1;
    c.energy -= m.base_decay;
    if c.state != CreatureState::Sleeping {
        c.tiredness = (c.tiredness + m.tiredness_rate).min(m.max_tiredness);
    }
    if c.energy > arch.base.reproduction_urge_threshold && c.age > m.maturity_age {
        c.reproduction_urge = (c.reproduction_urge + m.urge_increment).min(1.0);
    }
}

/// Arrival at the nest, sleep recovery and waking.
pub fn manage_sleep<R: Rng + ?Sized>(
    c: &mut Creature,
    arch: &Archetype,
    config: &AppConfig,
    rng: &mut R,
) {
    let m = &config.metabolism;
    if c.state == CreatureState::GoingToSleep
        && c.pos.distance(&c.nest) < config.behavior.nest_arrival_cells * config.world.cell_size
    {
        c.state = CreatureState::Sleeping;
        c.heading = rng.gen_range(0.0..TAU);
    }

    if c.state == CreatureState::Sleeping {
        c.tiredness = (c.tiredness - m.sleep_tiredness_recovery).max(0.0);
        c.energy = (c.energy + m.sleep_energy_gain).min(arch.base.max_energy);
        if c.tiredness <= 0.0 && c.energy > m.wake_energy_fraction * arch.base.max_energy {
            c.state = CreatureState::Exploring;
        }
    }
}

/// Fleeing is a hard timeout; a new threat only matters while exploring.
pub fn update_flee_state(c: &mut Creature, perception: &Perception, config: &AppConfig) {
    match c.state {
        CreatureState::Fleeing => {
            c.flee_timer = c.flee_timer.saturating_sub(1);
            if c.flee_timer == 0 {
                c.state = CreatureState::Exploring;
            }
        }
        CreatureState::Exploring if perception.threatened() => {
            c.state = CreatureState::Fleeing;
            c.flee_timer = config.behavior.flee_duration;
        }
        _ => {}
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Runs the policy, turning a panic into a [`PolicyError`].
pub fn evaluate_isolated(
    policy: &dyn DecisionPolicy,
    observation: &[f32],
) -> Result<[f32; ACTION_LEN], PolicyError> {
    match panic::catch_unwind(AssertUnwindSafe(|| policy.evaluate(observation))) {
        Ok(result) => result,
        Err(payload) => Err(PolicyError::Panicked(panic_message(payload.as_ref()))),
    }
}

/// Runs one creature's whole tick behind an unwind boundary.
///
/// If `step` panics, the creature is put back exactly as it was before the
/// tick and the failure is reported like a policy failure.
pub fn step_isolated<F>(c: &mut Creature, step: F) -> StepReport
where
    F: FnOnce(&mut Creature) -> StepReport,
{
    let before = c.clone();
    match panic::catch_unwind(AssertUnwindSafe(|| step(&mut *c))) {
        Ok(report) => report,
        Err(payload) => {
            *c = before;
            let message = panic_message(payload.as_ref());
            tracing::warn!(
                creature = %c.id,
                error = %message,
                "Creature update panicked, state rolled back for this tick"
            );
            StepReport {
                policy_error: Some(PolicyError::Panicked(message)),
                bounced: false,
            }
        }
    }
}

pub fn step_creature<R: Rng + ?Sized>(
    c: &mut Creature,
    ctx: &TickContext,
    policy: &dyn DecisionPolicy,
    rng: &mut R,
) -> StepReport {
    let arch = c.archetype.archetype();
    let config = ctx.config;
    let mut report = StepReport::default();

    update_common_state(c, arch, config);
    manage_sleep(c, arch, config, rng);

    match c.state {
        CreatureState::Sleeping => {
            c.target = None;
        }
        CreatureState::GoingToSleep => {
            c.target = Some(Target::Point(c.nest));
            let steer = Action::toward(c.pos, c.heading, c.nest, config);
            report.bounced = action::apply_move(c, &steer, arch.base.max_speed, ctx).bounced;
        }
        CreatureState::Exploring | CreatureState::Fleeing => {
            let sensed = perception::perceive(c, ctx);
            perception::remember(&mut c.memory, &sensed);
            c.target = sensed
                .food
                .map(|s| s.target)
                .or(sensed.threat.map(|s| s.target));
            update_flee_state(c, &sensed, config);

            let observation = perception::observation(c, &sensed, ctx);
            let chosen = match evaluate_isolated(policy, &observation) {
                Ok(outputs) => Action::from_outputs(&outputs, config),
                Err(e) => {
                    tracing::warn!(
                        creature = %c.id,
                        policy = %c.policy.id,
                        tick = ctx.tick,
                        error = %e,
                        "Policy evaluation failed, creature idles this tick"
                    );
                    report.policy_error = Some(e);
                    Action::IDLE
                }
            };
            if c.state == CreatureState::Exploring && chosen.sleep_intent {
                c.state = CreatureState::GoingToSleep;
            }
            report.bounced = action::apply_move(c, &chosen, arch.base.max_speed, ctx).bounced;
        }
    }

    c.energy = c.energy.clamp(0.0, arch.base.max_energy);
    report
}
