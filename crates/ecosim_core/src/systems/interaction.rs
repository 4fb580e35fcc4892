//! Sequential feeding, hunting, reproduction and death over post-movement
//! positions.
//!
//! Creatures are visited in list order. Each one gets at most one meal, one
//! kill and one mating per tick, always the first match in list order. Deaths
//! are removed after the pass and offspring appended last, so neither takes
//! part in the tick that produced it.

use crate::archetypes::ArchetypeLogic;
use crate::config::AppConfig;
use crate::history::{DeathCause, LiveEvent};
use crate::lifecycle;
use ecosim_data::{Creature, Food, PolicyId};
use rand::Rng;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct Resolution {
    pub events: Vec<LiveEvent>,
    /// Policy and final fitness of every creature removed this tick.
    pub retired: Vec<(PolicyId, f64)>,
    pub meals: usize,
    pub kills: usize,
    pub births: usize,
}

/// Out of energy or past its lifespan.
#[must_use]
pub fn is_dead(c: &Creature) -> bool {
    c.energy <= 0.0 || c.age > c.archetype.archetype().base.lifespan
}

/// Urge is capped at 1.0, so reaching the cap is what makes a creature ready.
#[must_use]
pub fn ready_to_mate(c: &Creature) -> bool {
    c.reproduction_urge >= 1.0
}

fn death_cause(c: &Creature, killer: Option<Uuid>) -> Option<DeathCause> {
    if let Some(killer) = killer {
        Some(DeathCause::Predation { killer })
    } else if c.energy <= 0.0 {
        Some(DeathCause::Starvation)
    } else if c.age > c.archetype.archetype().base.lifespan {
        Some(DeathCause::OldAge)
    } else {
        None
    }
}

pub fn resolve<R: Rng + ?Sized>(
    creatures: &mut Vec<Creature>,
    food: &mut Vec<Food>,
    config: &AppConfig,
    rng: &mut R,
    tick: u64,
) -> Resolution {
    let reach = config.behavior.interaction_radius_cells * config.world.cell_size;
    let rewards = &config.evolution;
    let n = creatures.len();
    let mut killed_by: Vec<Option<Uuid>> = vec![None; n];
    let mut births: Vec<(Creature, (Uuid, Uuid))> = Vec::new();
    let mut out = Resolution::default();

    for i in 0..n {
        if killed_by[i].is_some() || is_dead(&creatures[i]) {
            continue;
        }
        let arch = creatures[i].archetype.archetype();
        let max_energy = arch.base.max_energy;

        if arch.diet.plants {
            let me = creatures[i].pos;
            if let Some(k) = food.iter().position(|f| f.pos.distance(&me) < reach) {
                let meal = food.remove(k);
                let c = &mut creatures[i];
                c.energy = (c.energy + meal.energy).min(max_energy);
                c.fitness += rewards.food_reward;
                out.meals += 1;
            }
        }

        if arch.diet.meat {
            let me = creatures[i].pos;
            let prey = (0..n).find(|&j| {
                j != i
                    && killed_by[j].is_none()
                    && !is_dead(&creatures[j])
                    && arch.hunts(creatures[j].archetype)
                    && creatures[j].pos.distance(&me) < reach
            });
            if let Some(j) = prey {
                killed_by[j] = Some(creatures[i].id);
                let c = &mut creatures[i];
                c.energy = (c.energy + arch.energy_per_kill()).min(max_energy);
                c.fitness += rewards.kill_reward;
                out.kills += 1;
            }
        }

        if ready_to_mate(&creatures[i]) {
            let me = &creatures[i];
            let partner = (0..n).find(|&j| {
                let other = &creatures[j];
                j != i
                    && killed_by[j].is_none()
                    && !is_dead(other)
                    && other.archetype == me.archetype
                    && other.tribe == me.tribe
                    && ready_to_mate(other)
                    && other.pos.distance(&me.pos) < reach
            });
            if let Some(j) = partner {
                let child = lifecycle::offspring(&creatures[i], config, rng);
                let cost = config.metabolism.reproduction_cost * max_energy;
                for k in [i, j] {
                    let parent = &mut creatures[k];
                    parent.energy = (parent.energy - cost).max(0.0);
                    parent.reproduction_urge = 0.0;
                    parent.fitness += rewards.reproduction_reward;
                }
                births.push((child, (creatures[i].id, creatures[j].id)));
            }
        }
    }

    let mut survivors = Vec::with_capacity(n + births.len());
    for (c, killer) in creatures.drain(..).zip(killed_by) {
        let Some(cause) = death_cause(&c, killer) else {
            survivors.push(c);
            continue;
        };
        tracing::debug!(creature = %c.id, archetype = c.archetype.key(), age = c.age, ?cause, "Creature died");
        out.retired.push((c.policy.id, c.fitness));
        out.events.push(LiveEvent::Death {
            id: c.id,
            archetype: c.archetype,
            age: c.age,
            cause,
            tick,
            timestamp: LiveEvent::now(),
        });
    }

    for (child, parents) in births {
        tracing::debug!(creature = %child.id, archetype = child.archetype.key(), tribe = child.tribe, "Creature born");
        out.events.push(LiveEvent::Birth {
            id: child.id,
            archetype: child.archetype,
            tribe: child.tribe,
            parents: Some(parents),
            tick,
            timestamp: LiveEvent::now(),
        });
        survivors.push(child);
        out.births += 1;
    }

    *creatures = survivors;
    out
}
