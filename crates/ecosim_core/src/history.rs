use ecosim_data::{ArchetypeId, Point, Season};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Starvation,
    OldAge,
    Predation { killer: Uuid },
    /// Removed through a mutation entry point.
    Removed,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event")]
pub enum LiveEvent {
    Birth {
        id: Uuid,
        archetype: ArchetypeId,
        tribe: u8,
        parents: Option<(Uuid, Uuid)>,
        tick: u64,
        timestamp: String,
    },
    Death {
        id: Uuid,
        archetype: ArchetypeId,
        age: u64,
        cause: DeathCause,
        tick: u64,
        timestamp: String,
    },
    FoodSpawned {
        id: Uuid,
        pos: Point,
        tick: u64,
        timestamp: String,
    },
    SeasonChanged {
        season: Season,
        tick: u64,
        timestamp: String,
    },
    GenerationEvolved {
        generation: u64,
        policies: usize,
        best_fitness: f64,
        tick: u64,
        timestamp: String,
    },
    Extinction {
        archetype: Option<ArchetypeId>,
        tick: u64,
        timestamp: String,
    },
}

impl LiveEvent {
    #[must_use]
    pub fn now() -> String {
        chrono::Utc::now().to_rfc3339()
    }

    #[must_use]
    pub fn tick(&self) -> u64 {
        match self {
            LiveEvent::Birth { tick, .. }
            | LiveEvent::Death { tick, .. }
            | LiveEvent::FoodSpawned { tick, .. }
            | LiveEvent::SeasonChanged { tick, .. }
            | LiveEvent::GenerationEvolved { tick, .. }
            | LiveEvent::Extinction { tick, .. } => *tick,
        }
    }
}

/// Live creature counts per archetype, sampled once per day.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulationSample {
    pub tick: u64,
    /// Indexed by [`ArchetypeId::index`].
    pub counts: [usize; 4],
}

impl PopulationSample {
    #[must_use]
    pub fn count(&self, archetype: ArchetypeId) -> usize {
        self.counts[archetype.index()]
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Appends events to `<dir>/live.jsonl`, one JSON object per line.
pub struct HistoryLogger {
    live_file: Option<BufWriter<File>>,
}

impl HistoryLogger {
    pub fn new_at(dir: &str) -> anyhow::Result<Self> {
        if !std::path::Path::new(dir).exists() {
            std::fs::create_dir_all(dir)?;
        }
        let file_path = format!("{}/live.jsonl", dir);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;
        Ok(Self {
            live_file: Some(BufWriter::new(file)),
        })
    }

    /// Logger that drops every event.
    pub fn new_dummy() -> Self {
        Self {
            live_file: None,
        }
    }

    pub fn log_event(&mut self, event: &LiveEvent) -> anyhow::Result<()> {
        if let Some(ref mut file) = self.live_file {
            let json = serde_json::to_string(event)?;
            writeln!(file, "{}", json)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> anyhow::Result<()> {
        if let Some(ref mut file) = self.live_file {
            file.flush()?;
        }
        Ok(())
    }
}
