//! Snapshot files: gzip-compressed JSON of a [`WorldSnapshot`].

use crate::error::{IoError, Result};
use crate::serialization::{from_hex, from_json, to_hex, to_json};
use ecosim_core::snapshot::WorldSnapshot;
use ecosim_data::{Brain, ACTION_LEN, OBSERVATION_LEN};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

fn compress(payload: &[u8], mut out: impl Write) -> Result<()> {
    let mut encoder = GzEncoder::new(&mut out, Compression::default());
    encoder
        .write_all(payload)
        .map_err(|e| IoError::compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| IoError::compression(e.to_string()))?;
    Ok(())
}

fn decompress(input: impl Read) -> Result<String> {
    let mut json = String::new();
    GzDecoder::new(input)
        .read_to_string(&mut json)
        .map_err(|e| IoError::compression(e.to_string()))?;
    Ok(json)
}

fn parse(json: &str) -> Result<WorldSnapshot> {
    let mut snapshot: WorldSnapshot = from_json(json)?;
    snapshot.validate().map_err(IoError::snapshot)?;
    snapshot.link_policies().map_err(IoError::snapshot)?;
    Ok(snapshot)
}

/// In-memory equivalent of [`save_snapshot`].
pub fn snapshot_to_bytes(snapshot: &WorldSnapshot) -> Result<Vec<u8>> {
    let json = to_json(snapshot)?;
    let mut bytes = Vec::new();
    compress(json.as_bytes(), &mut bytes)?;
    Ok(bytes)
}

pub fn snapshot_from_bytes(bytes: &[u8]) -> Result<WorldSnapshot> {
    parse(&decompress(bytes)?)
}

/// Writes to a sibling temp file first so a crash never leaves a torn save.
pub fn save_snapshot<P: AsRef<Path>>(snapshot: &WorldSnapshot, path: P) -> Result<()> {
    let path = path.as_ref();
    let json = to_json(snapshot)?;
    let tmp = path.with_extension("tmp");
    {
        let file = File::create(&tmp).map_err(|e| {
            IoError::FileSystem(e).with_context(format!("creating {:?}", tmp))
        })?;
        let mut writer = BufWriter::new(file);
        compress(json.as_bytes(), &mut writer)?;
        writer.flush()?;
    }
    fs::rename(&tmp, path)
        .map_err(|e| IoError::FileSystem(e).with_context(format!("replacing {:?}", path)))?;
    tracing::info!(path = %path.display(), tick = snapshot.tick, creatures = snapshot.creatures.len(), "Snapshot saved");
    Ok(())
}

pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<WorldSnapshot> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::not_found(path.display().to_string()));
    }
    let file = File::open(path)
        .map_err(|e| IoError::FileSystem(e).with_context(format!("opening {:?}", path)))?;
    let snapshot = parse(&decompress(BufReader::new(file))?)
        .map_err(|e| e.with_context(format!("loading {:?}", path)))?;
    tracing::info!(path = %path.display(), tick = snapshot.tick, "Snapshot loaded");
    Ok(snapshot)
}

/// Hex-encoded policy weights, for seeding another run.
pub fn export_policy(brain: &Brain) -> Result<String> {
    to_hex(brain)
}

/// Parses an exported policy and checks it fits the observation and action sizes.
pub fn import_policy(hex_str: &str) -> Result<Brain> {
    let brain: Brain = from_hex(hex_str)?;
    let shape_ok = brain.inputs == OBSERVATION_LEN
        && brain.outputs == ACTION_LEN
        && brain.weights_ih.len() == brain.inputs * brain.hidden
        && brain.bias_h.len() == brain.hidden
        && brain.weights_ho.len() == brain.hidden * brain.outputs
        && brain.bias_o.len() == brain.outputs;
    if !shape_ok {
        return Err(IoError::validation(format!(
            "policy shape {}x{}x{} does not fit {} observations and {} actions",
            brain.inputs, brain.hidden, brain.outputs, OBSERVATION_LEN, ACTION_LEN
        )));
    }
    Ok(brain)
}
