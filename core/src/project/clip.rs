use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_derive::{Deserialize, Serialize};

use crate::project::IdMap;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AudioClip {
  pub name: String,
  pub start_tick: u64,
  pub length_ticks: u64,
  pub file: PathBuf,
  pub file_start_frame: u64,
  pub db: f64,
  pub is_loop: bool,
}

impl AudioClip {
  pub fn new<T, P>(name: T, file: P) -> AudioClip
  where
    T: Into<String>,
    P: Into<PathBuf>,
  {
    AudioClip {
      name: name.into(),
      file: file.into(),
      ..AudioClip::default()
    }
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SparseAudioClip {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub start_tick: Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub length_ticks: Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub file: Option<PathBuf>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub file_start_frame: Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub db: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub is_loop: Option<bool>,
}

/// MIDI polyphonic expression attached to a note.
/// Pressure is the Z axis, slide Y and timbre X.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct MidiMpe {
  pub channel: u32,
  pub pressure: f32,
  pub slide: f32,
  pub timbre: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SparseMidiMpe {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub channel: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pressure: Option<f32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub slide: Option<f32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub timbre: Option<f32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct MidiNote {
  pub start_tick: u64,
  pub length_ticks: u64,
  pub pitch: u16,
  pub velocity: f32,
  #[serde(default)]
  pub mpe: MidiMpe,
}

impl MidiNote {
  pub fn new(start_tick: u64, length_ticks: u64, pitch: u16, velocity: f32) -> MidiNote {
    MidiNote {
      start_tick,
      length_ticks,
      pitch,
      velocity,
      mpe: MidiMpe::default(),
    }
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SparseMidiNote {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub start_tick: Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub length_ticks: Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pitch: Option<u16>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub velocity: Option<f32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub mpe: Option<SparseMidiMpe>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct MidiClip {
  pub name: String,
  pub start_tick: u64,
  pub length_ticks: u64,
  pub notes: IdMap<MidiNote>,
}

impl MidiClip {
  pub fn new<T>(name: T, start_tick: u64, length_ticks: u64) -> MidiClip
  where
    T: Into<String>,
  {
    MidiClip {
      name: name.into(),
      start_tick,
      length_ticks,
      notes: IdMap::new(),
    }
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SparseMidiClip {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub start_tick: Option<u64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub length_ticks: Option<u64>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub notes: IdMap<SparseMidiNote>,
}
