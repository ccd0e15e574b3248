pub mod clip;
pub mod mixer;
pub mod sequencer;

use std::collections::BTreeMap;

use serde::Deserializer;
use serde_derive::{Deserialize, Serialize};

pub use self::clip::{AudioClip, MidiClip, MidiMpe, MidiNote};
pub use self::clip::{SparseAudioClip, SparseMidiClip, SparseMidiMpe, SparseMidiNote};
pub use self::mixer::{AudioEffect, MixerRouting, MixerTrack};
pub use self::mixer::{SparseAudioEffect, SparseMixerRouting, SparseMixerTrack};
pub use self::sequencer::{AudioSequencer, MidiInstrument, MidiSequencer};
pub use self::sequencer::{SparseAudioSequencer, SparseMidiInstrument, SparseMidiSequencer};

/// Stable identifier assigned by whoever creates an entity.
/// The diff and apply engines never mint or reassign them.
pub type Id = u32;

pub type TrackId = Id;

pub type IdMap<T> = BTreeMap<Id, T>;

pub const DEFAULT_PPQ: u32 = 960;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Project {
  pub name: String,
  pub ppq: u32,
  pub audio_sequencers: IdMap<AudioSequencer>,
  pub midi_sequencers: IdMap<MidiSequencer>,
  pub mixer_tracks: IdMap<MixerTrack>,
  pub master_track_id: Option<TrackId>,
}

impl Default for Project {
  fn default() -> Project {
    Project {
      name: String::new(),
      ppq: DEFAULT_PPQ,
      audio_sequencers: IdMap::new(),
      midi_sequencers: IdMap::new(),
      mixer_tracks: IdMap::new(),
      master_track_id: None,
    }
  }
}

impl Project {
  pub fn new<T>(name: T, ppq: u32) -> Project
  where
    T: Into<String>,
  {
    Project {
      name: name.into(),
      ppq,
      ..Project::default()
    }
  }
}

/// Patch payload for a whole project: only the changed fields and entries are present.
///
/// `master_track_id` is doubly optional so that clearing the master track
/// (`Some(None)`) stays distinguishable from leaving it alone (`None`).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SparseProject {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ppq: Option<u32>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub audio_sequencers: IdMap<SparseAudioSequencer>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub midi_sequencers: IdMap<SparseMidiSequencer>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub mixer_tracks: IdMap<SparseMixerTrack>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none",
    deserialize_with = "deserialize_present"
  )]
  pub master_track_id: Option<Option<TrackId>>,
}

// A field that is present in the input is a change, even when its value is null.
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
  T: serde::Deserialize<'de>,
  D: Deserializer<'de>,
{
  T::deserialize(deserializer).map(Some)
}
