use std::collections::BTreeMap;

use serde_derive::{Deserialize, Serialize};

use crate::project::clip::{AudioClip, MidiClip, SparseAudioClip, SparseMidiClip};
use crate::project::{IdMap, TrackId};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AudioSequencer {
  pub name: String,
  pub clips: IdMap<AudioClip>,
  pub output: TrackId,
}

impl AudioSequencer {
  pub fn new<T>(name: T, output: TrackId) -> AudioSequencer
  where
    T: Into<String>,
  {
    AudioSequencer {
      name: name.into(),
      clips: IdMap::new(),
      output,
    }
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SparseAudioSequencer {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub clips: IdMap<SparseAudioClip>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub output: Option<TrackId>,
}

// Only the name is modelled for now.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct MidiInstrument {
  pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SparseMidiInstrument {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct MidiSequencer {
  pub name: String,
  pub instrument: MidiInstrument,
  pub clips: IdMap<MidiClip>,
  pub output: TrackId,
}

impl MidiSequencer {
  pub fn new<T, I>(name: T, instrument: I, output: TrackId) -> MidiSequencer
  where
    T: Into<String>,
    I: Into<String>,
  {
    MidiSequencer {
      name: name.into(),
      instrument: MidiInstrument {
        name: instrument.into(),
      },
      clips: IdMap::new(),
      output,
    }
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SparseMidiSequencer {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub instrument: Option<SparseMidiInstrument>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub clips: IdMap<SparseMidiClip>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub output: Option<TrackId>,
}
