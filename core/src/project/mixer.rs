use std::collections::BTreeMap;

use serde_derive::{Deserialize, Serialize};

use crate::project::{IdMap, TrackId};

// Placeholder until effects carry parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AudioEffect {
  pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SparseAudioEffect {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
}

/// A send from one mixer track into another.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct MixerRouting {
  pub db: f64,
  pub output: TrackId,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SparseMixerRouting {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub db: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub output: Option<TrackId>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct MixerTrack {
  pub name: String,
  pub db: f64,
  pub pan: f64,
  pub effects: IdMap<AudioEffect>,
  pub routings: IdMap<MixerRouting>,
}

impl MixerTrack {
  pub fn new<T>(name: T) -> MixerTrack
  where
    T: Into<String>,
  {
    MixerTrack {
      name: name.into(),
      ..MixerTrack::default()
    }
  }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SparseMixerTrack {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub db: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub pan: Option<f64>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub effects: IdMap<SparseAudioEffect>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub routings: IdMap<SparseMixerRouting>,
}

#[cfg(test)]
mod test {

  use super::MixerTrack;

  #[test]
  pub fn mixer_track_new() {
    let track = MixerTrack::new("Master");
    assert_eq!(track.name, "Master");
    assert_eq!(track.db, 0.0);
    assert_eq!(track.pan, 0.0);
    assert!(track.effects.is_empty());
    assert!(track.routings.is_empty());
  }
}
