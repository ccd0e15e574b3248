use std::path::PathBuf;

use crate::project::{
  SparseAudioClip, SparseAudioEffect, SparseAudioSequencer, SparseMidiClip, SparseMidiInstrument,
  SparseMidiMpe, SparseMidiNote, SparseMidiSequencer, SparseMixerRouting, SparseMixerTrack,
  SparseProject,
};

pub const F64_EPSILON: f64 = 1e-9;
pub const F32_EPSILON: f32 = 1e-6;

/// Whether a field changed between two snapshots.
pub trait Differs {
  fn differs(&self, other: &Self) -> bool;
}

impl Differs for f64 {
  fn differs(&self, other: &f64) -> bool {
    (self - other).abs() > F64_EPSILON
  }
}

impl Differs for f32 {
  fn differs(&self, other: &f32) -> bool {
    (self - other).abs() > F32_EPSILON
  }
}

macro_rules! exact_differs {
  ($($ty:ty),*) => {
    $(
      impl Differs for $ty {
        fn differs(&self, other: &$ty) -> bool {
          self != other
        }
      }
    )*
  };
}

exact_differs!(bool, u16, u32, u64, String, PathBuf);

impl<T> Differs for Option<T>
where
  T: Differs,
{
  fn differs(&self, other: &Option<T>) -> bool {
    match (self, other) {
      (Some(a), Some(b)) => a.differs(b),
      (None, None) => false,
      _ => true,
    }
  }
}

pub fn diff_value<T>(a: &T, b: &T) -> Option<T>
where
  T: Differs + Clone,
{
  if a.differs(b) {
    Some(b.clone())
  } else {
    None
  }
}

pub fn set_if<T>(dst: &mut T, value: &Option<T>)
where
  T: Clone,
{
  if let Some(value) = value {
    *dst = value.clone();
  }
}

/// Patch payloads know when they would not change anything.
pub trait Sparse {
  fn is_empty(&self) -> bool;
}

fn is_empty_embedded<T>(value: &Option<T>) -> bool
where
  T: Sparse,
{
  value.as_ref().map_or(true, Sparse::is_empty)
}

impl Sparse for SparseAudioClip {
  fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.start_tick.is_none()
      && self.length_ticks.is_none()
      && self.file.is_none()
      && self.file_start_frame.is_none()
      && self.db.is_none()
      && self.is_loop.is_none()
  }
}

impl Sparse for SparseMidiMpe {
  fn is_empty(&self) -> bool {
    self.channel.is_none()
      && self.pressure.is_none()
      && self.slide.is_none()
      && self.timbre.is_none()
  }
}

impl Sparse for SparseMidiNote {
  fn is_empty(&self) -> bool {
    self.start_tick.is_none()
      && self.length_ticks.is_none()
      && self.pitch.is_none()
      && self.velocity.is_none()
      && is_empty_embedded(&self.mpe)
  }
}

impl Sparse for SparseMidiClip {
  fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.start_tick.is_none()
      && self.length_ticks.is_none()
      && self.notes.is_empty()
  }
}

impl Sparse for SparseAudioSequencer {
  fn is_empty(&self) -> bool {
    self.name.is_none() && self.output.is_none() && self.clips.is_empty()
  }
}

impl Sparse for SparseMidiInstrument {
  fn is_empty(&self) -> bool {
    self.name.is_none()
  }
}

impl Sparse for SparseMidiSequencer {
  fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.output.is_none()
      && is_empty_embedded(&self.instrument)
      && self.clips.is_empty()
  }
}

impl Sparse for SparseAudioEffect {
  fn is_empty(&self) -> bool {
    self.name.is_none()
  }
}

impl Sparse for SparseMixerRouting {
  fn is_empty(&self) -> bool {
    self.db.is_none() && self.output.is_none()
  }
}

impl Sparse for SparseMixerTrack {
  fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.db.is_none()
      && self.pan.is_none()
      && self.effects.is_empty()
      && self.routings.is_empty()
  }
}

impl Sparse for SparseProject {
  fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.ppq.is_none()
      && self.master_track_id.is_none()
      && self.audio_sequencers.is_empty()
      && self.midi_sequencers.is_empty()
      && self.mixer_tracks.is_empty()
  }
}

#[cfg(test)]
mod test {

  use super::{diff_value, set_if, Differs, Sparse};
  use crate::project::{SparseMidiMpe, SparseMidiNote, SparseMixerTrack, SparseProject};

  #[test]
  /// Doubles closer than 1e-9 are the same value
  pub fn f64_epsilon_boundary() {
    assert!(!0.0f64.differs(&1e-9));
    assert!(0.0f64.differs(&(1e-9 + 1e-12)));
    assert!(!(-6.0f64).differs(&-6.0));
  }

  #[test]
  /// Floats closer than 1e-6 are the same value
  pub fn f32_epsilon_boundary() {
    assert!(!0.0f32.differs(&1e-6));
    assert!(0.0f32.differs(&2e-6));
  }

  #[test]
  pub fn exact_types_differ_on_any_change() {
    assert!(1u64.differs(&2));
    assert!(!7u16.differs(&7));
    assert!(true.differs(&false));
    assert!(String::from("a").differs(&String::from("b")));
  }

  #[test]
  pub fn option_differs() {
    assert!(!None::<u32>.differs(&None));
    assert!(Some(1u32).differs(&None));
    assert!(None.differs(&Some(1u32)));
    assert!(!Some(0.5f64).differs(&Some(0.5 + 1e-12)));
  }

  #[test]
  pub fn diff_value_returns_the_new_value() {
    assert_eq!(diff_value(&1u32, &2), Some(2));
    assert_eq!(diff_value(&1u32, &1), None);
    assert_eq!(diff_value(&0.25f64, &0.25), None);
  }

  #[test]
  pub fn set_if_only_writes_present_values() {
    let mut value = 3u64;
    set_if(&mut value, &None);
    assert_eq!(value, 3);
    set_if(&mut value, &Some(9));
    assert_eq!(value, 9);
  }

  #[test]
  /// An embedded patch with nothing inside does not make its parent non-empty
  pub fn empty_embedded_patch_is_empty() {
    let note = SparseMidiNote {
      mpe: Some(SparseMidiMpe::default()),
      ..SparseMidiNote::default()
    };
    assert!(note.is_empty());

    let note = SparseMidiNote {
      mpe: Some(SparseMidiMpe {
        slide: Some(0.3),
        ..SparseMidiMpe::default()
      }),
      ..SparseMidiNote::default()
    };
    assert!(!note.is_empty());
  }

  #[test]
  pub fn project_with_child_entry_is_not_empty() {
    assert!(SparseProject::default().is_empty());

    let mut project = SparseProject::default();
    project.mixer_tracks.insert(1, SparseMixerTrack::default());
    assert!(!project.is_empty());
  }

  #[test]
  pub fn clearing_master_track_is_a_change() {
    let project = SparseProject {
      master_track_id: Some(None),
      ..SparseProject::default()
    };
    assert!(!project.is_empty());
  }
}
