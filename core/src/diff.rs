//! Structural diff between two dense snapshots.
//!
//! Patches only describe additions and modifications. An entity that exists in
//! the base but not in the other snapshot leaves no trace in the patch; use
//! [`removals`] to find out about those.

use std::fmt;

use crate::compare::{diff_value, Sparse};
use crate::project::{
  AudioClip, AudioEffect, AudioSequencer, Id, IdMap, MidiClip, MidiInstrument, MidiMpe, MidiNote,
  MidiSequencer, MixerRouting, MixerTrack, Project, SparseAudioClip, SparseAudioEffect,
  SparseAudioSequencer, SparseMidiClip, SparseMidiInstrument, SparseMidiMpe, SparseMidiNote,
  SparseMidiSequencer, SparseMixerRouting, SparseMixerTrack, SparseProject,
};

pub trait Diff {
  type Sparse: Sparse;

  /// Fields of `other` that differ from `self`, recursing into keyed children.
  fn diff(&self, other: &Self) -> Self::Sparse;

  /// Every field marked as changed. This is how a new entity travels in a patch.
  fn full_patch(&self) -> Self::Sparse;
}

/// Adds and modifications for a keyed collection, pruning children that did not change.
pub fn diff_map<V>(base: &IdMap<V>, other: &IdMap<V>) -> IdMap<V::Sparse>
where
  V: Diff,
{
  other
    .iter()
    .filter_map(|(id, child)| {
      let patch = match base.get(id) {
        Some(prev) => prev.diff(child),
        None => child.full_patch(),
      };
      if patch.is_empty() {
        None
      } else {
        Some((*id, patch))
      }
    })
    .collect()
}

fn diff_embedded<V>(base: &V, other: &V) -> Option<V::Sparse>
where
  V: Diff,
{
  Some(base.diff(other)).filter(|patch| !patch.is_empty())
}

fn full_patch_map<V>(values: &IdMap<V>) -> IdMap<V::Sparse>
where
  V: Diff,
{
  values
    .iter()
    .map(|(id, value)| (*id, value.full_patch()))
    .collect()
}

impl Diff for AudioClip {
  type Sparse = SparseAudioClip;

  fn diff(&self, other: &AudioClip) -> SparseAudioClip {
    SparseAudioClip {
      name: diff_value(&self.name, &other.name),
      start_tick: diff_value(&self.start_tick, &other.start_tick),
      length_ticks: diff_value(&self.length_ticks, &other.length_ticks),
      file: diff_value(&self.file, &other.file),
      file_start_frame: diff_value(&self.file_start_frame, &other.file_start_frame),
      db: diff_value(&self.db, &other.db),
      is_loop: diff_value(&self.is_loop, &other.is_loop),
    }
  }

  fn full_patch(&self) -> SparseAudioClip {
    SparseAudioClip {
      name: Some(self.name.clone()),
      start_tick: Some(self.start_tick),
      length_ticks: Some(self.length_ticks),
      file: Some(self.file.clone()),
      file_start_frame: Some(self.file_start_frame),
      db: Some(self.db),
      is_loop: Some(self.is_loop),
    }
  }
}

impl Diff for MidiMpe {
  type Sparse = SparseMidiMpe;

  fn diff(&self, other: &MidiMpe) -> SparseMidiMpe {
    SparseMidiMpe {
      channel: diff_value(&self.channel, &other.channel),
      pressure: diff_value(&self.pressure, &other.pressure),
      slide: diff_value(&self.slide, &other.slide),
      timbre: diff_value(&self.timbre, &other.timbre),
    }
  }

  fn full_patch(&self) -> SparseMidiMpe {
    SparseMidiMpe {
      channel: Some(self.channel),
      pressure: Some(self.pressure),
      slide: Some(self.slide),
      timbre: Some(self.timbre),
    }
  }
}

impl Diff for MidiNote {
  type Sparse = SparseMidiNote;

  fn diff(&self, other: &MidiNote) -> SparseMidiNote {
    SparseMidiNote {
      start_tick: diff_value(&self.start_tick, &other.start_tick),
      length_ticks: diff_value(&self.length_ticks, &other.length_ticks),
      pitch: diff_value(&self.pitch, &other.pitch),
      velocity: diff_value(&self.velocity, &other.velocity),
      mpe: diff_embedded(&self.mpe, &other.mpe),
    }
  }

  fn full_patch(&self) -> SparseMidiNote {
    SparseMidiNote {
      start_tick: Some(self.start_tick),
      length_ticks: Some(self.length_ticks),
      pitch: Some(self.pitch),
      velocity: Some(self.velocity),
      mpe: Some(self.mpe.full_patch()),
    }
  }
}

impl Diff for MidiClip {
  type Sparse = SparseMidiClip;

  fn diff(&self, other: &MidiClip) -> SparseMidiClip {
    SparseMidiClip {
      name: diff_value(&self.name, &other.name),
      start_tick: diff_value(&self.start_tick, &other.start_tick),
      length_ticks: diff_value(&self.length_ticks, &other.length_ticks),
      notes: diff_map(&self.notes, &other.notes),
    }
  }

  fn full_patch(&self) -> SparseMidiClip {
    SparseMidiClip {
      name: Some(self.name.clone()),
      start_tick: Some(self.start_tick),
      length_ticks: Some(self.length_ticks),
      notes: full_patch_map(&self.notes),
    }
  }
}

impl Diff for AudioSequencer {
  type Sparse = SparseAudioSequencer;

  fn diff(&self, other: &AudioSequencer) -> SparseAudioSequencer {
    SparseAudioSequencer {
      name: diff_value(&self.name, &other.name),
      clips: diff_map(&self.clips, &other.clips),
      output: diff_value(&self.output, &other.output),
    }
  }

  fn full_patch(&self) -> SparseAudioSequencer {
    SparseAudioSequencer {
      name: Some(self.name.clone()),
      clips: full_patch_map(&self.clips),
      output: Some(self.output),
    }
  }
}

impl Diff for MidiInstrument {
  type Sparse = SparseMidiInstrument;

  fn diff(&self, other: &MidiInstrument) -> SparseMidiInstrument {
    SparseMidiInstrument {
      name: diff_value(&self.name, &other.name),
    }
  }

  fn full_patch(&self) -> SparseMidiInstrument {
    SparseMidiInstrument {
      name: Some(self.name.clone()),
    }
  }
}

impl Diff for MidiSequencer {
  type Sparse = SparseMidiSequencer;

  fn diff(&self, other: &MidiSequencer) -> SparseMidiSequencer {
    SparseMidiSequencer {
      name: diff_value(&self.name, &other.name),
      instrument: diff_embedded(&self.instrument, &other.instrument),
      clips: diff_map(&self.clips, &other.clips),
      output: diff_value(&self.output, &other.output),
    }
  }

  fn full_patch(&self) -> SparseMidiSequencer {
    SparseMidiSequencer {
      name: Some(self.name.clone()),
      instrument: Some(self.instrument.full_patch()),
      clips: full_patch_map(&self.clips),
      output: Some(self.output),
    }
  }
}

impl Diff for AudioEffect {
  type Sparse = SparseAudioEffect;

  fn diff(&self, other: &AudioEffect) -> SparseAudioEffect {
    SparseAudioEffect {
      name: diff_value(&self.name, &other.name),
    }
  }

  fn full_patch(&self) -> SparseAudioEffect {
    SparseAudioEffect {
      name: Some(self.name.clone()),
    }
  }
}

impl Diff for MixerRouting {
  type Sparse = SparseMixerRouting;

  fn diff(&self, other: &MixerRouting) -> SparseMixerRouting {
    SparseMixerRouting {
      db: diff_value(&self.db, &other.db),
      output: diff_value(&self.output, &other.output),
    }
  }

  fn full_patch(&self) -> SparseMixerRouting {
    SparseMixerRouting {
      db: Some(self.db),
      output: Some(self.output),
    }
  }
}

impl Diff for MixerTrack {
  type Sparse = SparseMixerTrack;

  fn diff(&self, other: &MixerTrack) -> SparseMixerTrack {
    SparseMixerTrack {
      name: diff_value(&self.name, &other.name),
      db: diff_value(&self.db, &other.db),
      pan: diff_value(&self.pan, &other.pan),
      effects: diff_map(&self.effects, &other.effects),
      routings: diff_map(&self.routings, &other.routings),
    }
  }

  fn full_patch(&self) -> SparseMixerTrack {
    SparseMixerTrack {
      name: Some(self.name.clone()),
      db: Some(self.db),
      pan: Some(self.pan),
      effects: full_patch_map(&self.effects),
      routings: full_patch_map(&self.routings),
    }
  }
}

impl Diff for Project {
  type Sparse = SparseProject;

  fn diff(&self, other: &Project) -> SparseProject {
    SparseProject {
      name: diff_value(&self.name, &other.name),
      ppq: diff_value(&self.ppq, &other.ppq),
      audio_sequencers: diff_map(&self.audio_sequencers, &other.audio_sequencers),
      midi_sequencers: diff_map(&self.midi_sequencers, &other.midi_sequencers),
      mixer_tracks: diff_map(&self.mixer_tracks, &other.mixer_tracks),
      master_track_id: diff_value(&self.master_track_id, &other.master_track_id),
    }
  }

  fn full_patch(&self) -> SparseProject {
    SparseProject {
      name: Some(self.name.clone()),
      ppq: Some(self.ppq),
      audio_sequencers: full_patch_map(&self.audio_sequencers),
      midi_sequencers: full_patch_map(&self.midi_sequencers),
      mixer_tracks: full_patch_map(&self.mixer_tracks),
      master_track_id: Some(self.master_track_id),
    }
  }
}

/// Patch that turns `base` into `other`, ignoring removed entities.
pub fn diff(base: &Project, other: &Project) -> SparseProject {
  base.diff(other)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSegment {
  pub field: &'static str,
  pub id: Id,
}

/// Location of a keyed entity inside a project, e.g. `midi_sequencers[2].clips[4].notes[9]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntityPath(Vec<PathSegment>);

impl EntityPath {
  pub fn root() -> EntityPath {
    EntityPath::default()
  }

  pub fn child(&self, field: &'static str, id: Id) -> EntityPath {
    let mut segments = self.0.clone();
    segments.push(PathSegment { field, id });
    EntityPath(segments)
  }

  pub fn segments(&self) -> &[PathSegment] {
    self.0.as_slice()
  }
}

impl fmt::Display for EntityPath {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    for (index, segment) in self.0.iter().enumerate() {
      if index > 0 {
        write!(f, ".")?;
      }
      write!(f, "{}[{}]", segment.field, segment.id)?;
    }
    Ok(())
  }
}

/// Keyed entities that a patch cannot express because they disappeared.
pub trait Removals {
  fn collect_removals(&self, _other: &Self, _path: &EntityPath, _out: &mut Vec<EntityPath>) {}
}

fn removals_in_map<V>(
  base: &IdMap<V>,
  other: &IdMap<V>,
  field: &'static str,
  path: &EntityPath,
  out: &mut Vec<EntityPath>,
) where
  V: Removals,
{
  for (id, child) in base.iter() {
    let child_path = path.child(field, *id);
    match other.get(id) {
      Some(next) => child.collect_removals(next, &child_path, out),
      None => out.push(child_path),
    }
  }
}

impl Removals for AudioClip {}
impl Removals for MidiNote {}
impl Removals for AudioEffect {}
impl Removals for MixerRouting {}

impl Removals for MidiClip {
  fn collect_removals(&self, other: &MidiClip, path: &EntityPath, out: &mut Vec<EntityPath>) {
    removals_in_map(&self.notes, &other.notes, "notes", path, out);
  }
}

impl Removals for AudioSequencer {
  fn collect_removals(&self, other: &AudioSequencer, path: &EntityPath, out: &mut Vec<EntityPath>) {
    removals_in_map(&self.clips, &other.clips, "clips", path, out);
  }
}

impl Removals for MidiSequencer {
  fn collect_removals(&self, other: &MidiSequencer, path: &EntityPath, out: &mut Vec<EntityPath>) {
    removals_in_map(&self.clips, &other.clips, "clips", path, out);
  }
}

impl Removals for MixerTrack {
  fn collect_removals(&self, other: &MixerTrack, path: &EntityPath, out: &mut Vec<EntityPath>) {
    removals_in_map(&self.effects, &other.effects, "effects", path, out);
    removals_in_map(&self.routings, &other.routings, "routings", path, out);
  }
}

impl Removals for Project {
  fn collect_removals(&self, other: &Project, path: &EntityPath, out: &mut Vec<EntityPath>) {
    removals_in_map(&self.audio_sequencers, &other.audio_sequencers, "audio_sequencers", path, out);
    removals_in_map(&self.midi_sequencers, &other.midi_sequencers, "midi_sequencers", path, out);
    removals_in_map(&self.mixer_tracks, &other.mixer_tracks, "mixer_tracks", path, out);
  }
}

/// Entities present in `base` and missing from `other`, in ascending key order per level.
pub fn removals(base: &Project, other: &Project) -> Vec<EntityPath> {
  let mut out = Vec::new();
  base.collect_removals(other, &EntityPath::root(), &mut out);
  out
}

/// Whether `state` reproduces every field and keyed entity of `target`, under tolerance.
/// Entities that only exist in `state` are allowed.
pub fn approx_covers(state: &Project, target: &Project) -> bool {
  state.diff(target).is_empty()
}

/// Equality under the floating point tolerance of each field.
pub fn approx_eq(a: &Project, b: &Project) -> bool {
  approx_covers(a, b) && removals(a, b).is_empty()
}

#[cfg(test)]
mod test {

  use super::{approx_covers, approx_eq, diff, diff_map, removals, Diff, EntityPath};
  use crate::compare::Sparse;
  use crate::project::{
    AudioClip, AudioSequencer, IdMap, MidiClip, MidiNote, MidiSequencer, MixerRouting, MixerTrack,
    Project, SparseMidiInstrument, SparseMixerTrack,
  };

  fn sample_project() -> Project {
    let mut project = Project::new("song", 960);

    let mut master = MixerTrack::new("Master");
    master.db = -3.0;
    project.mixer_tracks.insert(1, master);

    let mut bus = MixerTrack::new("Drums");
    bus.routings.insert(
      1,
      MixerRouting {
        db: -6.0,
        output: 1,
      },
    );
    project.mixer_tracks.insert(2, bus);
    project.master_track_id = Some(1);

    let mut clip = MidiClip::new("intro", 0, 3840);
    clip.notes.insert(1, MidiNote::new(0, 240, 60, 0.8));
    clip.notes.insert(2, MidiNote::new(240, 240, 64, 0.7));
    let mut lead = MidiSequencer::new("lead", "saw", 1);
    lead.clips.insert(1, clip);
    project.midi_sequencers.insert(1, lead);

    let mut drums = AudioSequencer::new("loops", 2);
    drums.clips.insert(1, AudioClip::new("beat", "loops/beat.wav"));
    project.audio_sequencers.insert(1, drums);

    project
  }

  // Note of the sample's only MIDI clip
  fn note_mut(project: &mut Project, id: u32) -> &mut MidiNote {
    let sequencer = project.midi_sequencers.get_mut(&1).unwrap();
    let clip = sequencer.clips.get_mut(&1).unwrap();
    clip.notes.get_mut(&id).unwrap()
  }

  #[test]
  /// Comparing a snapshot with itself yields an empty patch
  pub fn diff_identical_is_empty() {
    let project = sample_project();
    assert!(diff(&project, &project.clone()).is_empty());
  }

  #[test]
  /// Changing one note only reports that note, through all its ancestors
  pub fn diff_prunes_unchanged_children() {
    let base = sample_project();
    let mut other = base.clone();
    note_mut(&mut other, 2).pitch = 65;

    let patch = diff(&base, &other);
    assert!(patch.name.is_none());
    assert!(patch.mixer_tracks.is_empty());
    assert!(patch.audio_sequencers.is_empty());

    let sequencer = &patch.midi_sequencers[&1];
    assert!(sequencer.name.is_none());
    assert!(sequencer.instrument.is_none());
    let clip = &sequencer.clips[&1];
    assert!(clip.name.is_none());
    assert_eq!(clip.notes.len(), 1);
    let note = &clip.notes[&2];
    assert_eq!(note.pitch, Some(65));
    assert!(note.start_tick.is_none());
    assert!(note.mpe.is_none());
  }

  #[test]
  /// A key missing from the base is sent as the full patch of the new entity
  pub fn diff_addition_is_full_patch() {
    let base = sample_project();
    let mut other = base.clone();
    let mut fx = MixerTrack::new("FX");
    fx.pan = 0.25;
    other.mixer_tracks.insert(3, fx.clone());

    let patch = diff(&base, &other);
    assert_eq!(patch.mixer_tracks.len(), 1);
    assert_eq!(patch.mixer_tracks[&3], fx.full_patch());
    assert_eq!(patch.mixer_tracks[&3].db, Some(0.0));
  }

  #[test]
  /// New MIDI sequencers carry their instrument, clips and notes
  pub fn full_patch_is_recursive() {
    let project = sample_project();
    let patch = project.midi_sequencers[&1].full_patch();
    assert_eq!(
      patch.instrument,
      Some(SparseMidiInstrument {
        name: Some("saw".into())
      })
    );
    let note = &patch.clips[&1].notes[&1];
    assert_eq!(note.pitch, Some(60));
    assert_eq!(note.mpe.as_ref().and_then(|mpe| mpe.pressure), Some(0.0));
  }

  #[test]
  /// Removed keys never show up in a patch
  pub fn diff_ignores_removed_keys() {
    let base = sample_project();
    let mut other = base.clone();
    other.mixer_tracks.remove(&2);
    assert!(diff(&base, &other).is_empty());
  }

  #[test]
  pub fn diff_map_generic() {
    let mut base: IdMap<MixerTrack> = IdMap::new();
    base.insert(1, MixerTrack::new("a"));
    base.insert(2, MixerTrack::new("b"));
    let mut other = base.clone();
    other.get_mut(&2).unwrap().name = "c".into();
    other.insert(5, MixerTrack::new("e"));

    let patch = diff_map(&base, &other);
    assert_eq!(patch.keys().cloned().collect::<Vec<_>>(), vec![2, 5]);
    assert_eq!(
      patch[&2],
      SparseMixerTrack {
        name: Some("c".into()),
        ..SparseMixerTrack::default()
      }
    );
  }

  #[test]
  pub fn diff_within_epsilon_is_empty() {
    let base = sample_project();
    let mut other = base.clone();
    other.mixer_tracks.get_mut(&1).unwrap().db += 1e-10;
    note_mut(&mut other, 1).velocity += 1e-7;
    assert!(diff(&base, &other).is_empty());
    assert!(approx_eq(&base, &other));
  }

  #[test]
  pub fn diff_master_track_cleared() {
    let base = sample_project();
    let mut other = base.clone();
    other.master_track_id = None;
    assert_eq!(diff(&base, &other).master_track_id, Some(None));
  }

  #[test]
  /// Removals are reported through their full path
  pub fn removals_lists_missing_entities() {
    let base = sample_project();
    let mut other = base.clone();
    other.midi_sequencers.get_mut(&1).unwrap().clips.get_mut(&1).unwrap().notes.remove(&2);
    other.mixer_tracks.get_mut(&2).unwrap().routings.remove(&1);
    other.audio_sequencers.clear();

    let paths: Vec<String> = removals(&base, &other).iter().map(|path| path.to_string()).collect();
    assert_eq!(
      paths,
      vec![
        "audio_sequencers[1]",
        "midi_sequencers[1].clips[1].notes[2]",
        "mixer_tracks[2].routings[1]",
      ]
    );
    assert!(!approx_eq(&base, &other));
  }

  #[test]
  /// Extra entities in the state do not break coverage, missing ones do
  pub fn approx_covers_allows_additions() {
    let base = sample_project();
    let mut larger = base.clone();
    larger.mixer_tracks.insert(9, MixerTrack::new("extra"));
    assert!(approx_covers(&larger, &base));
    assert!(!approx_covers(&base, &larger));
    assert!(!approx_eq(&larger, &base));
  }

  #[test]
  pub fn entity_path_display() {
    let path = EntityPath::root().child("mixer_tracks", 4).child("effects", 7);
    assert_eq!(path.to_string(), "mixer_tracks[4].effects[7]");
    assert_eq!(path.segments().len(), 2);
    assert_eq!(EntityPath::root().to_string(), "");
  }
}
