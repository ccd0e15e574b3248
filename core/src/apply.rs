//! Merges a sparse patch onto a dense snapshot.
//!
//! Applying never removes anything. A patch entry whose key is missing in the
//! target creates a default child first, then merges the fields into it, so the
//! same code path handles both additions and modifications.

use crate::compare::set_if;
use crate::diff::Diff;
use crate::project::{
  AudioClip, AudioEffect, AudioSequencer, IdMap, MidiClip, MidiInstrument, MidiMpe, MidiNote,
  MidiSequencer, MixerRouting, MixerTrack, Project, SparseAudioClip, SparseAudioEffect,
  SparseAudioSequencer, SparseMidiClip, SparseMidiInstrument, SparseMidiMpe, SparseMidiNote,
  SparseMidiSequencer, SparseMixerRouting, SparseMixerTrack, SparseProject,
};

pub trait Apply: Diff {
  fn apply(&mut self, patch: &Self::Sparse);
}

pub fn apply_map<V>(dst: &mut IdMap<V>, patches: &IdMap<V::Sparse>)
where
  V: Apply + Default,
{
  for (id, patch) in patches.iter() {
    dst.entry(*id).or_insert_with(V::default).apply(patch);
  }
}

fn apply_embedded<V>(dst: &mut V, patch: &Option<V::Sparse>)
where
  V: Apply,
{
  if let Some(patch) = patch {
    dst.apply(patch);
  }
}

impl Apply for AudioClip {
  fn apply(&mut self, patch: &SparseAudioClip) {
    set_if(&mut self.name, &patch.name);
    set_if(&mut self.start_tick, &patch.start_tick);
    set_if(&mut self.length_ticks, &patch.length_ticks);
    set_if(&mut self.file, &patch.file);
    set_if(&mut self.file_start_frame, &patch.file_start_frame);
    set_if(&mut self.db, &patch.db);
    set_if(&mut self.is_loop, &patch.is_loop);
  }
}

impl Apply for MidiMpe {
  fn apply(&mut self, patch: &SparseMidiMpe) {
    set_if(&mut self.channel, &patch.channel);
    set_if(&mut self.pressure, &patch.pressure);
    set_if(&mut self.slide, &patch.slide);
    set_if(&mut self.timbre, &patch.timbre);
  }
}

impl Apply for MidiNote {
  fn apply(&mut self, patch: &SparseMidiNote) {
    set_if(&mut self.start_tick, &patch.start_tick);
    set_if(&mut self.length_ticks, &patch.length_ticks);
    set_if(&mut self.pitch, &patch.pitch);
    set_if(&mut self.velocity, &patch.velocity);
    apply_embedded(&mut self.mpe, &patch.mpe);
  }
}

impl Apply for MidiClip {
  fn apply(&mut self, patch: &SparseMidiClip) {
    set_if(&mut self.name, &patch.name);
    set_if(&mut self.start_tick, &patch.start_tick);
    set_if(&mut self.length_ticks, &patch.length_ticks);
    apply_map(&mut self.notes, &patch.notes);
  }
}

impl Apply for AudioSequencer {
  fn apply(&mut self, patch: &SparseAudioSequencer) {
    set_if(&mut self.name, &patch.name);
    set_if(&mut self.output, &patch.output);
    apply_map(&mut self.clips, &patch.clips);
  }
}

impl Apply for MidiInstrument {
  fn apply(&mut self, patch: &SparseMidiInstrument) {
    set_if(&mut self.name, &patch.name);
  }
}

impl Apply for MidiSequencer {
  fn apply(&mut self, patch: &SparseMidiSequencer) {
    set_if(&mut self.name, &patch.name);
    set_if(&mut self.output, &patch.output);
    apply_embedded(&mut self.instrument, &patch.instrument);
    apply_map(&mut self.clips, &patch.clips);
  }
}

impl Apply for AudioEffect {
  fn apply(&mut self, patch: &SparseAudioEffect) {
    set_if(&mut self.name, &patch.name);
  }
}

impl Apply for MixerRouting {
  fn apply(&mut self, patch: &SparseMixerRouting) {
    set_if(&mut self.db, &patch.db);
    set_if(&mut self.output, &patch.output);
  }
}

impl Apply for MixerTrack {
  fn apply(&mut self, patch: &SparseMixerTrack) {
    set_if(&mut self.name, &patch.name);
    set_if(&mut self.db, &patch.db);
    set_if(&mut self.pan, &patch.pan);
    apply_map(&mut self.effects, &patch.effects);
    apply_map(&mut self.routings, &patch.routings);
  }
}

impl Apply for Project {
  fn apply(&mut self, patch: &SparseProject) {
    set_if(&mut self.name, &patch.name);
    set_if(&mut self.ppq, &patch.ppq);
    set_if(&mut self.master_track_id, &patch.master_track_id);
    apply_map(&mut self.audio_sequencers, &patch.audio_sequencers);
    apply_map(&mut self.midi_sequencers, &patch.midi_sequencers);
    apply_map(&mut self.mixer_tracks, &patch.mixer_tracks);
  }
}

pub fn apply(base: &Project, patch: &SparseProject) -> Project {
  let mut result = base.clone();
  result.apply(patch);
  result
}

pub fn apply_in_place(base: &mut Project, patch: &SparseProject) {
  base.apply(patch);
}
