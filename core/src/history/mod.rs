pub mod info;

pub use self::info::{CommitSummary, ProjectInfo};

use failure::Fail;
use log::{debug, error, warn};

use serde_derive::{Deserialize, Serialize};

use crate::apply::Apply;
use crate::compare::Sparse;
use crate::config::History as HistoryConfig;
use crate::diff::{approx_covers, approx_eq, removals, Diff, EntityPath};
use crate::project::{Project, SparseProject};
use crate::time::Timestamp;

#[derive(Debug, Fail)]
pub enum HistoryError {
  #[fail(display = "Removing {} cannot be recorded as a commit", path)]
  UnsupportedDeletion { path: EntityPath },

  #[fail(display = "Applied count {} is beyond the {} recorded commits", applied, commits)]
  InvalidCursor { applied: usize, commits: usize },

  #[fail(display = "Commit {} is inconsistent: {}", index, reason)]
  InvariantViolation { index: usize, reason: &'static str },
}

/// One step of the linear history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProjectCommit {
  pub message: String,
  pub timestamp: Timestamp,
  /// Turns the snapshot before the commit into the one after it
  pub forward: SparseProject,
  /// Turns the snapshot after the commit back into the one before it
  pub backward: SparseProject,
}

impl ProjectCommit {
  pub fn new<T>(message: T, pre: &Project, post: &Project) -> ProjectCommit
  where
    T: Into<String>,
  {
    ProjectCommit {
      message: message.into(),
      timestamp: Timestamp::now(),
      forward: pre.diff(post),
      backward: post.diff(pre),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.forward.is_empty()
  }

  /// Replays the commit on `pre` and checks that the backward patch restores every
  /// field and entity of `pre`. Entities added by the commit survive the rewind since
  /// patches never remove. Returns the snapshot after the commit.
  pub fn verify(&self, index: usize, pre: &Project) -> Result<Project, HistoryError> {
    let mut post = pre.clone();
    post.apply(&self.forward);

    let mut rewind = post.clone();
    rewind.apply(&self.backward);

    if !approx_covers(&rewind, pre) {
      return Err(HistoryError::InvariantViolation {
        index,
        reason: "backward patch does not restore the previous project",
      });
    }
    Ok(post)
  }
}

/// A project snapshot together with the commits that led to it and those that can be redone.
///
/// The first `applied` commits are in effect on `project`; the rest form the redo tail.
#[derive(Debug, Clone)]
pub struct ProjectContainer {
  project: Project,
  commits: Vec<ProjectCommit>,
  applied: usize,
  verify_commits: bool,
}

impl Default for ProjectContainer {
  fn default() -> Self {
    ProjectContainer::new(Project::default())
  }
}

impl ProjectContainer {
  pub fn new(project: Project) -> ProjectContainer {
    ProjectContainer::with_config(project, &HistoryConfig::default())
  }

  pub fn with_config(project: Project, config: &HistoryConfig) -> ProjectContainer {
    ProjectContainer {
      project,
      commits: Vec::new(),
      applied: 0,
      verify_commits: config.verify_commits,
    }
  }

  /// Starts from the base snapshot with every commit in the redo tail.
  pub fn with_commits(base: Project, commits: Vec<ProjectCommit>) -> ProjectContainer {
    ProjectContainer {
      project: base,
      commits,
      applied: 0,
      verify_commits: HistoryConfig::default().verify_commits,
    }
  }

  pub fn from_parts(
    project: Project,
    commits: Vec<ProjectCommit>,
    applied: usize,
  ) -> Result<ProjectContainer, HistoryError> {
    if applied > commits.len() {
      return Err(HistoryError::InvalidCursor {
        applied,
        commits: commits.len(),
      });
    }
    Ok(ProjectContainer {
      project,
      commits,
      applied,
      verify_commits: HistoryConfig::default().verify_commits,
    })
  }

  pub fn set_verify_commits(&mut self, verify: bool) {
    self.verify_commits = verify;
  }

  pub fn verify_commits(&self) -> bool {
    self.verify_commits
  }

  pub fn project(&self) -> &Project {
    &self.project
  }

  pub fn commits(&self) -> &[ProjectCommit] {
    self.commits.as_slice()
  }

  pub fn applied(&self) -> usize {
    self.applied
  }

  pub fn can_undo(&self) -> bool {
    self.applied > 0
  }

  pub fn can_redo(&self) -> bool {
    self.applied < self.commits.len()
  }

  /// Records the transition from the current snapshot to `next`.
  ///
  /// Returns `false` when nothing changed, in which case `next` still replaces
  /// the current snapshot but no commit is added. Any redo tail is discarded.
  /// Snapshots that drop keyed entities are rejected since a patch cannot remove them.
  pub fn commit<T>(&mut self, message: T, next: Project) -> Result<bool, HistoryError>
  where
    T: Into<String>,
  {
    if let Some(path) = removals(&self.project, &next).into_iter().next() {
      warn!("Rejected commit removing {}", path);
      return Err(HistoryError::UnsupportedDeletion { path });
    }

    let commit = ProjectCommit::new(message, &self.project, &next);
    if commit.is_empty() {
      debug!("Skipped empty commit {:?}", commit.message);
      self.project = next;
      return Ok(false);
    }

    if self.verify_commits {
      self.check(self.applied, &commit, &next)?;
    }

    debug!(
      "Commit #{} {:?} (discarding {} redoable)",
      self.applied,
      commit.message,
      self.commits.len() - self.applied
    );
    self.commits.truncate(self.applied);
    self.commits.push(commit);
    self.applied += 1;
    self.project = next;
    Ok(true)
  }

  /// Records a commit built elsewhere, applying its forward patch to the current snapshot.
  pub fn push_commit(&mut self, commit: ProjectCommit) -> bool {
    if commit.is_empty() {
      debug!("Skipped empty commit {:?}", commit.message);
      return false;
    }
    debug!("Push commit #{} {:?}", self.applied, commit.message);
    self.commits.truncate(self.applied);
    self.project.apply(&commit.forward);
    self.commits.push(commit);
    self.applied += 1;
    true
  }

  pub fn undo(&mut self) -> bool {
    if !self.can_undo() {
      return false;
    }
    let commit = &self.commits[self.applied - 1];
    debug!("Undo #{} {:?}", self.applied - 1, commit.message);
    self.project.apply(&commit.backward);
    self.applied -= 1;
    true
  }

  pub fn redo(&mut self) -> bool {
    if !self.can_redo() {
      return false;
    }
    let commit = &self.commits[self.applied];
    debug!("Redo #{} {:?}", self.applied, commit.message);
    self.project.apply(&commit.forward);
    self.applied += 1;
    true
  }

  /// Snapshot before the first commit, rebuilt from the backward patches.
  pub fn base(&self) -> Project {
    let mut base = self.project.clone();
    for commit in self.commits[..self.applied].iter().rev() {
      base.apply(&commit.backward);
    }
    base
  }

  /// Replays the whole history from the base snapshot, checking every commit
  /// and that the applied ones lead to the current snapshot.
  pub fn verify(&self) -> Result<(), HistoryError> {
    let mut state = self.base();
    for (index, commit) in self.commits.iter().enumerate() {
      if index == self.applied {
        self.check_current(index, &state)?;
      }
      state = commit.verify(index, &state)?;
    }
    if self.applied == self.commits.len() {
      self.check_current(self.applied, &state)?;
    }
    Ok(())
  }

  fn check_current(&self, index: usize, state: &Project) -> Result<(), HistoryError> {
    if approx_eq(state, &self.project) {
      Ok(())
    } else {
      Err(HistoryError::InvariantViolation {
        index,
        reason: "applied commits do not lead to the current project",
      })
    }
  }

  fn check(
    &self,
    index: usize,
    commit: &ProjectCommit,
    next: &Project,
  ) -> Result<(), HistoryError> {
    let result = commit.verify(index, &self.project).and_then(|post| {
      if approx_eq(&post, next) {
        Ok(())
      } else {
        Err(HistoryError::InvariantViolation {
          index,
          reason: "forward patch does not reach the committed project",
        })
      }
    });
    if let Err(err) = &result {
      error!("{}", err);
      if cfg!(debug_assertions) {
        panic!("{}", err);
      }
    }
    result
  }
}
