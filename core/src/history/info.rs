use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::codec::{import_container, DecodeError, Format};
use crate::history::ProjectContainer;
use crate::time::Timestamp;

#[derive(Debug, Clone, PartialEq)]
pub struct CommitSummary {
  pub message: String,
  pub timestamp: Timestamp,
}

/// Metadata about a container, without the patches.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectInfo {
  pub created_on: Option<Timestamp>,
  pub modified_on: Option<Timestamp>,
  pub commits: Vec<CommitSummary>,
  pub applied: usize,
}

impl ProjectInfo {
  pub fn scan(container: &ProjectContainer) -> ProjectInfo {
    let commits: Vec<CommitSummary> = container
      .commits()
      .iter()
      .map(|commit| CommitSummary {
        message: commit.message.clone(),
        timestamp: commit.timestamp,
      })
      .collect();

    ProjectInfo {
      created_on: commits.first().map(|commit| commit.timestamp),
      modified_on: commits.last().map(|commit| commit.timestamp),
      commits,
      applied: container.applied(),
    }
  }

  pub fn scan_file<P>(path: P, format: Format) -> Result<ProjectInfo, DecodeError>
  where
    P: AsRef<Path>,
  {
    let file = File::open(path.as_ref()).map_err(|err| DecodeError::Io {
      cause: err.to_string(),
    })?;
    let (container, _version) = import_container(BufReader::new(file), format)?;
    Ok(ProjectInfo::scan(&container))
  }
}
