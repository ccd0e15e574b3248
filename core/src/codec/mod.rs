//! Persistence of a whole project container.
//!
//! Two interchangeable encodings share the same field names and nesting: CBOR for
//! storage and pretty printed JSON for inspection. Every document starts with a
//! version tag, which is checked before the rest of the document is decoded.

mod binary;
mod text;

use std::convert::TryFrom;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use failure::{Error, Fail};
use log::{debug, info};

use serde_derive::{Deserialize, Serialize};

use crate::config::Config;
use crate::history::{ProjectCommit, ProjectContainer};
use crate::project::Project;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
  Alpha = 90000,
}

impl Version {
  pub const LATEST: Version = Version::Alpha;

  pub fn from_tag(tag: u32) -> Option<Version> {
    match tag {
      90000 => Some(Version::Alpha),
      _ => None,
    }
  }

  pub fn tag(self) -> u32 {
    self as u32
  }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
  #[serde(rename = "binary")]
  Binary,
  #[serde(rename = "text")]
  Text,
}

impl Format {
  /// `.dxcc` files are binary containers, `.json` files text ones.
  pub fn from_path<P>(path: P) -> Option<Format>
  where
    P: AsRef<Path>,
  {
    match path.as_ref().extension().and_then(|ext| ext.to_str()) {
      Some("dxcc") => Some(Format::Binary),
      Some("json") => Some(Format::Text),
      _ => None,
    }
  }

  /// Format implied by the extension of `path`, or the configured default.
  pub fn resolve<P>(path: P, config: &Config) -> Format
  where
    P: AsRef<Path>,
  {
    Format::from_path(path).unwrap_or(config.container.format)
  }
}

#[derive(Debug, Fail)]
pub enum EncodeError {
  #[fail(display = "Failed to write the container: {}", cause)]
  Io { cause: String },

  #[fail(display = "Failed to write the binary container: {}", cause)]
  Binary { cause: String },

  #[fail(display = "Failed to write the text container: {}", cause)]
  Text { cause: String },
}

#[derive(Debug, Fail)]
pub enum DecodeError {
  #[fail(display = "Failed to read the container: {}", cause)]
  Io { cause: String },

  #[fail(display = "Malformed binary container: {}", cause)]
  Binary { cause: String },

  #[fail(display = "Malformed text container: {}", cause)]
  Text { cause: String },

  #[fail(display = "Unsupported container version {}", version)]
  UnsupportedVersion { version: u32 },

  #[fail(display = "Applied count {} is beyond the {} stored commits", applied, commits)]
  InvalidCursor { applied: u64, commits: usize },
}

#[derive(Deserialize, Debug)]
pub(crate) struct Header {
  pub version: u32,
}

#[derive(Serialize, Debug)]
pub(crate) struct DocumentRef<'a> {
  pub version: u32,
  pub project: &'a Project,
  pub applied: u64,
  pub commits: &'a [ProjectCommit],
}

#[derive(Deserialize, Debug)]
pub(crate) struct Document {
  pub project: Project,
  pub applied: u64,
  pub commits: Vec<ProjectCommit>,
}

pub fn export_container<W>(
  writer: W,
  container: &ProjectContainer,
  version: Version,
  format: Format,
) -> Result<(), EncodeError>
where
  W: Write,
{
  info!(
    "Exporting {:?} container {:?} with {} commits",
    format,
    version,
    container.commits().len()
  );

  let document = DocumentRef {
    version: version.tag(),
    project: container.project(),
    applied: container.applied() as u64,
    commits: container.commits(),
  };

  match format {
    Format::Binary => binary::write(&document, writer),
    Format::Text => text::write(&document, writer),
  }
}

pub fn import_container<R>(
  mut reader: R,
  format: Format,
) -> Result<(ProjectContainer, Version), DecodeError>
where
  R: Read,
{
  let mut bytes = Vec::new();
  reader
    .read_to_end(&mut bytes)
    .map_err(|err| DecodeError::Io {
      cause: err.to_string(),
    })?;
  decode(&bytes, format)
}

pub fn encode(
  container: &ProjectContainer,
  version: Version,
  format: Format,
) -> Result<Vec<u8>, EncodeError> {
  let mut bytes = Vec::new();
  export_container(&mut bytes, container, version, format)?;
  Ok(bytes)
}

pub fn decode(bytes: &[u8], format: Format) -> Result<(ProjectContainer, Version), DecodeError> {
  let header = match format {
    Format::Binary => binary::read_header(bytes)?,
    Format::Text => text::read_header(bytes)?,
  };
  let version = Version::from_tag(header.version).ok_or(DecodeError::UnsupportedVersion {
    version: header.version,
  })?;
  debug!("Decoding {:?} container {:?}", format, version);

  let document = match format {
    Format::Binary => binary::read_document(bytes)?,
    Format::Text => text::read_document(bytes)?,
  };
  let Document {
    project,
    applied,
    commits,
  } = document;

  let count = commits.len();
  let container = usize::try_from(applied)
    .ok()
    .and_then(|cursor| ProjectContainer::from_parts(project, commits, cursor).ok())
    .ok_or(DecodeError::InvalidCursor {
      applied,
      commits: count,
    })?;

  info!(
    "Imported {:?} container {:?} with {} commits, {} applied",
    format,
    version,
    count,
    container.applied()
  );
  Ok((container, version))
}

/// Writes the container to `path` with the latest version. The format follows the
/// file extension and falls back to `config.container.format`.
pub fn save_container<P>(
  path: P,
  container: &ProjectContainer,
  config: &Config,
) -> Result<Format, EncodeError>
where
  P: AsRef<Path>,
{
  let path = path.as_ref();
  let format = Format::resolve(path, config);
  let file = File::create(path).map_err(|err| EncodeError::Io {
    cause: err.to_string(),
  })?;
  let mut writer = BufWriter::new(file);
  export_container(&mut writer, container, Version::LATEST, format)?;
  writer.flush().map_err(|err| EncodeError::Io {
    cause: err.to_string(),
  })?;
  Ok(format)
}

/// Reads a container from `path`, picking the format like `save_container` does.
/// Commit verification of the loaded container follows `config.history`.
pub fn load_container<P>(
  path: P,
  config: &Config,
) -> Result<(ProjectContainer, Version), DecodeError>
where
  P: AsRef<Path>,
{
  let path = path.as_ref();
  let format = Format::resolve(path, config);
  let file = File::open(path).map_err(|err| DecodeError::Io {
    cause: err.to_string(),
  })?;
  let (mut container, version) = import_container(BufReader::new(file), format)?;
  container.set_verify_commits(config.history.verify_commits);
  Ok((container, version))
}

/// Re-encodes a container from one format into the other, keeping its version.
pub fn convert(bytes: &[u8], from: Format, to: Format) -> Result<Vec<u8>, Error> {
  let (container, version) = decode(bytes, from)?;
  let converted = encode(&container, version, to)?;
  Ok(converted)
}
