//! Project trees for music production, with structural diff, patch application
//! and a linear undo/redo history built from those patches.

pub mod apply;
pub mod codec;
pub mod compare;
pub mod config;
pub mod diff;
pub mod history;
pub mod project;
pub mod time;

pub use crate::apply::{apply, apply_in_place, Apply};
pub use crate::codec::{
  export_container, import_container, load_container, save_container, DecodeError, EncodeError,
  Format, Version,
};
pub use crate::compare::{Differs, Sparse};
pub use crate::config::Config;
pub use crate::diff::{approx_covers, approx_eq, diff, removals, Diff, EntityPath};
pub use crate::history::{HistoryError, ProjectCommit, ProjectContainer, ProjectInfo};
pub use crate::project::{Project, SparseProject};
