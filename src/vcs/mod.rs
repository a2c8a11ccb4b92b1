//! Version control access.
//!
//! Everything goes through the `git` command line.

mod backend;
mod git;
#[cfg(test)]
pub mod test_utils;

pub use backend::{VcsBackend, VcsError};
pub use git::GitBackend;
