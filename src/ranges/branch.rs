//! ranges::branch
//!
//! Lazy iteration over the result of a branch comparison.

use std::iter::FusedIterator;

use log::debug;

use super::RangeError;
use crate::core::types::IgnoreSet;
use crate::git::{CherryEntry, CommitInfo, Git};

/// The `+` commits of a branch comparison, in the order
/// the comparison printed them.
///
/// The iterator owns the repository handle. Commits are looked up one at a
/// time as the caller pulls; the handle is released once the entries are
/// exhausted, after the first error, or when the iterator is dropped.
///
/// A hash from the comparison that the repository cannot resolve yields
/// [`RangeError::UnresolvedCommit`] and ends the iteration.
#[derive(Debug)]
pub struct BranchCommits<'a> {
    git: Option<Git>,
    entries: std::vec::IntoIter<CherryEntry>,
    ignore: &'a IgnoreSet,
}

impl<'a> BranchCommits<'a> {
    /// Iterate the added entries of a comparison against an open repository.
    pub(crate) fn new(git: Git, entries: Vec<CherryEntry>, ignore: &'a IgnoreSet) -> Self {
        let added: Vec<_> = entries.into_iter().filter(CherryEntry::is_added).collect();
        Self {
            git: Some(git),
            entries: added.into_iter(),
            ignore,
        }
    }

    /// An iterator that yields nothing and holds no repository.
    pub(crate) fn empty(ignore: &'a IgnoreSet) -> Self {
        Self {
            git: None,
            entries: Vec::new().into_iter(),
            ignore,
        }
    }

    /// Whether the repository handle is still held.
    pub fn is_open(&self) -> bool {
        self.git.is_some()
    }

    fn release(&mut self) {
        if self.git.take().is_some() {
            debug!("branch comparison finished, repository released");
        }
        self.entries = Vec::new().into_iter();
    }
}

impl Iterator for BranchCommits<'_> {
    type Item = Result<CommitInfo, RangeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let git = self.git.as_ref()?;

            let Some(entry) = self.entries.next() else {
                self.release();
                return None;
            };

            if self.ignore.contains(&entry.hash) {
                debug!("skipping ignored commit {}", entry.hash);
                continue;
            }

            let looked_up = git.lookup_commit(&entry.hash);
            return Some(match looked_up {
                Ok(info) => Ok(info),
                Err(source) => {
                    self.release();
                    Err(RangeError::UnresolvedCommit {
                        hash: entry.hash,
                        source,
                    })
                }
            });
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.git.is_none() {
            return (0, Some(0));
        }
        (0, Some(self.entries.len()))
    }
}

impl FusedIterator for BranchCommits<'_> {}
