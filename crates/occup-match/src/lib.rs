//! Multi-word phrase matching over lexeme streams.
//!
//! A [`PhraseTrie`] maps word sequences to a [`TagId`]; a [`Finder`] scans a
//! stream of lexemes against it and reports leftmost-longest,
//! non-overlapping [`Match`]es. The same engine serves dictionary
//! normalization and template matching.

pub mod finder;
pub mod trie;

pub use finder::{find_matches, Finder, Match};
pub use trie::{Node, PhraseTrie, TagId, WordId};
