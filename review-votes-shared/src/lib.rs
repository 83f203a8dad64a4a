//! # Review Votes Shared
//! This crate defines the data structures shared by every part of the review votes system.
//! It includes the vote direction enum and its transition table, the persisted vote record,
//! caller and display identities, and the helpful/unhelpful tally.
pub mod types;
