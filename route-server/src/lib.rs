//! Train route search server.
//!
//! Answers "which trains run from station A to station B, in that order?"
//! over a stop-level timetable, and attaches a predicted delay to each
//! answer.

pub mod config;
pub mod delay;
pub mod domain;
pub mod fallback;
pub mod index;
pub mod ingest;
pub mod resolver;
pub mod search;
pub mod store;
pub mod web;
