//! Core types and definitions for the SALVO weapon simulation.
//!
//! This crate defines the vocabulary shared across the other crates:
//! ids, outfit definitions, rigid bodies, pilot and asteroid records,
//! damage descriptors, events, errors, and tuning constants.
//! It contains no per-tick simulation logic.

pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod outfit;
pub mod solid;
pub mod types;
