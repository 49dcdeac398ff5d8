//! Application core: service logic behind port traits.
//!
//! This module holds the rules for image-occlusion notes and localisation.
//! All interaction with storage, media and string tables happens through
//! the **port traits** defined in [`ports`], keeping this layer fully
//! testable with in-memory adapters.

pub mod events;
pub mod ports;
pub mod service;
