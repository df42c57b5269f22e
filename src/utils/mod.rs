//! Utility modules: date math, hashing, slugification.

pub mod date;
pub mod hash;
pub mod slug;
