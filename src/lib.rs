//! Hybrid workout coach.
//!
//! Watches a running workout session and speaks short motivational lines at
//! meaningful moments, using an AI text model when available and a built-in
//! phrase bank otherwise.

pub mod coach;
pub mod config;
pub mod llm;
pub mod session;
pub mod voice;
