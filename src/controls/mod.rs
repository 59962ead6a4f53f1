//! # Controls Module
//!
//! Reference terminal control adapters. These are the platform side of the
//! binding story: concrete widgets implementing the
//! [`Control`](crate::binding::Control) capability surface over crossterm
//! input, usable directly and doubling as the worked example for writing
//! adapters over other toolkits.

pub mod button;

pub use button::{TermButton, PRESSED};
