//! Terminal conflict map: Mercator-projected regions, grid-clustered assets
//! and animated relationship arcs, rendered in Braille Unicode.

pub mod braille;
pub mod config;
pub mod coords;
pub mod data;
pub mod error;
pub mod frame;
pub mod map;
