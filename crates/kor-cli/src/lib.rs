//! Library components of the Kor viewer CLI.

pub mod blocks;
pub mod logging;
pub mod view;
