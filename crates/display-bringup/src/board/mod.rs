//! Board presets
//!
//! Wiring and capability declarations for known board / display-module
//! combinations, plus the board-level entry point the graphics subsystem
//! calls at startup.

pub mod samd20_xplained;
