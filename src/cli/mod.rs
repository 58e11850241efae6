//! CLI interface for libahocorasick
//!
//! Provides command-line utilities for building, inspecting and searching
//! with keyword trees.

pub mod args;
pub mod commands;
pub mod detect;
pub mod logger;

pub use args::{Cli, Commands, SerializationFormat, TreeSource};
pub use detect::{detect_format, DetectionMethod, FormatDetection};
