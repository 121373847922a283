//! CLI command implementations.
//!
//! - `render` - Render a stripe recipe (YAML or JSON)
//! - `fill` - Stripe every polygon of an SVG file
//! - `example` - Print an example recipe

pub mod common;
pub mod fill;
pub mod recipe;
pub mod render;

pub use common::CliError;
pub use fill::cmd_fill;
pub use render::{cmd_example, cmd_render};
