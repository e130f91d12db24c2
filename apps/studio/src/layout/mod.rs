//! Page layout: font metrics, the positioned-element fragment every template
//! produces, the column flow the templates paint with, and SVG serialization.
//!
//! Everything here is pure and synchronous. Rasterizing a fragment is CPU-bound
//! and belongs inside `tokio::task::spawn_blocking` (see `export::raster`).

pub mod flow;
pub mod font_metrics;
pub mod fragment;
pub mod svg;

pub use fragment::{Fragment, A4_HEIGHT_PX, A4_WIDTH_PX};
