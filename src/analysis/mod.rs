//! Static HTML analysis used to decide whether a page needs rendering.

pub mod text_density;

pub use text_density::{DensityReport, FRAMEWORK_MARKERS, FrameworkMarker, analyze, visible_text};
