//! Visualization tools for texture analysis
//!
//! Renders local power spectra and direction-field overlays as images.

mod overlay;
mod spectrum;

pub use overlay::{render_direction_field, save_direction_field, OverlayConfig};
pub use spectrum::{
    render_spectrum, save_spectrum, Colormap, SpectrumImageConfig, MAX_SPECTRUM_SIDE,
};
