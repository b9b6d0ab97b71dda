//! Noise generation module for terrain and cloud synthesis.
//!
//! `basis` holds single-octave coherent noise sources; `fractal` layers them
//! into an fBm height field with a sea-level cutoff.

mod basis;
mod fractal;

pub use basis::{CoherentNoise, NoiseBasis, NoiseSource, ProjectedPerlin, SimplexNoise};
pub use fractal::{FractalNoiseField, NoiseConfig};
