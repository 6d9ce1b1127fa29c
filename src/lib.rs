#![deny(clippy::all)]

pub mod cluster;
pub mod color;
pub mod palette;
pub mod sample;

use crate::cluster::{cluster_colors, DEFAULT_MAX_ITERATIONS};
use crate::color::{format_hex_color, parse_hex_color};
use crate::palette::{build_palette, fallback_palette, PaletteEntry};
use crate::sample::{collect_samples, SamplerConfig};
use image::RgbaImage;
use napi::bindgen_prelude::*;
use napi_derive::napi;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default number of colors extracted when the caller does not ask for more
pub const DEFAULT_COLOR_COUNT: usize = 6;

#[napi(object)]
pub struct RgbColor {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

#[napi(object)]
pub struct PaletteEntryJs {
  /// Swatch color as an uppercase "#RRGGBB" string
  pub color: String,
  /// Number of sampled pixels that mapped to this swatch
  pub count: u32,
  /// Share of all sampled pixels, 0-100
  pub percentage: f64,
}

#[napi(object)]
pub struct ExtractPaletteOptions {
  /// The input image buffer
  pub input: Buffer,
  /// How many colors to extract (default: 6)
  pub color_count: Option<u32>,
  /// Longest side of the working image before sampling (default: 200)
  pub max_dimension: Option<u32>,
  /// Cap on clustering rounds (default: 100)
  pub max_iterations: Option<u32>,
  /// Minimum alpha (0-255) for a pixel to be sampled (default: 128)
  pub alpha_threshold: Option<u8>,
  /// Seed for centroid initialization. Runs with the same seed and input
  /// produce the same palette.
  pub seed: Option<u32>,
}

pub struct AsyncExtractPalette {
  options: ExtractPaletteOptions,
}

#[napi]
impl Task for AsyncExtractPalette {
  type Output = Vec<PaletteEntry>;
  type JsValue = Vec<PaletteEntryJs>;

  fn compute(&mut self) -> Result<Self::Output> {
    extract_palette_internal(&self.options)
  }

  fn resolve(&mut self, _env: Env, output: Self::Output) -> Result<Self::JsValue> {
    Ok(output.into_iter().map(entry_to_js).collect())
  }
}

#[napi]
/// Extract a dominant-color palette from an image asynchronously
///
/// Samples the image (downscaling large inputs and skipping mostly
/// transparent pixels), clusters the samples into representative colors, and
/// resolves to hex swatches annotated with occurrence counts and percentage
/// shares, most frequent first. A fully transparent image resolves to a
/// single white swatch at 100%.
///
/// # Arguments
/// * `options` - The options for palette extraction
///
/// # Returns
/// A promise that resolves to the palette entries
pub fn extract_palette(options: ExtractPaletteOptions) -> AsyncTask<AsyncExtractPalette> {
  AsyncTask::new(AsyncExtractPalette { options })
}

#[napi]
/// Extract a dominant-color palette from an image synchronously
///
/// # Arguments
/// * `options` - The options for palette extraction
///
/// # Returns
/// The palette entries, most frequent first
pub fn extract_palette_sync(options: ExtractPaletteOptions) -> Result<Vec<PaletteEntryJs>> {
  let palette = extract_palette_internal(&options)?;
  Ok(palette.into_iter().map(entry_to_js).collect())
}

#[napi]
/// Extract only the most frequent color of an image
///
/// # Arguments
/// * `options` - The options for palette extraction
///
/// # Returns
/// The top palette entry
pub fn dominant_color(options: ExtractPaletteOptions) -> Result<PaletteEntryJs> {
  let palette = extract_palette_internal(&options)?;
  palette.into_iter().next().map(entry_to_js).ok_or_else(|| {
    Error::new(
      Status::GenericFailure,
      "Extraction produced an empty palette".to_string(),
    )
  })
}

#[napi]
/// Parse a hex color string into an RGB color
///
/// Supports formats: "#ff0000", "ff0000", "#f00", "f00"
///
/// # Arguments
/// * `hex` - The hex color string
///
/// # Returns
/// The parsed RGB color
pub fn parse_color(hex: String) -> Result<RgbColor> {
  let color = parse_hex_color(&hex)
    .map_err(|e| Error::new(Status::InvalidArg, format!("Invalid hex color: {}", e)))?;
  Ok(RgbColor {
    r: color[0],
    g: color[1],
    b: color[2],
  })
}

#[napi]
/// Format an RGB color as an uppercase "#RRGGBB" string
///
/// # Arguments
/// * `color` - The RGB color
///
/// # Returns
/// The hex color string
pub fn format_color(color: RgbColor) -> String {
  format_hex_color([color.r, color.g, color.b])
}

#[napi]
/// Get the default number of extracted colors
///
/// # Returns
/// The default color count (6)
pub fn get_default_color_count() -> u32 {
  DEFAULT_COLOR_COUNT as u32
}

/// Extract a palette from already-decoded pixel data
///
/// This is the whole pipeline behind the exported functions: sample, cluster,
/// aggregate. Decoding stays with the caller.
pub fn extract_from_pixels<R: Rng>(
  image: &RgbaImage,
  color_count: usize,
  max_iterations: usize,
  sampler: &SamplerConfig,
  rng: &mut R,
) -> anyhow::Result<Vec<PaletteEntry>> {
  let samples = collect_samples(image, sampler);
  if samples.is_empty() {
    return Ok(fallback_palette());
  }

  let clusters = cluster_colors(&samples, color_count, max_iterations, rng)?;
  Ok(build_palette(&clusters, samples.len()))
}

fn entry_to_js(entry: PaletteEntry) -> PaletteEntryJs {
  PaletteEntryJs {
    color: entry.color,
    count: entry.count,
    percentage: entry.percentage,
  }
}

fn extract_palette_internal(options: &ExtractPaletteOptions) -> Result<Vec<PaletteEntry>> {
  let defaults = SamplerConfig::default();

  let color_count = options.color_count.unwrap_or(DEFAULT_COLOR_COUNT as u32);
  if color_count == 0 {
    return Err(Error::new(
      Status::InvalidArg,
      "colorCount must be at least 1".to_string(),
    ));
  }

  let max_dimension = options.max_dimension.unwrap_or(defaults.max_dimension);
  if max_dimension == 0 {
    return Err(Error::new(
      Status::InvalidArg,
      "maxDimension must be at least 1".to_string(),
    ));
  }

  let max_iterations = options
    .max_iterations
    .unwrap_or(DEFAULT_MAX_ITERATIONS as u32);
  if max_iterations == 0 {
    return Err(Error::new(
      Status::InvalidArg,
      "maxIterations must be at least 1".to_string(),
    ));
  }

  let img = image::load_from_memory(&options.input)
    .map_err(|e| Error::new(Status::InvalidArg, format!("Failed to load image: {}", e)))?;
  let rgba = img.to_rgba8();

  let sampler = SamplerConfig {
    max_dimension,
    alpha_threshold: options.alpha_threshold.unwrap_or(defaults.alpha_threshold),
  };

  let mut rng: StdRng = match options.seed {
    Some(seed) => StdRng::seed_from_u64(seed as u64),
    None => StdRng::from_os_rng(),
  };

  extract_from_pixels(
    &rgba,
    color_count as usize,
    max_iterations as usize,
    &sampler,
    &mut rng,
  )
  .map_err(|e| {
    Error::new(
      Status::GenericFailure,
      format!("Palette extraction failed: {}", e),
    )
  })
}
