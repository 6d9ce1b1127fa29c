use crate::color::Color;
use image::imageops::FilterType;
use image::RgbaImage;

/// Configuration for pixel sampling
pub struct SamplerConfig {
  /// Longest side of the working image, in pixels. Larger inputs are
  /// downscaled before sampling so clustering cost stays bounded.
  pub max_dimension: u32,
  /// Minimum alpha value (0-255) for a pixel to produce a sample
  pub alpha_threshold: u8,
}

impl Default for SamplerConfig {
  fn default() -> Self {
    Self {
      max_dimension: 200,
      alpha_threshold: 128,
    }
  }
}

/// Collect color samples from an image
///
/// Downscales the image (preserving aspect ratio) when its longer side
/// exceeds `max_dimension`, then emits one RGB sample per pixel whose alpha
/// is at or above `alpha_threshold`. A fully transparent image yields an
/// empty vector.
///
/// # Arguments
/// * `image` - The decoded RGBA pixel buffer
/// * `config` - Sampling configuration
///
/// # Returns
/// The eligible color samples, in row-major pixel order
pub fn collect_samples(image: &RgbaImage, config: &SamplerConfig) -> Vec<Color> {
  let (width, height) = image.dimensions();

  let resized;
  let working = if width.max(height) > config.max_dimension {
    let (new_width, new_height) = scaled_dimensions(width, height, config.max_dimension);
    resized = image::imageops::resize(image, new_width, new_height, FilterType::Nearest);
    &resized
  } else {
    image
  };

  working
    .pixels()
    .filter(|pixel| pixel[3] >= config.alpha_threshold)
    .map(|pixel| [pixel[0], pixel[1], pixel[2]])
    .collect()
}

/// Scale dimensions so the longer side equals `max_dimension`, preserving
/// aspect ratio. Each side is rounded and never drops below one pixel.
fn scaled_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
  let ratio = max_dimension as f64 / width.max(height) as f64;
  let new_width = ((width as f64) * ratio).round().max(1.0) as u32;
  let new_height = ((height as f64) * ratio).round().max(1.0) as u32;
  (new_width, new_height)
}
