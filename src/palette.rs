use crate::cluster::Cluster;
use crate::color::{format_hex_color, Color};

/// One palette swatch: a hex color with its occurrence count and share
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
  /// Swatch color as an uppercase "#RRGGBB" string
  pub color: String,
  /// Number of samples that mapped to this swatch
  pub count: u32,
  /// Share of all samples, 0-100
  pub percentage: f64,
}

/// Aggregate clusters into the final palette
///
/// Clusters that received no samples are dropped, the rest are converted to
/// hex entries with their percentage share and sorted by descending count.
///
/// # Arguments
/// * `clusters` - The clusters produced by `cluster_colors`
/// * `total_samples` - Number of samples the clusters were built from
///
/// # Returns
/// The palette entries, most frequent first
pub fn build_palette(clusters: &[Cluster], total_samples: usize) -> Vec<PaletteEntry> {
  let mut entries: Vec<PaletteEntry> = clusters
    .iter()
    .filter(|cluster| cluster.count > 0)
    .map(|cluster| PaletteEntry {
      color: format_hex_color(centroid_to_color(cluster)),
      count: cluster.count as u32,
      percentage: cluster.count as f64 / total_samples as f64 * 100.0,
    })
    .collect();

  entries.sort_by(|a, b| b.count.cmp(&a.count));
  entries
}

/// Palette substituted when no pixel survives the visibility filter
pub fn fallback_palette() -> Vec<PaletteEntry> {
  vec![PaletteEntry {
    color: "#FFFFFF".to_string(),
    count: 1,
    percentage: 100.0,
  }]
}

/// Round a centroid's floating-point channels to displayable 8-bit values
fn centroid_to_color(cluster: &Cluster) -> Color {
  [
    cluster.centroid.x.round().clamp(0.0, 255.0) as u8,
    cluster.centroid.y.round().clamp(0.0, 255.0) as u8,
    cluster.centroid.z.round().clamp(0.0, 255.0) as u8,
  ]
}
