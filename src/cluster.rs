use crate::color::Color;
use anyhow::{ensure, Result};
use nalgebra::Vector3;
use rand::Rng;

/// Default cap on refinement rounds
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// A finished cluster: its mean color and how many samples it absorbed
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
  /// Component-wise mean of the assigned samples, in RGB
  pub centroid: Vector3<f64>,
  /// Number of samples assigned to this centroid
  pub count: usize,
}

/// Partition color samples into up to `color_count` clusters
///
/// Runs k-means over the samples: centroids are seeded with a
/// distance-weighted spread across the color space, then refined by
/// alternating nearest-centroid assignment and mean updates until the
/// partition stabilizes or the iteration budget runs out. The effective
/// cluster count is clamped to the sample count.
///
/// A centroid that ends up with no assigned samples keeps its last mean and
/// is reported with a count of zero; callers filter such clusters out.
///
/// # Arguments
/// * `samples` - The color samples to partition (must be non-empty)
/// * `color_count` - Requested number of clusters (must be at least 1)
/// * `max_iterations` - Cap on refinement rounds (must be at least 1)
/// * `rng` - Random source for centroid seeding; a seeded generator makes
///   the run reproducible
///
/// # Returns
/// One `Cluster` per effective centroid, in centroid index order
pub fn cluster_colors<R: Rng>(
  samples: &[Color],
  color_count: usize,
  max_iterations: usize,
  rng: &mut R,
) -> Result<Vec<Cluster>> {
  ensure!(color_count > 0, "cluster count must be at least 1");
  ensure!(max_iterations > 0, "iteration budget must be at least 1");
  ensure!(!samples.is_empty(), "cannot cluster an empty sample set");

  let k = color_count.min(samples.len());
  let mut centroids = seed_centroids(samples, k, rng);
  let mut assignments = vec![usize::MAX; samples.len()];

  for _ in 0..max_iterations {
    let changed = assign_samples(samples, &centroids, &mut assignments);
    if !changed {
      break;
    }
    update_centroids(samples, &assignments, &mut centroids);
  }

  let mut counts = vec![0usize; k];
  for &assigned in &assignments {
    counts[assigned] += 1;
  }

  Ok(
    centroids
      .into_iter()
      .zip(counts)
      .map(|(centroid, count)| Cluster { centroid, count })
      .collect(),
  )
}

/// Pick `k` initial centroids from the samples
///
/// The first centroid is chosen uniformly at random. Each subsequent one is
/// drawn with probability proportional to the squared distance to its nearest
/// already-chosen centroid, so the seeds spread out across the color space.
fn seed_centroids<R: Rng>(samples: &[Color], k: usize, rng: &mut R) -> Vec<Vector3<f64>> {
  let mut centroids = Vec::with_capacity(k);

  let first = rng.random_range(0..samples.len());
  centroids.push(sample_to_vector(samples[first]));

  // Squared distance from each sample to its nearest chosen centroid
  let mut weights: Vec<f64> = samples
    .iter()
    .map(|&sample| squared_distance(sample, &centroids[0]))
    .collect();

  while centroids.len() < k {
    let total: f64 = weights.iter().sum();

    let chosen = if total > 0.0 {
      // Walk the cumulative weights until the drawn value is covered
      let mut target = rng.random_range(0.0..total);
      let mut index = samples.len() - 1;
      for (i, &weight) in weights.iter().enumerate() {
        if target < weight {
          index = i;
          break;
        }
        target -= weight;
      }
      index
    } else {
      // Every sample already coincides with a centroid; no spread is possible
      rng.random_range(0..samples.len())
    };

    let centroid = sample_to_vector(samples[chosen]);
    for (weight, &sample) in weights.iter_mut().zip(samples) {
      *weight = weight.min(squared_distance(sample, &centroid));
    }
    centroids.push(centroid);
  }

  centroids
}

/// Assign every sample to its nearest centroid
///
/// Exact distance ties go to the lowest centroid index. Returns whether any
/// assignment differs from the previous round.
fn assign_samples(
  samples: &[Color],
  centroids: &[Vector3<f64>],
  assignments: &mut [usize],
) -> bool {
  let mut changed = false;

  for (slot, &sample) in assignments.iter_mut().zip(samples) {
    let mut best_index = 0;
    let mut best_distance = f64::INFINITY;
    for (index, centroid) in centroids.iter().enumerate() {
      let distance = squared_distance(sample, centroid);
      if distance < best_distance {
        best_distance = distance;
        best_index = index;
      }
    }
    if *slot != best_index {
      *slot = best_index;
      changed = true;
    }
  }

  changed
}

/// Move each centroid to the mean of its assigned samples
///
/// A centroid with no assigned samples keeps its previous value.
fn update_centroids(samples: &[Color], assignments: &[usize], centroids: &mut [Vector3<f64>]) {
  let mut sums = vec![Vector3::zeros(); centroids.len()];
  let mut counts = vec![0usize; centroids.len()];

  for (&assigned, &sample) in assignments.iter().zip(samples) {
    sums[assigned] += sample_to_vector(sample);
    counts[assigned] += 1;
  }

  for (index, centroid) in centroids.iter_mut().enumerate() {
    if counts[index] > 0 {
      *centroid = sums[index] / counts[index] as f64;
    }
  }
}

fn sample_to_vector(sample: Color) -> Vector3<f64> {
  Vector3::new(sample[0] as f64, sample[1] as f64, sample[2] as f64)
}

/// Squared Euclidean distance in RGB space; only relative order matters, so
/// the square root is skipped
fn squared_distance(sample: Color, centroid: &Vector3<f64>) -> f64 {
  (sample_to_vector(sample) - centroid).norm_squared()
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  const BLACK: Color = [0, 0, 0];
  const WHITE: Color = [255, 255, 255];

  fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
  }

  #[test]
  fn rejects_zero_cluster_count() {
    assert!(cluster_colors(&[BLACK], 0, DEFAULT_MAX_ITERATIONS, &mut rng(1)).is_err());
  }

  #[test]
  fn rejects_zero_iteration_budget() {
    assert!(cluster_colors(&[BLACK], 1, 0, &mut rng(1)).is_err());
  }

  #[test]
  fn rejects_empty_sample_set() {
    assert!(cluster_colors(&[], 3, DEFAULT_MAX_ITERATIONS, &mut rng(1)).is_err());
  }

  #[test]
  fn clamps_cluster_count_to_sample_count() {
    let samples = [BLACK, WHITE];
    let clusters = cluster_colors(&samples, 6, DEFAULT_MAX_ITERATIONS, &mut rng(7)).unwrap();
    assert_eq!(clusters.len(), 2);
  }

  #[test]
  fn counts_partition_the_sample_set() {
    let samples: Vec<Color> = (0..60)
      .map(|i| {
        let v = (i * 4) as u8;
        [v, 255 - v, v / 2]
      })
      .collect();

    let clusters = cluster_colors(&samples, 5, DEFAULT_MAX_ITERATIONS, &mut rng(11)).unwrap();
    let total: usize = clusters.iter().map(|c| c.count).sum();
    assert_eq!(total, samples.len());
  }

  #[test]
  fn identical_samples_collapse_to_one_populated_cluster() {
    let samples = vec![[40, 90, 200]; 25];
    let clusters = cluster_colors(&samples, 6, DEFAULT_MAX_ITERATIONS, &mut rng(3)).unwrap();

    let populated: Vec<_> = clusters.iter().filter(|c| c.count > 0).collect();
    assert_eq!(populated.len(), 1);
    assert_eq!(populated[0].count, 25);
    assert_eq!(populated[0].centroid, Vector3::new(40.0, 90.0, 200.0));
  }

  #[test]
  fn separates_two_colors_in_three_to_one_ratio() {
    let samples = [BLACK, BLACK, BLACK, WHITE];
    let clusters = cluster_colors(&samples, 6, DEFAULT_MAX_ITERATIONS, &mut rng(21)).unwrap();

    let mut populated: Vec<_> = clusters.iter().filter(|c| c.count > 0).collect();
    populated.sort_by(|a, b| b.count.cmp(&a.count));

    assert_eq!(populated.len(), 2);
    assert_eq!(populated[0].count, 3);
    assert_eq!(populated[0].centroid, Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(populated[1].count, 1);
    assert_eq!(populated[1].centroid, Vector3::new(255.0, 255.0, 255.0));
  }

  #[test]
  fn same_seed_reproduces_the_same_clusters() {
    let samples: Vec<Color> = (0..40)
      .map(|i| {
        let v = (i * 6) as u8;
        [v.wrapping_mul(3), v, 255 - v]
      })
      .collect();

    let first = cluster_colors(&samples, 4, DEFAULT_MAX_ITERATIONS, &mut rng(99)).unwrap();
    let second = cluster_colors(&samples, 4, DEFAULT_MAX_ITERATIONS, &mut rng(99)).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn converges_with_a_tight_iteration_budget() {
    let samples = [BLACK, WHITE, [10, 10, 10], [245, 245, 245]];
    let clusters = cluster_colors(&samples, 2, 1, &mut rng(5)).unwrap();
    let total: usize = clusters.iter().map(|c| c.count).sum();
    assert_eq!(total, samples.len());
  }
}
