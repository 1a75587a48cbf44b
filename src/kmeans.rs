use crate::{
    error::{Error, Result},
    swatch::Swatch,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{cmp::Reverse, collections::HashMap};

type Rgb = (u8, u8, u8);

pub struct KMeansQuantizer<'a> {
    pixels: &'a [Rgb],
    color_count: usize,
    seed: u64,
    max_iterations: usize,
}

#[derive(Debug)]
pub struct Quantized {
    pub swatches: Vec<Swatch>,
    pub iterations: usize,
    pub converged: bool,
}

impl<'a> KMeansQuantizer<'a> {
    pub fn new(pixels: &'a [Rgb], color_count: usize, seed: u64, max_iterations: usize) -> Self {
        Self {
            pixels,
            color_count,
            seed,
            max_iterations,
        }
    }

    pub fn get_quantized_colors(self) -> Result<Quantized> {
        if self.pixels.is_empty() {
            return Err(Error::EmptyInput);
        }

        // identical pixels always land in the same cluster, so the clustering runs over the distinct colors weighted
        // by how often they occur instead of over every single pixel
        let colors = histogram(self.pixels);

        if self.color_count == 0 || self.color_count > colors.len() {
            return Err(Error::InvalidParameter {
                k: self.color_count,
                samples: self.pixels.len(),
                distinct: colors.len(),
            });
        }

        tracing::debug!(
            samples = self.pixels.len(),
            distinct = colors.len(),
            k = self.color_count,
            "clustering samples"
        );

        let mut centroids = self.seed_centroids(&colors);
        let mut assignments = vec![usize::MAX; colors.len()];
        let mut iterations = 0;
        let mut converged = false;

        // at least one pass is needed for every color to have an assignment
        while iterations < self.max_iterations.max(1) {
            iterations += 1;

            let reassigned = assign_colors(&colors, &centroids, &mut assignments);
            tracing::trace!(iteration = iterations, reassigned, "assignment step");

            if reassigned == 0 {
                converged = true;
                break;
            }

            update_centroids(&colors, &assignments, &mut centroids);
        }

        if converged {
            tracing::debug!(iterations, "k-means converged");
        } else {
            tracing::warn!(iterations, "k-means stopped at the iteration cap before converging");
        }

        let mut populations = vec![0u32; centroids.len()];
        for ((_, count), &cluster) in colors.iter().zip(&assignments) {
            populations[cluster] += count;
        }

        let mut swatches = centroids
            .iter()
            .zip(populations)
            .map(|(&centroid, population)| Swatch::from_centroid(centroid, population))
            .collect::<Vec<_>>();

        // stable, so clusters with equal populations keep the order they were seeded in
        swatches.sort_by_key(|swatch| Reverse(swatch.population()));

        Ok(Quantized {
            swatches,
            iterations,
            converged,
        })
    }

    fn seed_centroids(&self, colors: &[(Rgb, u32)]) -> Vec<[f64; 3]> {
        // k-means++: the first center is drawn by population, every following one by population times the squared
        // distance to the closest center picked so far. picked colors weigh zero, so every center is a distinct color
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = Vec::with_capacity(self.color_count);
        let mut nearest = vec![u64::MAX; colors.len()];

        while centroids.len() < self.color_count {
            let weights = colors
                .iter()
                .zip(&nearest)
                .map(|((_, count), &distance)| {
                    if distance == u64::MAX {
                        *count as u64
                    } else {
                        *count as u64 * distance
                    }
                })
                .collect::<Vec<_>>();

            // only reachable if every color is already a center, which the color count check rules out
            let Some(picked) = pick_weighted(&mut rng, &weights) else {
                break;
            };

            let (center, _) = colors[picked];
            for ((color, _), distance) in colors.iter().zip(nearest.iter_mut()) {
                *distance = (*distance).min(squared_distance(*color, center));
            }

            centroids.push(to_centroid(center));
        }

        centroids
    }
}

fn histogram(pixels: &[Rgb]) -> Vec<(Rgb, u32)> {
    let mut hist = HashMap::new();
    for pixel in pixels {
        *hist.entry(*pixel).or_insert(0) += 1;
    }

    // hash map order isn't stable between runs, so order the colors by their channels with red the most significant
    let mut colors = hist.into_iter().collect::<Vec<_>>();
    colors.sort_unstable_by_key(|&(rgb, _)| rgb);
    colors
}

fn pick_weighted(rng: &mut StdRng, weights: &[u64]) -> Option<usize> {
    let total = weights.iter().sum::<u64>();
    if total == 0 {
        return None;
    }

    let target = rng.gen_range(0..total);
    let mut cumulative = 0u64;

    weights.iter().position(|&weight| {
        cumulative += weight;
        cumulative > target
    })
}

/// Assign every color to its nearest centroid, returning how many colors changed cluster.
fn assign_colors(colors: &[(Rgb, u32)], centroids: &[[f64; 3]], assignments: &mut [usize]) -> usize {
    let mut reassigned = 0;

    for ((color, _), assignment) in colors.iter().zip(assignments.iter_mut()) {
        let nearest = nearest_centroid(to_centroid(*color), centroids);

        if *assignment != nearest {
            *assignment = nearest;
            reassigned += 1;
        }
    }

    reassigned
}

fn nearest_centroid(color: [f64; 3], centroids: &[[f64; 3]]) -> usize {
    let mut nearest = 0;
    let mut nearest_distance = f64::INFINITY;

    for (index, centroid) in centroids.iter().enumerate() {
        let distance = (0..3).map(|c| (color[c] - centroid[c]).powi(2)).sum::<f64>();

        // strict comparison: on a tie the lowest index wins
        if distance < nearest_distance {
            nearest = index;
            nearest_distance = distance;
        }
    }

    nearest
}

/// Move every centroid to the mean of the colors assigned to it. A centroid without colors stays where it is.
fn update_centroids(colors: &[(Rgb, u32)], assignments: &[usize], centroids: &mut [[f64; 3]]) {
    let mut sums = vec![([0u64; 3], 0u64); centroids.len()];

    for (((r, g, b), count), &cluster) in colors.iter().zip(assignments) {
        let count = *count as u64;
        let (sum, population) = &mut sums[cluster];

        sum[0] += *r as u64 * count;
        sum[1] += *g as u64 * count;
        sum[2] += *b as u64 * count;
        *population += count;
    }

    for (centroid, (sum, population)) in centroids.iter_mut().zip(sums) {
        if population > 0 {
            *centroid = sum.map(|channel| channel as f64 / population as f64);
        }
    }
}

fn squared_distance((r1, g1, b1): Rgb, (r2, g2, b2): Rgb) -> u64 {
    let dr = r1 as i64 - r2 as i64;
    let dg = g1 as i64 - g2 as i64;
    let db = b1 as i64 - b2 as i64;

    (dr * dr + dg * dg + db * db) as u64
}

fn to_centroid((r, g, b): Rgb) -> [f64; 3] {
    [r as f64, g as f64, b as f64]
}
