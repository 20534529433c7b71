//! Gaussian kernel density estimation.
//!
//! Used to overlay iso-density contours on top of the
//! position scatter plot, and to draw marginal distributions.
//! Kernel bandwidths follow Scott's rule, independently on each axis.
use statrs::{
    distribution::{Continuous, Normal},
    statistics::Statistics,
};

use crate::constants::DENSITY_THRESHOLD;

/// A contour line segment, in plot coordinates
pub type Segment = ((f64, f64), (f64, f64));

/// Scott's rule of thumb bandwidth, for a `dims`-dimensional dataset.
/// None when the dataset has no spread.
pub fn scott_bandwidth(data: &[f64], dims: u8) -> Option<f64> {
    let n = data.len() as f64;
    let h = data.iter().population_std_dev() * n.powf(-1.0 / (dims as f64 + 4.0));
    if h.is_finite() && h > 0.0 {
        Some(h)
    } else {
        None
    }
}

/// Standard normal kernel
fn kernel() -> Option<Normal> {
    Normal::new(0.0, 1.0).ok()
}

/// Returns `resolution` equally spaced nodes, spanning bounds (inclusive).
fn linspace(bounds: (f64, f64), resolution: usize) -> Vec<f64> {
    let step = (bounds.1 - bounds.0) / (resolution - 1) as f64;
    (0..resolution)
        .map(|k| bounds.0 + k as f64 * step)
        .collect()
}

/// Estimates the 1D density of this dataset, on `resolution` nodes
/// spanning given bounds. Returns (node, density) pairs.
/// None when the dataset is degenerate (empty or no spread).
pub fn marginal(data: &[f64], bounds: (f64, f64), resolution: usize) -> Option<Vec<(f64, f64)>> {
    if resolution < 2 || bounds.1 <= bounds.0 {
        return None;
    }
    let h = scott_bandwidth(data, 1)?;
    let kernel = kernel()?;
    let n = data.len() as f64;
    let curve = linspace(bounds, resolution)
        .into_iter()
        .map(|node| {
            let sum: f64 = data.iter().map(|x| kernel.pdf((node - x) / h)).sum();
            (node, sum / (n * h))
        })
        .collect();
    Some(curve)
}

/// [DensityGrid] is a 2D density estimate, sampled on a square grid.
#[derive(Debug, Clone)]
pub struct DensityGrid {
    /// Grid nodes, identical on both axes
    pub nodes: Vec<f64>,
    /// Density values, row major: `values[j * nodes.len() + i]`
    /// is the density at (nodes[i], nodes[j]).
    pub values: Vec<f64>,
    /// Kernel bandwidth along (x, y)
    pub bandwidth: (f64, f64),
}

impl DensityGrid {
    /// Estimates the density of given points on a `resolution` x `resolution` grid
    /// spanning bounds, on both axes.
    /// None when the dataset is degenerate along any axis.
    pub fn estimate(points: &[(f64, f64)], bounds: (f64, f64), resolution: usize) -> Option<Self> {
        if resolution < 2 || bounds.1 <= bounds.0 {
            return None;
        }

        let x: Vec<f64> = points.iter().map(|p| p.0).collect();
        let y: Vec<f64> = points.iter().map(|p| p.1).collect();
        let hx = scott_bandwidth(&x, 2)?;
        let hy = scott_bandwidth(&y, 2)?;
        let kernel = kernel()?;

        let nodes = linspace(bounds, resolution);

        // the kernel is separable: precompute each axis contribution
        let wx: Vec<Vec<f64>> = x
            .iter()
            .map(|x| nodes.iter().map(|node| kernel.pdf((node - x) / hx)).collect())
            .collect();
        let wy: Vec<Vec<f64>> = y
            .iter()
            .map(|y| nodes.iter().map(|node| kernel.pdf((node - y) / hy)).collect())
            .collect();

        let norm = points.len() as f64 * hx * hy;
        let mut values = vec![0.0_f64; resolution * resolution];
        for (wx, wy) in wx.iter().zip(wy.iter()) {
            for (j, wy) in wy.iter().enumerate() {
                let row = &mut values[j * resolution..(j + 1) * resolution];
                for (value, wx) in row.iter_mut().zip(wx.iter()) {
                    *value += wx * wy;
                }
            }
        }
        for value in values.iter_mut() {
            *value /= norm;
        }

        Some(Self {
            nodes,
            values,
            bandwidth: (hx, hy),
        })
    }

    /// Grid resolution (number of nodes per axis)
    pub fn resolution(&self) -> usize {
        self.nodes.len()
    }

    /// Density at node (i, j)
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[j * self.nodes.len() + i]
    }

    /// Returns the density threshold under which lies
    /// the given proportion of the estimated probability mass.
    fn quantile_to_level(&self, sorted: &[f64], total: f64, quantile: f64) -> f64 {
        let mut cumsum = 0.0;
        for value in sorted {
            cumsum += value;
            if cumsum / total >= quantile {
                return *value;
            }
        }
        sorted.last().copied().unwrap_or(0.0)
    }

    /// Returns `n` iso-proportion density levels, in ascending order.
    /// The outermost contour leaves out [DENSITY_THRESHOLD] of the probability mass.
    /// Levels that would not produce any contour are omitted.
    pub fn levels(&self, n: usize) -> Vec<f64> {
        if n == 0 {
            return Vec::new();
        }
        let mut sorted = self.values.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let total: f64 = sorted.iter().sum();
        let peak = sorted.last().copied().unwrap_or(0.0);
        if total <= 0.0 {
            return Vec::new();
        }

        let mut levels: Vec<f64> = (0..n)
            .map(|k| {
                let quantile = if n > 1 {
                    DENSITY_THRESHOLD + k as f64 * (1.0 - DENSITY_THRESHOLD) / (n - 1) as f64
                } else {
                    DENSITY_THRESHOLD
                };
                self.quantile_to_level(&sorted, total, quantile)
            })
            .filter(|level| *level > 0.0 && *level < peak)
            .collect();
        levels.dedup();
        levels
    }

    /// Extracts the iso-density line at given level (marching squares).
    pub fn contour(&self, level: f64) -> Vec<Segment> {
        let res = self.nodes.len();
        let mut segments = Vec::new();

        // point on the edge between two nodes, linearly interpolated
        let interp = |pa: (f64, f64), va: f64, pb: (f64, f64), vb: f64| {
            let t = if vb != va { (level - va) / (vb - va) } else { 0.5 };
            (pa.0 + t * (pb.0 - pa.0), pa.1 + t * (pb.1 - pa.1))
        };

        for j in 0..res - 1 {
            for i in 0..res - 1 {
                let p = [
                    (self.nodes[i], self.nodes[j]),
                    (self.nodes[i + 1], self.nodes[j]),
                    (self.nodes[i + 1], self.nodes[j + 1]),
                    (self.nodes[i], self.nodes[j + 1]),
                ];
                let v = [
                    self.value(i, j),
                    self.value(i + 1, j),
                    self.value(i + 1, j + 1),
                    self.value(i, j + 1),
                ];

                let case = v
                    .iter()
                    .enumerate()
                    .fold(0, |case, (k, v)| if *v > level { case | (1 << k) } else { case });

                if case == 0 || case == 15 {
                    continue;
                }

                // bottom, right, top, left edges
                let e = [
                    interp(p[0], v[0], p[1], v[1]),
                    interp(p[1], v[1], p[2], v[2]),
                    interp(p[3], v[3], p[2], v[2]),
                    interp(p[0], v[0], p[3], v[3]),
                ];

                match case {
                    1 | 14 => segments.push((e[3], e[0])),
                    2 | 13 => segments.push((e[0], e[1])),
                    3 | 12 => segments.push((e[3], e[1])),
                    4 | 11 => segments.push((e[1], e[2])),
                    6 | 9 => segments.push((e[0], e[2])),
                    7 | 8 => segments.push((e[3], e[2])),
                    5 => {
                        segments.push((e[3], e[0]));
                        segments.push((e[1], e[2]));
                    },
                    10 => {
                        segments.push((e[0], e[1]));
                        segments.push((e[2], e[3]));
                    },
                    _ => {},
                }
            }
        }
        segments
    }
}
