use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::linalg::{vec3, Vec3};

/// Entries in the doubled permutation table.
pub const PERMUTATION_LEN: usize = 512;

/// Ken Perlin's improved gradient noise over a seeded permutation table.
///
/// The generator is immutable while sampling, so `&Perlin` can be shared
/// across threads; reseeding takes `&mut self`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Perlin {
    perm: Box<[u8]>,
    seed: u64,
}

impl Default for Perlin {
    fn default() -> Self {
        Self::new()
    }
}

/// Nanoseconds since the Unix epoch, or zero past the representable range.
fn clock_seed() -> u64 {
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64
}

/// `0..=255` shuffled by a generator seeded from `seed`, then repeated once
/// so lookups of `perm[i] + j` never wrap.
fn permutation(seed: u64) -> Box<[u8]> {
    let mut base: Vec<u8> = (0..=255).collect();
    base.shuffle(&mut StdRng::seed_from_u64(seed));
    base.iter().chain(base.iter()).copied().collect()
}

#[inline(always)]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline(always)]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of the offset with one of twelve cube-edge gradients; the
/// last four cases repeat gradients to fill sixteen slots.
#[inline(always)]
fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    match hash & 0xF {
        0x0 => x + y,
        0x1 => -x + y,
        0x2 => x - y,
        0x3 => -x - y,
        0x4 => x + z,
        0x5 => -x + z,
        0x6 => x - z,
        0x7 => -x - z,
        0x8 => y + z,
        0x9 => -y + z,
        0xA => y - z,
        0xB => -y - z,
        0xC => y + x,
        0xD => -y + z,
        0xE => y - x,
        _ => -y - z,
    }
}

impl Perlin {
    /// A generator seeded from the wall clock.
    pub fn new() -> Self {
        Self::with_seed(clock_seed())
    }

    pub fn with_seed(seed: u64) -> Self {
        tracing::debug!(seed, source = "explicit", "seeding perlin permutation");
        Perlin {
            perm: permutation(seed),
            seed,
        }
    }

    /// Rebuilds the permutation table from `seed`.
    pub fn seed(&mut self, seed: u64) {
        tracing::debug!(seed, source = "explicit", "reseeding perlin permutation");
        self.perm = permutation(seed);
        self.seed = seed;
    }

    /// Rebuilds the permutation table from the wall clock and returns the
    /// seed that was used.
    pub fn reseed(&mut self) -> u64 {
        let seed = clock_seed();
        tracing::debug!(seed, source = "clock", "reseeding perlin permutation");
        self.perm = permutation(seed);
        self.seed = seed;
        seed
    }

    /// The seed of the current permutation table.
    pub fn current_seed(&self) -> u64 {
        self.seed
    }

    pub fn permutation(&self) -> &[u8] {
        &self.perm
    }

    /// Noise at `point`.
    ///
    /// Zero at every integer lattice point. Values are typically within
    /// `[-1, 1]`; the range is not clamped.
    pub fn get_noise(&self, point: Vec3<f64>) -> f64 {
        let p = &self.perm;
        let (fx, fy, fz) = (point[0].floor(), point[1].floor(), point[2].floor());

        let xi = (fx as i64 & 255) as usize;
        let yi = (fy as i64 & 255) as usize;
        let zi = (fz as i64 & 255) as usize;

        let (x, y, z) = (point[0] - fx, point[1] - fy, point[2] - fz);
        let (u, v, w) = (fade(x), fade(y), fade(z));

        let a = p[xi] as usize + yi;
        let aa = p[a] as usize + zi;
        let ab = p[a + 1] as usize + zi;
        let b = p[xi + 1] as usize + yi;
        let ba = p[b] as usize + zi;
        let bb = p[b + 1] as usize + zi;

        lerp(
            w,
            lerp(
                v,
                lerp(u, grad(p[aa], x, y, z), grad(p[ba], x - 1.0, y, z)),
                lerp(u, grad(p[ab], x, y - 1.0, z), grad(p[bb], x - 1.0, y - 1.0, z)),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad(p[aa + 1], x, y, z - 1.0),
                    grad(p[ba + 1], x - 1.0, y, z - 1.0),
                ),
                lerp(
                    u,
                    grad(p[ab + 1], x, y - 1.0, z - 1.0),
                    grad(p[bb + 1], x - 1.0, y - 1.0, z - 1.0),
                ),
            ),
        )
    }

    /// Fractal sum of `octaves` noise layers. Each layer doubles the frequency
    /// and scales the amplitude by `persistence`; the sum is divided by the
    /// total amplitude. Returns `0.0` when `octaves == 0`.
    pub fn get_octave_noise(&self, point: Vec3<f64>, octaves: u32, persistence: f64) -> f64 {
        if octaves == 0 {
            return 0.0;
        }

        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut max_value = 0.0;
        for _ in 0..octaves {
            total += self.get_noise(point * frequency) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }
        total / max_value
    }

    fn fill_slice(&self, slice: &mut [f64], grid: &Grid, z: usize) {
        let [nx, _, _] = grid.dims;
        let pz = grid.origin[2] + z as f64 * grid.step;
        for (y, row) in slice.chunks_exact_mut(nx).enumerate() {
            let py = grid.origin[1] + y as f64 * grid.step;
            for (x, out) in row.iter_mut().enumerate() {
                let px = grid.origin[0] + x as f64 * grid.step;
                *out = self.get_noise(vec3(px, py, pz));
            }
        }
    }

    /// Noise over `grid`, x fastest then y then z.
    pub fn sample_grid(&self, grid: &Grid) -> Vec<f64> {
        tracing::debug!(dims = ?grid.dims, step = grid.step, "sampling perlin grid");
        let mut out = vec![0.0; grid.len()];
        let slice_len = grid.slice_len();
        if slice_len == 0 {
            return out;
        }
        for (z, slice) in out.chunks_exact_mut(slice_len).enumerate() {
            self.fill_slice(slice, grid, z);
        }
        out
    }

    /// [`sample_grid`](Self::sample_grid) with z-slices spread over the rayon
    /// pool. The output is identical.
    pub fn par_sample_grid(&self, grid: &Grid) -> Vec<f64> {
        tracing::debug!(dims = ?grid.dims, step = grid.step, "sampling perlin grid in parallel");
        let mut out = vec![0.0; grid.len()];
        let slice_len = grid.slice_len();
        if slice_len == 0 {
            return out;
        }
        out.par_chunks_mut(slice_len)
            .enumerate()
            .for_each(|(z, slice)| self.fill_slice(slice, grid, z));
        out
    }
}

/// Regular lattice of `dims[0] * dims[1] * dims[2]` points starting at
/// `origin` with spacing `step` on every axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    pub origin: Vec3<f64>,
    pub step: f64,
    pub dims: [usize; 3],
}

impl Grid {
    pub fn new(origin: Vec3<f64>, step: f64, dims: [usize; 3]) -> Self {
        Grid { origin, step, dims }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slice_len(&self) -> usize {
        self.dims[0] * self.dims[1]
    }

    /// Offset of point `(x, y, z)` in a sampled buffer.
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.dims[0] * (y + self.dims[1] * z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permutation_is_doubled_shuffle() {
        let perlin = Perlin::with_seed(7);
        let p = perlin.permutation();
        assert_eq!(p.len(), PERMUTATION_LEN);
        assert_eq!(p[..256], p[256..]);
        let mut sorted = p[..256].to_vec();
        sorted.sort_unstable();
        assert!(sorted.iter().copied().eq(0..=255));
    }

    #[test]
    fn test_lattice_points_are_zero() {
        let perlin = Perlin::with_seed(42);
        for point in [vec3(0.0, 0.0, 0.0), vec3(3.0, -7.0, 12.0), vec3(255.0, 256.0, -1.0)] {
            assert_eq!(perlin.get_noise(point), 0.0);
        }
    }

    #[test]
    fn test_grad_table_symmetry() {
        assert_eq!(grad(0xC, 1.0, 2.0, 3.0), grad(0x0, 1.0, 2.0, 3.0));
        assert_eq!(grad(0xD, 1.0, 2.0, 3.0), grad(0x9, 1.0, 2.0, 3.0));
        assert_eq!(grad(0xE, 1.0, 2.0, 3.0), grad(0x1, 1.0, 2.0, 3.0));
        assert_eq!(grad(0xF, 1.0, 2.0, 3.0), grad(0xB, 1.0, 2.0, 3.0));
        assert_eq!(grad(0x1F, 1.0, 2.0, 3.0), grad(0xF, 1.0, 2.0, 3.0));
    }

    #[test]
    fn test_reseed_changes_table_and_seed() {
        let mut perlin = Perlin::with_seed(1);
        let before = perlin.clone();
        perlin.seed(2);
        assert_eq!(perlin.current_seed(), 2);
        assert_ne!(perlin.permutation(), before.permutation());
        perlin.seed(1);
        assert_eq!(perlin, before);
    }

    #[test]
    fn test_zero_octaves() {
        let perlin = Perlin::with_seed(3);
        assert_eq!(perlin.get_octave_noise(vec3(0.3, 0.6, 0.9), 0, 0.5), 0.0);
    }

    #[test]
    fn test_empty_grid() {
        let perlin = Perlin::with_seed(3);
        let grid = Grid::new(vec3(0.0, 0.0, 0.0), 0.5, [0, 4, 4]);
        assert!(grid.is_empty());
        assert!(perlin.sample_grid(&grid).is_empty());
        assert!(perlin.par_sample_grid(&grid).is_empty());
    }
}
