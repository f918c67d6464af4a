//! Seeded Perlin gradient noise.
//!
//! ```rust
//! use lanemath::linalg::vec3;
//! use lanemath::noise::{Grid, Perlin};
//!
//! let perlin = Perlin::with_seed(2024);
//! let n = perlin.get_noise(vec3(0.5, 1.25, -3.75));
//! assert_eq!(n, Perlin::with_seed(2024).get_noise(vec3(0.5, 1.25, -3.75)));
//!
//! let grid = Grid::new(vec3(0.0, 0.0, 0.0), 0.1, [8, 8, 2]);
//! assert_eq!(perlin.sample_grid(&grid), perlin.par_sample_grid(&grid));
//! ```

pub mod perlin;

pub use perlin::{Grid, Perlin, PERMUTATION_LEN};
