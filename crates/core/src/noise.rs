//! Seeded gradient noise: Perlin, Simplex, fractal sums, domain warping and
//! curl-like turbulence.
//!
//! A [`NoiseKernel`] owns its permutation table. Build one per render from
//! the context seed; it is immutable afterwards and safe to share across
//! worker threads.

use crate::prng::Xorshift64;
use std::f64::consts::TAU;

/// Simplex skew factor `(√3 − 1) / 2`.
const F2: f64 = 0.366_025_403_784_438_6;
/// Simplex unskew factor `(3 − √3) / 6`.
const G2: f64 = 0.211_324_865_405_187_1;

/// Twelve gradient directions for simplex noise (x, y pairs; the cube edge
/// set projected onto the plane).
const GRAD3: [[f64; 2]; 12] = [
    [1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [-1.0, -1.0],
    [1.0, 0.0],
    [-1.0, 0.0],
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
    [0.0, 1.0],
    [0.0, -1.0],
];

/// Seeded 2D noise source.
#[derive(Debug, Clone)]
pub struct NoiseKernel {
    seed: u64,
    perm: [u8; 512],
}

impl NoiseKernel {
    /// Builds the permutation table: a Fisher–Yates shuffle of 0..256 driven
    /// by [`Xorshift64`] seeded with `seed`, duplicated to 512 entries.
    pub fn new(seed: u64) -> Self {
        let mut p: Vec<u8> = (0..=255).collect();
        Xorshift64::new(seed).shuffle(&mut p);
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = p[i & 255];
        }
        Self { seed, perm }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    fn p(&self, i: usize) -> usize {
        self.perm[i] as usize
    }

    #[inline]
    fn fade(t: f64) -> f64 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    #[inline]
    fn lerp(t: f64, a: f64, b: f64) -> f64 {
        a + t * (b - a)
    }

    // Low four bits pick one of twelve edge gradients (four repeated).
    #[inline]
    fn grad(hash: usize, x: f64, y: f64) -> f64 {
        let h = hash & 15;
        let u = if h < 8 { x } else { y };
        let v = if h < 4 {
            y
        } else if h == 12 || h == 14 {
            x
        } else {
            0.0
        };
        (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
    }

    /// Classic 2D Perlin noise, roughly in [-1, 1]. Zero on every lattice point.
    pub fn perlin(&self, x: f64, y: f64) -> f64 {
        let fx = x.floor();
        let fy = y.floor();
        let xi = (fx as i64 & 255) as usize;
        let yi = (fy as i64 & 255) as usize;
        let x = x - fx;
        let y = y - fy;
        let u = Self::fade(x);
        let v = Self::fade(y);

        let a = self.p(xi) + yi;
        let b = self.p(xi + 1) + yi;

        Self::lerp(
            v,
            Self::lerp(
                u,
                Self::grad(self.p(a), x, y),
                Self::grad(self.p(b), x - 1.0, y),
            ),
            Self::lerp(
                u,
                Self::grad(self.p(a + 1), x, y - 1.0),
                Self::grad(self.p(b + 1), x - 1.0, y - 1.0),
            ),
        )
    }

    /// 2D simplex noise, roughly in [-1, 1].
    pub fn simplex(&self, x: f64, y: f64) -> f64 {
        let s = (x + y) * F2;
        let i = (x + s).floor();
        let j = (y + s).floor();
        let t = (i + j) * G2;
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + G2;
        let y1 = y0 - j1 as f64 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;

        let corner = |gi: usize, cx: f64, cy: f64| {
            let t = 0.5 - cx * cx - cy * cy;
            if t < 0.0 {
                return 0.0;
            }
            let t = t * t;
            let g = GRAD3[gi % 12];
            t * t * (cx * g[0] + cy * g[1])
        };

        let n0 = corner(self.p(ii + self.p(jj)), x0, y0);
        let n1 = corner(self.p(ii + i1 + self.p(jj + j1)), x1, y1);
        let n2 = corner(self.p(ii + 1 + self.p(jj + 1)), x2, y2);

        70.0 * (n0 + n1 + n2)
    }

    /// Fractal Brownian motion over Perlin noise, normalized by the amplitude sum.
    pub fn fbm(&self, x: f64, y: f64, octaves: u32, persistence: f64) -> f64 {
        self.fractal_sum(x, y, octaves, persistence, |nx, ny| self.perlin(nx, ny))
    }

    /// Fractal Brownian motion over simplex noise, normalized by the amplitude sum.
    pub fn fbm_simplex(&self, x: f64, y: f64, octaves: u32, persistence: f64) -> f64 {
        self.fractal_sum(x, y, octaves, persistence, |nx, ny| self.simplex(nx, ny))
    }

    fn fractal_sum(
        &self,
        x: f64,
        y: f64,
        octaves: u32,
        persistence: f64,
        basis: impl Fn(f64, f64) -> f64,
    ) -> f64 {
        let mut total = 0.0;
        let mut amp = 1.0;
        let mut freq = 1.0;
        let mut max = 0.0;
        for _ in 0..octaves {
            total += basis(x * freq, y * freq) * amp;
            max += amp;
            amp *= persistence;
            freq *= 2.0;
        }
        if max == 0.0 {
            0.0
        } else {
            total / max
        }
    }

    /// Two-level domain warp: FBM evaluated at `p + amount·r`, where `r` is an
    /// FBM field sampled at `p + amount·q` and `q` is an FBM field at `p`.
    pub fn domain_warp(&self, x: f64, y: f64, amount: f64, octaves: u32) -> f64 {
        let qx = self.fbm(x, y, octaves, 0.5);
        let qy = self.fbm(x + 5.2, y + 1.3, octaves, 0.5);

        let wx = x + amount * qx;
        let wy = y + amount * qy;
        let rx = self.fbm(wx + 1.7, wy + 9.2, octaves, 0.5);
        let ry = self.fbm(wx + 8.3, wy + 2.8, octaves, 0.5);

        self.fbm(x + amount * rx, y + amount * ry, octaves, 0.5)
    }

    /// Curl-like turbulence: accumulates unit vectors whose angle is driven by
    /// simplex noise per octave, then samples simplex at the displaced point.
    pub fn curl_turbulence(
        &self,
        x: f64,
        y: f64,
        octaves: u32,
        persistence: f64,
        time: f64,
    ) -> f64 {
        let mut dx = 0.0;
        let mut dy = 0.0;
        let mut amp = 1.0;
        let mut freq = 1.0;
        for _ in 0..octaves {
            let angle = self.simplex(x * freq + time, y * freq) * TAU;
            dx += angle.cos() * amp;
            dy += angle.sin() * amp;
            amp *= persistence;
            freq *= 2.0;
        }
        self.simplex(x + dx, y + dy)
    }
}
