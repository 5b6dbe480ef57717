//! Humlicek Voigt profile evaluation.
//!
//! Implements the W4 rational approximations (regions 0-3) with the CPF12
//! fallback near the core for small `y`. The profile is written in the
//! reduced variables
//!
//! ```text
//! x = sqrt(ln 2) (nu - nu0) / alpha_D
//! y = sqrt(ln 2) gamma_L / alpha_D
//! ```
//!
//! and each sample receives `S * sqrt(ln 2) / (alpha_D sqrt(pi)) * K(x, y)`,
//! where `K` is the real part of the Faddeeva function.

use crate::lineshape::LineShape;
use std::f64::consts::{FRAC_2_SQRT_PI, LN_2, PI};

// ============================================================================
// Constants
// ============================================================================

/// 1 / sqrt(pi)
const RSQRPI: f64 = 0.5 * FRAC_2_SQRT_PI;

/// Above this `y` the whole profile is Lorentzian.
pub const LORENTZ_LIMIT: f64 = 70.55;

/// Below this `y` the W4 regions 1 and 2 are bypassed.
const SMALL_Y: f64 = 1.0e-6;

/// Numerator of the region 3 rational (sqrt(pi) truncated).
const REGION3_SCALE: f64 = 1.7724538;

const CPF_Y0: f64 = 1.5;

/// `CPF_Y0 + CPF_Y0`, added to `y` as one term.
const CPF_Y0_2: f64 = 3.0;

const CPF_C: [f64; 6] = [
    1.0117281,
    -0.75197147,
    0.012557727,
    0.010022008,
    -0.00024206814,
    0.00000050084806,
];

const CPF_S: [f64; 6] = [
    1.393237,
    0.23115241,
    -0.15535147,
    0.0062183662,
    0.000091908299,
    -0.00000062752596,
];

const CPF_T: [f64; 6] = [
    0.31424038, 0.94778839, 1.5976826, 2.2795071, 3.0206370, 3.8897249,
];

// ============================================================================
// Region coefficients
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Region1 {
    a0: f64,
    d0: f64,
    d2: f64,
}

impl Region1 {
    fn new(yq: f64) -> Self {
        let a0 = yq + 0.5;
        Self {
            a0,
            d0: a0 * a0,
            d2: yq + yq - 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Region2 {
    h0: f64,
    h2: f64,
    h4: f64,
    h6: f64,
    e0: f64,
    e2: f64,
    e4: f64,
}

impl Region2 {
    fn new(yq: f64) -> Self {
        let h6 = -6.0 + yq * 4.0;
        Self {
            h0: 0.5625 + yq * (4.5 + yq * (10.5 + yq * (6.0 + yq))),
            h2: -4.5 + yq * (9.0 + yq * (6.0 + yq * 4.0)),
            h4: 10.5 - yq * (6.0 - yq * 6.0),
            h6,
            e0: 1.875 + yq * (8.25 + yq * (5.5 + yq)),
            e2: 5.25 + yq * (1.0 + yq * 3.0),
            e4: 0.75 * h6,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Region3 {
    z: [f64; 5],
    p: [f64; 5],
}

impl Region3 {
    #[rustfmt::skip]
    fn new(y: f64) -> Self {
        let z0 = 272.1014 + y * (1280.829 + y * (2802.870 + y * (3764.966
            + y * (3447.629 + y * (2256.981 + y * (1074.409 + y * (369.1989
            + y * (88.26741 + y * (13.39880 + y)))))))));
        let z2 = 211.678 + y * (902.3066 + y * (1758.336 + y * (2037.310
            + y * (1549.675 + y * (793.4273 + y * (266.2987
            + y * (53.59518 + y * 5.0)))))));
        let z4 = 78.86585 + y * (308.1852 + y * (497.3014 + y * (479.2576
            + y * (269.2916 + y * (80.39278 + y * 10.0)))));
        let z6 = 22.03523 + y * (55.02933 + y * (92.75679 + y * (53.59518
            + y * 10.0)));
        let z8 = 1.496460 + y * (13.39880 + y * 5.0);

        let p0 = 153.5168 + y * (549.3954 + y * (919.4955 + y * (946.8970
            + y * (662.8097 + y * (328.2151 + y * (115.3772 + y * (27.93941
            + y * (4.264678 + y * 0.3183291))))))));
        let p2 = -34.16955 + y * (-1.322256 + y * (124.5975 + y * (189.7730
            + y * (139.4665 + y * (56.81652 + y * (12.79458
            + y * 1.2733163))))));
        let p4 = 2.584042 + y * (10.46332 + y * (24.01655 + y * (29.81482
            + y * (12.79568 + y * 1.9099744))));
        let p6 = -0.07272979 + y * (0.9377051 + y * (4.266322 + y * 1.273316));
        let p8 = 0.0005480304 + y * 0.3183291;

        Self {
            z: [z0, z2, z4, z6, z8],
            p: [p0, p2, p4, p6, p8],
        }
    }
}

// ============================================================================
// Evaluator
// ============================================================================

/// Region thresholds for one `y`, with coefficients filled in the first time
/// a sample lands in the corresponding region.
///
/// Lives for a single line evaluation only; nothing is shared between calls.
struct Humlicek {
    y: f64,
    yq: f64,
    yrrtpi: f64,
    xlim0: f64,
    xlim1: f64,
    xlim2: f64,
    xlim3: f64,
    xlim4: f64,
    region1: Option<Region1>,
    region2: Option<Region2>,
    region3: Option<Region3>,
}

impl Humlicek {
    /// Valid for `y < LORENTZ_LIMIT`.
    fn new(y: f64) -> Self {
        let xlim0 = (15100.0 + y * (40.0 - y * 3.6)).sqrt();
        let mut xlim1 = if y >= 8.425 {
            0.0
        } else {
            (164.0 - y * (4.3 + y * 1.8)).sqrt()
        };
        let mut xlim2 = 6.8 - y;
        if y <= SMALL_Y {
            xlim1 = xlim0;
            xlim2 = xlim0;
        }

        Self {
            y,
            yq: y * y,
            yrrtpi: y * RSQRPI,
            xlim0,
            xlim1,
            xlim2,
            xlim3: 2.4 * y,
            xlim4: 18.1 * y + 1.65,
            region1: None,
            region2: None,
            region3: None,
        }
    }

    /// `K(x, y)` for the `y` this evaluator was built for.
    fn value(&mut self, x: f64) -> f64 {
        let abx = x.abs();
        let xq = abx * abx;
        let y = self.y;
        let yq = self.yq;

        if abx >= self.xlim0 {
            self.yrrtpi / (xq + yq)
        } else if abx >= self.xlim1 {
            let r = *self.region1.get_or_insert_with(|| Region1::new(yq));
            let d = RSQRPI / (r.d0 + xq * (r.d2 + xq));
            d * y * (r.a0 + xq)
        } else if abx >= self.xlim2 {
            let r = *self.region2.get_or_insert_with(|| Region2::new(yq));
            let d = RSQRPI / (r.h0 + xq * (r.h2 + xq * (r.h4 + xq * (r.h6 + xq))));
            d * y * (r.e0 + xq * (r.e2 + xq * (r.e4 + xq)))
        } else if abx < self.xlim3 {
            let r = *self.region3.get_or_insert_with(|| Region3::new(y));
            let [z0, z2, z4, z6, z8] = r.z;
            let [p0, p2, p4, p6, p8] = r.p;
            let d = REGION3_SCALE / (z0 + xq * (z2 + xq * (z4 + xq * (z6 + xq * (z8 + xq)))));
            d * (p0 + xq * (p2 + xq * (p4 + xq * (p6 + xq * p8))))
        } else {
            self.cpf12(x, abx <= self.xlim4, xq)
        }
    }

    /// Humlicek CPF12 near the core of weakly broadened lines.
    fn cpf12(&self, x: f64, inner: bool, xq: f64) -> f64 {
        let y = self.y;
        let ypy0 = y + CPF_Y0;
        let ypy0q = ypy0 * ypy0;
        let y0q = CPF_Y0 * CPF_Y0;
        let yf = y + CPF_Y0_2;

        let mut sum = 0.0;
        for j in 0..6 {
            let dm = x - CPF_T[j];
            let mq = dm * dm;
            let mf = 1.0 / (mq + ypy0q);
            let xm = mf * dm;
            let ym = mf * ypy0;

            let dp = x + CPF_T[j];
            let pq = dp * dp;
            let pf = 1.0 / (pq + ypy0q);
            let xp = pf * dp;
            let yp = pf * ypy0;

            if inner {
                sum += CPF_C[j] * (ym + yp) - CPF_S[j] * (xm - xp);
            } else {
                sum += (CPF_C[j] * (mq * mf - CPF_Y0 * ym) + CPF_S[j] * yf * xm) / (mq + y0q)
                    + (CPF_C[j] * (pq * pf - CPF_Y0 * yp) - CPF_S[j] * yf * xp) / (pq + y0q);
            }
        }

        if inner {
            sum
        } else {
            y * sum + (-xq).exp()
        }
    }
}

/// Real part of the Faddeeva function, `K(x, y)`, via Humlicek's scheme.
///
/// Normalized so that the integral over `x` is `sqrt(pi)`.
pub fn voigt_function(x: f64, y: f64) -> f64 {
    if y >= LORENTZ_LIMIT {
        y * RSQRPI / (x * x + y * y)
    } else {
        Humlicek::new(y).value(x)
    }
}

/// Adds one line's Voigt profile to `k[start..=end]`.
///
/// `wavenumbers` are the grid samples; `k` is the absorption buffer of the
/// same length. Values already in `k` are preserved and added to.
pub fn evaluate(
    wavenumbers: &[f64],
    start: usize,
    end: usize,
    line: &LineShape,
    k: &mut [f64],
) {
    debug_assert!(start <= end && end < wavenumbers.len() && end < k.len());

    let alpha = line.doppler_hwhm;
    if !(alpha > 0.0) {
        log::trace!("Skipping line at {} with Doppler width {}", line.center, alpha);
        return;
    }

    let repwid = LN_2.sqrt() / alpha;
    let y = repwid * line.lorentz_hwhm;
    let samples = wavenumbers[start..=end].iter().zip(&mut k[start..=end]);

    if y >= LORENTZ_LIMIT {
        let yq = y * y;
        let scale = line.strength * repwid * y / PI;
        for (nu, value) in samples {
            let x = (nu - line.center) * repwid;
            *value += scale / (x * x + yq);
        }
        return;
    }

    let mut profile = Humlicek::new(y);
    let scale = line.strength * RSQRPI * repwid;
    for (nu, value) in samples {
        let x = (nu - line.center) * repwid;
        *value += scale * profile.value(x);
    }
}

/// Subtracts `min(k[start], k[end])` from every sample in `k[start..=end]`.
///
/// Applied right after a line is evaluated so that the truncated profile
/// goes to zero at the lower of its two window edges.
pub fn remove_pedestal(k: &mut [f64], start: usize, end: usize) {
    let pedestal = k[start].min(k[end]);
    for value in &mut k[start..=end] {
        *value -= pedestal;
    }
}

/// Area-normalized Lorentz profile at offset `dnu` [cm-1] from center.
pub fn lorentz_profile(dnu: f64, gamma: f64) -> f64 {
    gamma / (PI * (dnu * dnu + gamma * gamma))
}

/// Area-normalized Doppler (Gaussian) profile with half-width `alpha`.
pub fn doppler_profile(dnu: f64, alpha: f64) -> f64 {
    (LN_2 / PI).sqrt() / alpha * (-LN_2 * dnu * dnu / (alpha * alpha)).exp()
}
