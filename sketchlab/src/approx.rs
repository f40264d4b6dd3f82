// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Normal approximation to the binomial distribution.
//!
//! A binomial distribution with `n` trials and success probability `p` is
//! approximated by a normal distribution with mean `np` and variance
//! `np(1 - p)`. The approximation improves as `n` grows and degrades as `p`
//! approaches 0 or 1.
//!
//! # Usage
//!
//! ```rust
//! use sketchlab::approx::NormalApproximation;
//!
//! let approx = NormalApproximation::new(100, 0.1, 10).unwrap();
//! assert_eq!(approx.mean(), 10.0);
//! assert!(approx.max_abs_error() < 0.01);
//! ```

use std::f64::consts::PI;

use crate::error::Error;

/// Upper bound on the number of trials of a binomial distribution.
pub const MAX_TRIALS: u64 = 1 << 20;

/// Upper bound on the number of samples in a PDF grid.
pub const MAX_GRID_POINTS: u64 = 1 << 26;

/// Binomial probability mass function over the support `0..=n`.
///
/// Terms are evaluated in log space, so large `n` does not underflow to an
/// all-zero vector.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter)
/// if `n` is 0 or above [`MAX_TRIALS`], or `p` is not in (0, 1).
///
/// # Examples
///
/// ```
/// # use sketchlab::approx::binomial_pmf;
/// let pmf = binomial_pmf(2, 0.5).unwrap();
/// assert_eq!(pmf.len(), 3);
/// assert!((pmf[1] - 0.5).abs() < 1e-12);
/// ```
pub fn binomial_pmf(n: u64, p: f64) -> Result<Vec<f64>, Error> {
    validate_binomial(n, p)?;

    let ln_factorial = ln_factorials(n);
    let ln_n = ln_factorial[n as usize];
    let ln_p = p.ln();
    let ln_q = (-p).ln_1p();

    Ok((0..=n as usize)
        .map(|k| {
            let ln_choose = ln_n - ln_factorial[k] - ln_factorial[n as usize - k];
            (ln_choose + k as f64 * ln_p + (n as usize - k) as f64 * ln_q).exp()
        })
        .collect())
}

/// `ln(i!)` for `i` in `0..=n`.
fn ln_factorials(n: u64) -> Vec<f64> {
    let mut table = Vec::with_capacity(n as usize + 1);
    let mut acc = 0.0;
    table.push(acc);
    for i in 1..=n {
        acc += (i as f64).ln();
        table.push(acc);
    }
    table
}

fn validate_binomial(n: u64, p: f64) -> Result<(), Error> {
    if n == 0 {
        return Err(Error::invalid_parameter("n", n, "greater than 0"));
    }
    if n > MAX_TRIALS {
        return Err(Error::invalid_parameter("n", n, "at most MAX_TRIALS"));
    }
    if !(p > 0.0 && p < 1.0) {
        return Err(Error::invalid_parameter("p", p, "in (0, 1)"));
    }
    Ok(())
}

/// A normal distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    mean: f64,
    variance: f64,
}

impl Normal {
    /// Creates a normal distribution.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter)
    /// if `mean` is not finite or `variance` is not a finite positive number.
    pub fn new(mean: f64, variance: f64) -> Result<Self, Error> {
        if !mean.is_finite() {
            return Err(Error::invalid_parameter("mean", mean, "finite"));
        }
        if !(variance > 0.0 && variance.is_finite()) {
            return Err(Error::invalid_parameter(
                "variance",
                variance,
                "finite and greater than 0",
            ));
        }
        Ok(Self { mean, variance })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> f64 {
        self.variance
    }

    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Probability density at `x`.
    pub fn pdf(&self, x: f64) -> f64 {
        let d = x - self.mean;
        (-d * d / (2.0 * self.variance)).exp() / (2.0 * PI * self.variance).sqrt()
    }
}

/// A binomial PMF paired with its normal approximation.
///
/// The PMF covers `0..=n`; the PDF is sampled on an evenly spaced grid over
/// `[-0.5, n + 0.5]` with `points_per_unit` samples per unit step, so both
/// can be drawn on the same axes.
#[derive(Debug, Clone)]
pub struct NormalApproximation {
    n: u64,
    p: f64,
    normal: Normal,
    pmf: Vec<f64>,
    pdf: Vec<(f64, f64)>,
}

impl NormalApproximation {
    /// Computes the binomial PMF for `(n, p)` and samples the PDF of the normal
    /// distribution with mean `np` and variance `np(1 - p)`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter)
    /// if `n` is 0 or above [`MAX_TRIALS`], `p` is not in (0, 1), `points_per_unit`
    /// is 0, or the grid would hold more than [`MAX_GRID_POINTS`] samples.
    pub fn new(n: u64, p: f64, points_per_unit: u32) -> Result<Self, Error> {
        if points_per_unit == 0 {
            return Err(Error::invalid_parameter(
                "points_per_unit",
                points_per_unit,
                "greater than 0",
            ));
        }
        let pmf = binomial_pmf(n, p)?;
        let num_points = (n + 1)
            .checked_mul(u64::from(points_per_unit))
            .and_then(|points| points.checked_add(1))
            .filter(|&points| points <= MAX_GRID_POINTS)
            .ok_or_else(|| {
                Error::invalid_parameter(
                    "points_per_unit",
                    points_per_unit,
                    "small enough for at most MAX_GRID_POINTS samples",
                )
                .with_context("n", n)
            })?;
        let mean = n as f64 * p;
        let normal = Normal::new(mean, mean * (1.0 - p))?;

        let step = 1.0 / f64::from(points_per_unit);
        let pdf = (0..num_points)
            .map(|i| {
                let x = -0.5 + i as f64 * step;
                (x, normal.pdf(x))
            })
            .collect();

        tracing::debug!(n, p, mean, variance = normal.variance(), "normal approximation");

        Ok(Self {
            n,
            p,
            normal,
            pmf,
            pdf,
        })
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    /// Mean of the approximating normal, `np`.
    pub fn mean(&self) -> f64 {
        self.normal.mean()
    }

    /// Variance of the approximating normal, `np(1 - p)`.
    pub fn variance(&self) -> f64 {
        self.normal.variance()
    }

    pub fn normal(&self) -> &Normal {
        &self.normal
    }

    /// Binomial probabilities, indexed by the number of successes.
    pub fn pmf(&self) -> &[f64] {
        &self.pmf
    }

    /// `(x, density)` samples of the normal PDF.
    pub fn pdf(&self) -> &[(f64, f64)] {
        &self.pdf
    }

    /// Largest absolute difference between the PMF and the PDF over the
    /// integer support.
    pub fn max_abs_error(&self) -> f64 {
        self.pmf
            .iter()
            .enumerate()
            .map(|(k, &mass)| (mass - self.normal.pdf(k as f64)).abs())
            .fold(0.0, f64::max)
    }
}
