// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! ODE integrators over flat state vectors.
//!
//! Solvers know nothing about rigid bodies: they advance an opaque `&[f64]`
//! using a caller-supplied derivative closure.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{PhysicsError, Result};

/// Derivative callback: writes `dx/dt` at `(t, x)` into the third argument,
/// which always has the same length as `x`.
pub type DerivativeFn<'a> = dyn FnMut(f64, &[f64], &mut [f64]) + 'a;

/// Fixed-interface numerical integrator with a mutable step size.
pub trait OdeSolver: fmt::Debug {
    /// Advances `x0` from `t0` to exactly `t1`.
    ///
    /// Fails with [`PhysicsError::InvalidArgument`] for an empty state, a
    /// non-finite or reversed time range, or a step too small to move `t`.
    fn step(&self, x0: &[f64], t0: f64, t1: f64, dxdt: &mut DerivativeFn<'_>) -> Result<Vec<f64>>;

    /// Sets the step size; `h` must be finite and positive.
    fn set_step_size(&mut self, h: f64) -> Result<()>;

    /// Current step size.
    fn step_size(&self) -> f64;

    /// Which algorithm this is.
    fn kind(&self) -> SolverKind;

    /// Reacts to a non-smooth event by halving the step, never going below `floor`.
    fn on_discontinuity(&mut self, floor: f64) {
        let current = self.step_size();
        let halved = (current * 0.5).max(floor);
        if halved < current && self.set_step_size(halved).is_ok() {
            debug!(
                from = current,
                to = halved,
                "halved step size after impulse"
            );
        }
    }
}

/// Available integrator algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolverKind {
    /// Fixed-step explicit Euler.
    Euler,
}

impl SolverKind {
    /// Canonical lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Euler => "euler",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SolverKind {
    type Err = PhysicsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euler" => Ok(Self::Euler),
            other => Err(PhysicsError::InvalidArgument(format!(
                "unknown solver {other:?}"
            ))),
        }
    }
}

/// Builds a boxed solver by name with initial step size `h`.
pub fn create_solver(name: &str, h: f64) -> Result<Box<dyn OdeSolver>> {
    match name.parse::<SolverKind>()? {
        SolverKind::Euler => Ok(Box::new(EulerSolver::new(h)?)),
    }
}

fn check_step_size(h: f64) -> Result<()> {
    if h.is_finite() && h > 0.0 {
        Ok(())
    } else {
        Err(PhysicsError::InvalidArgument(format!(
            "step size must be positive, got {h}"
        )))
    }
}

/// Explicit Euler: `x += h·f(t, x)` until `t1`, shortening the final step so
/// the result lands on `t1` exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct EulerSolver {
    h: f64,
}

impl EulerSolver {
    /// Creates a solver with step size `h`.
    pub fn new(h: f64) -> Result<Self> {
        check_step_size(h)?;
        Ok(Self { h })
    }
}

impl OdeSolver for EulerSolver {
    fn step(
        &self,
        x0: &[f64],
        t0: f64,
        t1: f64,
        dxdt: &mut DerivativeFn<'_>,
    ) -> Result<Vec<f64>> {
        if x0.is_empty() {
            return Err(PhysicsError::InvalidArgument(
                "initial state is empty".to_owned(),
            ));
        }
        if !(t0.is_finite() && t1.is_finite()) {
            return Err(PhysicsError::InvalidArgument(format!(
                "time range must be finite: [{t0}, {t1}]"
            )));
        }
        if t1 <= t0 {
            return Err(PhysicsError::InvalidArgument(format!(
                "time range is empty or reversed: [{t0}, {t1}]"
            )));
        }
        let mut x = x0.to_vec();
        let mut xdot = vec![0.0; x.len()];
        let mut t = t0;
        while t < t1 {
            let h = self.h.min(t1 - t);
            let next = t + h;
            if next <= t {
                return Err(PhysicsError::InvalidArgument(format!(
                    "step size {h} is below the float resolution at t = {t}"
                )));
            }
            dxdt(t, &x, &mut xdot);
            for (xi, di) in x.iter_mut().zip(&xdot) {
                *xi += h * di;
            }
            t = if next >= t1 || t1 - next <= f64::EPSILON * t1.abs() {
                t1
            } else {
                next
            };
        }
        Ok(x)
    }

    fn set_step_size(&mut self, h: f64) -> Result<()> {
        check_step_size(h)?;
        self.h = h;
        Ok(())
    }

    fn step_size(&self) -> f64 {
        self.h
    }

    fn kind(&self) -> SolverKind {
        SolverKind::Euler
    }
}
