//! Random simple functions and Lipschitz integrands.

use super::{Generator, Space, Vector};
use bochner::{LipschitzIntegrand, MeasureError, PointFunction, SimpleFunction};
use rand::Rng;
use std::sync::Arc;

/// A Lipschitz integrand on a bounded interval with its exact integral.
#[derive(Debug, Clone)]
pub struct LipschitzCase {
    pub integrand: LipschitzIntegrand<Vector>,
    /// `∫ f dλ`, computed in closed form.
    pub exact: Vector,
}

impl<R: Rng> Generator<R> {
    /// An integrable simple function: atoms are grouped into at most
    /// `max_pieces` pieces, and pieces touching an infinite atom are zero.
    pub fn integrable_function(
        &mut self,
        mu: &Arc<Space>,
    ) -> Result<SimpleFunction<Space, Vector>, MeasureError> {
        let pieces = self.rng.gen_range(1..=self.config.max_pieces.max(1)) as usize;
        let mut groups: Vec<Vec<usize>> = vec![Vec::new(); pieces];
        for atom in 0..mu.atom_count() {
            groups[self.rng.gen_range(0..pieces)].push(atom);
        }

        let mut partition = Vec::with_capacity(pieces);
        for atoms in groups.into_iter().filter(|g| !g.is_empty()) {
            let infinite = atoms
                .iter()
                .any(|&a| mu.atom_weight(a).is_some_and(|w| w.is_infinite()));
            let value = if infinite { [0.0; 2] } else { self.vector() };
            partition.push((mu.atoms_set(atoms), value));
        }
        SimpleFunction::from_partition(mu.clone(), partition)
    }

    /// A simple function with a nonzero value on an infinite atom, if the
    /// measure has one.
    pub fn non_integrable_function(
        &mut self,
        mu: &Arc<Space>,
    ) -> Result<Option<SimpleFunction<Space, Vector>>, MeasureError> {
        let infinite = Self::infinite_atoms(mu);
        if infinite.is_empty() {
            return Ok(None);
        }
        let atom = infinite[self.rng.gen_range(0..infinite.len())];
        let x = self.nonzero_vector();
        let base = self.integrable_function(mu)?;
        let spike = SimpleFunction::indicator_const(mu.clone(), mu.atoms_set([atom]), x)?;
        Ok(Some(base.add(&spike)))
    }

    /// The same function given point by point.
    pub fn as_point_function(f: &SimpleFunction<Space, Vector>) -> PointFunction<Vector> {
        let f = f.clone();
        PointFunction::new(move |p| f.eval(&p).copied().unwrap_or([0.0; 2]))
    }

    /// `f(x) = (sin(ωx), kx)` on a random interval, with `√(ω² + k²)` at most
    /// `max_lipschitz`.
    pub fn lipschitz_case(&mut self) -> Result<LipschitzCase, MeasureError> {
        let start = self.rng.gen_range(-2.0..=2.0);
        let end = start + self.rng.gen_range(0.1..=2.0);
        let m = self.config.max_lipschitz.max(0.0) / 2f64.sqrt();
        let omega: f64 = self.rng.gen_range(-m..=m);
        let k: f64 = self.rng.gen_range(-m..=m);

        let integrand = LipschitzIntegrand::new(start, end, omega.hypot(k), move |x: f64| {
            [(omega * x).sin(), k * x]
        })?;
        let sine = if omega == 0.0 {
            0.0
        } else {
            ((omega * start).cos() - (omega * end).cos()) / omega
        };
        let exact = [sine, k * (end * end - start * start) / 2.0];
        Ok(LipschitzCase { integrand, exact })
    }
}
