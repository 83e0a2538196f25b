//! Random atomic measures and measurable sets.

use super::{Generator, Space};
use crate::config::AtomShape;
use crate::distribution::sample_in_range;
use bochner::{ENNReal, MeasureError, MeasureSpace, PointSet};
use rand::Rng;
use std::sync::Arc;

impl<R: Rng> Generator<R> {
    /// A measure on `point_count` points whose atoms follow the configured
    /// shape, with null and infinite atoms mixed in.
    pub fn measure(&mut self) -> Result<Arc<Space>, MeasureError> {
        let n = self.config.point_count.max(1) as usize;
        let mut atoms = Vec::new();
        let mut next = 0;

        while next < n {
            let size = match self.config.atom_shape {
                AtomShape::Singletons => 1,
                AtomShape::Grouped { max_atom_size } => {
                    self.rng.gen_range(1..=max_atom_size.max(1) as usize)
                }
                AtomShape::Trivial => n,
            }
            .min(n - next);
            let weight = self.weight()?;
            atoms.push(((next..next + size).collect(), weight));
            next += size;
        }

        Ok(Arc::new(Space::from_atoms(atoms)?))
    }

    fn weight(&mut self) -> Result<ENNReal, MeasureError> {
        let roll: f64 = self.rng.gen();
        if roll < self.config.null_fraction {
            return Ok(ENNReal::ZERO);
        }
        if roll < self.config.null_fraction + self.config.infinite_fraction {
            return Ok(ENNReal::INFINITY);
        }
        let range = self.config.weights;
        let w = sample_in_range(&mut self.rng, range.min, range.max, range.distribution);
        ENNReal::new(w.max(0.0))
    }

    /// Indices of the atoms of infinite weight.
    pub fn infinite_atoms(mu: &Space) -> Vec<usize> {
        mu.atoms()
            .enumerate()
            .filter(|(_, (_, w))| w.is_infinite())
            .map(|(i, _)| i)
            .collect()
    }

    /// A random union of finite-weight atoms.
    pub fn finite_set(&mut self, mu: &Space) -> PointSet {
        let chosen: Vec<usize> = (0..mu.atom_count())
            .filter(|&i| mu.atom_weight(i).is_some_and(ENNReal::is_finite))
            .filter(|_| self.rng.gen_bool(0.5))
            .collect();
        mu.atoms_set(chosen)
    }

    /// Two disjoint random unions of finite-weight atoms.
    pub fn disjoint_finite_pair(&mut self, mu: &Space) -> (PointSet, PointSet) {
        let s = self.finite_set(mu);
        let t = self.finite_set(mu);
        let t = mu.diff(&t, &s);
        (s, t)
    }
}
