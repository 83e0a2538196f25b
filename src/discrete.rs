//! Finite atomic measure spaces.
//!
//! Every finite σ-algebra is generated by a partition of the points into
//! atoms. A [`DiscreteMeasure`] stores that partition together with the
//! weight of each atom; a set is measurable iff it is a union of atoms.

use std::collections::BTreeSet;

use crate::ennreal::ENNReal;
use crate::error::MeasureError;
use crate::space::MeasureSpace;

/// A set of points of a discrete space.
pub type PointSet = BTreeSet<usize>;

#[derive(Debug, Clone, PartialEq)]
struct Atom {
    points: PointSet,
    weight: ENNReal,
}

/// A measure on the points `0..n` with the σ-algebra generated by atoms.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteMeasure {
    atoms: Vec<Atom>,
    /// Atom index of every point.
    atom_of: Vec<usize>,
}

impl DiscreteMeasure {
    /// Counting measure on `n` points with the power-set σ-algebra.
    pub fn counting(n: usize) -> Self {
        Self::singletons(vec![ENNReal::ONE; n])
    }

    /// Measure giving point `i` the weight `weights[i]`, power-set σ-algebra.
    pub fn weighted(weights: Vec<f64>) -> Result<Self, MeasureError> {
        let weights = weights
            .into_iter()
            .map(ENNReal::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::singletons(weights))
    }

    /// Dirac mass at `point` on `n` points.
    pub fn dirac(n: usize, point: usize) -> Result<Self, MeasureError> {
        if point >= n {
            return Err(MeasureError::InvalidPartition {
                reason: format!("point {point} outside 0..{n}"),
            });
        }
        let mut weights = vec![ENNReal::ZERO; n];
        weights[point] = ENNReal::ONE;
        Ok(Self::singletons(weights))
    }

    /// Build from explicit atoms `(points, weight)`.
    ///
    /// The atoms must be nonempty and partition `0..n`, where `n` is the total
    /// number of points listed.
    pub fn from_atoms(atoms: Vec<(Vec<usize>, ENNReal)>) -> Result<Self, MeasureError> {
        let n: usize = atoms.iter().map(|(points, _)| points.len()).sum();
        let mut atom_of = vec![usize::MAX; n];
        let mut out = Vec::with_capacity(atoms.len());

        for (index, (points, weight)) in atoms.into_iter().enumerate() {
            if points.is_empty() {
                return Err(MeasureError::InvalidPartition {
                    reason: format!("atom {index} is empty"),
                });
            }
            for &p in &points {
                if p >= n {
                    return Err(MeasureError::InvalidPartition {
                        reason: format!("point {p} outside 0..{n}"),
                    });
                }
                if atom_of[p] != usize::MAX {
                    return Err(MeasureError::InvalidPartition {
                        reason: format!("point {p} belongs to atoms {} and {index}", atom_of[p]),
                    });
                }
                atom_of[p] = index;
            }
            out.push(Atom {
                points: points.into_iter().collect(),
                weight,
            });
        }

        Ok(Self {
            atoms: out,
            atom_of,
        })
    }

    fn singletons(weights: Vec<ENNReal>) -> Self {
        let atom_of = (0..weights.len()).collect();
        let atoms = weights
            .into_iter()
            .enumerate()
            .map(|(p, weight)| Atom {
                points: PointSet::from([p]),
                weight,
            })
            .collect();
        Self { atoms, atom_of }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.atom_of.len()
    }

    /// Returns `true` if the space has no points.
    pub fn is_empty_space(&self) -> bool {
        self.atom_of.is_empty()
    }

    /// Number of atoms.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Points of atom `index`.
    pub fn atom(&self, index: usize) -> Option<&PointSet> {
        self.atoms.get(index).map(|atom| &atom.points)
    }

    /// Weight of atom `index`.
    pub fn atom_weight(&self, index: usize) -> Option<ENNReal> {
        self.atoms.get(index).map(|atom| atom.weight)
    }

    /// Iterate over `(points, weight)` of every atom.
    pub fn atoms(&self) -> impl Iterator<Item = (&PointSet, ENNReal)> {
        self.atoms.iter().map(|atom| (&atom.points, atom.weight))
    }

    /// Atom containing `point`.
    pub fn atom_index_of(&self, point: usize) -> Option<usize> {
        self.atom_of.get(point).copied()
    }

    /// Union of the given atoms.
    pub fn atoms_set(&self, indices: impl IntoIterator<Item = usize>) -> PointSet {
        indices
            .into_iter()
            .filter_map(|i| self.atom(i))
            .flat_map(|points| points.iter().copied())
            .collect()
    }
}

impl MeasureSpace for DiscreteMeasure {
    type Point = usize;
    type Set = PointSet;

    fn empty(&self) -> PointSet {
        PointSet::new()
    }

    fn univ(&self) -> PointSet {
        (0..self.len()).collect()
    }

    fn union(&self, a: &PointSet, b: &PointSet) -> PointSet {
        a.union(b).copied().collect()
    }

    fn inter(&self, a: &PointSet, b: &PointSet) -> PointSet {
        a.intersection(b).copied().collect()
    }

    fn diff(&self, a: &PointSet, b: &PointSet) -> PointSet {
        a.difference(b).copied().collect()
    }

    fn is_empty(&self, set: &PointSet) -> bool {
        set.is_empty()
    }

    fn contains(&self, set: &PointSet, point: &usize) -> bool {
        set.contains(point)
    }

    fn is_measurable(&self, set: &PointSet) -> bool {
        set.iter().all(|&p| {
            self.atom_of
                .get(p)
                .is_some_and(|&atom| self.atoms[atom].points.is_subset(set))
        })
    }

    fn measure(&self, set: &PointSet) -> ENNReal {
        let touched: BTreeSet<usize> = set
            .iter()
            .filter_map(|&p| self.atom_of.get(p).copied())
            .collect();
        touched.into_iter().map(|i| self.atoms[i].weight).sum()
    }
}
