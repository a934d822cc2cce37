//! in-circuit checking
//!
//! Queries that can be verified recursively express their check through
//! [`CircuitApi`]. [`CircuitBuilder`] is the recording implementation: it
//! allocates witness variables eagerly with their values and collects
//! constraints, so a built [`Circuit`] can be checked for satisfaction.

use wizard_binary_fields::BinaryFieldElement;

use crate::F;

/// index into the circuit witness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(pub usize);

impl Variable {
    pub fn index(self) -> usize {
        self.0
    }
}

/// constraint kinds recorded by the builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// a + b = out
    Add { a: Variable, b: Variable, out: Variable },

    /// a * b = out
    Mul { a: Variable, b: Variable, out: Variable },

    /// a = b
    Eq { a: Variable, b: Variable },

    /// wire = value
    AssertConst { wire: Variable, value: F },

    /// wire < bound, reading the element bits as an unsigned integer
    LessThan { wire: Variable, bound: u128 },
}

impl Constraint {
    /// check if constraint is satisfied by witness
    pub fn check(&self, witness: &[F]) -> bool {
        match self {
            Constraint::Add { a, b, out } => witness[a.0].add(&witness[b.0]) == witness[out.0],
            Constraint::Mul { a, b, out } => witness[a.0].mul(&witness[b.0]) == witness[out.0],
            Constraint::Eq { a, b } => witness[a.0] == witness[b.0],
            Constraint::AssertConst { wire, value } => witness[wire.0] == *value,
            Constraint::LessThan { wire, bound } => witness[wire.0].value() < *bound,
        }
    }
}

/// arithmetic and assertion surface offered to in-circuit checks
pub trait CircuitApi {
    fn constant(&mut self, value: F) -> Variable;
    fn add(&mut self, a: Variable, b: Variable) -> Variable;
    fn mul(&mut self, a: Variable, b: Variable) -> Variable;
    fn assert_is_equal(&mut self, a: Variable, b: Variable);
    fn assert_less_than(&mut self, v: Variable, bound: u128);
}

/// circuit builder recording constraints over an eagerly computed witness
#[derive(Debug, Clone, Default)]
pub struct CircuitBuilder {
    witness: Vec<F>,
    constraints: Vec<Constraint>,
}

impl CircuitBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// allocate a new witness variable holding `value`
    pub fn add_witness(&mut self, value: F) -> Variable {
        let var = Variable(self.witness.len());
        self.witness.push(value);
        var
    }

    pub fn value(&self, var: Variable) -> F {
        self.witness[var.0]
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn num_variables(&self) -> usize {
        self.witness.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn build(self) -> Circuit {
        Circuit {
            witness: self.witness,
            constraints: self.constraints,
        }
    }
}

impl CircuitApi for CircuitBuilder {
    fn constant(&mut self, value: F) -> Variable {
        let wire = self.add_witness(value);
        self.add_constraint(Constraint::AssertConst { wire, value });
        wire
    }

    fn add(&mut self, a: Variable, b: Variable) -> Variable {
        let out = self.add_witness(self.value(a).add(&self.value(b)));
        self.add_constraint(Constraint::Add { a, b, out });
        out
    }

    fn mul(&mut self, a: Variable, b: Variable) -> Variable {
        let out = self.add_witness(self.value(a).mul(&self.value(b)));
        self.add_constraint(Constraint::Mul { a, b, out });
        out
    }

    fn assert_is_equal(&mut self, a: Variable, b: Variable) {
        self.add_constraint(Constraint::Eq { a, b });
    }

    fn assert_less_than(&mut self, v: Variable, bound: u128) {
        self.add_constraint(Constraint::LessThan { wire: v, bound });
    }
}

/// built circuit together with the witness it was built over
#[derive(Debug, Clone)]
pub struct Circuit {
    pub witness: Vec<F>,
    pub constraints: Vec<Constraint>,
}

impl Circuit {
    /// index of the first unsatisfied constraint, if any
    pub fn check(&self) -> Result<(), usize> {
        self.check_witness(&self.witness)
    }

    /// check all constraints against another witness of the same shape
    ///
    /// A witness shorter than the circuit's fails with
    /// `Err(self.constraints.len())`, an index no constraint has.
    pub fn check_witness(&self, witness: &[F]) -> Result<(), usize> {
        if witness.len() < self.witness.len() {
            return Err(self.constraints.len());
        }
        for (i, constraint) in self.constraints.iter().enumerate() {
            if !constraint.check(witness) {
                return Err(i);
            }
        }
        Ok(())
    }

    pub fn num_range_constraints(&self) -> usize {
        self.constraints
            .iter()
            .filter(|c| matches!(c, Constraint::LessThan { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_constraints() {
        let mut builder = CircuitBuilder::new();
        let a = builder.add_witness(F::from(3u64));
        let b = builder.add_witness(F::from(5u64));

        // (x + 1)(x^2 + 1) in GF(2^128): 3 * 5 = 15, 3 + 5 = 6
        let sum = builder.add(a, b);
        let prod = builder.mul(a, b);
        assert_eq!(builder.value(sum), F::from(6u64));
        assert_eq!(builder.value(prod), F::from(15u64));

        let fifteen = builder.constant(F::from(15u64));
        builder.assert_is_equal(prod, fifteen);

        let circuit = builder.build();
        assert!(circuit.check().is_ok());

        let mut tampered = circuit.witness.clone();
        tampered[prod.0] = F::from(14u64);
        // first violated constraint is the mul producing `prod`
        assert_eq!(circuit.check_witness(&tampered), Err(1));
    }

    #[test]
    fn test_less_than() {
        let mut builder = CircuitBuilder::new();
        let small = builder.add_witness(F::from(7u64));
        let big = builder.add_witness(F::from(8u64));
        builder.assert_less_than(small, 8);
        builder.assert_less_than(big, 8);

        let circuit = builder.build();
        assert_eq!(circuit.num_range_constraints(), 2);
        assert_eq!(circuit.check(), Err(1));
    }

    #[test]
    fn test_short_witness_rejected() {
        let mut builder = CircuitBuilder::new();
        let a = builder.add_witness(F::from(1u64));
        builder.assert_less_than(a, 2);
        let circuit = builder.build();
        // distinct from a failure of constraint 0
        assert_eq!(circuit.check_witness(&[]), Err(1));
    }
}
