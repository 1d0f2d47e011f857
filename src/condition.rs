// Copyright © 2025 Denis Morel
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option) any
// later version.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License and
// a copy of the GNU General Public License along with this program. If not, see
// <https://www.gnu.org/licenses/>.

//! A minimal boolean algebra over a set of observed board keys.
//!
//! A [`Term`] is a (key, expected-present?) pair. A [`Condition`] is the conjunction
//! of a list of terms with an optional global negation (De Morgan gives OR). A
//! [`JointCondition`] is a conjunction of `Condition`s. Evaluation is a pure function
//! of the observed key-set and is short-circuit.

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Term {
    key: String,
    expected_present: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Condition {
    terms: Vec<Term>,
    negate: bool,
}

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `key` to be present in the observed set.
    pub fn present(mut self, key: impl Into<String>) -> Self {
        self.terms.push(Term {
            key: key.into(),
            expected_present: true,
        });
        self
    }

    /// Require `key` to be absent from the observed set.
    pub fn absent(mut self, key: impl Into<String>) -> Self {
        self.terms.push(Term {
            key: key.into(),
            expected_present: false,
        });
        self
    }

    /// Negate the whole conjunction (De Morgan: turns AND-of-terms into an OR).
    pub fn negated(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// Evaluate this condition against an observed key-set, short-circuiting on the
    /// first term that fails.
    pub fn eval(&self, observed: &HashSet<String>) -> bool {
        let conjunction = self
            .terms
            .iter()
            .all(|t| observed.contains(&t.key) == t.expected_present);
        conjunction ^ self.negate
    }
}

/// A conjunction of [`Condition`]s.
#[derive(Debug, Clone, Default)]
pub struct JointCondition {
    conditions: Vec<Condition>,
}

impl JointCondition {
    pub fn new(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }

    pub fn eval(&self, observed: &HashSet<String>) -> bool {
        self.conditions.iter().all(|c| c.eval(observed))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn set(keys: &[&str]) -> HashSet<String> {
        keys.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_present_and_absent_terms() {
        let observed = set(&["A", "B"]);
        assert!(Condition::new().present("A").eval(&observed));
        assert!(!Condition::new().present("C").eval(&observed));
        assert!(Condition::new().absent("C").eval(&observed));
        assert!(!Condition::new().absent("A").eval(&observed));
    }

    #[test]
    fn test_conjunction_short_circuits_correctly() {
        let observed = set(&["A"]);
        let c = Condition::new().present("A").present("B");
        assert!(!c.eval(&observed));
    }

    #[test]
    fn test_negation_is_de_morgan_or() {
        let observed = set(&["A"]);
        // NOT(present(A) AND present(B)) == NOT(A) OR NOT(B) == true since B absent
        let c = Condition::new().present("A").present("B").negated();
        assert!(c.eval(&observed));

        let observed_both = set(&["A", "B"]);
        assert!(!c.eval(&observed_both));
    }

    #[test]
    fn test_joint_condition_is_and_of_conditions() {
        let observed = set(&["A", "B"]);
        let c1 = Condition::new().present("A");
        let c2 = Condition::new().present("B");
        let joint = JointCondition::new(vec![c1.clone(), c2.clone()]);
        assert_eq!(joint.eval(&observed), c1.eval(&observed) && c2.eval(&observed));

        let observed_missing_b = set(&["A"]);
        let joint2 = JointCondition::new(vec![c1.clone(), c2.clone()]);
        assert_eq!(
            joint2.eval(&observed_missing_b),
            c1.eval(&observed_missing_b) && c2.eval(&observed_missing_b)
        );
    }

    #[test]
    fn test_double_negation_is_identity() {
        let observed = set(&["A"]);
        let c = Condition::new().present("A").present("B");
        let double_negated = c.clone().negated().negated();
        assert_eq!(c.eval(&observed), double_negated.eval(&observed));
    }
}
