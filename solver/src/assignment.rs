use std::fmt;
use std::iter::FromIterator;

use itertools::Itertools;

use crate::cnf::{Literal, Problem, VarId};
use crate::util::HashSet;

const MAX_LITERALS_PER_LINE: usize = 8;

/// One satisfying assignment, literals in the order the search decided them.
///
/// Variables absent from the assignment may take either value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Assignment {
    literals: Vec<Literal>,
}

impl Assignment {
    /// The assignment satisfying the empty problem
    pub fn empty() -> Assignment {
        Assignment{literals: Vec::new()}
    }

    pub fn new(literals: Vec<Literal>) -> Assignment {
        Assignment{literals}
    }

    /// Puts an earlier decision in front of the existing ones
    pub fn prepended_with(mut self, literal: Literal) -> Assignment {
        self.literals.insert(0, literal);
        self
    }

    /// Appends `literal` as the latest decision
    pub(crate) fn pushed(mut self, literal: Literal) -> Assignment {
        self.literals.push(literal);
        self
    }

    pub(crate) fn reversed(mut self) -> Assignment {
        self.literals.reverse();
        self
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn contains(&self, literal: Literal) -> bool {
        self.literals.contains(&literal)
    }

    /// Value forced on a variable, `None` when the search left it free
    pub fn value_of(&self, var: VarId) -> Option<bool> {
        self.literals.iter()
            .find(|literal| literal.var() == var)
            .map(|literal| literal.is_positive())
    }

    /// Checks that every clause of `problem` holds one of the assigned literals
    pub fn satisfies(&self, problem: &Problem) -> bool {
        let assigned: HashSet<Literal> = self.literals.iter().copied().collect();
        problem.iter()
            .all(|clause| clause.iter().any(|literal| assigned.contains(&literal)))
    }

    /// Extends the assignment with every variable of `problem` it leaves free,
    /// using the given polarity. Added literals follow the decided ones in
    /// ascending variable order.
    pub fn completed(&self, problem: &Problem, polarity: bool) -> Assignment {
        let assigned: HashSet<VarId> = self.literals.iter().map(|l| l.var()).collect();
        let free = problem.variables()
            .into_iter()
            .filter(|var| !assigned.contains(var))
            .sorted()
            .filter_map(|var| {
                let literal = if polarity { Literal::pos(var) } else { Literal::neg(var) };
                literal.ok()
            });

        self.literals.iter()
            .copied()
            .chain(free)
            .collect()
    }

    /// Plain signed integer representation
    pub fn to_ints(&self) -> Vec<i32> {
        self.literals.iter().map(|l| l.value()).collect()
    }

    /// Prints the assignment as DIMACS `v` lines
    pub fn to_dimacs(&self) -> String {
        let mut out = String::new();
        for chunk in &self.literals.iter().chunks(MAX_LITERALS_PER_LINE) {
            out.push_str("v ");
            for literal in chunk {
                out.push_str(&literal.to_string());
                out.push(' ');
            }
            out.push('\n');
        }
        out.push_str("v 0\n");
        out
    }
}

impl From<Vec<Literal>> for Assignment {
    fn from(literals: Vec<Literal>) -> Self {
        Assignment::new(literals)
    }
}

impl FromIterator<Literal> for Assignment {
    fn from_iter<T: IntoIterator<Item=Literal>>(iter: T) -> Self {
        Assignment{literals: iter.into_iter().collect()}
    }
}

impl IntoIterator for Assignment {
    type Item = Literal;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.into_iter()
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.literals.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(values: &[i32]) -> Assignment {
        values.iter().map(|&v| Literal::new(v).unwrap()).collect()
    }

    #[test]
    fn prepending_puts_decision_first() {
        let a = assignment(&[2, -3]).prepended_with(Literal::new(1).unwrap());
        assert_eq!(a.to_ints(), vec![1, 2, -3]);
    }

    #[test]
    fn decisions_collected_backwards() {
        let a = assignment(&[3])
            .pushed(Literal::new(-2).unwrap())
            .pushed(Literal::new(1).unwrap())
            .reversed();
        assert_eq!(a.to_ints(), vec![1, -2, 3]);
    }

    #[test]
    fn satisfaction_check() {
        let problem = Problem::from_ints(&[vec![1, 2], vec![-2, 3]]).unwrap();
        assert!(assignment(&[1, 2, 3]).satisfies(&problem));
        assert!(assignment(&[-1, 2, 3]).satisfies(&problem));
        assert!(!assignment(&[1, 2]).satisfies(&problem));
        assert!(!assignment(&[]).satisfies(&problem));
        assert!(assignment(&[]).satisfies(&Problem::empty()));
    }

    #[test]
    fn completion_adds_free_variables_after_decisions() {
        let problem = Problem::from_ints(&[vec![4, 2], vec![-2, 3], vec![1]]).unwrap();
        let completed = assignment(&[1, -2, 4]).completed(&problem, false);
        assert_eq!(completed.to_ints(), vec![1, -2, 4, -3]);
        assert_eq!(completed.value_of(3), Some(false));
        assert_eq!(assignment(&[1]).value_of(3), None);
    }

    #[test]
    fn dimacs_lines() {
        let a = assignment(&[1, -2, 3, 4, 5, 6, 7, 8, -9]);
        assert_eq!(a.to_dimacs(), "v 1 -2 3 4 5 6 7 8 \nv -9 \nv 0\n");
    }
}
