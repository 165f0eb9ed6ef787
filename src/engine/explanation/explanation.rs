use std::fmt::Display;
use std::fmt::Formatter;

use itertools::Itertools;

use super::Deduction;
use super::Fact;

/// A deduplicated set of deductions, read as their conjunction.
///
/// Kept as a small vector: explanations are typically a handful of deductions
/// and are iterated far more often than they are searched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Explanation {
    deductions: Vec<Deduction>,
}

impl Explanation {
    pub fn new() -> Self {
        Explanation::default()
    }

    pub fn add(&mut self, deduction: Deduction) {
        if !self.deductions.contains(&deduction) {
            self.deductions.push(deduction);
        }
    }

    pub fn remove(&mut self, deduction: &Deduction) {
        self.deductions.retain(|other| other != deduction);
    }

    pub fn contains(&self, deduction: &Deduction) -> bool {
        self.deductions.contains(deduction)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Deduction> {
        self.deductions.iter()
    }

    pub fn len(&self) -> usize {
        self.deductions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deductions.is_empty()
    }

    pub(crate) fn extend_from(&mut self, other: &Explanation) {
        for &deduction in other.iter() {
            self.add(deduction);
        }
    }
}

impl From<Deduction> for Explanation {
    fn from(deduction: Deduction) -> Self {
        Explanation {
            deductions: vec![deduction],
        }
    }
}

impl From<Fact> for Explanation {
    fn from(fact: Fact) -> Self {
        Explanation::from(Deduction::Fact(fact))
    }
}

impl FromIterator<Deduction> for Explanation {
    fn from_iter<T: IntoIterator<Item = Deduction>>(iter: T) -> Self {
        let mut explanation = Explanation::new();
        for deduction in iter {
            explanation.add(deduction);
        }
        explanation
    }
}

impl Display for Explanation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.deductions.iter().map(|d| format!("{d}")).join(", ")
        )
    }
}
