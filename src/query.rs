use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corpus::Corpus;
use crate::domain::{ClauseSpecifier, CombineMode, MatchMode};
use crate::matcher::FieldMatcher;
use crate::metadata::Scalar;

/// Target of one clause: a single value, or a list where any value matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    AnyOf(Vec<Scalar>),
    One(Scalar),
}

impl QueryValue {
    pub fn alternatives(&self) -> &[Scalar] {
        match self {
            QueryValue::One(value) => std::slice::from_ref(value),
            QueryValue::AnyOf(values) => values,
        }
    }

    fn push(self, value: Scalar) -> Self {
        match self {
            QueryValue::One(existing) => QueryValue::AnyOf(vec![existing, value]),
            QueryValue::AnyOf(mut values) => {
                values.push(value);
                QueryValue::AnyOf(values)
            }
        }
    }
}

impl From<Scalar> for QueryValue {
    fn from(value: Scalar) -> Self {
        QueryValue::One(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::One(Scalar::from(value))
    }
}

impl<T: Into<Scalar>> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        QueryValue::AnyOf(values.into_iter().map(Into::into).collect())
    }
}

/// Field name to clause value. Each field appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query {
    clauses: BTreeMap<String, QueryValue>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.clauses.insert(field.into(), value.into());
        self
    }

    /// Adds `value` as one more alternative for `field`.
    pub fn push_alternative(&mut self, field: impl Into<String>, value: Scalar) {
        let field = field.into();
        let merged = match self.clauses.remove(&field) {
            Some(existing) => existing.push(value),
            None => QueryValue::One(value),
        };
        self.clauses.insert(field, merged);
    }

    pub fn clauses(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.clauses
            .iter()
            .map(|(field, value)| (field.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl FromIterator<ClauseSpecifier> for Query {
    fn from_iter<I: IntoIterator<Item = ClauseSpecifier>>(iter: I) -> Self {
        let mut query = Query::new();
        for clause in iter {
            query.push_alternative(clause.field, clause.value);
        }
        query
    }
}

/// Projects matching any alternative of one clause, in corpus order.
pub fn clause_matches<'c>(
    corpus: &'c Corpus,
    field: &str,
    value: &QueryValue,
    mode: MatchMode,
) -> Vec<&'c str> {
    let mut seen = HashSet::new();
    let mut hits = Vec::new();
    for target in value.alternatives() {
        let matcher = FieldMatcher::new(field, target, mode);
        for (project, document) in corpus.iter() {
            if let Some(found) = matcher.matches(project, document).next() {
                if seen.insert(found) {
                    hits.push(found);
                }
            }
        }
    }
    hits
}

pub fn search(
    corpus: &Corpus,
    query: &Query,
    combine: CombineMode,
    mode: MatchMode,
) -> Vec<String> {
    let per_clause = query
        .clauses()
        .map(|(field, value)| {
            let hits = clause_matches(corpus, field, value, mode);
            debug!(
                field,
                alternatives = value.alternatives().len(),
                hits = hits.len(),
                "clause evaluated"
            );
            hits
        })
        .collect::<Vec<_>>();

    combine_hits(&per_clause, combine)
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn combine_hits<'c>(per_clause: &[Vec<&'c str>], combine: CombineMode) -> Vec<&'c str> {
    let mut seen = HashSet::new();
    match combine {
        CombineMode::Union => per_clause
            .iter()
            .flatten()
            .copied()
            .filter(|project| seen.insert(*project))
            .collect(),
        CombineMode::Intersection => {
            let mut counts = HashMap::<&str, usize>::new();
            for project in per_clause.iter().flatten().copied() {
                *counts.entry(project).or_insert(0) += 1;
            }
            per_clause
                .iter()
                .flatten()
                .copied()
                .filter(|project| counts.get(project) == Some(&per_clause.len()))
                .filter(|project| seen.insert(*project))
                .collect()
        }
    }
}
