use assert_matches::assert_matches;

use cellatlas_search::domain::ClauseSpecifier;
use cellatlas_search::error::AtlasError;
use cellatlas_search::metadata::Scalar;
use cellatlas_search::query::{Query, QueryValue};

fn parse_all(clauses: &[&str]) -> Result<Query, AtlasError> {
    clauses
        .iter()
        .map(|clause| clause.parse::<ClauseSpecifier>())
        .collect()
}

#[test]
fn repeated_field_becomes_or_list() {
    let query = parse_all(&["organ=brain", "genusSpecies=Mus musculus", "organ=heart"]).unwrap();
    assert_eq!(query.len(), 2);

    let clauses = query.clauses().collect::<Vec<_>>();
    assert_eq!(
        clauses,
        vec![
            ("genusSpecies", &QueryValue::One(Scalar::from("Mus musculus"))),
            (
                "organ",
                &QueryValue::AnyOf(vec![Scalar::from("brain"), Scalar::from("heart")])
            ),
        ]
    );
}

#[test]
fn clause_values_are_read_leniently() {
    let query = parse_all(&["totalCells=4500", "paired=true", "organ=10x 3' v2"]).unwrap();
    let values = query
        .clauses()
        .map(|(field, value)| (field, value.alternatives().to_vec()))
        .collect::<Vec<_>>();
    assert_eq!(
        values,
        vec![
            ("organ", vec![Scalar::from("10x 3' v2")]),
            ("paired", vec![Scalar::Bool(true)]),
            ("totalCells", vec![Scalar::from(4500i64)]),
        ]
    );
}

#[test]
fn value_may_contain_equals_sign() {
    let clause: ClauseSpecifier = "projectTitle=a=b".parse().unwrap();
    assert_eq!(clause.field, "projectTitle");
    assert_eq!(clause.value, Scalar::from("a=b"));
}

#[test]
fn one_bad_clause_fails_the_query() {
    assert_matches!(
        parse_all(&["organ=brain", "brain"]),
        Err(AtlasError::InvalidClause(ref clause)) if clause == "brain"
    );
}

#[test]
fn query_json_accepts_single_values_and_lists() {
    let query: Query =
        serde_json::from_str(r#"{"organ": ["brain", "heart"], "totalCells": 4500}"#).unwrap();
    assert_eq!(
        query,
        Query::new()
            .with("organ", vec!["brain", "heart"])
            .with("totalCells", Scalar::from(4500i64))
    );
}
