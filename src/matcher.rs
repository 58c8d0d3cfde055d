use crate::domain::MatchMode;
use crate::metadata::{Node, Scalar};

/// Predicate for one `(field, value)` alternative of a search clause.
#[derive(Debug, Clone)]
pub struct FieldMatcher<'q> {
    field: &'q str,
    target: &'q Scalar,
    mode: MatchMode,
    variants: [String; 3],
}

impl<'q> FieldMatcher<'q> {
    pub fn new(field: &'q str, target: &'q Scalar, mode: MatchMode) -> Self {
        let variants = match mode {
            MatchMode::Full => Default::default(),
            MatchMode::Partial => case_variants(&target.to_string()),
        };
        Self {
            field,
            target,
            mode,
            variants,
        }
    }

    pub fn matches_scalar(&self, node: &Scalar) -> bool {
        match self.mode {
            MatchMode::Full => node == self.target,
            MatchMode::Partial => node.as_str().is_some_and(|text| self.contains_variant(text)),
        }
    }

    /// A list under the target field is matched as a unit: membership for
    /// full mode, any string member containing the target for partial mode.
    pub fn matches_sequence(&self, items: &[Node]) -> bool {
        let mut members = items
            .iter()
            .filter_map(Node::as_scalar)
            .filter(|scalar| !scalar.is_null());
        match self.mode {
            MatchMode::Full => members.any(|scalar| scalar == self.target),
            MatchMode::Partial => members
                .filter_map(Scalar::as_str)
                .any(|text| self.contains_variant(text)),
        }
    }

    /// Walks `document`, yielding `project` once per matching position.
    pub fn matches<'d>(&self, project: &'d str, document: &'d Node) -> TreeMatches<'_, 'd> {
        TreeMatches {
            matcher: self,
            project,
            stack: vec![(document, None)],
        }
    }

    fn contains_variant(&self, text: &str) -> bool {
        self.variants
            .iter()
            .any(|variant| text.contains(variant.as_str()))
    }
}

pub struct TreeMatches<'m, 'd> {
    matcher: &'m FieldMatcher<'m>,
    project: &'d str,
    stack: Vec<(&'d Node, Option<&'d str>)>,
}

impl<'d> Iterator for TreeMatches<'_, 'd> {
    type Item = &'d str;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, field)) = self.stack.pop() {
            let on_field = field == Some(self.matcher.field);
            match node {
                Node::Mapping(entries) => {
                    self.stack.extend(
                        entries
                            .iter()
                            .rev()
                            .map(|(key, child)| (child, Some(key.as_str()))),
                    );
                }
                Node::Sequence(items) => {
                    if on_field && self.matcher.matches_sequence(items) {
                        return Some(self.project);
                    }
                    self.stack.extend(items.iter().rev().map(|item| (item, field)));
                }
                Node::Scalar(scalar) => {
                    if on_field && self.matcher.matches_scalar(scalar) {
                        return Some(self.project);
                    }
                }
            }
        }
        None
    }
}

fn case_variants(text: &str) -> [String; 3] {
    [text.to_lowercase(), capitalize(text), text.to_uppercase()]
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: serde_json::Value) -> Node {
        serde_json::from_value(value).unwrap()
    }

    fn count(document: &Node, field: &str, target: Scalar, mode: MatchMode) -> usize {
        let matcher = FieldMatcher::new(field, &target, mode);
        matcher.matches("p1", document).count()
    }

    #[test]
    fn capitalize_lowers_the_tail() {
        assert_eq!(capitalize("mUS muSCULUS"), "Mus musculus");
        assert_eq!(capitalize(""), "");
        assert_eq!(
            case_variants("Brain"),
            ["brain".to_string(), "Brain".to_string(), "BRAIN".to_string()]
        );
    }

    #[test]
    fn full_match_on_scalars_at_any_depth() {
        let document = doc(json!({
            "specimens": [{"organ": "brain"}, {"organ": "heart"}],
            "summary": {"organ": "brain"}
        }));
        assert_eq!(count(&document, "organ", "brain".into(), MatchMode::Full), 2);
        assert_eq!(count(&document, "organ", "heart".into(), MatchMode::Full), 1);
        assert_eq!(count(&document, "organ", "Brain".into(), MatchMode::Full), 0);
        assert_eq!(count(&document, "tissue", "brain".into(), MatchMode::Full), 0);
    }

    #[test]
    fn sequence_under_field_matches_once() {
        let document = doc(json!({"organ": ["brain", "spinal cord", null]}));
        assert_eq!(count(&document, "organ", "brain".into(), MatchMode::Full), 1);
        assert_eq!(count(&document, "organ", "cord".into(), MatchMode::Partial), 1);
        assert_eq!(count(&document, "organ", "lung".into(), MatchMode::Full), 0);
    }

    #[test]
    fn nested_sequences_keep_field_context() {
        let document = doc(json!({"organ": [["lung"], [{"organ": "skin"}]]}));
        assert_eq!(count(&document, "organ", "lung".into(), MatchMode::Full), 1);
        assert_eq!(count(&document, "organ", "skin".into(), MatchMode::Full), 1);
    }

    #[test]
    fn mapping_under_field_is_not_a_match() {
        let document = doc(json!({"organ": {"brain": ["x.h5ad"]}}));
        assert_eq!(count(&document, "organ", "brain".into(), MatchMode::Full), 0);
    }

    #[test]
    fn partial_match_uses_three_castings() {
        let document = doc(json!({"projectTitle": "Single-cell atlas of the Human Esophagus"}));
        assert_eq!(
            count(&document, "projectTitle", "esophagus".into(), MatchMode::Partial),
            1
        );
        assert_eq!(
            count(&document, "projectTitle", "HUMAN".into(), MatchMode::Partial),
            1
        );

        let mixed = doc(json!({"organ": "ESOphagus"}));
        assert_eq!(count(&mixed, "organ", "esophagus".into(), MatchMode::Partial), 0);
    }

    #[test]
    fn partial_match_skips_non_strings() {
        let document = doc(json!({"cells": [4500, true, null], "count": 4500}));
        assert_eq!(count(&document, "cells", "45".into(), MatchMode::Partial), 0);
        assert_eq!(count(&document, "count", 4500i64.into(), MatchMode::Partial), 0);
        assert_eq!(count(&document, "count", 4500i64.into(), MatchMode::Full), 1);
        assert_eq!(count(&document, "cells", 4500i64.into(), MatchMode::Full), 1);
    }

    #[test]
    fn non_string_target_matches_by_text_in_partial_mode() {
        let document = doc(json!({"libraryConstructionApproach": "10x 3' v2"}));
        assert_eq!(
            count(
                &document,
                "libraryConstructionApproach",
                10i64.into(),
                MatchMode::Partial
            ),
            1
        );
    }

    #[test]
    fn null_entries_are_ignored_in_sequences() {
        let document = doc(json!({"organ": [null]}));
        let matcher = FieldMatcher::new("organ", &Scalar::Null, MatchMode::Full);
        assert!(!matcher.matches_sequence(document.get("organ").unwrap().as_sequence().unwrap()));
        // the element walk still compares the bare null scalar
        assert_eq!(matcher.matches("p1", &document).count(), 1);
    }

    #[test]
    fn empty_document_yields_nothing() {
        let document = doc(json!({}));
        assert_eq!(count(&document, "organ", "brain".into(), MatchMode::Full), 0);
        let scalar = doc(json!("brain"));
        assert_eq!(count(&scalar, "organ", "brain".into(), MatchMode::Full), 0);
    }
}
