use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::metadata::{Node, Scalar};

/// Every `(field, leaf value)` pair of a document, depth first.
///
/// Scalars inside a sequence are paired with the nearest enclosing field
/// name; mappings inside a sequence contribute their own keys. A scalar that
/// is not under any mapping is paired with `None`.
pub struct FieldPairs<'a> {
    stack: Vec<(&'a Node, Option<&'a str>)>,
}

impl<'a> FieldPairs<'a> {
    pub fn new(document: &'a Node) -> Self {
        Self {
            stack: vec![(document, None)],
        }
    }
}

impl<'a> Iterator for FieldPairs<'a> {
    type Item = (Option<&'a str>, &'a Scalar);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, field)) = self.stack.pop() {
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
                    self.stack.extend(items.iter().rev().map(|item| (item, field)));
                }
                Node::Scalar(scalar) => return Some((field, scalar)),
            }
        }
        None
    }
}

pub fn enumerate_fields(document: &Node) -> FieldPairs<'_> {
    FieldPairs::new(document)
}

/// Field name to the distinct values seen under it across a corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchCatalog {
    fields: BTreeMap<String, BTreeSet<Scalar>>,
}

impl SearchCatalog {
    pub fn build<'a, I>(documents: I) -> Self
    where
        I: IntoIterator<Item = &'a Node>,
    {
        let mut catalog = Self::default();
        for document in documents {
            catalog.add_document(document);
        }
        catalog
    }

    fn add_document(&mut self, document: &Node) {
        for (field, value) in enumerate_fields(document) {
            let Some(field) = field else {
                continue;
            };
            match self.fields.get_mut(field) {
                Some(values) => {
                    if !values.contains(value) {
                        values.insert(value.clone());
                    }
                }
                None => {
                    self.fields
                        .insert(field.to_string(), BTreeSet::from([value.clone()]));
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn values(&self, field: &str) -> Option<&BTreeSet<Scalar>> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str, value: &Scalar) -> bool {
        self.fields
            .get(field)
            .is_some_and(|values| values.contains(value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<Scalar>)> {
        self.fields
            .iter()
            .map(|(field, values)| (field.as_str(), values))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: serde_json::Value) -> Node {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn enumerate_nested_pairs() {
        let document = doc(json!({
            "organ": ["brain", "heart"],
            "donors": [{"sex": "male"}, "unlabelled", [{"age": 30}]],
            "title": "atlas"
        }));
        let pairs = enumerate_fields(&document)
            .map(|(field, value)| (field.map(str::to_string), value.to_string()))
            .collect::<Vec<_>>();

        assert_eq!(
            pairs,
            vec![
                (Some("sex".to_string()), "male".to_string()),
                (Some("donors".to_string()), "unlabelled".to_string()),
                (Some("age".to_string()), "30".to_string()),
                (Some("organ".to_string()), "brain".to_string()),
                (Some("organ".to_string()), "heart".to_string()),
                (Some("title".to_string()), "atlas".to_string()),
            ]
        );
    }

    #[test]
    fn bare_scalar_has_no_field() {
        let document = doc(json!(["loose", 1]));
        let fields = enumerate_fields(&document)
            .map(|(field, _)| field)
            .collect::<Vec<_>>();
        assert_eq!(fields, vec![None, None]);
    }

    #[test]
    fn catalog_deduplicates_values() {
        let first = doc(json!({"organ": ["brain", "brain"], "cells": 10}));
        let second = doc(json!({"specimens": [{"organ": "brain"}, {"organ": "lung"}]}));
        let loose = doc(json!("orphan"));

        let catalog = SearchCatalog::build([&first, &second, &loose]);

        assert_eq!(catalog.len(), 2);
        let organs = catalog.values("organ").unwrap();
        assert_eq!(organs.len(), 2);
        assert!(catalog.contains("organ", &Scalar::from("lung")));
        assert!(catalog.contains("cells", &Scalar::from(10i64)));
        assert!(!catalog.contains("specimens", &Scalar::from("brain")));
        assert_eq!(catalog.field_names().collect::<Vec<_>>(), vec!["cells", "organ"]);
    }

    #[test]
    fn catalog_serializes_as_plain_mapping() {
        let document = doc(json!({"organ": ["lung", "brain"]}));
        let catalog = SearchCatalog::build([&document]);
        assert_eq!(
            serde_json::to_value(&catalog).unwrap(),
            json!({"organ": ["brain", "lung"]})
        );
    }
}
