mod common;

use std::fs;

use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use cellatlas_search::app::App;
use cellatlas_search::config::SavedQuery;
use cellatlas_search::domain::{CombineMode, MatchMode};
use cellatlas_search::error::AtlasError;
use cellatlas_search::metadata::Scalar;
use cellatlas_search::query::Query;

use common::*;

#[test]
fn search_reports_clauses_and_total() {
    let app = App::new(fixture_session());
    let result = app.search(
        Query::new().with("organ", "heart"),
        CombineMode::Union,
        MatchMode::Full,
    );
    assert_eq!(result.total, 1);
    assert_eq!(result.projects, vec![MOUSE_HEART.to_string()]);
    assert!(result.name.is_none());

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["combine"], "union");
    assert_eq!(json["match_mode"], "full");
    assert_eq!(json["clauses"]["organ"], "heart");
}

#[test]
fn run_saved_names_each_search() {
    let app = App::new(fixture_session());
    let saved = vec![
        SavedQuery {
            name: "mouse-brain".to_string(),
            query: Query::new()
                .with("genusSpecies", "Mus musculus")
                .with("organ", "brain"),
            combine: CombineMode::Intersection,
            match_mode: MatchMode::Full,
        },
        SavedQuery {
            name: "nasal".to_string(),
            query: Query::new().with("organPart", "nasal"),
            combine: CombineMode::Union,
            match_mode: MatchMode::Partial,
        },
    ];

    let result = app.run_saved(&saved);
    assert_eq!(result.searches.len(), 2);
    assert_eq!(result.searches[0].name.as_deref(), Some("mouse-brain"));
    assert_eq!(result.searches[0].total, 2);
    assert_eq!(result.searches[1].projects, vec![NOSE.to_string()]);
}

#[test]
fn fields_and_values_come_from_catalog() {
    let app = App::new(fixture_session());
    let fields = app.fields();
    assert_eq!(fields.projects, 7);
    let organ = fields
        .fields
        .iter()
        .find(|summary| summary.field == "organ")
        .unwrap();
    assert_eq!(organ.distinct_values, 6);

    let values = app.values("genusSpecies");
    assert_eq!(
        values.values,
        vec![Scalar::from("Homo sapiens"), Scalar::from("Mus musculus")]
    );
    assert!(app.values("unknownField").values.is_empty());
}

#[test]
fn show_lists_project_pairs() {
    let app = App::new(fixture_session());
    let result = app.show(BARRETTS).unwrap();
    assert!(result.fields.iter().any(|entry| {
        entry.field.as_deref() == Some("organ") && entry.value == Scalar::from("Esophagus")
    }));
    assert_matches!(app.show("no-such-project"), Err(AtlasError::ProjectNotFound(_)));
}

#[test]
fn files_plan_for_project() {
    let app = App::new(fixture_session());
    let result = app.files(MOUSE_BRAIN).unwrap();
    let names = result
        .files
        .iter()
        .map(|file| file.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["mouse-brain-10x.h5ad", "mouse-brain-clusters.h5ad"]);
    assert!(result.files.iter().all(|file| !file.url.contains("/fetch")));

    assert!(app.files(NOSE).unwrap().files.is_empty());
}

#[test]
fn export_writes_catalog_json() {
    let temp = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(temp.path().join("out").join("catalog.json")).unwrap();
    let app = App::new(fixture_session());

    let result = app.export_catalog(&path).unwrap();
    assert_eq!(result.fields, app.session().catalog().len());

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(path.as_std_path()).unwrap()).unwrap();
    assert_eq!(written["projects"], 7);
    assert_eq!(written["generated_at"], result.generated_at.as_str());
    assert!(
        written["fields"]["organ"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("nose"))
    );
}
