use camino::Utf8Path;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::catalog::SearchCatalog;
use crate::config::SavedQuery;
use crate::corpus::Session;
use crate::domain::{CombineMode, MatchMode};
use crate::error::AtlasError;
use crate::files::FileEntry;
use crate::metadata::Scalar;
use crate::query::Query;
use crate::store::Store;

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub name: Option<String>,
    pub combine: CombineMode,
    pub match_mode: MatchMode,
    pub clauses: Query,
    pub total: usize,
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub searches: Vec<SearchResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldsResult {
    pub projects: usize,
    pub fields: Vec<FieldSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldSummary {
    pub field: String,
    pub distinct_values: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValuesResult {
    pub field: String,
    pub values: Vec<Scalar>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShowResult {
    pub project: String,
    pub fields: Vec<FieldValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldValue {
    pub field: Option<String>,
    pub value: Scalar,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilesResult {
    pub project: String,
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportResult {
    pub path: String,
    pub fields: usize,
    pub generated_at: String,
}

#[derive(Serialize)]
struct CatalogExport<'a> {
    generated_at: &'a str,
    projects: usize,
    fields: &'a SearchCatalog,
}

pub struct App {
    session: Session,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn search(&self, query: Query, combine: CombineMode, match_mode: MatchMode) -> SearchResult {
        let projects = self.session.search(&query, combine, match_mode);
        SearchResult {
            name: None,
            combine,
            match_mode,
            clauses: query,
            total: projects.len(),
            projects,
        }
    }

    pub fn run_saved(&self, queries: &[SavedQuery]) -> RunResult {
        let searches = queries
            .iter()
            .map(|saved| {
                let mut result =
                    self.search(saved.query.clone(), saved.combine, saved.match_mode);
                result.name = Some(saved.name.clone());
                result
            })
            .collect();
        RunResult { searches }
    }

    pub fn fields(&self) -> FieldsResult {
        let fields = self
            .session
            .catalog()
            .iter()
            .map(|(field, values)| FieldSummary {
                field: field.to_string(),
                distinct_values: values.len(),
            })
            .collect();
        FieldsResult {
            projects: self.session.corpus().len(),
            fields,
        }
    }

    /// Values observed under `field`; empty for a field the corpus never uses.
    pub fn values(&self, field: &str) -> ValuesResult {
        let values = self
            .session
            .catalog()
            .values(field)
            .map(|values| values.iter().cloned().collect())
            .unwrap_or_default();
        ValuesResult {
            field: field.to_string(),
            values,
        }
    }

    pub fn show(&self, project: &str) -> Result<ShowResult, AtlasError> {
        let fields = self
            .session
            .fields_of(project)?
            .into_iter()
            .map(|(field, value)| FieldValue {
                field: field.map(str::to_string),
                value: value.clone(),
            })
            .collect();
        Ok(ShowResult {
            project: project.to_string(),
            fields,
        })
    }

    pub fn files(&self, project: &str) -> Result<FilesResult, AtlasError> {
        Ok(FilesResult {
            project: project.to_string(),
            files: self.session.download_plan(project)?,
        })
    }

    pub fn export_catalog(&self, path: &Utf8Path) -> Result<ExportResult, AtlasError> {
        let generated_at = Utc::now().to_rfc3339();
        let catalog = self.session.catalog();
        let export = CatalogExport {
            generated_at: &generated_at,
            projects: self.session.corpus().len(),
            fields: catalog,
        };
        Store::write_json_atomic(path, &export)?;
        info!(path = %path, fields = catalog.len(), "catalog exported");
        Ok(ExportResult {
            path: path.to_string(),
            fields: catalog.len(),
            generated_at,
        })
    }
}
