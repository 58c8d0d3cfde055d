use std::collections::BTreeMap;
use std::fs;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{SearchCatalog, enumerate_fields};
use crate::domain::{CombineMode, MatchMode};
use crate::error::AtlasError;
use crate::files::{FileEntry, download_plan};
use crate::metadata::{Node, Scalar};
use crate::query::{Query, search};

/// Project identifier to metadata document, as written by the loader.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Corpus {
    documents: BTreeMap<String, Node>,
}

impl Corpus {
    pub fn load(path: &Utf8Path) -> Result<Self, AtlasError> {
        let content = fs::read_to_string(path.as_std_path())
            .map_err(|_| AtlasError::CorpusRead(path.to_path_buf()))?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, AtlasError> {
        serde_json::from_str(content).map_err(|err| AtlasError::CorpusParse(err.to_string()))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn contains(&self, project: &str) -> bool {
        self.documents.contains_key(project)
    }

    pub fn get(&self, project: &str) -> Option<&Node> {
        self.documents.get(project)
    }

    pub fn project(&self, project: &str) -> Result<&Node, AtlasError> {
        self.get(project)
            .ok_or_else(|| AtlasError::ProjectNotFound(project.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.documents
            .iter()
            .map(|(project, document)| (project.as_str(), document))
    }
}

impl FromIterator<(String, Node)> for Corpus {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        Self {
            documents: iter.into_iter().collect(),
        }
    }
}

/// A loaded corpus and the catalog derived from it. Neither changes after
/// construction, so a session can be shared freely between readers.
#[derive(Debug, Clone)]
pub struct Session {
    corpus: Corpus,
    catalog: SearchCatalog,
}

impl Session {
    pub fn new(corpus: Corpus) -> Self {
        let catalog = SearchCatalog::build(corpus.iter().map(|(_, document)| document));
        info!(
            projects = corpus.len(),
            fields = catalog.len(),
            "search catalog built"
        );
        Self { corpus, catalog }
    }

    pub fn load(path: &Utf8Path) -> Result<Self, AtlasError> {
        let corpus = Corpus::load(path)?;
        info!(path = %path, projects = corpus.len(), "corpus loaded");
        Ok(Self::new(corpus))
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn catalog(&self) -> &SearchCatalog {
        &self.catalog
    }

    pub fn search(&self, query: &Query, combine: CombineMode, mode: MatchMode) -> Vec<String> {
        search(&self.corpus, query, combine, mode)
    }

    /// Like [`Session::search`] with the modes given as text; both are
    /// validated before any document is visited.
    pub fn search_str(
        &self,
        query: &Query,
        combine: &str,
        mode: &str,
    ) -> Result<Vec<String>, AtlasError> {
        let combine = combine.parse::<CombineMode>()?;
        let mode = mode.parse::<MatchMode>()?;
        Ok(self.search(query, combine, mode))
    }

    pub fn fields_of(&self, project: &str) -> Result<Vec<(Option<&str>, &Scalar)>, AtlasError> {
        let document = self.corpus.project(project)?;
        Ok(enumerate_fields(document).collect())
    }

    pub fn download_plan(&self, project: &str) -> Result<Vec<FileEntry>, AtlasError> {
        let document = self.corpus.project(project)?;
        download_plan(project, document)
    }
}
