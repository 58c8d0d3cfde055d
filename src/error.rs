use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum AtlasError {
    #[error("invalid {kind} value {value:?}; expected one of: {allowed}")]
    InvalidArgument {
        kind: &'static str,
        value: String,
        allowed: &'static str,
    },

    #[error("invalid search clause (expected field=value): {0}")]
    InvalidClause(String),

    #[error("missing config file cellatlas.json in current directory")]
    MissingConfig,

    #[error("failed to read config file at {0}")]
    ConfigRead(Utf8PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("failed to read corpus file at {0}")]
    CorpusRead(Utf8PathBuf),

    #[error("failed to parse corpus JSON: {0}")]
    CorpusParse(String),

    #[error("project not found in corpus: {0}")]
    ProjectNotFound(String),

    #[error("saved query not found: {0}")]
    QueryNotFound(String),

    #[error("malformed file tree in project {project} at {path}: expected a list of files")]
    MalformedFileTree { project: String, path: String },

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
