use std::fs;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::domain::{ClauseSpecifier, CombineMode, MatchMode};
use crate::error::AtlasError;
use crate::query::Query;

pub const DEFAULT_CONFIG: &str = "cellatlas.json";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub corpus: Option<String>,
    #[serde(default)]
    pub match_mode: Option<String>,
    #[serde(default)]
    pub combine: Option<String>,
    #[serde(default)]
    pub queries: Vec<QueryEntry>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum QueryEntry {
    Shorthand(String),
    Detailed(QueryEntryObject),
}

#[derive(Debug, Deserialize, Serialize)]
pub struct QueryEntryObject {
    pub name: String,
    pub clauses: Query,
    #[serde(default)]
    pub combine: Option<String>,
    #[serde(default)]
    pub match_mode: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedQuery {
    pub name: String,
    pub query: Query,
    pub combine: CombineMode,
    pub match_mode: MatchMode,
}

#[derive(Debug, Clone, Default)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub corpus: Option<Utf8PathBuf>,
    pub match_mode: MatchMode,
    pub combine: CombineMode,
    pub queries: Vec<SavedQuery>,
}

impl ResolvedConfig {
    pub fn query(&self, name: &str) -> Result<&SavedQuery, AtlasError> {
        self.queries
            .iter()
            .find(|saved| saved.name == name)
            .ok_or_else(|| AtlasError::QueryNotFound(name.to_string()))
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, AtlasError> {
        let config_path = Utf8PathBuf::from(path.unwrap_or(DEFAULT_CONFIG));

        if path.is_none() && !config_path.as_std_path().exists() {
            return Err(AtlasError::MissingConfig);
        }

        let content = fs::read_to_string(config_path.as_std_path())
            .map_err(|_| AtlasError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| AtlasError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    /// Same as [`ConfigLoader::resolve`], but an absent default config file
    /// yields the built-in defaults.
    pub fn resolve_or_default(path: Option<&str>) -> Result<ResolvedConfig, AtlasError> {
        match Self::resolve(path) {
            Err(AtlasError::MissingConfig) => Self::resolve_config(Config::default()),
            other => other,
        }
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, AtlasError> {
        let schema_version = config.schema_version.unwrap_or(1);
        let match_mode = parse_or_default::<MatchMode>(config.match_mode.as_deref())?;
        let combine = parse_or_default::<CombineMode>(config.combine.as_deref())?;

        let queries = config
            .queries
            .into_iter()
            .map(|entry| match entry {
                QueryEntry::Shorthand(value) => {
                    let clause: ClauseSpecifier = value.parse()?;
                    Ok(SavedQuery {
                        name: value.trim().to_string(),
                        query: Query::from_iter([clause]),
                        combine,
                        match_mode,
                    })
                }
                QueryEntry::Detailed(obj) => Ok(SavedQuery {
                    name: obj.name,
                    query: obj.clauses,
                    combine: match obj.combine.as_deref() {
                        Some(value) => value.parse()?,
                        None => combine,
                    },
                    match_mode: match obj.match_mode.as_deref() {
                        Some(value) => value.parse()?,
                        None => match_mode,
                    },
                }),
            })
            .collect::<Result<Vec<_>, AtlasError>>()?;

        Ok(ResolvedConfig {
            schema_version,
            corpus: config.corpus.map(Utf8PathBuf::from),
            match_mode,
            combine,
            queries,
        })
    }
}

fn parse_or_default<T>(value: Option<&str>) -> Result<T, AtlasError>
where
    T: std::str::FromStr<Err = AtlasError> + Default,
{
    value.map(str::parse::<T>).transpose().map(Option::unwrap_or_default)
}
