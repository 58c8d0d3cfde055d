#![allow(dead_code)]

use camino::Utf8PathBuf;

use cellatlas_search::corpus::Session;

pub const ESOPHAGUS: &str = "0c3b7785-f74d-4091-8616-a68757e4c2a8";
pub const NOSE: &str = "2f676143-80c2-4bc6-b7b4-2613fe0fadb0";
pub const MOUSE_BRAIN: &str = "4a95101c-9ffc-4f30-a809-f04518a23803";
pub const MOUSE_NERVOUS_SYSTEM: &str = "88ec040b-8705-4f77-8f41-f81e57632f7d";
pub const HUMAN_BRAIN: &str = "c4077b3c-5c98-4d26-a614-246d12c2e5d7";
pub const MOUSE_HEART: &str = "dbcd4b1d-31bd-4eb5-94e1-50e8bdd8b4e7";
pub const BARRETTS: &str = "f83165c5-e2ea-4d15-a5cf-33f3550bffde";

pub fn fixture_path() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("hca_sample.json")
}

pub fn fixture_session() -> Session {
    Session::load(&fixture_path()).unwrap()
}

pub fn sorted(mut projects: Vec<String>) -> Vec<String> {
    projects.sort();
    projects
}

pub fn ids(projects: &[&str]) -> Vec<String> {
    let mut ids = projects.iter().map(|id| id.to_string()).collect::<Vec<_>>();
    ids.sort();
    ids
}
