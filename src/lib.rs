pub mod app;
pub mod catalog;
pub mod config;
pub mod corpus;
pub mod domain;
pub mod error;
pub mod files;
pub mod matcher;
pub mod metadata;
pub mod output;
pub mod query;
pub mod store;
