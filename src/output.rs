use std::io::{self, Write};

use serde::Serialize;

use crate::app::{
    ExportResult, FieldsResult, FilesResult, RunResult, SearchResult, ShowResult, ValuesResult,
};

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Text,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_search(result: &SearchResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_run(result: &RunResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_fields(result: &FieldsResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_values(result: &ValuesResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_show(result: &ShowResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_files(result: &FilesResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_export(result: &ExportResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

pub struct TextOutput;

impl TextOutput {
    pub fn print_search(result: &SearchResult) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        Self::write_search(&mut stdout, result)
    }

    pub fn print_run(result: &RunResult) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        for search in &result.searches {
            Self::write_search(&mut stdout, search)?;
        }
        Ok(())
    }

    pub fn print_fields(result: &FieldsResult) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(
            stdout,
            "{CYAN}{} searchable fields across {} projects{RESET}",
            result.fields.len(),
            result.projects
        )?;
        for summary in &result.fields {
            writeln!(stdout, "  {} ({} values)", summary.field, summary.distinct_values)?;
        }
        Ok(())
    }

    pub fn print_values(result: &ValuesResult) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        if result.values.is_empty() {
            writeln!(stdout, "{YELLOW}no values recorded for {}{RESET}", result.field)?;
            return Ok(());
        }
        writeln!(stdout, "{CYAN}{}{RESET}", result.field)?;
        for value in &result.values {
            writeln!(stdout, "  {value}")?;
        }
        Ok(())
    }

    pub fn print_show(result: &ShowResult) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        for entry in &result.fields {
            let field = entry.field.as_deref().unwrap_or("-");
            writeln!(stdout, "found {} at {field} in {}", entry.value, result.project)?;
        }
        Ok(())
    }

    pub fn print_files(result: &FilesResult) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(
            stdout,
            "{CYAN}{} downloadable files for {}{RESET}",
            result.files.len(),
            result.project
        )?;
        for file in &result.files {
            writeln!(stdout, "{GREEN}  {}{RESET}", file.name)?;
            writeln!(stdout, "    {}", file.url)?;
        }
        Ok(())
    }

    pub fn print_export(result: &ExportResult) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(
            stdout,
            "{GREEN}wrote {} fields to {}{RESET}",
            result.fields, result.path
        )
    }

    fn write_search<W: Write>(out: &mut W, result: &SearchResult) -> io::Result<()> {
        let label = result.name.as_deref().unwrap_or("search");
        let color = if result.projects.is_empty() { YELLOW } else { GREEN };
        writeln!(
            out,
            "{color}{label}: {} projects ({}, {}){RESET}",
            result.total, result.combine, result.match_mode
        )?;
        for project in &result.projects {
            writeln!(out, "  {project}")?;
        }
        Ok(())
    }
}
