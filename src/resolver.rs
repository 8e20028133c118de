//! Column-name collision resolvers.
//!
//! When two headers slugify to the same name the schema inferrer asks a
//! [`NameResolver`] for a replacement. Resolvers may prompt a person
//! ([`PromptResolver`]), answer from a script ([`RenameMapResolver`]),
//! or generate names ([`SuffixResolver`]). Plain closures also work.

use std::{
    collections::{HashMap, HashSet},
    io::{BufRead, Write},
};

use anyhow::{Context, Result, anyhow, bail};

pub trait NameResolver {
    /// Returns a replacement for `proposed`, which already exists in the
    /// schema. `column_label` is the spreadsheet letter of the column.
    fn resolve(&mut self, proposed: &str, column_label: &str) -> Result<String>;
}

impl<F> NameResolver for F
where
    F: FnMut(&str, &str) -> String,
{
    fn resolve(&mut self, proposed: &str, column_label: &str) -> Result<String> {
        Ok(self(proposed, column_label))
    }
}

/// Asks for a new name on `output` and reads one line from `input`.
pub struct PromptResolver<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptResolver<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> NameResolver for PromptResolver<R, W> {
    fn resolve(&mut self, proposed: &str, column_label: &str) -> Result<String> {
        write!(
            self.output,
            "column name {proposed} of Column '{column_label}' already exists. Enter a new name: "
        )
        .context("Writing rename prompt")?;
        self.output.flush().context("Flushing rename prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Reading replacement column name")?;
        if read == 0 {
            bail!("Input closed while waiting for a new name for column '{column_label}'");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Appends `_2`, `_3`, ... to the proposed name.
#[derive(Debug, Default)]
pub struct SuffixResolver {
    counters: HashMap<String, usize>,
}

impl SuffixResolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NameResolver for SuffixResolver {
    fn resolve(&mut self, proposed: &str, _column_label: &str) -> Result<String> {
        let base = proposed.to_string();
        let next = self.counters.entry(base.clone()).or_insert(1);
        *next += 1;
        Ok(format!("{base}_{next}"))
    }
}

/// Never resolves; turns every collision into an error.
#[derive(Debug, Default)]
pub struct FailResolver;

impl NameResolver for FailResolver {
    fn resolve(&mut self, proposed: &str, column_label: &str) -> Result<String> {
        Err(anyhow!(
            "Column '{column_label}' duplicates column name '{proposed}'"
        ))
    }
}

/// Answers from `LABEL=NAME` pairs keyed by column letter, deferring to
/// `fallback` for columns without an entry or once an entry was used.
pub struct RenameMapResolver<F> {
    renames: HashMap<String, String>,
    used: HashSet<String>,
    fallback: F,
}

impl<F: NameResolver> RenameMapResolver<F> {
    pub fn new(renames: HashMap<String, String>, fallback: F) -> Self {
        let renames = renames
            .into_iter()
            .map(|(label, name)| (label.to_ascii_uppercase(), name))
            .collect();
        Self {
            renames,
            used: HashSet::new(),
            fallback,
        }
    }

    /// Parses `LABEL=NAME` specs such as `B=name_2`.
    pub fn parse_specs(specs: &[String], fallback: F) -> Result<Self> {
        let mut renames = HashMap::new();
        for spec in specs {
            let (label, name) = spec
                .split_once('=')
                .ok_or_else(|| anyhow!("Rename '{spec}' must use the form COLUMN=NAME"))?;
            let label = label.trim();
            let name = name.trim();
            if label.is_empty() || !label.chars().all(|c| c.is_ascii_alphabetic()) {
                bail!("Rename '{spec}' must name a column letter such as B or AA");
            }
            if name.is_empty() {
                bail!("Rename '{spec}' has an empty replacement name");
            }
            if renames
                .insert(label.to_ascii_uppercase(), name.to_string())
                .is_some()
            {
                bail!("Column '{label}' is renamed more than once");
            }
        }
        Ok(Self::new(renames, fallback))
    }
}

impl<F: NameResolver> NameResolver for RenameMapResolver<F> {
    fn resolve(&mut self, proposed: &str, column_label: &str) -> Result<String> {
        let key = column_label.to_ascii_uppercase();
        match self.renames.get(&key) {
            Some(name) if self.used.insert(key.clone()) => Ok(name.clone()),
            _ => self.fallback.resolve(proposed, column_label),
        }
    }
}
