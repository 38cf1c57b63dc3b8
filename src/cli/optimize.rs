//! Canonicalize paths against JSON input

use super::{parse_document, CliError};
use crate::Discriminators;

/// Options for the optimize command
#[derive(Debug, Clone, Default)]
pub struct OptimizeOptions {
    /// The path to canonicalize
    pub path: String,
    /// JSON input string
    pub input: Option<String>,
    /// Discriminator table as JSON; the built-in table when absent
    pub discriminators: Option<String>,
}

/// Canonicalize a path against the input document
pub fn execute_optimize(options: &OptimizeOptions) -> Result<String, CliError> {
    let table = match &options.discriminators {
        Some(text) => load_discriminators(text)?,
        None => Discriminators::default(),
    };
    let document = parse_document(options.input.as_ref())?;
    Ok(crate::optimize_with(&document, &options.path, &table)?)
}

/// Read a table of the form `{ "<container>": ["field", "nested.field"] }`.
///
/// The loaded table replaces the built-in one.
pub fn load_discriminators(text: &str) -> Result<Discriminators, CliError> {
    let raw: serde_json::Value = serde_json::from_str(text)?;
    let entries = raw
        .as_object()
        .ok_or_else(|| CliError::Config("expected an object of container names".into()))?;

    let mut table = Discriminators::empty();
    for (container, fields) in entries {
        let fields = fields
            .as_array()
            .ok_or_else(|| CliError::Config(format!("`{}` should list field names", container)))?
            .iter()
            .map(|field| {
                field.as_str().map(str::to_string).ok_or_else(|| {
                    CliError::Config(format!("`{}` has a field name that is not a string", container))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        table = table.with(container.as_str(), fields);
    }
    Ok(table)
}
