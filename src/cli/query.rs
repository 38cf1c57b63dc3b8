//! Run paths against JSON input

use super::{parse_document, CliError};
use crate::{OperationArgs, Parser};

/// Options for the get command
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    /// The path to evaluate
    pub path: String,
    /// JSON input string
    pub input: Option<String>,
}

/// Options for the set command
#[derive(Debug, Clone, Default)]
pub struct SetOptions {
    /// The path to write at
    pub path: String,
    /// Value to write; read as JSON, or as a plain string if it is not JSON
    pub value: String,
    /// JSON input string
    pub input: Option<String>,
}

/// Result of a get operation
#[derive(Debug)]
pub struct QueryResult {
    pub value: serde_json::Value,
    /// Whether the value was assembled from several elements
    pub many: bool,
}

/// Evaluate a path against the input document
pub fn execute_get(options: &GetOptions) -> Result<QueryResult, CliError> {
    let compiled = crate::compile(&options.path)?;
    let document = parse_document(options.input.as_ref())?;
    let (value, many) = compiled.lookup(&document)?;
    Ok(QueryResult { value, many })
}

/// Write a value into the input document and return the updated document
pub fn execute_set(options: &SetOptions) -> Result<serde_json::Value, CliError> {
    let compiled = crate::compile(&options.path)?;
    let mut document = parse_document(options.input.as_ref())?;
    let value = serde_json::from_str(&options.value)
        .unwrap_or_else(|_| serde_json::Value::String(options.value.clone()));
    compiled.set(&mut document, value)?;
    Ok(document)
}

/// Describe how a path is tokenized and compiled
pub fn execute_explain(path: &str) -> Result<String, CliError> {
    let parser = Parser::new(path)?;
    let tokens = parser.tokens().to_vec();
    let compiled = parser.parse()?;

    let mut out = format!("{}\ntokens: {:?}\n", compiled, tokens);
    for (i, op) in compiled.operations().iter().enumerate() {
        let args = match &op.args {
            OperationArgs::None => String::new(),
            OperationArgs::IndexList(indices) => format!(" {:?}", indices),
            OperationArgs::RangeBound(from, to) => format!(
                " {}..={}",
                from.map_or("first".to_string(), |f| f.to_string()),
                to.map_or("last".to_string(), |t| t.to_string())
            ),
            OperationArgs::FilterExpr(filter) => format!(" ?({})", filter.source()),
        };
        out.push_str(&format!("{:>3}. {:<6} `{}`{}\n", i + 1, op.kind, op.key, args));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{"a": {"b": [1, 2, 3]}, "c": "x"}"#;

    #[test]
    fn get_reports_multi_valued_results() {
        let result = execute_get(&GetOptions {
            path: "$.a.b[0:1]".into(),
            input: Some(DOC.into()),
        })
        .unwrap();
        assert_eq!(result.value, serde_json::json!([1, 2]));
        assert!(result.many);
    }

    #[test]
    fn get_without_input_fails() {
        let err = execute_get(&GetOptions {
            path: "$.a".into(),
            input: None,
        })
        .unwrap_err();
        assert!(matches!(err, CliError::NoInput));
    }

    #[test]
    fn set_parses_json_values_and_falls_back_to_strings() {
        let updated = execute_set(&SetOptions {
            path: "$.a.b[-1]".into(),
            value: "{\"n\": 1}".into(),
            input: Some(DOC.into()),
        })
        .unwrap();
        assert_eq!(updated["a"]["b"][2], serde_json::json!({"n": 1}));

        let updated = execute_set(&SetOptions {
            path: "$.c".into(),
            value: "plain text".into(),
            input: Some(DOC.into()),
        })
        .unwrap();
        assert_eq!(updated["c"], "plain text");
    }

    #[test]
    fn explain_lists_operations() {
        let text = execute_explain("$.store.book[?(@.price < 10)].title").unwrap();
        assert!(text.starts_with("Compiled lookup: $.store.book[?(@.price < 10)].title"));
        assert!(text.contains("filter"));
        assert!(text.contains("?(@.price < 10)"));
    }

    #[test]
    fn explain_output_is_exact() {
        let test_cases = vec![
            (
                "$.a[0]",
                "Compiled lookup: $.a[0]\ntokens: [\"$\", \"a[0]\"]\n  1. idx    `a` [0]\n",
            ),
            (
                "$..b[1:]",
                "Compiled lookup: $..b[1:]\ntokens: [\"$\", \"*\", \"b[1:]\"]\n  1. scan   `*`\n  2. range  `b` 1..=last\n",
            ),
        ];
        for (path, expected) in test_cases {
            assert_eq!(execute_explain(path).unwrap(), expected, "Failed for path: {}", path);
        }
    }
}
