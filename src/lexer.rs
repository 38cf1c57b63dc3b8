use crate::error::{PathError, Result};

/// Splits a raw path into segment tokens.
///
/// The first token is always the root marker (`$` or `@`). Dots separate
/// segments except inside `[...]`, and a `..` becomes a single `*` token.
/// Brackets nest, so filter operands may index (`[?(@.tags[0] == 'a')]`);
/// an escaped `\[` or `\]` does not count, so regex literals may hold
/// either.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    tokens: Vec<String>,
    pending: String,
    depth: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            tokens: Vec::new(),
            pending: String::new(),
            depth: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn push_scan(&mut self) {
        if self.tokens.last().map(String::as_str) != Some("*") {
            self.tokens.push("*".to_string());
        }
    }

    /// Emit `text` with a leading separator dot removed.
    fn push_segment(&mut self, text: &str) {
        let text = text.strip_prefix('.').unwrap_or(text);
        if text == "*" {
            self.push_scan();
        } else {
            self.tokens.push(text.to_string());
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<String>> {
        match self.current_char() {
            Some(root @ ('$' | '@')) => {
                self.tokens.push(root.to_string());
                self.advance();
            }
            _ => {
                return Err(PathError::MalformedPath(
                    "path should start with '$' or '@'".into(),
                ));
            }
        }

        while let Some(ch) = self.current_char() {
            self.advance();
            let escaped = self.pending.ends_with('\\');
            self.pending.push(ch);

            if self.pending == "." {
                continue;
            }
            if self.pending == ".." {
                self.push_scan();
                self.pending = ".".to_string();
                continue;
            }

            match ch {
                '[' if !escaped => self.depth += 1,
                ']' if !escaped && self.depth > 0 => {
                    self.depth -= 1;
                    if self.depth == 0 {
                        let segment = std::mem::take(&mut self.pending);
                        let segment = segment.strip_prefix('.').unwrap_or(&segment);
                        self.tokens.push(segment.to_string());
                    }
                }
                '.' if self.depth == 0 => {
                    let mut segment = std::mem::take(&mut self.pending);
                    segment.pop();
                    let segment = segment.strip_prefix('.').unwrap_or(&segment);
                    self.tokens.push(segment.to_string());
                    self.pending = ".".to_string();
                }
                _ => {}
            }
        }

        if !self.pending.is_empty() {
            let segment = std::mem::take(&mut self.pending);
            self.push_segment(&segment);
        }

        Ok(self.tokens)
    }
}

/// Tokenize `path` into its root marker followed by segment tokens.
pub fn tokenize(path: &str) -> Result<Vec<String>> {
    Lexer::new(path).tokenize()
}

#[test]
fn test_recursive_descent_collapses() {
    assert_eq!(tokenize("$..author").unwrap(), vec!["$", "*", "author"]);
    assert_eq!(tokenize("$....author").unwrap(), vec!["$", "*", "author"]);
    assert_eq!(tokenize("$..*").unwrap(), vec!["$", "*"]);
}

#[test]
fn test_nested_brackets() {
    assert_eq!(
        tokenize("$.a[?(@.tags[0] == 'x')].b").unwrap(),
        vec!["$", "a[?(@.tags[0] == 'x')]", "b"]
    );
    assert_eq!(
        tokenize(r"$.a[?(@.n =~ /\[x/)]").unwrap(),
        vec!["$", r"a[?(@.n =~ /\[x/)]"]
    );
}

#[test]
fn test_brackets_keep_dots() {
    assert_eq!(
        tokenize("$.store.book[?(@.price > 10)].title").unwrap(),
        vec!["$", "store", "book[?(@.price > 10)]", "title"]
    );
}
