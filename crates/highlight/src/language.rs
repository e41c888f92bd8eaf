use std::fmt;
use std::ops::Range;

use regex::Regex;
use thiserror::Error;

/// Category painted by a highlight rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    Keyword,
    FunctionCall,
    String,
    Number,
    Directive,
}

impl HighlightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightKind::Keyword => "keyword",
            HighlightKind::FunctionCall => "function",
            HighlightKind::String => "string",
            HighlightKind::Number => "number",
            HighlightKind::Directive => "directive",
        }
    }
}

impl fmt::Display for HighlightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single regex match produced by one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightToken {
    pub range: Range<usize>,
    pub kind: HighlightKind,
}

/// A painted run after later rules have overridden earlier ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub range: Range<usize>,
    pub kind: HighlightKind,
}

#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("regex compilation failed: {0}")]
    RegexCompilation(String),
}

/// Pattern paired with the style it paints.
#[derive(Debug, Clone)]
pub struct HighlightRule {
    regex: Regex,
    kind: HighlightKind,
}

impl HighlightRule {
    pub fn new(pattern: &str, kind: HighlightKind) -> Result<Self, HighlightError> {
        let regex = Regex::new(pattern).map_err(|err| {
            HighlightError::RegexCompilation(format!("{kind} rule '{pattern}': {err}"))
        })?;
        Ok(Self { regex, kind })
    }

    /// Builds a rule that matches `word` only as a whole word.
    pub fn word(word: &str, kind: HighlightKind) -> Result<Self, HighlightError> {
        Self::new(&format!(r"\b{}\b", regex::escape(word)), kind)
    }

    pub fn kind(&self) -> HighlightKind {
        self.kind
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// Ordered regex rules applied line by line. Later rules win where matches overlap.
#[derive(Debug, Clone)]
pub struct Highlighter {
    rules: Vec<HighlightRule>,
}

impl Highlighter {
    pub fn new(rules: Vec<HighlightRule>) -> Self {
        Self { rules }
    }

    /// Highlighter for C sources with the built-in rule list.
    pub fn c_language() -> Self {
        Self::new(builtin::c_rules().to_vec())
    }

    pub fn rules(&self) -> &[HighlightRule] {
        &self.rules
    }

    /// Every match of every rule, in rule order.
    pub fn highlight_line(&self, line: &str) -> Vec<HighlightToken> {
        let mut tokens = Vec::new();
        for rule in &self.rules {
            for found in rule.regex.find_iter(line) {
                if found.start() == found.end() {
                    continue;
                }
                tokens.push(HighlightToken {
                    range: found.start()..found.end(),
                    kind: rule.kind,
                });
            }
        }
        tokens
    }

    /// Paints the tokens of `line` in rule order and merges the result into runs.
    pub fn resolve_line(&self, line: &str) -> Vec<StyledRun> {
        if line.is_empty() {
            return Vec::new();
        }
        let mut painted: Vec<Option<HighlightKind>> = vec![None; line.len()];
        for token in self.highlight_line(line) {
            for slot in &mut painted[token.range.clone()] {
                *slot = Some(token.kind);
            }
        }
        coalesce(&painted)
    }

    /// Resolves every line of `text`, returning runs in document offsets.
    pub fn resolve_document(&self, text: &str) -> Vec<StyledRun> {
        let mut runs = Vec::new();
        let mut offset = 0;
        for line in text.split('\n') {
            runs.extend(self.resolve_line(line).into_iter().map(|run| StyledRun {
                range: run.range.start + offset..run.range.end + offset,
                kind: run.kind,
            }));
            offset += line.len() + 1;
        }
        runs
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::c_language()
    }
}

fn coalesce(painted: &[Option<HighlightKind>]) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut current: Option<(usize, HighlightKind)> = None;
    for (index, slot) in painted.iter().enumerate() {
        match (current, slot) {
            (Some((_, kind)), Some(next)) if kind == *next => {}
            (Some((start, kind)), _) => {
                runs.push(StyledRun {
                    range: start..index,
                    kind,
                });
                current = slot.map(|next| (index, next));
            }
            (None, Some(next)) => current = Some((index, *next)),
            (None, None) => {}
        }
    }
    if let Some((start, kind)) = current {
        runs.push(StyledRun {
            range: start..painted.len(),
            kind,
        });
    }
    runs
}

pub mod builtin {
    use once_cell::sync::Lazy;

    use super::{HighlightKind, HighlightRule};

    pub const C_KEYWORDS: &[&str] = &[
        "int", "char", "float", "if", "else", "for", "while", "return", "void", "struct",
        "typedef", "enum", "const", "static", "extern", "switch", "case", "break", "continue",
        "goto", "sizeof", "long", "short", "unsigned", "signed",
    ];

    pub const C_FUNCTIONS: &[&str] = &[
        "printf", "scanf", "malloc", "free", "strlen", "strcmp", "strcpy", "fopen", "fclose",
        "fread", "fwrite", "exit", "perror", "system",
    ];

    pub const STRING_PATTERN: &str = r#""[^"\\]*(\\.[^"\\]*)*""#;
    pub const NUMBER_PATTERN: &str = r"\b\d+\b";
    pub const DIRECTIVE_PATTERN: &str = r"#\s*(include|define)\b";

    static C_RULES: Lazy<Vec<HighlightRule>> = Lazy::new(|| {
        let function_pattern = format!(r"\b({})\b\s*\(", C_FUNCTIONS.join("|"));
        let mut rules: Vec<HighlightRule> = C_KEYWORDS
            .iter()
            .map(|word| {
                HighlightRule::word(word, HighlightKind::Keyword)
                    .expect("built-in keyword rule should compile")
            })
            .collect();
        rules.extend([
            HighlightRule::new(STRING_PATTERN, HighlightKind::String)
                .expect("built-in string rule should compile"),
            HighlightRule::new(NUMBER_PATTERN, HighlightKind::Number)
                .expect("built-in number rule should compile"),
            HighlightRule::new(&function_pattern, HighlightKind::FunctionCall)
                .expect("built-in function rule should compile"),
            HighlightRule::new(DIRECTIVE_PATTERN, HighlightKind::Directive)
                .expect("built-in directive rule should compile"),
        ]);
        rules
    });

    /// Rule list for C in application order.
    pub fn c_rules() -> &'static [HighlightRule] {
        &C_RULES
    }
}
