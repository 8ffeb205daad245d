use crate::block::{BlockError, BlockSpec, Terminator};
use crate::tree::ParseOptions;
use serde::Deserialize;
use std::fmt;

/// Top-level settings file.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Settings {
    #[serde(default)]
    pub parse: ParseSection,
    #[serde(default)]
    pub input: InputSection,
    #[serde(default)]
    pub blocks: Vec<BlockDefinition>,
}

impl Settings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.parse_options().map(|_| ())
    }

    /// Collect every problem with the settings and, if there are none, the
    /// parse options they describe.
    pub fn parse_options(&self) -> Result<ParseOptions, ValidationError> {
        let mut issues = Vec::new();

        let comment_chars: Vec<char> = self
            .parse
            .comment
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        if comment_chars.is_empty() {
            issues.push(ValidationIssue::MissingField {
                block: None,
                field: "parse.comment",
            });
        }

        let mut blocks = if self.parse.default_blocks {
            BlockSpec::ios_banners()
        } else {
            Vec::new()
        };

        for block in &self.blocks {
            if block.name.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    block: None,
                    field: "blocks.name",
                });
            }
            if block.start.trim().is_empty() {
                issues.push(ValidationIssue::MissingField {
                    block: Some(block.name.clone()),
                    field: "blocks.start",
                });
                continue;
            }
            match BlockSpec::new(block.name.clone(), &block.start, block.terminator) {
                Ok(spec) => blocks.push(spec),
                Err(source) => issues.push(ValidationIssue::InvalidBlock(source)),
            }
        }

        for ext in &self.input.extensions {
            if ext.trim().trim_start_matches('.').is_empty() {
                issues.push(ValidationIssue::MissingField {
                    block: None,
                    field: "input.extensions",
                });
            }
        }

        if issues.is_empty() {
            Ok(ParseOptions {
                comment_chars,
                blocks,
            })
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ParseSection {
    /// Every non-whitespace character here is a comment marker
    #[serde(default = "default_comment")]
    pub comment: String,
    /// Include the IOS banner kinds before any `[[blocks]]`
    #[serde(default = "default_true")]
    pub default_blocks: bool,
}

impl Default for ParseSection {
    fn default() -> Self {
        Self {
            comment: default_comment(),
            default_blocks: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputSection {
    /// File extensions picked up when a directory is given
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

impl InputSection {
    pub fn accepts(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| ext.trim().trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BlockDefinition {
    pub name: String,
    /// Regex matching the first line of the block
    pub start: String,
    #[serde(default)]
    pub terminator: Terminator,
}

fn default_comment() -> String {
    "!".to_string()
}

fn default_true() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    ["conf", "cfg", "txt"].map(String::from).to_vec()
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub enum ValidationIssue {
    MissingField {
        block: Option<String>,
        field: &'static str,
    },
    InvalidBlock(BlockError),
}

impl ValidationIssue {
    /// The `[[blocks]]` entry this issue points at, if any.
    pub fn block(&self) -> Option<&str> {
        match self {
            ValidationIssue::MissingField { block, .. } => block.as_deref(),
            ValidationIssue::InvalidBlock(source) => Some(source.name()),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingField { block, field } => match block {
                Some(name) => write!(f, "block '{name}' missing required field '{field}'"),
                None => write!(f, "missing required field '{field}'"),
            },
            ValidationIssue::InvalidBlock(source) => write!(f, "{source}"),
        }
    }
}
