use crate::block::errors::BlockError;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Banner kinds recognised on IOS devices.
pub const IOS_BANNERS: &[&str] = &["login", "motd", "exec", "incoming"];

/// How the end of a multiline block is recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Terminator {
    /// The next comment line ends the block and is not part of it.
    #[default]
    Comment,
    /// The start pattern's first capture group is the end delimiter. The
    /// first later line containing it ends the block and is part of it.
    Delimiter,
}

/// A multiline block kind: a start marker plus a terminator convention.
#[derive(Debug, Clone)]
pub struct BlockSpec {
    name: String,
    start: Regex,
    terminator: Terminator,
}

impl BlockSpec {
    pub fn new(
        name: impl Into<String>,
        start: &str,
        terminator: Terminator,
    ) -> Result<Self, BlockError> {
        let name = name.into();
        let start = Regex::new(start).map_err(|e| BlockError::InvalidPattern {
            name: name.clone(),
            message: e.to_string(),
        })?;

        if terminator == Terminator::Delimiter && start.captures_len() < 2 {
            return Err(BlockError::MissingCaptureGroup { name });
        }

        Ok(Self {
            name,
            start,
            terminator,
        })
    }

    /// Banner of the given kind, e.g. `motd` for `banner motd ^C`.
    ///
    /// The banner body runs until the next comment line.
    pub fn banner(kind: &str) -> Result<Self, BlockError> {
        let pattern = format!(r"banner\s+{}\s+\^\S+", keyword_pattern(kind));
        Self::new(format!("banner {kind}"), &pattern, Terminator::Comment)
    }

    /// One banner spec per entry of [`IOS_BANNERS`].
    pub fn ios_banners() -> Vec<Self> {
        IOS_BANNERS
            .iter()
            .filter_map(|kind| match Self::banner(kind) {
                Ok(spec) => Some(spec),
                Err(err) => {
                    log::error!("skipping built-in banner: {err}");
                    None
                }
            })
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> &Regex {
        &self.start
    }

    pub fn terminator(&self) -> Terminator {
        self.terminator
    }

    /// End delimiter captured from the start line, for delimiter blocks.
    pub(crate) fn delimiter<'a>(&self, start_line: &'a str) -> Option<&'a str> {
        self.start
            .captures(start_line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|d| !d.is_empty())
    }
}

/// Escape each whitespace-separated word and allow any run of whitespace between them.
fn keyword_pattern(keyword: &str) -> String {
    keyword
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_matches_custom_delimiter() {
        let spec = BlockSpec::banner("motd").unwrap();
        assert!(spec.start().is_match("banner motd ^C"));
        assert!(spec.start().is_match("banner  motd   ^CCC"));
        assert!(!spec.start().is_match("banner motd"));
        assert!(!spec.start().is_match("banner login ^C"));
        assert_eq!(spec.name(), "banner motd");
    }

    #[test]
    fn ios_banners_cover_all_kinds() {
        let names: Vec<String> = BlockSpec::ios_banners()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(
            names,
            ["banner login", "banner motd", "banner exec", "banner incoming"]
        );
    }

    #[test]
    fn delimiter_requires_capture_group() {
        let err = BlockSpec::new("cert", r"certificate \S+", Terminator::Delimiter).unwrap_err();
        assert_eq!(err, BlockError::MissingCaptureGroup { name: "cert".into() });
    }

    #[test]
    fn invalid_pattern_reported() {
        let err = BlockSpec::new("bad", "banner (", Terminator::Comment).unwrap_err();
        assert!(matches!(err, BlockError::InvalidPattern { .. }));
    }

    #[test]
    fn delimiter_captured_from_start_line() {
        let spec = BlockSpec::new("motd", r"banner motd (\^\S+)", Terminator::Delimiter).unwrap();
        assert_eq!(spec.delimiter("banner motd ^C"), Some("^C"));
        assert_eq!(spec.delimiter("hostname r1"), None);
    }

    #[test]
    fn banner_kind_is_escaped() {
        let spec = BlockSpec::banner("motd(").unwrap();
        assert!(spec.start().is_match("banner motd( ^C"));
        assert!(!spec.start().is_match("banner motd ^C"));
    }

    #[test]
    fn keyword_words_are_escaped() {
        assert_eq!(keyword_pattern("a.b  c"), r"a\.b\s+c");
    }
}
