use std::fmt;

/// The verification strategy a fence tag resolves to.
///
/// The set is closed: every tag, including the empty one, maps to exactly one
/// variant through [`Strategy::for_tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Executed with the configured shell in a scratch directory
    Shell,
    /// Syntax-checked with the Python interpreter
    Python,
    /// Parsed as TOML
    Toml,
    /// Declarative or documentation formats, accepted as-is
    PassThrough,
    /// Any tag not in the table, accepted as-is
    Unrecognized,
}

/// Fence tags and the strategy each resolves to.
///
/// Tags are compared after lower-casing; the list is based on the
/// highlight.js aliases for each language.
const TAG_TABLE: &[(&str, Strategy)] = &[
    ("bash", Strategy::Shell),
    ("sh", Strategy::Shell),
    ("shell", Strategy::Shell),
    ("console", Strategy::Shell),
    ("python", Strategy::Python),
    ("py", Strategy::Python),
    ("toml", Strategy::Toml),
    ("yaml", Strategy::PassThrough),
    ("yml", Strategy::PassThrough),
    ("json", Strategy::PassThrough),
    ("markdown", Strategy::PassThrough),
    ("md", Strategy::PassThrough),
    ("text", Strategy::PassThrough),
];

impl Strategy {
    /// Resolves a fence tag to its strategy.
    ///
    /// # Examples
    ///
    /// ```
    /// use doc_check_code::Strategy;
    ///
    /// assert_eq!(Strategy::for_tag("Bash"), Strategy::Shell);
    /// assert_eq!(Strategy::for_tag("py"), Strategy::Python);
    /// assert_eq!(Strategy::for_tag("yml"), Strategy::PassThrough);
    /// assert_eq!(Strategy::for_tag("cobol"), Strategy::Unrecognized);
    /// ```
    pub fn for_tag(tag: &str) -> Strategy {
        let normalized = tag.to_lowercase();
        TAG_TABLE
            .iter()
            .find(|(alias, _)| *alias == normalized)
            .map_or(Strategy::Unrecognized, |(_, strategy)| *strategy)
    }

    /// Whether fragments of this strategy spawn a child process.
    pub fn executes(self) -> bool {
        matches!(self, Strategy::Shell | Strategy::Python)
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Shell => "shell",
            Strategy::Python => "python",
            Strategy::Toml => "toml",
            Strategy::PassThrough => "pass-through",
            Strategy::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
