use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// File name looked up in the root directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "doc-check.toml";

/// Configuration for a verification run.
///
/// Deserialized from `doc-check.toml`. Every field has a default, so an absent
/// file or an empty one behaves the same.
///
/// # Example
///
/// ```toml
/// jobs = 4
///
/// [discovery]
/// patterns = ["*.md", "docs/**/*.md", "guides/*.md"]
///
/// [shell]
/// program = "bash"
/// timeout_secs = 10
/// interactive_commands = ["read ", "select ", "mytool init"]
///
/// [python]
/// interpreter = "${PYTHON}"
/// timeout_secs = 5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    pub discovery: DiscoveryConfig,
    pub shell: ShellConfig,
    pub python: PythonConfig,
    /// Fragments verified concurrently per document; 0 means one per CPU
    pub jobs: usize,
    /// Fragments larger than this are failed without being run
    pub max_fragment_bytes: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            discovery: DiscoveryConfig::default(),
            shell: ShellConfig::default(),
            python: PythonConfig::default(),
            jobs: 1,
            max_fragment_bytes: 1_000_000,
        }
    }
}

/// Glob patterns, relative to the root directory, for the discovery sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    pub patterns: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            patterns: vec!["*.md".to_string(), "docs/**/*.md".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShellConfig {
    /// Shell executable, invoked as `<program> -c <body>` (supports ${VAR} expansion)
    pub program: String,
    pub timeout_secs: u64,
    /// Substrings marking a fragment as needing a terminal
    pub interactive_commands: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: "sh".to_string(),
            timeout_secs: 10,
            interactive_commands: vec!["read ".to_string(), "select ".to_string()],
        }
    }
}

impl ShellConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PythonConfig {
    /// Interpreter used for `-m py_compile` (supports ${VAR} expansion)
    pub interpreter: String,
    pub timeout_secs: u64,
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            timeout_secs: 5,
        }
    }
}

impl PythonConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl CheckConfig {
    /// Loads the configuration for a run.
    ///
    /// An explicit path must exist. Without one, `doc-check.toml` in `root` is
    /// used when present and the defaults otherwise. Program paths get their
    /// environment variables expanded before validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting configuration fails [`CheckConfig::validate`].
    pub fn load(explicit: Option<&Path>, root: &Path) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let candidate = root.join(DEFAULT_CONFIG_FILE);
                if candidate.is_file() {
                    Self::from_file(&candidate)?
                } else {
                    log::debug!("No {} in {}, using defaults", DEFAULT_CONFIG_FILE, root.display());
                    Self::default()
                }
            }
        };

        config.shell.program = expand_env_vars(&config.shell.program);
        config.python.interpreter = expand_env_vars(&config.python.interpreter);
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: CheckConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Validate the configuration for security and correctness
    pub fn validate(&self) -> Result<()> {
        validate_program(&self.shell.program).context("Invalid [shell] program")?;
        validate_program(&self.python.interpreter).context("Invalid [python] interpreter")?;

        if self.shell.timeout_secs == 0 {
            anyhow::bail!("[shell] timeout_secs must be greater than zero");
        }
        if self.python.timeout_secs == 0 {
            anyhow::bail!("[python] timeout_secs must be greater than zero");
        }
        if self.discovery.patterns.is_empty() {
            anyhow::bail!("[discovery] must have at least one pattern");
        }

        Ok(())
    }

    /// Concurrency actually used, with `0` resolved to the CPU count.
    pub fn effective_jobs(&self) -> usize {
        match self.jobs {
            0 => num_cpus::get(),
            n => n,
        }
    }
}

/// Rejects program paths that could smuggle extra shell syntax or escape upward.
fn validate_program(program: &str) -> Result<()> {
    if program.is_empty() {
        anyhow::bail!("Program path cannot be empty");
    }

    let dangerous_chars = [';', '|', '&', '`', '\n', '\r'];
    for ch in dangerous_chars {
        if program.contains(ch) {
            anyhow::bail!(
                "Program path contains invalid character '{}': {}",
                ch.escape_default(),
                program
            );
        }
    }

    for component in Path::new(program).components() {
        if matches!(component, std::path::Component::ParentDir) {
            anyhow::bail!("Program path cannot contain '..': {}", program);
        }
    }

    Ok(())
}

/// Expand environment variables in a string
/// Supports ${VAR_NAME} syntax
/// This function processes the string in a single pass to avoid re-processing expanded values
fn expand_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut var_name = String::new();
            let mut found_close = false;

            for ch in chars.by_ref() {
                if ch == '}' {
                    found_close = true;
                    break;
                }
                var_name.push(ch);
            }

            if found_close {
                match env::var(&var_name) {
                    Ok(value) => result.push_str(&value),
                    Err(_) => {
                        log::warn!(
                            "Environment variable '{}' not found, leaving unexpanded",
                            var_name
                        );
                        result.push_str("${");
                        result.push_str(&var_name);
                        result.push('}');
                    }
                }
            } else {
                // No closing brace found, treat as literal
                result.push_str("${");
                result.push_str(&var_name);
            }
        } else {
            result.push(ch);
        }
    }

    result
}
