//! Launcher script generation.
//!
//! Turns a shortcut into a self-contained POSIX shell script that opens the
//! project's local URL, changes into its directory and runs its command.
//! The generator never touches the filesystem; the directory check happens
//! when the script runs.

use std::fs;
use std::path::{Path, PathBuf};

use super::Shortcut;

/// Extension of generated launchers (double-clickable on macOS).
pub const SCRIPT_EXTENSION: &str = "command";

/// Content type advertised for generated launchers.
pub const SCRIPT_CONTENT_TYPE: &str = "text/x-shellscript";

/// Knobs for the generated script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOptions {
    /// First line of the script
    pub shebang: String,

    /// Program that opens a URL in the default browser
    pub opener: String,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self { shebang: "#!/bin/bash".to_string(), opener: "open".to_string() }
    }
}

/// A generated launcher ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherScript {
    /// Suggested file name
    pub file_name: String,

    /// Script text
    pub content: String,

    /// MIME type of the content
    pub content_type: &'static str,
}

impl LauncherScript {
    /// Build the launcher for `shortcut`.
    pub fn for_shortcut(shortcut: &Shortcut, options: &ScriptOptions) -> Self {
        Self {
            file_name: script_file_name(&shortcut.name),
            content: generate_script_with(shortcut, options),
            content_type: SCRIPT_CONTENT_TYPE,
        }
    }

    /// Write into `dir` and mark the file executable.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.content)?;
        make_executable(&path)?;

        tracing::info!(path = %path.display(), "Wrote launcher script");
        Ok(path)
    }
}

/// Build the launcher for `shortcut` and write it into `dir`.
pub fn write_launcher(
    shortcut: &Shortcut,
    dir: &Path,
    options: &ScriptOptions,
) -> std::io::Result<PathBuf> {
    LauncherScript::for_shortcut(shortcut, options).write_to(dir)
}

/// Generate the launcher script with default options.
pub fn generate_script(shortcut: &Shortcut) -> String {
    generate_script_with(shortcut, &ScriptOptions::default())
}

/// Generate the launcher script.
///
/// Output is a pure function of the inputs. The browser step is left out
/// entirely when no port is set. The `cd` path and the final command are
/// emitted exactly as the user wrote them; only the text inside `echo`
/// strings is escaped.
pub fn generate_script_with(shortcut: &Shortcut, options: &ScriptOptions) -> String {
    let name = escape_double_quoted(&shortcut.name);
    let path_msg = escape_double_quoted(&shortcut.path);
    let command_msg = escape_double_quoted(&shortcut.command);

    let mut lines = vec![
        options.shebang.clone(),
        format!("# DevDeck launcher for {}", single_line(&shortcut.name)),
        String::new(),
        format!("echo \"Launching {name}...\""),
        String::new(),
    ];

    if let Some(port) = shortcut.active_port() {
        lines.push("# Open the browser".to_string());
        lines.push(format!("{} \"http://localhost:{port}\"", options.opener));
        lines.push(String::new());
    }

    lines.push("# Enter the project directory".to_string());
    lines.push(format!(
        "cd \"{}\" || {{ echo \"Directory not found: {path_msg}\"; exit 1; }}",
        shortcut.path
    ));
    lines.push(String::new());
    lines.push("# Run the command".to_string());
    lines.push("echo \"Working directory: $(pwd)\"".to_string());
    lines.push(format!("echo \"Running: {command_msg}\""));
    lines.push(shortcut.command.clone());

    let mut script = lines.join("\n");
    script.push('\n');
    script
}

/// File name for a shortcut's launcher: whitespace runs and path separators
/// become `-`, followed by the script extension.
pub fn script_file_name(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    let mut in_separator = false;

    for c in name.chars() {
        if c.is_whitespace() || c == '/' || c == '\\' {
            if !in_separator {
                stem.push('-');
                in_separator = true;
            }
        } else {
            stem.push(c);
            in_separator = false;
        }
    }

    if stem.is_empty() {
        stem.push_str("shortcut");
    }
    format!("{stem}.{SCRIPT_EXTENSION}")
}

/// Escape text for use inside a double-quoted shell string.
fn escape_double_quoted(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in single_line(text).chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Collapse line breaks so interpolated text cannot start a new shell line.
fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
