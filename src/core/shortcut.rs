//! Shortcut data structures.
//!
//! Defines the `Shortcut` record kept on the deck, along with the draft and
//! patch types used to create and update it.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use super::error::{Field, IconError, ValidationError};

/// Command used when nothing better is known.
pub const DEFAULT_COMMAND: &str = "npm run dev";

/// A named reference to a local project and how to run it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortcut {
    /// Unique identifier, assigned once at creation
    pub id: String,

    /// Display name
    pub name: String,

    /// Optional free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Project directory (not checked for existence)
    pub path: String,

    /// Shell command that runs the project
    pub command: String,

    /// Icon shown on the card
    #[serde(default)]
    pub icon: Icon,

    /// Local port the project serves on, as typed by the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    /// Category (always `development` from the editor today)
    #[serde(default)]
    pub category: Category,

    /// Creation time in Unix epoch milliseconds, assigned once
    pub created_at: i64,
}

impl Shortcut {
    /// The demonstration record seeded on first use.
    pub fn demo(created_at: i64) -> Self {
        Self {
            id: "demo-1".to_string(),
            name: "My Awesome Project".to_string(),
            description: None,
            path: "/Users/developer/awesome-project".to_string(),
            command: DEFAULT_COMMAND.to_string(),
            icon: Icon::Symbolic(IconName::Code),
            port: Some("3000".to_string()),
            category: Category::Development,
            created_at,
        }
    }

    /// The port, if one is set and non-empty.
    pub fn active_port(&self) -> Option<&str> {
        self.port.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }

    /// The port parsed as a number, ignoring values that are not numeric.
    pub fn port_number(&self) -> Option<u16> {
        self.active_port().and_then(|p| p.parse().ok())
    }

    /// Text used for fuzzy matching.
    pub fn match_text(&self) -> String {
        format!("{} {}", self.name, self.path)
    }
}

/// Icon of a shortcut: a built-in symbol or an embedded image.
///
/// Stored as a single string. `data:` URIs and http(s) URLs are embedded
/// images; anything else names a built-in symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Icon {
    Symbolic(IconName),
    Embedded(String),
}

impl Icon {
    /// Parse the stored string form. Unknown symbol names fall back to the terminal icon.
    pub fn parse(value: &str) -> Self {
        if is_embedded(value) {
            return Self::Embedded(value.to_string());
        }
        Self::Symbolic(value.parse().unwrap_or_default())
    }

    /// Glyph used when drawing the icon in a terminal.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Symbolic(name) => name.glyph(),
            Self::Embedded(_) => "🖼",
        }
    }

    /// Short label for listings.
    pub fn label(&self) -> &str {
        match self {
            Self::Symbolic(name) => name.as_str(),
            Self::Embedded(_) => "custom",
        }
    }

    /// Whether this is an embedded image.
    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded(_))
    }

    /// Embed an image file as a `data:<mime>;base64,...` URI.
    ///
    /// The MIME type comes from the file extension and must be `image/*`.
    pub fn from_file(path: &Path) -> Result<Self, IconError> {
        let mime = mime_guess::from_path(path)
            .first()
            .filter(|mime| mime.type_().as_str() == "image")
            .ok_or_else(|| IconError::NotImage { path: path.to_path_buf() })?;
        let bytes = fs::read(path)
            .map_err(|source| IconError::Read { path: path.to_path_buf(), source })?;

        tracing::debug!(path = %path.display(), %mime, size = bytes.len(), "Embedded icon file");
        Ok(Self::Embedded(format!("data:{mime};base64,{}", BASE64.encode(bytes))))
    }
}

fn is_embedded(value: &str) -> bool {
    ["data:", "http://", "https://"].iter().any(|prefix| value.starts_with(prefix))
}

impl Default for Icon {
    fn default() -> Self {
        Self::Symbolic(IconName::default())
    }
}

impl From<String> for Icon {
    fn from(value: String) -> Self {
        if is_embedded(&value) {
            Self::Embedded(value)
        } else {
            Self::parse(&value)
        }
    }
}

impl From<Icon> for String {
    fn from(icon: Icon) -> Self {
        match icon {
            Icon::Symbolic(name) => name.as_str().to_string(),
            Icon::Embedded(data) => data,
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The fixed set of built-in icons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IconName {
    #[default]
    Terminal,
    Code,
    Globe,
    Coffee,
    Zap,
    Box,
    Layout,
    Server,
}

impl IconName {
    /// All built-in icons in picker order.
    pub const ALL: [Self; 8] = [
        Self::Terminal,
        Self::Code,
        Self::Globe,
        Self::Coffee,
        Self::Zap,
        Self::Box,
        Self::Layout,
        Self::Server,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Terminal => "terminal",
            Self::Code => "code",
            Self::Globe => "globe",
            Self::Coffee => "coffee",
            Self::Zap => "zap",
            Self::Box => "box",
            Self::Layout => "layout",
            Self::Server => "server",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Terminal => "❯_",
            Self::Code => "</>",
            Self::Globe => "🌐",
            Self::Coffee => "☕",
            Self::Zap => "⚡",
            Self::Box => "📦",
            Self::Layout => "▦",
            Self::Server => "🖧",
        }
    }

    /// Next icon in picker order, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|i| *i == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous icon in picker order, wrapping around.
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|i| *i == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl FromStr for IconName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|icon| icon.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown icon '{s}'"))
    }
}

/// Shortcut category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Development,
    Production,
    Utility,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Utility => "utility",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "utility" => Ok(Self::Utility),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

/// Field values for a new shortcut. `id` and `createdAt` are assigned by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutDraft {
    pub name: String,
    pub path: String,
    pub command: String,
    pub port: Option<String>,
    pub description: Option<String>,
    pub icon: Icon,
    pub category: Category,
}

impl ShortcutDraft {
    /// Create a draft with the required fields.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            command: command.into(),
            port: None,
            description: None,
            icon: Icon::default(),
            category: Category::default(),
        }
    }

    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Check required fields and the port format.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.name, &self.path, &self.command, self.port.as_deref())
    }

    /// Build the record, trimming text fields and dropping empty optionals.
    pub(crate) fn into_shortcut(self, id: String, created_at: i64) -> Shortcut {
        Shortcut {
            id,
            name: self.name.trim().to_string(),
            description: normalize_optional(self.description),
            path: self.path.trim().to_string(),
            command: self.command.trim().to_string(),
            icon: self.icon,
            port: normalize_optional(self.port),
            category: self.category,
            created_at,
        }
    }
}

impl From<&Shortcut> for ShortcutDraft {
    fn from(shortcut: &Shortcut) -> Self {
        Self {
            name: shortcut.name.clone(),
            path: shortcut.path.clone(),
            command: shortcut.command.clone(),
            port: shortcut.port.clone(),
            description: shortcut.description.clone(),
            icon: shortcut.icon.clone(),
            category: shortcut.category,
        }
    }
}

/// Partial update for an existing shortcut.
///
/// `id` and `created_at` have no counterpart here, so an update can never
/// touch them. `port` and `description` are doubly optional so they can be
/// cleared with `Some(None)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortcutPatch {
    pub name: Option<String>,
    pub path: Option<String>,
    pub command: Option<String>,
    pub port: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub icon: Option<Icon>,
    pub category: Option<Category>,
}

impl ShortcutPatch {
    /// A patch that replaces every editable field with the draft's values.
    pub fn from_draft(draft: ShortcutDraft) -> Self {
        Self {
            name: Some(draft.name),
            path: Some(draft.path),
            command: Some(draft.command),
            port: Some(draft.port),
            description: Some(draft.description),
            icon: Some(draft.icon),
            category: Some(draft.category),
        }
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Produce the merged record without touching `target`.
    pub(crate) fn merged(&self, target: &Shortcut) -> Result<Shortcut, ValidationError> {
        let mut merged = target.clone();

        if let Some(name) = &self.name {
            merged.name = name.trim().to_string();
        }
        if let Some(path) = &self.path {
            merged.path = path.trim().to_string();
        }
        if let Some(command) = &self.command {
            merged.command = command.trim().to_string();
        }
        if let Some(port) = &self.port {
            merged.port = normalize_optional(port.clone());
        }
        if let Some(description) = &self.description {
            merged.description = normalize_optional(description.clone());
        }
        if let Some(icon) = &self.icon {
            merged.icon = icon.clone();
        }
        if let Some(category) = self.category {
            merged.category = category;
        }

        validate_fields(&merged.name, &merged.path, &merged.command, merged.port.as_deref())?;
        Ok(merged)
    }
}

fn validate_fields(
    name: &str,
    path: &str,
    command: &str,
    port: Option<&str>,
) -> Result<(), ValidationError> {
    for (field, value) in [(Field::Name, name), (Field::Path, path), (Field::Command, command)] {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField(field));
        }
    }

    if let Some(port) = port.map(str::trim).filter(|p| !p.is_empty()) {
        match port.parse::<u16>() {
            Ok(n) if n > 0 => {}
            _ => return Err(ValidationError::InvalidPort(port.to_string())),
        }
    }

    Ok(())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Shortcut {
        ShortcutDraft::new("Demo", "/tmp/x", "echo hi")
            .with_port("4000")
            .into_shortcut("id-1".to_string(), 42)
    }

    #[test]
    fn test_icon_parse_symbolic() {
        assert_eq!(Icon::parse("code"), Icon::Symbolic(IconName::Code));
        assert_eq!(Icon::parse("SERVER"), Icon::Symbolic(IconName::Server));
    }

    #[test]
    fn test_icon_parse_embedded() {
        let data = "data:image/png;base64,iVBORw0KGgo=";
        assert_eq!(Icon::parse(data), Icon::Embedded(data.to_string()));
        assert!(Icon::parse("https://example.com/logo.png").is_embedded());
    }

    #[test]
    fn test_icon_from_file_embeds_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, b"\x89PNG").unwrap();

        let icon = Icon::from_file(&path).unwrap();
        assert_eq!(icon, Icon::Embedded("data:image/png;base64,iVBORw==".to_string()));
        assert_eq!(Icon::parse(&String::from(icon.clone())), icon);
    }

    #[test]
    fn test_icon_from_file_rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, "hi").unwrap();

        assert!(matches!(Icon::from_file(&notes), Err(IconError::NotImage { .. })));
        assert!(matches!(
            Icon::from_file(&dir.path().join("missing.svg")),
            Err(IconError::Read { .. })
        ));
    }

    #[test]
    fn test_icon_unknown_falls_back_to_terminal() {
        assert_eq!(Icon::parse("rocket"), Icon::Symbolic(IconName::Terminal));
    }

    #[test]
    fn test_icon_serializes_as_plain_string() {
        let json = serde_json::to_string(&Icon::Symbolic(IconName::Zap)).unwrap();
        assert_eq!(json, "\"zap\"");

        let icon: Icon = serde_json::from_str("\"data:image/svg+xml;base64,AA==\"").unwrap();
        assert!(icon.is_embedded());
    }

    #[test]
    fn test_icon_cycling_wraps() {
        assert_eq!(IconName::Server.next(), IconName::Terminal);
        assert_eq!(IconName::Terminal.prev(), IconName::Server);
        assert_eq!(IconName::Code.next(), IconName::Globe);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("prod".parse::<Category>().unwrap(), Category::Production);
        assert_eq!("Utility".parse::<Category>().unwrap(), Category::Utility);
        assert!("misc".parse::<Category>().is_err());
    }

    #[test]
    fn test_shortcut_json_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["createdAt"], 42);
        assert_eq!(json["port"], "4000");
        assert_eq!(json["icon"], "terminal");
        assert_eq!(json["category"], "development");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_shortcut_reads_original_storage_format() {
        let json = r#"{
            "id": "demo-1",
            "name": "My Awesome Project",
            "path": "/Users/developer/awesome-project",
            "command": "npm run dev",
            "icon": "code",
            "port": "3000",
            "category": "development",
            "createdAt": 1700000000000
        }"#;

        let shortcut: Shortcut = serde_json::from_str(json).unwrap();
        assert_eq!(shortcut, Shortcut::demo(1_700_000_000_000));
    }

    #[test]
    fn test_active_port_ignores_blank() {
        let mut shortcut = sample();
        assert_eq!(shortcut.active_port(), Some("4000"));
        assert_eq!(shortcut.port_number(), Some(4000));

        shortcut.port = Some("  ".to_string());
        assert_eq!(shortcut.active_port(), None);
    }

    #[test]
    fn test_draft_validation() {
        assert!(ShortcutDraft::new("a", "/b", "c").validate().is_ok());
        assert_eq!(
            ShortcutDraft::new(" ", "/b", "c").validate(),
            Err(ValidationError::MissingField(Field::Name))
        );
        assert_eq!(
            ShortcutDraft::new("a", "", "c").validate(),
            Err(ValidationError::MissingField(Field::Path))
        );
        assert_eq!(
            ShortcutDraft::new("a", "/b", "\t").validate(),
            Err(ValidationError::MissingField(Field::Command))
        );
        assert_eq!(
            ShortcutDraft::new("a", "/b", "c").with_port("http").validate(),
            Err(ValidationError::InvalidPort("http".to_string()))
        );
        assert!(ShortcutDraft::new("a", "/b", "c").with_port("").validate().is_ok());
    }

    #[test]
    fn test_draft_into_shortcut_normalizes() {
        let shortcut = ShortcutDraft::new("  Api ", " /srv/api ", " cargo run ")
            .with_port(" ")
            .with_description("")
            .into_shortcut("x".to_string(), 1);

        assert_eq!(shortcut.name, "Api");
        assert_eq!(shortcut.path, "/srv/api");
        assert_eq!(shortcut.command, "cargo run");
        assert_eq!(shortcut.port, None);
        assert_eq!(shortcut.description, None);
    }

    #[test]
    fn test_patch_merges_and_clears() {
        let original = sample();
        let patch = ShortcutPatch {
            command: Some("cargo run".to_string()),
            port: Some(None),
            ..ShortcutPatch::default()
        };

        let merged = patch.merged(&original).unwrap();
        assert_eq!(merged.command, "cargo run");
        assert_eq!(merged.port, None);
        assert_eq!(merged.name, original.name);
        assert_eq!(merged.id, original.id);
        assert_eq!(merged.created_at, original.created_at);
    }

    #[test]
    fn test_patch_rejects_empty_required_field() {
        let patch = ShortcutPatch { name: Some(String::new()), ..ShortcutPatch::default() };
        assert_eq!(
            patch.merged(&sample()),
            Err(ValidationError::MissingField(Field::Name))
        );
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(ShortcutPatch::default().is_empty());
        let patch = ShortcutPatch::from_draft(ShortcutDraft::from(&sample()));
        assert!(!patch.is_empty());
    }
}
