//! Shortcut editor form.
//!
//! Holds the text of the create/edit form, keeps track of which field has
//! focus, raises the duplicate-port warning, and guards AI suggestion
//! requests so only one is in flight per form and late replies for a
//! closed form are ignored.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::{
    expand_path, Category, Icon, IconError, IconName, RepositoryError, Shortcut, ShortcutDraft,
    ShortcutPatch, ShortcutRepository, DEFAULT_COMMAND,
};

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Editable fields in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Name,
    Path,
    Command,
    Port,
    Description,
    Icon,
    IconFile,
}

impl EditorField {
    pub const ORDER: [Self; 7] = [
        Self::Name,
        Self::Path,
        Self::Command,
        Self::Port,
        Self::Description,
        Self::Icon,
        Self::IconFile,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Project Name",
            Self::Path => "Local Path",
            Self::Command => "Run Command",
            Self::Port => "Port (Optional)",
            Self::Description => "Description (Optional)",
            Self::Icon => "Icon",
            Self::IconFile => "Custom Icon File (Optional)",
        }
    }

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Identifies the form a suggestion was requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionTicket(u64);

/// What a suggestion worker needs to do its job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub ticket: SuggestionTicket,
    pub name: String,
    pub path: String,
}

/// Why a form could not be saved.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("port {0} is already used by another shortcut")]
    PortInUse(String),

    #[error(transparent)]
    Icon(#[from] IconError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// State of one open editor.
#[derive(Debug, Clone)]
pub struct EditorForm {
    session: u64,
    editing_id: Option<String>,
    pub name: String,
    pub path: String,
    pub command: String,
    pub port: String,
    pub description: String,
    pub icon: Icon,
    /// Path of an image to embed as the icon
    pub icon_file: String,
    /// Embedded image kept in the picker rotation
    custom_icon: Option<String>,
    pub category: Category,
    pub focus: EditorField,
    /// Last submit error, shown inline
    pub error: Option<String>,
    suggestion_pending: bool,
}

impl EditorForm {
    /// Blank form for a new shortcut, pre-filled with the default command and a free port.
    pub fn new(repo: &ShortcutRepository) -> Self {
        Self {
            session: NEXT_SESSION.fetch_add(1, Ordering::Relaxed),
            editing_id: None,
            name: String::new(),
            path: String::new(),
            command: DEFAULT_COMMAND.to_string(),
            port: repo.suggest_port(None),
            description: String::new(),
            icon: Icon::Symbolic(IconName::Terminal),
            icon_file: String::new(),
            custom_icon: None,
            category: Category::Development,
            focus: EditorField::Name,
            error: None,
            suggestion_pending: false,
        }
    }

    /// Form pre-filled from an existing shortcut.
    pub fn edit(shortcut: &Shortcut) -> Self {
        Self {
            session: NEXT_SESSION.fetch_add(1, Ordering::Relaxed),
            editing_id: Some(shortcut.id.clone()),
            name: shortcut.name.clone(),
            path: shortcut.path.clone(),
            command: shortcut.command.clone(),
            port: shortcut.port.clone().unwrap_or_default(),
            description: shortcut.description.clone().unwrap_or_default(),
            icon: shortcut.icon.clone(),
            icon_file: String::new(),
            custom_icon: match &shortcut.icon {
                Icon::Embedded(data) => Some(data.clone()),
                Icon::Symbolic(_) => None,
            },
            category: shortcut.category,
            focus: EditorField::Name,
            error: None,
            suggestion_pending: false,
        }
    }

    /// Id of the shortcut being edited, `None` when creating.
    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn title(&self) -> &'static str {
        if self.is_editing() {
            "Edit Shortcut"
        } else {
            "New Shortcut"
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_editing() {
            "Save Changes"
        } else {
            "Create Shortcut"
        }
    }

    /// Text of a field (`None` for the icon picker).
    pub fn value(&self, field: EditorField) -> Option<&str> {
        match field {
            EditorField::Name => Some(&self.name),
            EditorField::Path => Some(&self.path),
            EditorField::Command => Some(&self.command),
            EditorField::Port => Some(&self.port),
            EditorField::Description => Some(&self.description),
            EditorField::IconFile => Some(&self.icon_file),
            EditorField::Icon => None,
        }
    }

    fn focused_value_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            EditorField::Name => Some(&mut self.name),
            EditorField::Path => Some(&mut self.path),
            EditorField::Command => Some(&mut self.command),
            EditorField::Port => Some(&mut self.port),
            EditorField::Description => Some(&mut self.description),
            EditorField::IconFile => Some(&mut self.icon_file),
            EditorField::Icon => None,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(value) = self.focused_value_mut() {
            value.push(c);
        }
        self.error = None;
    }

    pub fn backspace(&mut self) {
        if let Some(value) = self.focused_value_mut() {
            value.pop();
        }
        self.error = None;
    }

    pub fn clear_field(&mut self) {
        if let Some(value) = self.focused_value_mut() {
            value.clear();
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Step through the built-in icons, followed by the custom image if there is one.
    pub fn cycle_icon(&mut self, forward: bool) {
        let mut choices: Vec<Icon> = IconName::ALL.into_iter().map(Icon::Symbolic).collect();
        if let Some(data) = &self.custom_icon {
            choices.push(Icon::Embedded(data.clone()));
        }

        let len = choices.len();
        let current = choices.iter().position(|icon| *icon == self.icon).unwrap_or(0);
        let next = if forward { (current + 1) % len } else { (current + len - 1) % len };
        self.icon = choices.swap_remove(next);
    }

    /// Embed the image named in the icon file field and select it.
    pub fn load_icon_file(&mut self) -> Result<(), IconError> {
        let path = expand_path(Path::new(self.icon_file.trim()));
        match Icon::from_file(&path) {
            Ok(icon) => {
                if let Icon::Embedded(data) = &icon {
                    self.custom_icon = Some(data.clone());
                }
                self.icon = icon;
                self.icon_file.clear();
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Replace the port with the next free one.
    pub fn fill_suggested_port(&mut self, repo: &ShortcutRepository) {
        self.port = repo.suggest_port(self.editing_id());
        self.error = None;
    }

    /// Draft built from the current field values.
    pub fn draft(&self) -> ShortcutDraft {
        let mut draft = ShortcutDraft::new(&self.name, &self.path, &self.command)
            .with_icon(self.icon.clone())
            .with_category(self.category);
        draft.port = Some(self.port.clone());
        draft.description = Some(self.description.clone());
        draft
    }

    /// Warning shown while another shortcut uses the same port.
    pub fn port_warning(&self, repo: &ShortcutRepository) -> Option<String> {
        if repo.has_port_conflict(&self.port, self.editing_id()) {
            Some(format!("Port {} is already used by another shortcut", self.port.trim()))
        } else {
            None
        }
    }

    /// Save the form. Blocked while the port warning is active.
    ///
    /// A path left in the icon file field is embedded first.
    pub fn submit(&mut self, repo: &mut ShortcutRepository) -> Result<Shortcut, SubmitError> {
        if !self.icon_file.trim().is_empty() {
            self.load_icon_file()?;
        }
        let result = self.try_submit(repo);
        if let Err(e) = &result {
            self.error = Some(e.to_string());
        }
        result
    }

    fn try_submit(&self, repo: &mut ShortcutRepository) -> Result<Shortcut, SubmitError> {
        if self.port_warning(repo).is_some() {
            return Err(SubmitError::PortInUse(self.port.trim().to_string()));
        }

        let draft = self.draft();
        let saved = match self.editing_id() {
            Some(id) => repo.update(id, ShortcutPatch::from_draft(draft))?,
            None => repo.create(draft)?,
        };
        Ok(saved)
    }

    /// Whether the AI suggest action is currently enabled.
    pub fn can_suggest(&self) -> bool {
        !self.suggestion_pending && !(self.name.trim().is_empty() && self.path.trim().is_empty())
    }

    pub fn is_suggestion_pending(&self) -> bool {
        self.suggestion_pending
    }

    /// Mark a suggestion as pending and describe the request, if one may start.
    pub fn begin_suggestion(&mut self) -> Option<SuggestionRequest> {
        if !self.can_suggest() {
            return None;
        }
        self.suggestion_pending = true;
        Some(SuggestionRequest {
            ticket: SuggestionTicket(self.session),
            name: self.name.clone(),
            path: self.path.clone(),
        })
    }

    /// Apply a finished suggestion. Returns `false` if it belongs to another form.
    pub fn apply_suggestion(&mut self, ticket: SuggestionTicket, command: String) -> bool {
        if ticket.0 != self.session {
            return false;
        }
        self.suggestion_pending = false;
        self.command = command;
        true
    }
}
