//! Category definitions used to classify desktop icons.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::ArgbColor;

/// Rule set used to auto-classify icons into a box.
///
/// # Validation
///
/// - ID format: kebab-case (lowercase, digits, hyphens), not starting or ending with a hyphen
/// - Name must be non-empty, max 50 characters
///
/// Definitions are immutable during a matching pass. The system-provided set is
/// read-only; user entries are added through settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    /// Unique identifier in kebab-case (e.g., "office-tools")
    pub id: String,
    /// Display name
    pub name: String,
    /// Glyph shown next to the box title
    #[serde(default)]
    pub glyph: String,
    /// Accent color for boxes of this category
    #[serde(default = "default_category_color")]
    pub color: ArgbColor,
    /// File extensions (".pdf" or "pdf"), compared case-insensitively
    #[serde(default)]
    pub extensions: Vec<String>,
    /// Substrings matched against icon name and path
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Substrings matched against icon name and path
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Higher wins when several categories match
    #[serde(default)]
    pub priority: i32,
    /// Disabled categories are skipped entirely
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Shipped with the application (read-only)
    #[serde(default)]
    pub system: bool,
}

fn default_category_color() -> ArgbColor {
    ArgbColor::opaque(0x4A, 0x90, 0xE2)
}

const fn default_enabled() -> bool {
    true
}

impl CategoryDefinition {
    /// Creates an enabled user category with validation and no match lists.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> EngineResult<Self> {
        let id = id.into();
        let name = name.into();

        Self::validate_id(&id)?;
        Self::validate_name(&name)?;

        Ok(Self {
            id,
            name,
            glyph: String::new(),
            color: default_category_color(),
            extensions: Vec::new(),
            patterns: Vec::new(),
            keywords: Vec::new(),
            priority: 0,
            enabled: true,
            system: false,
        })
    }

    /// Validates the id and name of an already-built definition.
    pub fn validate(&self) -> EngineResult<()> {
        Self::validate_id(&self.id)?;
        Self::validate_name(&self.name)
    }

    fn validate_id(id: &str) -> EngineResult<()> {
        if id.is_empty() {
            return Err(EngineError::Validation(
                "Category ID cannot be empty".to_string(),
            ));
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(EngineError::Validation(format!(
                "Category ID '{id}' must be kebab-case (lowercase, hyphens, and digits only)"
            )));
        }

        if id.starts_with('-') || id.ends_with('-') {
            return Err(EngineError::Validation(format!(
                "Category ID '{id}' cannot start or end with a hyphen"
            )));
        }

        Ok(())
    }

    fn validate_name(name: &str) -> EngineResult<()> {
        if name.trim().is_empty() {
            return Err(EngineError::Validation(
                "Category name cannot be empty".to_string(),
            ));
        }

        if name.chars().count() > 50 {
            return Err(EngineError::Validation(format!(
                "Category name '{name}' exceeds maximum length of 50 characters"
            )));
        }

        Ok(())
    }

    /// Sets the extension list.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the name/path pattern list.
    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the keyword list.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the priority.
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the glyph.
    pub fn with_glyph(mut self, glyph: impl Into<String>) -> Self {
        self.glyph = glyph.into();
        self
    }

    /// Enables or disables the category.
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

struct SystemCategory {
    id: &'static str,
    name: &'static str,
    glyph: &'static str,
    color: ArgbColor,
    extensions: &'static [&'static str],
    patterns: &'static [&'static str],
    keywords: &'static [&'static str],
    priority: i32,
}

const SYSTEM_CATEGORIES: &[SystemCategory] = &[
    SystemCategory {
        id: "office-tools",
        name: "Office Tools",
        glyph: "📊",
        color: ArgbColor::opaque(0x2E, 0x7D, 0x32),
        extensions: &[
            ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".pdf", ".odt", ".ods", ".odp",
        ],
        patterns: &[
            "word", "excel", "powerpoint", "acrobat", "reader", "office", "libreoffice",
            "openoffice",
        ],
        keywords: &["document", "spreadsheet", "presentation", "pdf", "office"],
        priority: 10,
    },
    SystemCategory {
        id: "games",
        name: "Games",
        glyph: "🎮",
        color: ArgbColor::opaque(0x7B, 0x1F, 0xA2),
        extensions: &[".exe"],
        patterns: &[
            "steam", "epic", "game", "games", "blizzard", "origin", "uplay", "gog",
        ],
        keywords: &["game", "gaming", "play", "entertainment", "steam", "epic"],
        priority: 8,
    },
    SystemCategory {
        id: "social-communication",
        name: "Social & Communication",
        glyph: "💬",
        color: ArgbColor::opaque(0x19, 0x76, 0xD2),
        extensions: &[],
        patterns: &[
            "discord", "telegram", "whatsapp", "skype", "zoom", "teams", "slack", "outlook",
            "thunderbird", "chrome", "firefox", "edge",
        ],
        keywords: &[
            "chat", "messenger", "email", "browser", "communication", "social", "meeting",
        ],
        priority: 9,
    },
    SystemCategory {
        id: "files-documents",
        name: "Files & Documents",
        glyph: "📁",
        color: ArgbColor::opaque(0xF5, 0x7C, 0x00),
        extensions: &[".txt", ".rtf", ".md", ".zip", ".rar", ".7z"],
        patterns: &[
            "explorer", "notepad", "winrar", "7zip", "totalcommander", "filezilla",
        ],
        keywords: &["file", "folder", "archive", "text", "document", "manager"],
        priority: 5,
    },
    SystemCategory {
        id: "development-tools",
        name: "Development Tools",
        glyph: "🛠️",
        color: ArgbColor::opaque(0x38, 0x8E, 0x3C),
        extensions: &[".cs", ".js", ".ts", ".py", ".java", ".cpp", ".h"],
        patterns: &[
            "visual studio", "code", "intellij", "eclipse", "atom", "sublime", "notepad++",
            "git", "github",
        ],
        keywords: &["code", "development", "programming", "ide", "editor", "git", "debug"],
        priority: 7,
    },
    SystemCategory {
        id: "creative-tools",
        name: "Creative Tools",
        glyph: "🎨",
        color: ArgbColor::opaque(0xE9, 0x1E, 0x63),
        extensions: &[
            ".psd", ".ai", ".png", ".jpg", ".jpeg", ".gif", ".mp4", ".mov", ".avi",
        ],
        patterns: &[
            "photoshop", "illustrator", "premiere", "aftereffects", "blender", "gimp",
            "inkscape", "audacity",
        ],
        keywords: &["photo", "image", "video", "audio", "design", "creative", "edit", "art"],
        priority: 6,
    },
    SystemCategory {
        id: "system-tools",
        name: "System Tools",
        glyph: "⚙️",
        color: ArgbColor::opaque(0x60, 0x7D, 0x8B),
        extensions: &[],
        patterns: &[
            "control", "settings", "regedit", "cmd", "powershell", "task manager",
            "device manager", "disk",
        ],
        keywords: &[
            "system", "control", "settings", "admin", "utility", "tool", "configuration",
        ],
        priority: 4,
    },
    SystemCategory {
        id: "web-applications",
        name: "Web Applications",
        glyph: "🌐",
        color: ArgbColor::opaque(0x00, 0xAC, 0xC1),
        extensions: &[".url", ".html", ".htm"],
        patterns: &["web", "online", "cloud"],
        keywords: &["web", "online", "cloud", "internet", "browser", "url"],
        priority: 3,
    },
];

/// Returns the built-in, read-only category set in declaration order.
pub fn system_categories() -> Vec<CategoryDefinition> {
    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    SYSTEM_CATEGORIES
        .iter()
        .map(|c| CategoryDefinition {
            id: c.id.to_string(),
            name: c.name.to_string(),
            glyph: c.glyph.to_string(),
            color: c.color,
            extensions: owned(c.extensions),
            patterns: owned(c.patterns),
            keywords: owned(c.keywords),
            priority: c.priority,
            enabled: true,
            system: true,
        })
        .collect()
}
