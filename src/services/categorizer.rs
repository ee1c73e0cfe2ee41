//! Rule-based icon categorization.
//!
//! Classification is a pure function of the icon and an ordered category set:
//! among enabled categories whose predicate holds, the highest priority wins and
//! ties go to the category declared first.

use serde::Serialize;

use crate::error::{EngineError, EngineResult, EntityKind};
use crate::models::icon::normalize_extension;
use crate::models::{system_categories, CategoryDefinition, DesktopIcon};

/// Which sub-check made a category match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MatchReason {
    /// Icon extension is in the category's extension list
    Extension(String),
    /// Icon name or path contains a pattern
    Pattern(String),
    /// Icon name or path contains a keyword
    Keyword(String),
}

/// Result of classifying one icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Classification {
    /// A category matched
    Assigned {
        /// Winning category id
        category_id: String,
        /// First sub-check that matched
        reason: MatchReason,
    },
    /// No enabled category matched
    Unassigned,
}

impl Classification {
    /// Category id of an assigned classification.
    pub fn category_id(&self) -> Option<&str> {
        match self {
            Self::Assigned { category_id, .. } => Some(category_id),
            Self::Unassigned => None,
        }
    }
}

/// Evaluates a category's predicate against an icon.
///
/// Checks run in order (extension, patterns, keywords) and the first hit is
/// reported. Empty extensions, names and list entries never match. Disabled
/// categories always return `None`.
pub fn match_reason(category: &CategoryDefinition, icon: &DesktopIcon) -> Option<MatchReason> {
    if !category.enabled {
        return None;
    }

    let extension = normalize_extension(&icon.extension);
    if !extension.is_empty() {
        if let Some(hit) = category
            .extensions
            .iter()
            .find(|candidate| normalize_extension(candidate) == extension)
        {
            return Some(MatchReason::Extension(hit.clone()));
        }
    }

    let name = icon.name.to_lowercase();
    let path = icon.path.to_lowercase();
    let contained = |needle: &&String| {
        let needle = needle.trim().to_lowercase();
        !needle.is_empty()
            && ((!name.is_empty() && name.contains(&needle))
                || (!path.is_empty() && path.contains(&needle)))
    };

    if let Some(hit) = category.patterns.iter().find(contained) {
        return Some(MatchReason::Pattern(hit.clone()));
    }
    if let Some(hit) = category.keywords.iter().find(contained) {
        return Some(MatchReason::Keyword(hit.clone()));
    }

    None
}

/// Selects the best-matching category for an icon.
///
/// Highest priority wins; equal priorities resolve to the earliest definition.
pub fn categorize<'a>(
    icon: &DesktopIcon,
    categories: &'a [CategoryDefinition],
) -> Option<(&'a CategoryDefinition, MatchReason)> {
    let mut best: Option<(&CategoryDefinition, MatchReason)> = None;
    for category in categories {
        let Some(reason) = match_reason(category, icon) else {
            continue;
        };
        let better = best
            .as_ref()
            .is_none_or(|(current, _)| category.priority > current.priority);
        if better {
            best = Some((category, reason));
        }
    }
    best
}

/// Ordered category set with classification helpers.
#[derive(Debug, Clone, Default)]
pub struct Categorizer {
    categories: Vec<CategoryDefinition>,
}

impl Categorizer {
    /// Creates a categorizer over an ordered category set.
    pub fn new(categories: Vec<CategoryDefinition>) -> Self {
        Self { categories }
    }

    /// System categories followed by the given user categories.
    ///
    /// User entries that fail validation or reuse an existing id are skipped
    /// with a warning.
    pub fn with_user_categories(user: &[CategoryDefinition]) -> Self {
        let mut categorizer = Self::new(system_categories());
        for category in user {
            if let Err(e) = categorizer.add_user_category(category.clone()) {
                tracing::warn!("Skipping user category '{}': {}", category.id, e);
            }
        }
        categorizer
    }

    /// Appends a user category at the end of the declaration order.
    pub fn add_user_category(&mut self, mut category: CategoryDefinition) -> EngineResult<()> {
        category.validate()?;
        if self.get(&category.id).is_some() {
            return Err(EngineError::duplicate(EntityKind::Category, &category.id));
        }
        category.system = false;
        self.categories.push(category);
        Ok(())
    }

    /// Category definitions in declaration order.
    pub fn categories(&self) -> &[CategoryDefinition] {
        &self.categories
    }

    /// Looks up a category by id.
    pub fn get(&self, id: &str) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Classifies one icon.
    pub fn classify(&self, icon: &DesktopIcon) -> Classification {
        match categorize(icon, &self.categories) {
            Some((category, reason)) => Classification::Assigned {
                category_id: category.id.clone(),
                reason,
            },
            None => Classification::Unassigned,
        }
    }

    /// Returns true if the icon satisfies the predicate of the given category.
    ///
    /// Used for smart-box membership tests; unknown ids never match.
    pub fn matches(&self, category_id: &str, icon: &DesktopIcon) -> bool {
        self.get(category_id)
            .is_some_and(|category| match_reason(category, icon).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, priority: i32) -> CategoryDefinition {
        CategoryDefinition::new(id, id).unwrap().with_priority(priority)
    }

    #[test]
    fn test_higher_priority_wins() {
        let icon = DesktopIcon::new("/desk/steam.exe", "steam");
        let categories = vec![
            category("a", 8).with_extensions([".exe"]),
            category("b", 10).with_keywords(["steam"]),
        ];

        let (winner, reason) = categorize(&icon, &categories).unwrap();
        assert_eq!(winner.id, "b");
        assert_eq!(reason, MatchReason::Keyword("steam".to_string()));
    }

    #[test]
    fn test_tie_goes_to_first_declared() {
        let icon = DesktopIcon::new("/desk/steam.exe", "steam");
        let categories = vec![
            category("first", 5).with_keywords(["steam"]),
            category("second", 5).with_extensions(["exe"]),
        ];

        let (winner, _) = categorize(&icon, &categories).unwrap();
        assert_eq!(winner.id, "first");

        let reversed: Vec<_> = categories.into_iter().rev().collect();
        let (winner, _) = categorize(&icon, &reversed).unwrap();
        assert_eq!(winner.id, "second");
    }

    #[test]
    fn test_disabled_category_skipped() {
        let icon = DesktopIcon::new("/desk/steam.exe", "steam");
        let categories = vec![
            category("off", 100).with_keywords(["steam"]).with_enabled(false),
            category("on", 1).with_extensions([".exe"]),
        ];

        let (winner, _) = categorize(&icon, &categories).unwrap();
        assert_eq!(winner.id, "on");
    }

    #[test]
    fn test_case_insensitive_matching() {
        let icon = DesktopIcon::new("/Users/Me/Desktop/Quarterly REPORT.PDF", "Quarterly REPORT");
        let by_ext = category("docs", 0).with_extensions(["PDF"]);
        assert_eq!(
            match_reason(&by_ext, &icon),
            Some(MatchReason::Extension("PDF".to_string()))
        );

        let by_pattern = category("reports", 0).with_patterns(["report"]);
        assert_eq!(
            match_reason(&by_pattern, &icon),
            Some(MatchReason::Pattern("report".to_string()))
        );

        let by_path = category("mine", 0).with_keywords(["/users/me"]);
        assert!(match_reason(&by_path, &icon).is_some());
    }

    #[test]
    fn test_empty_inputs_never_match() {
        let mut icon = DesktopIcon::new("/desk/folder", "");
        icon.extension.clear();

        let empty_lists = category("empty", 0);
        assert_eq!(match_reason(&empty_lists, &icon), None);

        let empty_entries = category("blank", 0)
            .with_extensions([""])
            .with_patterns([""])
            .with_keywords(["   "]);
        assert_eq!(match_reason(&empty_entries, &icon), None);
    }

    #[test]
    fn test_no_match_is_unassigned() {
        let categorizer = Categorizer::new(vec![category("games", 1).with_extensions([".exe"])]);
        let icon = DesktopIcon::new("/desk/notes.txt", "notes");
        assert_eq!(categorizer.classify(&icon), Classification::Unassigned);
        assert_eq!(categorizer.classify(&icon).category_id(), None);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let categorizer = Categorizer::with_user_categories(&[]);
        let icons = [
            DesktopIcon::new("/desk/steam.exe", "steam"),
            DesktopIcon::new("/desk/Budget.xlsx", "Budget"),
            DesktopIcon::new("/desk/Discord.lnk", "Discord"),
            DesktopIcon::new("/desk/unknown.bin", "unknown"),
        ];
        for icon in &icons {
            let first = categorizer.classify(icon);
            for _ in 0..10 {
                assert_eq!(categorizer.classify(icon), first);
            }
        }
    }

    #[test]
    fn test_system_set_examples() {
        let categorizer = Categorizer::with_user_categories(&[]);

        let steam = DesktopIcon::new("/desk/steam.exe", "steam");
        assert_eq!(categorizer.classify(&steam).category_id(), Some("games"));

        let budget = DesktopIcon::new("/desk/Budget.xlsx", "Budget");
        assert_eq!(categorizer.classify(&budget).category_id(), Some("office-tools"));

        let discord = DesktopIcon::new("/desk/Discord.lnk", "Discord");
        assert_eq!(
            categorizer.classify(&discord).category_id(),
            Some("social-communication")
        );
    }

    #[test]
    fn test_add_user_category_rejects_duplicates() {
        let mut categorizer = Categorizer::with_user_categories(&[]);
        let err = categorizer
            .add_user_category(category("games", 1))
            .unwrap_err();
        assert_eq!(err, EngineError::duplicate(EntityKind::Category, "games"));

        categorizer
            .add_user_category(category("music", 1).with_extensions([".mp3"]))
            .unwrap();
        assert_eq!(categorizer.categories().len(), 9);
        assert!(categorizer.matches("music", &DesktopIcon::new("/desk/song.MP3", "song")));
        assert!(!categorizer.matches("nope", &DesktopIcon::new("/desk/song.mp3", "song")));
    }

    #[test]
    fn test_user_category_cannot_claim_system() {
        let mut user = category("music", 1);
        user.system = true;
        let categorizer = Categorizer::with_user_categories(&[user]);
        assert!(!categorizer.get("music").unwrap().system);
    }
}
