//! Auto-organize planning.
//!
//! Planning is pure: it reads icons, fences and rules and returns the
//! assignments to make. Applying the plan is the engine's job.

use std::cmp::Ordering;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

use crate::models::icon::normalize_extension;
use crate::models::{AutoOrganizeRule, DesktopIcon, Fence, RuleType};
use crate::services::Categorizer;

static SIZE_CONDITION: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(>=|<=|>|<|=)?\s*(\d+)\s*(b|kb|mb|gb)?\s*$").ok()
});

static DATE_CONDITION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*(>=|<=|>|<|=)?\s*(\d{4}-\d{2}-\d{2})\s*$").ok());

/// Comparison operator of a size or date condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Less,
    LessOrEqual,
    Equal,
    GreaterOrEqual,
    Greater,
}

impl Comparison {
    fn parse(op: Option<&str>) -> Option<Self> {
        match op.unwrap_or("=") {
            "<" => Some(Self::Less),
            "<=" => Some(Self::LessOrEqual),
            "=" => Some(Self::Equal),
            ">=" => Some(Self::GreaterOrEqual),
            ">" => Some(Self::Greater),
            _ => None,
        }
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Less => ordering.is_lt(),
            Self::LessOrEqual => ordering.is_le(),
            Self::Equal => ordering.is_eq(),
            Self::GreaterOrEqual => ordering.is_ge(),
            Self::Greater => ordering.is_gt(),
        }
    }
}

fn size_condition(condition: &str) -> Option<(Comparison, u64)> {
    let captures = SIZE_CONDITION.as_ref()?.captures(condition)?;
    let comparison = Comparison::parse(captures.get(1).map(|m| m.as_str()))?;
    let amount: u64 = captures.get(2)?.as_str().parse().ok()?;
    let unit = match captures
        .get(3)
        .map(|m| m.as_str().to_ascii_lowercase())
        .as_deref()
    {
        None | Some("b") => 1,
        Some("kb") => 1024,
        Some("mb") => 1024 * 1024,
        Some("gb") => 1024 * 1024 * 1024,
        Some(_) => return None,
    };
    Some((comparison, amount.checked_mul(unit)?))
}

fn date_condition(condition: &str) -> Option<(Comparison, NaiveDate)> {
    let captures = DATE_CONDITION.as_ref()?.captures(condition)?;
    let comparison = Comparison::parse(captures.get(1).map(|m| m.as_str()))?;
    let date = NaiveDate::parse_from_str(captures.get(2)?.as_str(), "%Y-%m-%d").ok()?;
    Some((comparison, date))
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    !needle.is_empty() && haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Returns true if an enabled rule's condition holds for the icon.
///
/// Empty or unparseable conditions never match.
pub fn rule_matches(rule: &AutoOrganizeRule, icon: &DesktopIcon) -> bool {
    if !rule.enabled || rule.condition.trim().is_empty() {
        return false;
    }

    match rule.rule_type {
        RuleType::Extension => {
            let extension = normalize_extension(&icon.extension);
            !extension.is_empty()
                && rule
                    .condition
                    .split([',', ';'])
                    .map(normalize_extension)
                    .any(|candidate| candidate == extension)
        }
        RuleType::Name => contains_ignore_case(&icon.name, &rule.condition),
        RuleType::Path => contains_ignore_case(&icon.path, &rule.condition),
        RuleType::Size => size_condition(&rule.condition)
            .is_some_and(|(comparison, bytes)| comparison.holds(icon.size_bytes.cmp(&bytes))),
        RuleType::DateCreated => date_condition(&rule.condition).is_some_and(|(comparison, date)| {
            comparison.holds(icon.created.date_naive().cmp(&date))
        }),
        RuleType::DateModified => {
            date_condition(&rule.condition).is_some_and(|(comparison, date)| {
                comparison.holds(icon.modified.date_naive().cmp(&date))
            })
        }
    }
}

/// Why an icon was routed to a fence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssignmentSource {
    /// A user rule matched
    Rule {
        /// Rule id
        rule_id: Uuid,
        /// Rule name
        name: String,
    },
    /// The icon's category has a fence
    Category {
        /// Category id
        category_id: String,
    },
}

/// One planned icon move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedAssignment {
    /// Icon path
    pub path: String,
    /// Destination fence
    pub fence_id: Uuid,
    /// What selected the fence
    pub source: AssignmentSource,
}

/// Result of planning an auto-organize pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrganizePlan {
    /// Icons to move, in icon path order
    pub assignments: Vec<PlannedAssignment>,
    /// Matched categories that have no fence, in first-seen order
    pub missing_categories: Vec<String>,
    /// Unfenced icons that matched nothing
    pub unmatched: Vec<String>,
}

/// Plans auto-organize passes from user rules and categories.
#[derive(Debug)]
pub struct Organizer<'a> {
    rules: Vec<&'a AutoOrganizeRule>,
    categorizer: &'a Categorizer,
}

impl<'a> Organizer<'a> {
    /// Creates an organizer. Rules are tried by descending priority, then in
    /// declaration order.
    pub fn new(rules: &'a [AutoOrganizeRule], categorizer: &'a Categorizer) -> Self {
        let mut rules: Vec<&AutoOrganizeRule> = rules.iter().filter(|r| r.enabled).collect();
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self { rules, categorizer }
    }

    /// Plans where each unfenced icon should go.
    ///
    /// A rule wins over a category; rules whose target fence does not exist
    /// are ignored. A category maps to the first fence (by the given order)
    /// whose `category_id` matches.
    pub fn plan(&self, icons: &[DesktopIcon], fences: &[Fence]) -> OrganizePlan {
        let mut plan = OrganizePlan::default();

        for icon in icons.iter().filter(|icon| icon.is_unfenced()) {
            if let Some(rule) = self.rules.iter().find(|rule| {
                fences.iter().any(|f| f.id == rule.target_fence_id) && rule_matches(rule, icon)
            }) {
                plan.assignments.push(PlannedAssignment {
                    path: icon.path.clone(),
                    fence_id: rule.target_fence_id,
                    source: AssignmentSource::Rule {
                        rule_id: rule.id,
                        name: rule.name.clone(),
                    },
                });
                continue;
            }

            let Some(category_id) = self.categorizer.classify(icon).category_id().map(str::to_owned)
            else {
                plan.unmatched.push(icon.path.clone());
                continue;
            };

            match fences
                .iter()
                .find(|fence| fence.category_id.as_deref() == Some(category_id.as_str()))
            {
                Some(fence) => plan.assignments.push(PlannedAssignment {
                    path: icon.path.clone(),
                    fence_id: fence.id,
                    source: AssignmentSource::Category { category_id },
                }),
                None => {
                    if !plan.missing_categories.contains(&category_id) {
                        plan.missing_categories.push(category_id);
                    }
                }
            }
        }

        plan
    }
}
