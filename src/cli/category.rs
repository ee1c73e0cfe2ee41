//! Category management commands.
//!
//! Lists the effective category set and adds or removes user categories stored
//! in the settings file.

use crate::cli::common::{open_engine, print_json, CliError, CliResult};
use crate::config::AppPaths;
use crate::models::{ArgbColor, CategoryDefinition};
use clap::{Args, Subcommand};
use serde::Serialize;

/// Manage icon categories
#[derive(Debug, Clone, Args)]
pub struct CategoryArgs {
    /// Category subcommand
    #[command(subcommand)]
    pub command: CategoryCommand,
}

/// Category management subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum CategoryCommand {
    /// List system and user categories
    List(ListCategoriesArgs),
    /// Add a user category
    Add(AddCategoryArgs),
    /// Remove a user category
    Remove(RemoveCategoryArgs),
}

/// List system and user categories
#[derive(Debug, Clone, Args)]
pub struct ListCategoriesArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Add a user category
#[derive(Debug, Clone, Args)]
pub struct AddCategoryArgs {
    /// Category ID (kebab-case)
    #[arg(long, value_name = "ID")]
    pub id: String,

    /// Category name
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// File extensions, comma separated (".mp3,.flac")
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Name or path substrings, comma separated
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub patterns: Vec<String>,

    /// Keywords, comma separated
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub keywords: Vec<String>,

    /// Priority (higher wins)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub priority: i32,

    /// Accent color in hex format (#RRGGBB or #AARRGGBB)
    #[arg(long, value_name = "HEX")]
    pub color: Option<String>,
}

/// Remove a user category
#[derive(Debug, Clone, Args)]
pub struct RemoveCategoryArgs {
    /// Category ID to remove
    #[arg(long, value_name = "ID")]
    pub id: String,
}

// JSON response types
#[derive(Debug, Serialize)]
struct CategoryItem {
    id: String,
    name: String,
    color: String,
    priority: i32,
    enabled: bool,
    system: bool,
    extensions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ListCategoriesResponse {
    categories: Vec<CategoryItem>,
    count: usize,
}

impl CategoryArgs {
    /// Execute the category command
    pub fn execute(&self, paths: &AppPaths) -> CliResult<()> {
        match &self.command {
            CategoryCommand::List(args) => args.execute(paths),
            CategoryCommand::Add(args) => args.execute(paths),
            CategoryCommand::Remove(args) => args.execute(paths),
        }
    }
}

impl ListCategoriesArgs {
    /// Execute the list command
    pub fn execute(&self, paths: &AppPaths) -> CliResult<()> {
        let engine = open_engine(paths)?;

        let categories: Vec<CategoryItem> = engine
            .categories()
            .into_iter()
            .map(|cat| CategoryItem {
                color: cat.color.to_hex(),
                id: cat.id,
                name: cat.name,
                priority: cat.priority,
                enabled: cat.enabled,
                system: cat.system,
                extensions: cat.extensions,
            })
            .collect();

        let response = ListCategoriesResponse {
            count: categories.len(),
            categories,
        };

        if self.json {
            return print_json(&response);
        }

        println!("Categories ({}):", response.count);
        println!();
        for cat in response.categories {
            let origin = if cat.system { "system" } else { "user" };
            println!(
                "  {:<20} {:<25} {:>4}  {}",
                cat.id, cat.name, cat.priority, origin
            );
        }
        Ok(())
    }
}

impl AddCategoryArgs {
    /// Execute the add command
    pub fn execute(&self, paths: &AppPaths) -> CliResult<()> {
        let mut category = CategoryDefinition::new(&self.id, &self.name)?
            .with_extensions(&self.extensions)
            .with_patterns(&self.patterns)
            .with_keywords(&self.keywords)
            .with_priority(self.priority);

        if let Some(hex) = &self.color {
            category.color = ArgbColor::from_hex(hex)
                .map_err(|e| CliError::validation(format!("Invalid color '{hex}': {e}")))?;
        }

        let engine = open_engine(paths)?;
        engine.add_category(category)?;

        println!("Category '{}' added successfully.", self.id);
        Ok(())
    }
}

impl RemoveCategoryArgs {
    /// Execute the remove command
    pub fn execute(&self, paths: &AppPaths) -> CliResult<()> {
        let engine = open_engine(paths)?;

        match engine.categorizer().get(&self.id) {
            None => {
                return Err(CliError::not_found(format!(
                    "Category '{}' not found",
                    self.id
                )))
            }
            Some(cat) if cat.system => {
                return Err(CliError::validation(format!(
                    "Category '{}' is a system category and cannot be removed",
                    self.id
                )))
            }
            Some(_) => {}
        }

        let mut settings = (*engine.settings().get()).clone();
        settings.custom_categories.retain(|cat| cat.id != self.id);
        engine.settings().save(settings)?;

        println!("Category '{}' removed successfully.", self.id);
        Ok(())
    }
}
