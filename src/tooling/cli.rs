//! CLI Tooling
//!
//! Command-line interface over the sled-backed stores. Every mutating command
//! opens an edit session on one design category, applies a single operation
//! and commits it.

use crate::category::Hierarchy;
use crate::config::{ConfigLoader, DesignConfig};
use crate::error::{ApiError, StorageError};
use crate::session::{CommitReport, EditSession};
use crate::store::{open_database, DesignStore, SledAssetStore, SledDesignStore};
use crate::tree::node::{AttributeNode, ComponentsTree, FileRef, Selection};
use crate::tree::path::MenuPath;
use crate::tree::validate::validate;
use crate::tree::visit::{tree_stats, walk_tree, Visitor};
use crate::types::{FileId, PageId};
use crate::upload::{Blob, FileSet};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tracing::info;

/// design-tree - Hierarchical component trees for multi-page designs
#[derive(Parser)]
#[command(name = "design-tree")]
#[command(about = "Edit design component hierarchies and their per-page drawings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Design and category a command edits
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// Design id
    #[arg(long)]
    pub design: String,
    /// Category code
    #[arg(long)]
    pub category: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store a hierarchy document read from a JSON file
    Import {
        #[arg(long)]
        design: String,
        /// JSON file holding the hierarchy
        file: PathBuf,
    },
    /// Print a hierarchy document as JSON
    Export {
        #[arg(long)]
        design: String,
    },
    /// List stored designs
    List,
    /// Show a category's pages and components
    Show {
        #[command(flatten)]
        target: Target,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Report selections that point at missing options
    Validate {
        #[command(flatten)]
        target: Target,
    },
    /// Add an option; with --page it is a file leaf, without it a nested attribute
    Add {
        #[command(flatten)]
        target: Target,
        /// Parent location, slash separated (omit for top level)
        #[arg(long, value_delimiter = '/')]
        at: Vec<String>,
        /// Name of the new option
        name: String,
        /// Page drawing as PAGE_ID=PATH, one per selected page
        #[arg(long = "page")]
        pages: Vec<String>,
    },
    /// Rename an option, keeping its subtree
    Rename {
        #[command(flatten)]
        target: Target,
        #[arg(long, value_delimiter = '/')]
        at: Vec<String>,
        /// New name
        to: String,
    },
    /// Delete an option and its subtree
    Delete {
        #[command(flatten)]
        target: Target,
        #[arg(long, value_delimiter = '/')]
        at: Vec<String>,
    },
    /// Set the selected option of an attribute ("none" disables it, "" unsets it)
    Select {
        #[command(flatten)]
        target: Target,
        #[arg(long, value_delimiter = '/')]
        at: Vec<String>,
        option: String,
    },
    /// Replace the drawings of one leaf under a fresh file id
    UpdateFile {
        #[command(flatten)]
        target: Target,
        #[arg(long, value_delimiter = '/')]
        at: Vec<String>,
        /// Page drawing as PAGE_ID=PATH
        #[arg(long = "page", required = true)]
        pages: Vec<String>,
    },
    /// Replace files across the category as FILE_ID:PAGE_ID=PATH
    ReplaceFiles {
        #[command(flatten)]
        target: Target,
        #[arg(long = "file", required = true)]
        files: Vec<String>,
    },
    /// Replace the base drawing; one file per page of the category
    SetBase {
        #[command(flatten)]
        target: Target,
        /// Page drawing as PAGE_ID=PATH
        #[arg(long = "page", required = true)]
        pages: Vec<String>,
    },
    /// Move the category's content to another category code
    Shift {
        #[command(flatten)]
        target: Target,
        /// Destination category code
        to: String,
    },
    /// Manage pages
    Page {
        #[command(flatten)]
        target: Target,
        #[command(subcommand)]
        command: PageCommands,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Subcommand)]
pub enum PageCommands {
    /// Add a page
    Add { name: String },
    /// Rename a page
    Rename { name: String, to: String },
    /// Delete a page (the last page cannot be deleted)
    Delete { name: String },
}

/// CLI context: configuration, stores and the async runtime
pub struct CliContext {
    config: DesignConfig,
    designs: SledDesignStore,
    assets: SledAssetStore,
    runtime: Runtime,
}

impl CliContext {
    /// Create a new CLI context
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Self::with_config(&workspace_root, config)
    }

    pub fn with_config(workspace_root: &Path, config: DesignConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let store_path = config.storage.resolve_path(workspace_root)?;
        std::fs::create_dir_all(&store_path)?;
        let db = open_database(&store_path)?;
        Ok(Self {
            designs: SledDesignStore::new(&db)?,
            assets: SledAssetStore::new(&db)?,
            runtime: Runtime::new()?,
            config,
        })
    }

    pub fn config(&self) -> &DesignConfig {
        &self.config
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Import { design, file } => {
                let content = std::fs::read_to_string(file)?;
                let hierarchy: Hierarchy =
                    serde_json::from_str(&content).map_err(StorageError::from)?;
                self.runtime
                    .block_on(self.designs.replace(design, &hierarchy))?;
                info!(design_id = %design, "Imported hierarchy");
                Ok(format!(
                    "Imported design {} ({} categories)",
                    design,
                    hierarchy.categories.len()
                ))
            }
            Commands::Export { design } => {
                let hierarchy = self.load_hierarchy(design)?;
                Ok(serde_json::to_string_pretty(&hierarchy).map_err(StorageError::from)?)
            }
            Commands::List => {
                let designs = self.runtime.block_on(self.designs.list())?;
                if designs.is_empty() {
                    return Ok("No designs stored.".to_string());
                }
                Ok(designs.join("\n"))
            }
            Commands::Show { target, format } => {
                let hierarchy = self.load_hierarchy(&target.design)?;
                let category = hierarchy.category(&target.category)?;
                if format == "json" {
                    return Ok(serde_json::to_string_pretty(category).map_err(StorageError::from)?);
                }
                Ok(format_category_text(
                    &target.category,
                    &category.pages,
                    category.base_drawing.as_ref(),
                    &category.components,
                ))
            }
            Commands::Validate { target } => {
                let hierarchy = self.load_hierarchy(&target.design)?;
                let report = validate(&hierarchy.category(&target.category)?.components);
                if report.is_valid() {
                    return Ok("Valid: every selection names an existing option.".to_string());
                }
                let mut output = format!("{} dangling selection(s):\n", report.dangling.len());
                for dangling in &report.dangling {
                    output.push_str(&format!(
                        "  {} -> '{}'\n",
                        dangling.path, dangling.selected
                    ));
                }
                Ok(output)
            }
            Commands::Add {
                target,
                at,
                name,
                pages,
            } => {
                let parent = MenuPath::new(at.iter().cloned());
                if pages.is_empty() {
                    return self.edit(target, |session| {
                        session.add_parent(&parent, name)?;
                        Ok(format!("Added attribute {}", parent.child(name.as_str())))
                    });
                }
                let files = read_page_files(pages)?;
                let selected: Vec<PageId> = files.keys().cloned().collect();
                self.edit(target, |session| {
                    let file_id = session.add_leaf(&parent, name, &selected, files)?;
                    Ok(format!(
                        "Added option {} (file {})",
                        parent.child(name.as_str()),
                        file_id
                    ))
                })
            }
            Commands::Rename { target, at, to } => {
                let path = MenuPath::new(at.iter().cloned());
                self.edit(target, |session| {
                    session.rename(&path, to)?;
                    Ok(format!("Renamed {} to {}", path, to))
                })
            }
            Commands::Delete { target, at } => {
                let path = MenuPath::new(at.iter().cloned());
                self.edit(target, |session| {
                    let removed = session.delete(&path)?;
                    Ok(format!("Deleted {} ({} file(s))", path, removed.len()))
                })
            }
            Commands::Select { target, at, option } => {
                let path = MenuPath::new(at.iter().cloned());
                let selection = Selection::from(option.clone());
                self.edit(target, |session| {
                    session.select(&path, selection.clone())?;
                    Ok(format!("Selected {} at {}", selection, path))
                })
            }
            Commands::UpdateFile { target, at, pages } => {
                let path = MenuPath::new(at.iter().cloned());
                let files = read_page_files(pages)?;
                let selected: Vec<PageId> = files.keys().cloned().collect();
                self.edit(target, |session| {
                    let file_id = session.update_file(&path, &selected, files)?;
                    Ok(format!("Updated {} (file {})", path, file_id))
                })
            }
            Commands::ReplaceFiles { target, files } => {
                let replacements = read_replacements(files)?;
                self.edit(target, |session| {
                    let map = session.replace_files(replacements)?;
                    let mut output = format!("Replaced {} file(s)", map.len());
                    for (old, new) in map.iter() {
                        output.push_str(&format!("\n  {} -> {}", old, new));
                    }
                    Ok(output)
                })
            }
            Commands::SetBase { target, pages } => {
                let files = read_page_files(pages)?;
                self.edit(target, |session| {
                    let file_id = session.set_base_drawing(files)?;
                    Ok(format!("Set base drawing (file {})", file_id))
                })
            }
            Commands::Shift { target, to } => self.edit(target, |session| {
                session.shift_category(to)?;
                Ok(format!("Moved category {} to {}", target.category, to))
            }),
            Commands::Page { target, command } => self.edit(target, |session| match command {
                PageCommands::Add { name } => {
                    let page_id = session.add_page(name)?;
                    Ok(format!("Added page {} ({})", name, page_id))
                }
                PageCommands::Rename { name, to } => {
                    session.rename_page(name, to)?;
                    Ok(format!("Renamed page {} to {}", name, to))
                }
                PageCommands::Delete { name } => {
                    let orphaned = session.delete_page(name)?;
                    Ok(format!(
                        "Deleted page {} ({} asset(s) released)",
                        name,
                        orphaned.len()
                    ))
                }
            }),
            Commands::Config => self.config.to_toml(),
        }
    }

    fn load_hierarchy(&self, design: &str) -> Result<Hierarchy, ApiError> {
        self.runtime
            .block_on(self.designs.load(design))?
            .ok_or_else(|| StorageError::DesignNotFound(design.to_string()).into())
    }

    /// Load a session, apply one operation and commit.
    fn edit<F>(&self, target: &Target, apply: F) -> Result<String, ApiError>
    where
        F: FnOnce(&mut EditSession) -> Result<String, ApiError>,
    {
        self.runtime.block_on(async {
            let mut session = EditSession::load(
                &self.designs,
                &target.design,
                &target.category,
                self.config.session.clone(),
            )
            .await?;
            let summary = apply(&mut session)?;
            let report = session.commit(&self.designs, &self.assets).await?;
            Ok(format!("{}\n{}", summary, format_commit_report(&report)))
        })
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("svg") => "image/svg+xml",
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

fn read_blob(path: &Path) -> Result<Blob, ApiError> {
    let bytes = std::fs::read(path)?;
    Ok(Blob::new(content_type_for(path), bytes))
}

/// Parse `PAGE_ID=PATH` into (page id, path).
fn parse_page_arg(arg: &str) -> Result<(PageId, PathBuf), ApiError> {
    match arg.split_once('=') {
        Some((page, path)) if !page.is_empty() && !path.is_empty() => {
            Ok((page.to_string(), PathBuf::from(path)))
        }
        _ => Err(ApiError::ConfigError(format!(
            "Invalid page argument '{}' (expected PAGE_ID=PATH)",
            arg
        ))),
    }
}

fn read_page_files(args: &[String]) -> Result<FileSet, ApiError> {
    let mut files = FileSet::new();
    for arg in args {
        let (page, path) = parse_page_arg(arg)?;
        files.insert(page, read_blob(&path)?);
    }
    Ok(files)
}

/// Parse `FILE_ID:PAGE_ID=PATH` arguments grouped by file id.
fn read_replacements(args: &[String]) -> Result<BTreeMap<FileId, FileSet>, ApiError> {
    let mut replacements: BTreeMap<FileId, FileSet> = BTreeMap::new();
    for arg in args {
        let (file_id, page_arg) = arg.split_once(':').ok_or_else(|| {
            ApiError::ConfigError(format!(
                "Invalid file argument '{}' (expected FILE_ID:PAGE_ID=PATH)",
                arg
            ))
        })?;
        let (page, path) = parse_page_arg(page_arg)?;
        replacements
            .entry(file_id.to_string())
            .or_default()
            .insert(page, read_blob(&path)?);
    }
    Ok(replacements)
}

struct TableRows {
    rows: Vec<[String; 3]>,
}

impl Visitor for TableRows {
    fn visit_leaf(&mut self, path: &MenuPath, file: &FileRef) {
        self.rows
            .push([path.to_string(), "option".to_string(), file.file_id.clone()]);
    }

    fn visit_parent(&mut self, path: &MenuPath, attr: &AttributeNode) {
        self.rows.push([
            path.to_string(),
            "attribute".to_string(),
            format!("selected: {}", attr.selected_option),
        ]);
    }
}

fn format_category_text(
    code: &str,
    pages: &BTreeMap<String, PageId>,
    base_drawing: Option<&FileRef>,
    components: &ComponentsTree,
) -> String {
    let stats = tree_stats(components);
    let mut output = format!(
        "Category {}: {} page(s), {} attribute(s), {} option file(s), depth {}\n",
        code,
        pages.len(),
        stats.parents,
        stats.leaves,
        stats.max_depth
    );
    if let Some(base) = base_drawing {
        output.push_str(&format!("Base drawing: {}\n", base.file_id));
    }

    let mut page_table = Table::new();
    page_table.load_preset(comfy_table::presets::UTF8_FULL);
    page_table.set_header(vec!["Page", "Page ID"]);
    for (name, id) in pages {
        page_table.add_row(vec![name, id]);
    }
    output.push_str(&page_table.to_string());
    output.push('\n');

    let mut rows = TableRows { rows: Vec::new() };
    walk_tree(&mut rows, components);
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Location", "Kind", "File / Selection"]);
    for row in &rows.rows {
        table.add_row(row.to_vec());
    }
    output.push_str(&table.to_string());
    output
}

fn format_commit_report(report: &CommitReport) -> String {
    format!(
        "Committed {} at {}: {} blob(s) uploaded, {} file(s) released{}",
        report.design_id,
        report.committed_at.to_rfc3339(),
        report.uploaded_blobs,
        report.deleted_files.len(),
        if report.gc_failures > 0 {
            format!(", {} cleanup failure(s)", report.gc_failures)
        } else {
            String::new()
        }
    )
}
