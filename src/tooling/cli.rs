//! CLI Tooling
//!
//! Command-line interface over a sled-backed menu store: group menus, their
//! anchors, links, rendered trees and discovery rebuilds.

use crate::api::MenuSystem;
use crate::config::{ConfigLoader, MenugraftConfig};
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::menu::group_menu::{Anchor, GroupMenu};
use crate::tree::node::{LinkDefinition, LinkUpdate};
use crate::tree::params::TreeParameters;
use crate::tree::resolve::ResolvedLink;
use crate::types::{GroupMenuId, LinkId};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use serde::Deserialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

/// Menugraft - graft group menus into site menus through shadow links
#[derive(Parser)]
#[command(name = "menugraft")]
#[command(about = "Graft group menus into other menus through shadow links")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Menu store directory (overrides storage.path)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Log to stderr at debug level
    #[arg(long, default_value = "false")]
    pub verbose: bool,

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

impl Cli {
    /// Logging settings with command-line flags applied over `base`.
    pub fn logging_config(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if self.verbose {
            config.level = "debug".to_string();
            config.output = "stderr".to_string();
        }
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage group menus
    Menu {
        #[command(subcommand)]
        command: MenuCommands,
    },
    /// Manage menu links
    Link {
        #[command(subcommand)]
        command: LinkCommands,
    },
    /// Render a menu, shadow links included
    Tree {
        /// Menu name
        menu: String,
        /// Include disabled links
        #[arg(long)]
        all: bool,
        /// Deepest level to render
        #[arg(long)]
        max_depth: Option<usize>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Replace discovered links from a TOML file
    Rebuild {
        /// File with one [[links]] table per discovered link
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum MenuCommands {
    /// Create a group menu
    Create {
        label: String,
        /// Owning group id
        #[arg(long)]
        group: Option<u64>,
        /// Parent anchor as <menu>:<link-id>
        #[arg(long)]
        anchor: Option<Anchor>,
    },
    /// Set the parent anchor of a group menu
    Anchor { id: GroupMenuId, anchor: Anchor },
    /// Detach a group menu from its anchor
    ClearAnchor { id: GroupMenuId },
    /// Delete a group menu and its links
    Delete { id: GroupMenuId },
    /// List group menus
    List {
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum LinkCommands {
    /// Add a link to a group menu
    Add {
        /// Group menu id
        menu: GroupMenuId,
        id: LinkId,
        title: String,
        #[arg(long)]
        parent: Option<LinkId>,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        weight: i32,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        disabled: bool,
    },
    /// Update a link; shadow ids edit the real link
    Update {
        id: LinkId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "root")]
        parent: Option<LinkId>,
        /// Move the link to the top level of its menu
        #[arg(long)]
        root: bool,
        #[arg(long, allow_hyphen_values = true)]
        weight: Option<i32>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        enabled: Option<bool>,
        /// Move the link (and its subtree) to another menu
        #[arg(long)]
        menu: Option<String>,
    },
    /// Remove a link; shadow ids remove the real link
    Remove { id: LinkId },
    /// Show one link
    Show {
        id: LinkId,
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// Discovered link as written in a rebuild file
#[derive(Debug, Deserialize)]
struct DiscoveredLink {
    id: LinkId,
    menu_name: String,
    title: String,
    #[serde(default)]
    parent: Option<LinkId>,
    #[serde(default)]
    weight: i32,
    #[serde(default)]
    description: String,
    #[serde(default)]
    route_name: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    provider: String,
}

#[derive(Debug, Deserialize)]
struct DiscoveryFile {
    #[serde(default)]
    links: Vec<DiscoveredLink>,
}

impl From<DiscoveredLink> for LinkDefinition {
    fn from(link: DiscoveredLink) -> Self {
        let mut definition = LinkDefinition::new(link.id, link.menu_name, link.title)
            .with_weight(link.weight)
            .with_provider(link.provider);
        definition.parent = link.parent;
        definition.description = link.description;
        definition.route_name = link.route_name;
        definition.url = link.url;
        definition
    }
}

/// CLI context holding the opened menu system
pub struct CliContext {
    system: MenuSystem,
    config: MenugraftConfig,
}

impl CliContext {
    /// Load configuration and open the menu store.
    pub fn new(config_path: Option<PathBuf>, store: Option<PathBuf>) -> Result<Self, ApiError> {
        Self::from_config(Self::load_config(config_path.as_deref())?, store)
    }

    pub fn load_config(config_path: Option<&Path>) -> Result<MenugraftConfig, ApiError> {
        match config_path {
            Some(path) => ConfigLoader::load_from_file(path),
            None => ConfigLoader::load(),
        }
    }

    /// Open the menu store named by `config`, or `store` when given.
    pub fn from_config(
        mut config: MenugraftConfig,
        store: Option<PathBuf>,
    ) -> Result<Self, ApiError> {
        if store.is_some() {
            config.storage.path = store;
        }
        let system = MenuSystem::open(&config)?;
        Ok(Self { system, config })
    }

    /// Build a context around an already assembled system.
    pub fn with_system(system: MenuSystem, config: MenugraftConfig) -> Self {
        Self { system, config }
    }

    pub fn config(&self) -> &MenugraftConfig {
        &self.config
    }

    pub fn system(&self) -> &MenuSystem {
        &self.system
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let output = match command {
            Commands::Menu { command } => self.execute_menu(command),
            Commands::Link { command } => self.execute_link(command),
            Commands::Tree {
                menu,
                all,
                max_depth,
                format,
            } => self.handle_tree(menu, *all, *max_depth, format),
            Commands::Rebuild { file } => self.handle_rebuild(file),
        }?;
        self.system.flush()?;
        Ok(output)
    }

    fn execute_menu(&self, command: &MenuCommands) -> Result<String, ApiError> {
        let menus = self.system.menus();
        match command {
            MenuCommands::Create {
                label,
                group,
                anchor,
            } => {
                let menu = menus.create(label.clone(), *group, anchor.clone())?;
                Ok(format!(
                    "Created group menu {} ({})",
                    menu.id,
                    menus.menu_name(menu.id)
                ))
            }
            MenuCommands::Anchor { id, anchor } => {
                menus.set_anchor(*id, Some(anchor.clone()))?;
                Ok(format!("Group menu {} anchored at {}", id, anchor))
            }
            MenuCommands::ClearAnchor { id } => {
                menus.set_anchor(*id, None)?;
                Ok(format!("Group menu {} detached", id))
            }
            MenuCommands::Delete { id } => {
                menus.delete(*id)?;
                Ok(format!("Deleted group menu {}", id))
            }
            MenuCommands::List { format } => {
                let list = menus.list()?;
                format_menu_list(&list, |id| menus.menu_name(id), format)
            }
        }
    }

    fn execute_link(&self, command: &LinkCommands) -> Result<String, ApiError> {
        let links = self.system.links();
        match command {
            LinkCommands::Add {
                menu,
                id,
                title,
                parent,
                weight,
                url,
                disabled,
            } => {
                let mut definition = LinkDefinition::new(id.clone(), "", title.clone())
                    .with_weight(*weight);
                definition.parent = parent.clone();
                definition.url = url.clone();
                definition.enabled = !*disabled;
                let added = self.system.menus().add_link(*menu, definition)?;
                Ok(format!("Added {} to {}", added.id, added.menu_name))
            }
            LinkCommands::Update {
                id,
                title,
                parent,
                root,
                weight,
                url,
                enabled,
                menu,
            } => {
                let update = LinkUpdate {
                    menu_name: menu.clone(),
                    parent: if *root {
                        Some(None)
                    } else {
                        parent.clone().map(Some)
                    },
                    weight: *weight,
                    title: title.clone(),
                    url: url.clone().map(Some),
                    enabled: *enabled,
                    ..LinkUpdate::default()
                };
                let updated = links.update_definition(id, &update)?;
                Ok(format!("Updated {}", updated.id))
            }
            LinkCommands::Remove { id } => {
                links.remove_definition(id)?;
                Ok(format!("Removed {}", id))
            }
            LinkCommands::Show { id, format } => {
                let link = self.system.factory().create_instance(id)?;
                let definition = link.definition();
                if format == "json" {
                    let out = json!({
                        "id": link.id(),
                        "menu_name": link.menu_name(),
                        "parent": link.parent(),
                        "title": link.title(),
                        "url": link.url(),
                        "weight": link.weight(),
                        "enabled": link.is_enabled(),
                        "provider": link.provider(),
                        "kind": format!("{:?}", definition.kind),
                        "shadow_of": definition.metadata.get(crate::types::SHADOW_OF_KEY),
                    });
                    return to_json(&out);
                }
                let mut table = Table::new();
                table.load_preset(comfy_table::presets::UTF8_FULL);
                table.set_header(vec!["Field", "Value"]);
                table.add_row(vec!["id".to_string(), link.id().to_string()]);
                table.add_row(vec!["menu".to_string(), link.menu_name().to_string()]);
                table.add_row(vec![
                    "parent".to_string(),
                    link.parent().unwrap_or("-").to_string(),
                ]);
                table.add_row(vec!["title".to_string(), link.title().to_string()]);
                table.add_row(vec!["url".to_string(), link.url().unwrap_or_default()]);
                table.add_row(vec!["weight".to_string(), link.weight().to_string()]);
                table.add_row(vec!["enabled".to_string(), link.is_enabled().to_string()]);
                table.add_row(vec!["kind".to_string(), format!("{:?}", definition.kind)]);
                Ok(table.to_string())
            }
        }
    }

    fn handle_tree(
        &self,
        menu: &str,
        all: bool,
        max_depth: Option<usize>,
        format: &str,
    ) -> Result<String, ApiError> {
        let mut params = TreeParameters::new();
        if !all {
            params = params.only_enabled();
        }
        if let Some(depth) = max_depth {
            params = params.with_max_depth(depth);
        }
        let tree = self.system.resolver().resolve(menu, &params)?;
        if format == "json" {
            return to_json(&tree);
        }
        if tree.is_empty() {
            return Ok(format!("Menu {} has no links.", menu));
        }
        let mut table = Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.set_header(vec!["Title", "Id", "Url", "Weight", "Shadow of"]);
        let mut rows = Vec::new();
        for link in &tree {
            tree_rows(link, &mut rows);
        }
        for row in rows {
            table.add_row(row);
        }
        Ok(table.to_string())
    }

    fn handle_rebuild(&self, file: &Path) -> Result<String, ApiError> {
        let text = std::fs::read_to_string(file).map_err(|e| {
            ApiError::ConfigError(format!("Failed to read {}: {}", file.display(), e))
        })?;
        let parsed: DiscoveryFile = toml::from_str(&text).map_err(|e| {
            ApiError::ConfigError(format!("Invalid discovery file {}: {}", file.display(), e))
        })?;
        let discovered: Vec<LinkDefinition> =
            parsed.links.into_iter().map(LinkDefinition::from).collect();
        let count = discovered.len();
        let pruned = self.system.links().rebuild(discovered)?;
        info!(count, pruned = pruned.len(), "rebuild finished");
        Ok(format!(
            "Rebuilt {} discovered link(s), pruned {}",
            count,
            pruned.len()
        ))
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::ConfigError(format!("Failed to encode output: {}", e)))
}

fn tree_rows(link: &ResolvedLink, rows: &mut Vec<Vec<String>>) {
    let indent = "  ".repeat(link.depth.saturating_sub(1));
    rows.push(vec![
        format!("{}{}", indent, link.title),
        link.id.clone(),
        link.url.clone().unwrap_or_default(),
        link.weight.to_string(),
        link.shadow_of.clone().unwrap_or_default(),
    ]);
    for child in &link.children {
        tree_rows(child, rows);
    }
}

fn format_menu_list(
    menus: &[GroupMenu],
    menu_name: impl Fn(GroupMenuId) -> String,
    format: &str,
) -> Result<String, ApiError> {
    if format == "json" {
        let arr: Vec<serde_json::Value> = menus
            .iter()
            .map(|m| {
                json!({
                    "id": m.id,
                    "label": m.label,
                    "menu_name": menu_name(m.id),
                    "group_id": m.group_id,
                    "anchor": m.anchor.as_ref().map(ToString::to_string),
                })
            })
            .collect();
        return to_json(&arr);
    }
    if menus.is_empty() {
        return Ok("No group menus.".to_string());
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Id", "Label", "Menu", "Group", "Anchor"]);
    for m in menus {
        table.add_row(vec![
            m.id.to_string(),
            m.label.clone(),
            menu_name(m.id),
            m.group_id.map(|g| g.to_string()).unwrap_or_else(|| "-".to_string()),
            m.anchor
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    Ok(table.to_string())
}
