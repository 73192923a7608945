//! Subcommands of the `sigcat` binary.
//!
//! Every command returns its result as JSON so the binary only has to print
//! it, and tests can inspect it directly.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use serde_json::{json, Value};
use sigcat_engine::{CatalogEngine, EngineConfig, FlattenFilter, Origin};
use sigcat_model::{LeafKind, Model, ModelRecord, Node, OverlayMap};
use sigcat_storage::CatalogStore;
use sigcat_types::{CatalogPath, DataType, NodeKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store a base catalog (and optional overlay) as a new model
    Import {
        /// Base catalog JSON file
        base: PathBuf,

        /// Name of the root branch
        #[arg(long, default_value = "Vehicle")]
        main_api: String,

        /// Overlay JSON file to start from
        #[arg(long)]
        overlay: Option<PathBuf>,
    },

    /// List stored model ids
    Models,

    #[command(flatten)]
    Query(QueryCommand),
}

/// Commands that run against one loaded model.
#[derive(Subcommand, Debug)]
pub enum QueryCommand {
    /// Look up one dotted path
    Resolve { path: String },

    /// List the direct children of a branch
    Ls {
        path: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Walk the merged catalog in order
    Flatten {
        #[command(flatten)]
        filter: FilterArgs,

        /// Only walk below this path
        #[arg(long)]
        under: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Case-insensitive substring search over paths
    Search {
        query: String,

        #[arg(long)]
        kind: Option<NodeKind>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Add a custom node
    Create {
        path: String,

        #[command(flatten)]
        node: NodeArgs,
    },

    /// Remove a custom node
    Delete { path: String },

    /// Node counts by kind and origin
    Stats,

    /// Overlay entries whose parent cannot be reached
    Orphans,

    /// Print the overlay as JSON
    Export,
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Only nodes of this kind (repeatable)
    #[arg(long = "kind")]
    pub kinds: Vec<NodeKind>,

    #[arg(long, value_enum, default_value_t = OriginArg::Any)]
    pub origin: OriginArg,
}

impl FilterArgs {
    fn to_filter(&self) -> FlattenFilter {
        let mut filter = FlattenFilter::all().with_origin(self.origin.into());
        for kind in &self.kinds {
            filter = filter.with_kind(*kind);
        }
        filter
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OriginArg {
    #[default]
    Any,
    Base,
    Custom,
}

impl From<OriginArg> for Origin {
    fn from(arg: OriginArg) -> Self {
        match arg {
            OriginArg::Any => Origin::Any,
            OriginArg::Base => Origin::Base,
            OriginArg::Custom => Origin::Custom,
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct PageArgs {
    #[arg(long, default_value_t = 0)]
    pub offset: usize,

    /// Defaults to the configured page size
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct NodeArgs {
    /// branch, sensor, actuator or attribute
    #[arg(long)]
    pub kind: Option<NodeKind>,

    /// Required for leaves
    #[arg(long)]
    pub datatype: Option<DataType>,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long)]
    pub unit: Option<String>,

    #[arg(long)]
    pub uuid: Option<String>,

    #[arg(long)]
    pub comment: Option<String>,

    /// Full node as JSON; replaces the other node options
    #[arg(long, conflicts_with_all = ["kind", "datatype", "unit"])]
    pub json: Option<String>,
}

impl NodeArgs {
    pub fn to_node(&self) -> Result<Node> {
        if let Some(json) = &self.json {
            return serde_json::from_str(json).context("invalid node JSON");
        }
        let Some(kind) = self.kind else {
            bail!("either --kind or --json is required");
        };
        let leaf_kind = match kind {
            NodeKind::Branch => {
                if self.datatype.is_some() || self.unit.is_some() {
                    bail!("branches take neither --datatype nor --unit");
                }
                None
            }
            NodeKind::Sensor => Some(LeafKind::Sensor),
            NodeKind::Actuator => Some(LeafKind::Actuator),
            NodeKind::Attribute => Some(LeafKind::Attribute),
        };

        let mut node = match leaf_kind {
            None => Node::branch(self.description.as_str()),
            Some(leaf_kind) => {
                let Some(datatype) = self.datatype else {
                    bail!("a {kind} needs --datatype");
                };
                Node::leaf(leaf_kind, datatype, self.description.as_str())
            }
        };
        if let Some(unit) = &self.unit {
            node = node.with_unit(unit.as_str());
        }
        if let Some(uuid) = &self.uuid {
            node = node.with_uuid(uuid.as_str());
        }
        if let Some(comment) = &self.comment {
            node = node.with_comment(comment.as_str());
        }
        Ok(node)
    }
}

/// Runs one command against `model_id` in `store`.
pub async fn run(
    store: Arc<dyn CatalogStore>,
    model_id: &str,
    config: EngineConfig,
    command: Command,
) -> Result<Value> {
    match command {
        Command::Import {
            base,
            main_api,
            overlay,
        } => import(store.as_ref(), model_id, &base, &main_api, overlay.as_deref()).await,
        Command::Models => Ok(json!(store.list_models().await?)),
        Command::Query(command) => {
            let engine = CatalogEngine::load(store, model_id, config)
                .await
                .with_context(|| format!("failed to open model {model_id}"))?;
            query(&engine, command).await
        }
    }
}

async fn import(
    store: &dyn CatalogStore,
    model_id: &str,
    base: &Path,
    main_api: &str,
    overlay: Option<&Path>,
) -> Result<Value> {
    let base_catalog_json = std::fs::read_to_string(base)
        .with_context(|| format!("failed to read {}", base.display()))?;
    let overlay = match overlay {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            OverlayMap::from_json(&text).context("invalid overlay")?
        }
        None => OverlayMap::new(),
    };
    let record = ModelRecord {
        main_api: main_api.to_string(),
        base_catalog_json,
        overlay,
    };

    // A catalog that does not parse is never stored.
    let model = Model::from_record(model_id, record.clone()).context("invalid base catalog")?;
    store.create_model(model_id, &record).await?;
    info!("imported model {model_id} into {} store", store.backend_name());

    Ok(json!({
        "model": model_id,
        "base_nodes": model.base().node_count(),
        "overlay_entries": model.overlay().len(),
    }))
}

async fn query(engine: &CatalogEngine, command: QueryCommand) -> Result<Value> {
    let value = match command {
        QueryCommand::Resolve { path } => {
            let (node, custom) = engine.resolve(&path)?;
            json!({ "path": path, "custom": custom, "node": node })
        }
        QueryCommand::Ls { path, filter } => {
            let children: Vec<Value> = engine
                .list_children(&path, &filter.to_filter())
                .into_iter()
                .map(|(name, node, custom)| {
                    json!({ "name": name, "kind": node.kind(), "custom": custom })
                })
                .collect();
            json!(children)
        }
        QueryCommand::Flatten {
            filter,
            under,
            page,
        } => {
            let mut filter = filter.to_filter();
            if let Some(under) = under {
                filter = filter.under(CatalogPath::from_dotted(&under));
            }
            let page = engine.config().page(page.offset, page.limit);
            serde_json::to_value(engine.flatten(filter, Some(page)))?
        }
        QueryCommand::Search { query, kind, page } => {
            let page = engine.config().page(page.offset, page.limit);
            serde_json::to_value(engine.search(&query, kind, Some(page)))?
        }
        QueryCommand::Create { path, node } => {
            let node = engine.create(&path, node.to_node()?).await?;
            json!({ "path": path, "node": node })
        }
        QueryCommand::Delete { path } => {
            let removed: Vec<String> = engine
                .delete(&path)
                .await?
                .iter()
                .map(CatalogPath::to_dotted)
                .collect();
            json!({ "removed": removed })
        }
        QueryCommand::Stats => serde_json::to_value(engine.stats())?,
        QueryCommand::Orphans => json!(engine.orphaned_entries()),
        QueryCommand::Export => serde_json::to_value(engine.snapshot().overlay())?,
    };
    Ok(value)
}
