//! Clap derive structures for the `hwdash` CLI.
//!
//! Defines the command tree, global flags, and the value enums that map
//! onto `hwdash_core` filter categories.

use std::time::Duration;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use hwdash_core::filter::NumericBucket;
use hwdash_core::{AllocationStatus, Availability, Detection, DeviceHealth, DeviceState, DeviceType};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hwdash -- inventory and usage dashboard for composable hardware
#[derive(Debug, Parser)]
#[command(
    name = "hwdash",
    version,
    about = "Inspect composable hardware inventory and usage from the command line",
    long_about = "Lists nodes, CXL switches, resources and resource groups from the\n\
        inventory backend, and summarises device usage from the metrics backend.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "HWDASH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Inventory API base URL (overrides profile)
    #[arg(long, env = "HWDASH_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Metrics API base URL (overrides profile)
    #[arg(long, env = "HWDASH_METRICS_URL", global = true)]
    pub metrics_url: Option<String>,

    /// Bearer token
    #[arg(long, env = "HWDASH_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(long, short = 'o', env = "HWDASH_OUTPUT", default_value = "table", global = true)]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "HWDASH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "HWDASH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Filter value enums ───────────────────────────────────────────────

/// Numeric column bucket: `not-exist` is 0, `exist` is 1 or more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BucketArg {
    NotExist,
    Exist,
}

impl From<BucketArg> for NumericBucket {
    fn from(arg: BucketArg) -> Self {
        match arg {
            BucketArg::NotExist => Self::NotExist,
            BucketArg::Exist => Self::Exist,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HealthArg {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl From<HealthArg> for DeviceHealth {
    fn from(arg: HealthArg) -> Self {
        match arg {
            HealthArg::Ok => Self::Ok,
            HealthArg::Warning => Self::Warning,
            HealthArg::Critical => Self::Critical,
            HealthArg::Unknown => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StateArg {
    Enabled,
    Disabled,
    Absent,
    Unknown,
}

impl From<StateArg> for DeviceState {
    fn from(arg: StateArg) -> Self {
        match arg {
            StateArg::Enabled => Self::Enabled,
            StateArg::Disabled => Self::Disabled,
            StateArg::Absent => Self::Absent,
            StateArg::Unknown => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AllocationArg {
    Allocated,
    Unallocated,
}

impl From<AllocationArg> for AllocationStatus {
    fn from(arg: AllocationArg) -> Self {
        match arg {
            AllocationArg::Allocated => Self::Allocated,
            AllocationArg::Unallocated => Self::Unallocated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AvailabilityArg {
    Available,
    Unavailable,
}

impl From<AvailabilityArg> for Availability {
    fn from(arg: AvailabilityArg) -> Self {
        match arg {
            AvailabilityArg::Available => Self::Available,
            AvailabilityArg::Unavailable => Self::Unavailable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DetectionArg {
    Detected,
    NotDetected,
}

impl From<DetectionArg> for Detection {
    fn from(arg: DetectionArg) -> Self {
        match arg {
            DetectionArg::Detected => Self::Detected,
            DetectionArg::NotDetected => Self::NotDetected,
        }
    }
}

/// Convert a list of clap value enums into core filter values.
pub fn convert_all<A: Copy + Into<T>, T>(args: &[A]) -> Vec<T> {
    args.iter().map(|&a| a.into()).collect()
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute nodes and their composed resources
    #[command(alias = "n")]
    Nodes(NodesArgs),

    /// CXL switches derived from resource attachments
    #[command(alias = "sw")]
    Switches(SwitchesArgs),

    /// Hardware resources
    #[command(alias = "res", alias = "r")]
    Resources(ResourcesArgs),

    /// Resource groups
    #[command(alias = "g")]
    Groups(GroupsArgs),

    /// Usage histogram, storage capacity, and per-device graphs
    #[command(alias = "m")]
    Metrics(MetricsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NODES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NodesArgs {
    #[command(subcommand)]
    pub command: NodesCommand,
}

#[derive(Debug, Subcommand)]
pub enum NodesCommand {
    /// List nodes with per-type device counts
    #[command(alias = "ls")]
    List(NodeListArgs),
}

#[derive(Debug, Args)]
pub struct NodeListArgs {
    /// Text filter on the node id (all tokens must match)
    #[arg(long)]
    pub id: Option<String>,

    #[arg(long, value_enum, value_delimiter = ',')]
    pub cpu: Vec<BucketArg>,

    #[arg(long, value_enum, value_delimiter = ',')]
    pub accelerator: Vec<BucketArg>,

    #[arg(long, value_enum, value_delimiter = ',')]
    pub dsp: Vec<BucketArg>,

    #[arg(long, value_enum, value_delimiter = ',')]
    pub fpga: Vec<BucketArg>,

    #[arg(long, value_enum, value_delimiter = ',')]
    pub gpu: Vec<BucketArg>,

    #[arg(long, value_enum, value_delimiter = ',')]
    pub unknown_processor: Vec<BucketArg>,

    /// Bucket on total memory capacity
    #[arg(long, value_enum, value_delimiter = ',')]
    pub memory: Vec<BucketArg>,

    /// Bucket on total drive capacity
    #[arg(long, value_enum, value_delimiter = ',')]
    pub storage: Vec<BucketArg>,

    #[arg(long, value_enum, value_delimiter = ',')]
    pub network_interface: Vec<BucketArg>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SWITCHES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SwitchesArgs {
    #[command(subcommand)]
    pub command: SwitchesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SwitchesCommand {
    /// List CXL switches
    #[command(alias = "ls")]
    List(SwitchListArgs),
}

#[derive(Debug, Args)]
pub struct SwitchListArgs {
    /// Text filter on the switch id
    #[arg(long)]
    pub id: Option<String>,

    /// Bucket on the number of allocated devices
    #[arg(long, value_enum, value_delimiter = ',')]
    pub allocated: Vec<BucketArg>,

    /// Bucket on the number of unallocated devices
    #[arg(long, value_enum, value_delimiter = ',')]
    pub unallocated: Vec<BucketArg>,

    /// Switches carrying at least one device of these types (wire names)
    #[arg(long = "type", value_delimiter = ',')]
    pub device_type: Vec<DeviceType>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  RESOURCES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ResourcesArgs {
    #[command(subcommand)]
    pub command: ResourcesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourcesCommand {
    /// List resources
    #[command(alias = "ls")]
    List(ResourceListArgs),

    /// Show one resource
    Get {
        /// Device id
        id: String,
    },

    /// Replace the resource groups a resource belongs to
    SetGroups {
        /// Device id
        id: String,

        /// Resource group ids (none clears membership)
        groups: Vec<String>,
    },
}

#[derive(Debug, Args)]
pub struct ResourceListArgs {
    /// Text filter on the device id
    #[arg(long)]
    pub id: Option<String>,

    /// Device types (wire names, e.g. CPU,memory,networkInterface)
    #[arg(long = "type", value_delimiter = ',')]
    pub device_type: Vec<DeviceType>,

    #[arg(long, value_enum, value_delimiter = ',')]
    pub health: Vec<HealthArg>,

    #[arg(long, value_enum, value_delimiter = ',')]
    pub state: Vec<StateArg>,

    /// Text filter on the CXL switch id
    #[arg(long)]
    pub cxl_switch: Option<String>,

    /// Text filter on attached node ids
    #[arg(long)]
    pub node: Option<String>,

    /// Text filter on resource group names
    #[arg(long)]
    pub group: Option<String>,

    #[arg(long, value_enum, value_delimiter = ',')]
    pub allocation: Vec<AllocationArg>,

    #[arg(long, value_enum, value_delimiter = ',')]
    pub availability: Vec<AvailabilityArg>,

    #[arg(long, value_enum, value_delimiter = ',')]
    pub detection: Vec<DetectionArg>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  GROUPS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// List resource groups
    #[command(alias = "ls")]
    List(GroupListArgs),

    /// Show one resource group
    Get {
        /// Group id
        id: String,
    },

    /// Create a resource group
    Create {
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Update name and description of a resource group
    Update {
        /// Group id
        id: String,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Delete a resource group
    Delete {
        /// Group id
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct GroupListArgs {
    /// Text filter on the group id
    #[arg(long)]
    pub id: Option<String>,

    /// Text filter on the group name
    #[arg(long)]
    pub name: Option<String>,

    /// Text filter on the description
    #[arg(long)]
    pub description: Option<String>,

    /// Created on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub created_from: Option<NaiveDate>,

    /// Created on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub created_to: Option<NaiveDate>,

    /// Updated on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub updated_from: Option<NaiveDate>,

    /// Updated on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub updated_to: Option<NaiveDate>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  METRICS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct MetricsArgs {
    #[command(subcommand)]
    pub command: MetricsCommand,
}

#[derive(Debug, Subcommand)]
pub enum MetricsCommand {
    /// Device counts per usage bucket
    Histogram {
        /// Device types to include (wire names)
        #[arg(
            long = "type",
            value_delimiter = ',',
            default_value = "CPU,memory"
        )]
        device_type: Vec<DeviceType>,
    },

    /// Used, allocated and total storage capacity
    Storage,

    /// Usage and energy time series for one resource
    Graph {
        /// Device id
        id: String,

        /// Look-back window (e.g. 1h, 30m, 1d)
        #[arg(long, short = 'w', default_value = "1h", value_parser = humantime::parse_duration)]
        window: Duration,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a bearer token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_flags_parse_into_filter_values() {
        let cli = Cli::try_parse_from([
            "hwdash",
            "resources",
            "list",
            "--type",
            "CPU,memory",
            "--health",
            "warning,critical",
            "--detection",
            "not-detected",
        ])
        .unwrap();

        let Command::Resources(ResourcesArgs {
            command: ResourcesCommand::List(args),
        }) = cli.command
        else {
            panic!("expected resources list");
        };
        assert_eq!(args.device_type, vec![DeviceType::Cpu, DeviceType::Memory]);
        assert_eq!(
            convert_all::<_, DeviceHealth>(&args.health),
            vec![DeviceHealth::Warning, DeviceHealth::Critical]
        );
        assert_eq!(
            convert_all::<_, Detection>(&args.detection),
            vec![Detection::NotDetected]
        );
    }

    #[test]
    fn graph_window_uses_humantime() {
        let cli =
            Cli::try_parse_from(["hwdash", "metrics", "graph", "gpu-1", "-w", "90m"]).unwrap();
        let Command::Metrics(MetricsArgs {
            command: MetricsCommand::Graph { window, .. },
        }) = cli.command
        else {
            panic!("expected metrics graph");
        };
        assert_eq!(window, Duration::from_secs(90 * 60));
    }

    #[test]
    fn unknown_device_type_is_rejected() {
        assert!(Cli::try_parse_from(["hwdash", "resources", "list", "--type", "quantum"]).is_err());
    }
}
