//! Node command handlers.

use tabled::Tabled;

use hwdash_core::filter::{NumericBucket, records_from};
use hwdash_core::{Backend, NodeListFilter, NodeSummary};

use crate::cli::{
    BucketArg, GlobalOpts, NodeListArgs, NodesArgs, NodesCommand, OutputFormat, convert_all,
};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "CPU")]
    cpu: u64,
    #[tabled(rename = "Accel")]
    accelerator: u64,
    #[tabled(rename = "DSP")]
    dsp: u64,
    #[tabled(rename = "FPGA")]
    fpga: u64,
    #[tabled(rename = "GPU")]
    gpu: u64,
    #[tabled(rename = "Other Proc")]
    unknown_processor: u64,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Storage")]
    storage: String,
    #[tabled(rename = "NIC")]
    network_interface: u64,
}

impl From<&NodeSummary> for NodeRow {
    fn from(n: &NodeSummary) -> Self {
        Self {
            id: n.id.to_string(),
            cpu: n.cpu,
            accelerator: n.accelerator,
            dsp: n.dsp,
            fpga: n.fpga,
            gpu: n.gpu,
            unknown_processor: n.unknown_processor,
            memory: util::mib(n.memory_mib),
            storage: util::bytes(n.storage_bytes),
            network_interface: n.network_interface,
        }
    }
}

fn render_rows(format: &OutputFormat, rows: &[NodeSummary]) -> Result<String, CliError> {
    output::render_list(format, rows, |n| NodeRow::from(n), |n| n.id.to_string())
}

fn apply_filters(filter: &mut NodeListFilter, args: NodeListArgs) {
    if let Some(id) = args.id {
        filter.set_id(id);
    }
    let buckets: [(Vec<BucketArg>, fn(&mut NodeListFilter, Vec<NumericBucket>)); 9] = [
        (args.cpu, NodeListFilter::set_cpu),
        (args.accelerator, NodeListFilter::set_accelerator),
        (args.dsp, NodeListFilter::set_dsp),
        (args.fpga, NodeListFilter::set_fpga),
        (args.gpu, NodeListFilter::set_gpu),
        (args.unknown_processor, NodeListFilter::set_unknown_processor),
        (args.memory, NodeListFilter::set_memory),
        (args.storage, NodeListFilter::set_storage),
        (args.network_interface, NodeListFilter::set_network_interface),
    ];
    for (selected, set) in buckets {
        if !selected.is_empty() {
            set(filter, convert_all(&selected));
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    backend: &Backend,
    args: NodesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        NodesCommand::List(list) => {
            let summaries: Vec<NodeSummary> = backend
                .nodes()
                .await?
                .iter()
                .map(hwdash_core::Node::summary)
                .collect();

            let mut filter = NodeListFilter::new(records_from(summaries), backend.debounce());
            apply_filters(&mut filter, list);
            let rows = util::settle(filter).await;

            let out = render_rows(&global.output, &rows)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
