//! Metrics command handlers: usage histogram, storage capacity, device graph.

use std::time::Duration;

use bytesize::ByteSize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::warn;

use hwdash_core::metrics::{
    GraphViewData, HistogramViewData, StorageGraphViewData, parse_graph_data,
    parse_histogram_data, parse_storage_graph_data,
};
use hwdash_core::{Backend, DeviceType, EntityId};

use crate::cli::{GlobalOpts, MetricsArgs, MetricsCommand};
use crate::error::CliError;
use crate::output;

// ── Renderers ───────────────────────────────────────────────────────

fn histogram_table(view: &HistogramViewData, types: &[DeviceType]) -> String {
    let mut builder = Builder::default();
    let mut header = vec!["Usage".to_owned()];
    header.extend(types.iter().map(|t| t.capitalized()));
    builder.push_record(header);

    for bucket in &view.buckets {
        let mut row = vec![bucket.label.to_owned()];
        row.extend(bucket.counts.values().map(ToString::to_string));
        builder.push_record(row);
    }
    builder.build().with(Style::rounded()).to_string()
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn used_bytes(value: f64) -> String {
    ByteSize::b(value.max(0.0).round() as u64).to_string()
}

fn storage_detail(view: &StorageGraphViewData) -> String {
    let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".into());
    [
        format!("Used:      {}", or_dash(view.used.map(used_bytes))),
        format!(
            "Allocated: {}",
            or_dash(view.allocated.map(|b| ByteSize::b(b).to_string()))
        ),
        format!(
            "Total:     {}",
            or_dash(view.overall.map(|b| ByteSize::b(b).to_string()))
        ),
    ]
    .join("\n")
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v:.2}"))
}

fn graph_table(view: &GraphViewData, device_type: DeviceType) -> String {
    let throughput = device_type == DeviceType::NetworkInterface;
    let mut builder = Builder::default();
    if throughput {
        builder.push_record([
            "Time".to_owned(),
            format!("Transmit ({})", view.unit),
            format!("Receive ({})", view.unit),
            "Energy".to_owned(),
        ]);
    } else {
        builder.push_record([
            "Time".to_owned(),
            format!("Usage ({})", view.unit),
            "Energy".to_owned(),
        ]);
    }

    for point in &view.points {
        let time = point
            .time()
            .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string());
        if throughput {
            builder.push_record([
                time,
                cell(point.transmit),
                cell(point.receive),
                cell(point.energy),
            ]);
        } else {
            builder.push_record([time, cell(point.usage), cell(point.energy)]);
        }
    }
    builder.build().with(Style::rounded()).to_string()
}

fn no_data(global: &GlobalOpts, what: &str) {
    if !global.quiet {
        eprintln!("No {what} data available");
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    backend: &Backend,
    args: MetricsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        MetricsCommand::Histogram { device_type } => {
            histogram(backend, &device_type, global).await
        }
        MetricsCommand::Storage => storage(backend, global).await,
        MetricsCommand::Graph { id, window } => {
            graph(backend, EntityId::from(id), window, global).await
        }
    }
}

async fn histogram(
    backend: &Backend,
    types: &[DeviceType],
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (resources, response) = tokio::join!(backend.resources(), backend.query_histogram(types));
    let resources = resources?;
    let response = response?;

    match parse_histogram_data(Some(&response), types, &resources) {
        Some(view) => {
            let out = output::render_single(
                &global.output,
                &view,
                |v| histogram_table(v, types),
                |v| {
                    v.buckets
                        .iter()
                        .map(|b| format!("{}\t{}", b.label, b.counts.values().sum::<u64>()))
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            )?;
            output::print_output(&out, global.quiet);
        }
        None => no_data(global, "usage"),
    }
    Ok(())
}

/// Each figure degrades on its own: a failed source only blanks the fields
/// derived from it.
async fn storage(backend: &Backend, global: &GlobalOpts) -> Result<(), CliError> {
    let (resources, usage) = tokio::join!(backend.resources(), backend.query_storage_usage());

    let (resources, usage) = match (resources, usage) {
        (Err(err), Err(metrics_err)) => {
            warn!(error = %metrics_err, "storage usage query failed");
            return Err(err.into());
        }
        (resources, usage) => {
            let resources = resources
                .inspect_err(|e| warn!(error = %e, "resource list unavailable"))
                .ok();
            let usage = usage
                .inspect_err(|e| warn!(error = %e, "storage usage query failed"))
                .ok();
            (resources, usage)
        }
    };

    let view = parse_storage_graph_data(resources.as_deref(), usage.as_ref());
    let out = output::render_single(&global.output, &view, storage_detail, |v| {
        v.used.map(used_bytes).unwrap_or_default()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn graph(
    backend: &Backend,
    id: EntityId,
    window: Duration,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let resource = backend.resource(&id).await?;
    let device_type = resource.device_type();
    let response = backend.query_graph(&resource.device, window).await?;

    match parse_graph_data(Some(&response), device_type) {
        Some(view) => {
            let out = output::render_single(
                &global.output,
                &view,
                |v| graph_table(v, device_type),
                |v| {
                    v.points
                        .iter()
                        .map(|p| format!("{}\t{}", p.timestamp, cell(p.usage.or(p.transmit))))
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            )?;
            output::print_output(&out, global.quiet);
        }
        None => no_data(global, "graph"),
    }
    Ok(())
}
