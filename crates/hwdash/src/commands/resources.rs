//! Resource command handlers.

use tabled::Tabled;
use tracing::warn;

use hwdash_core::derived::ResourceGroupLookup;
use hwdash_core::filter::records_from;
use hwdash_core::{Backend, EntityId, Resource, ResourceListFilter, ResourceSummary};

use crate::cli::{GlobalOpts, ResourceListArgs, ResourcesArgs, ResourcesCommand, convert_all};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    device_type: String,
    #[tabled(rename = "Health")]
    health: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "CXL Switch")]
    cxl_switch: String,
    #[tabled(rename = "Nodes")]
    nodes: String,
    #[tabled(rename = "Groups")]
    groups: String,
    #[tabled(rename = "Allocation")]
    allocation: String,
    #[tabled(rename = "Available")]
    availability: String,
    #[tabled(rename = "Detected")]
    detection: String,
}

impl ResourceRow {
    fn new(r: &ResourceSummary, color: bool) -> Self {
        Self {
            id: r.id.to_string(),
            device_type: r.device_type.to_string(),
            health: output::health_cell(r.health, color),
            state: r.state.to_string(),
            cxl_switch: util::or_dash(&r.cxl_switch_id),
            nodes: util::join_or_dash(&r.node_ids),
            groups: util::join_or_dash(&r.resource_group_names),
            allocation: r.allocation.to_string(),
            availability: r.availability.to_string(),
            detection: r.detection.to_string(),
        }
    }
}

fn detail(r: &Resource, group_names: &[String]) -> String {
    let d = &r.device;
    let mut lines = vec![
        format!("ID:          {}", d.device_id),
        format!("Type:        {}", d.device_type),
        format!("Health:      {}", d.health),
        format!("State:       {}", d.state),
        format!("Power:       {}", d.power_state.as_deref().unwrap_or("-")),
        format!(
            "CXL Switch:  {}",
            d.cxl_switch_id.as_deref().unwrap_or("-")
        ),
        format!("Nodes:       {}", util::join_or_dash(&r.node_ids)),
        format!("Groups:      {}", util::join_or_dash(group_names)),
        format!("Allocation:  {}", r.allocation()),
        format!("Available:   {}", r.availability()),
        format!("Detected:    {}", r.detection()),
    ];
    if let Some(mib) = d.capacity_mib {
        lines.push(format!("Capacity:    {}", util::mib(mib)));
    }
    if let Some(bytes) = d.drive_capacity_bytes {
        lines.push(format!("Drive:       {}", util::bytes(bytes)));
    }
    lines.join("\n")
}

fn apply_filters(filter: &mut ResourceListFilter, args: ResourceListArgs) {
    if let Some(id) = args.id {
        filter.set_id(id);
    }
    if !args.device_type.is_empty() {
        filter.set_device_type(args.device_type);
    }
    if !args.health.is_empty() {
        filter.set_health(convert_all(&args.health));
    }
    if !args.state.is_empty() {
        filter.set_state(convert_all(&args.state));
    }
    if let Some(switch) = args.cxl_switch {
        filter.set_cxl_switch(switch);
    }
    if let Some(node) = args.node {
        filter.set_node(node);
    }
    if let Some(group) = args.group {
        filter.set_group(group);
    }
    if !args.allocation.is_empty() {
        filter.set_allocation(convert_all(&args.allocation));
    }
    if !args.availability.is_empty() {
        filter.set_availability(convert_all(&args.availability));
    }
    if !args.detection.is_empty() {
        filter.set_detection(convert_all(&args.detection));
    }
}

/// Group lookup loaded alongside the resources. A failed group fetch only
/// leaves names unresolved.
async fn load_group_lookup(backend: &Backend) -> ResourceGroupLookup {
    let lookup = ResourceGroupLookup::new(backend.resource_group_fetch());
    lookup.revalidate().await;
    if let Some(err) = lookup.error() {
        warn!(error = %err, "resource groups unavailable, names left blank");
    }
    lookup
}

fn group_names(lookup: &mut ResourceGroupLookup, ids: &[EntityId]) -> Vec<String> {
    ids.iter()
        .map(|id| lookup.name_by_id(id).to_owned())
        .filter(|name| !name.is_empty())
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    backend: &Backend,
    args: ResourcesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ResourcesCommand::List(list) => {
            let (resources, mut lookup) =
                tokio::join!(backend.resources(), load_group_lookup(backend));
            let resources = resources?;

            let index = lookup.index();
            let summaries: Vec<ResourceSummary> = resources
                .iter()
                .map(|r| r.summarize(|id| index.name(id).to_owned()))
                .collect();

            let mut filter = ResourceListFilter::new(records_from(summaries), backend.debounce());
            apply_filters(&mut filter, list);
            let rows = util::settle(filter).await;

            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &rows,
                |r| ResourceRow::new(r, color),
                |r| r.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResourcesCommand::Get { id } => {
            let id = EntityId::from(id);
            let (resource, mut lookup) =
                tokio::join!(backend.resource(&id), load_group_lookup(backend));
            let resource = resource?;
            let names = group_names(&mut lookup, &resource.resource_group_ids);

            let out = output::render_single(
                &global.output,
                &resource,
                |r| detail(r, &names),
                |r| r.id().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResourcesCommand::SetGroups { id, groups } => {
            let id = EntityId::from(id);
            let group_ids: Vec<EntityId> = groups.into_iter().map(EntityId::from).collect();
            let prompt = if group_ids.is_empty() {
                format!("Remove {id} from every resource group?")
            } else {
                format!(
                    "Set groups of {id} to {}?",
                    util::join_or_dash(&group_ids)
                )
            };
            if !util::confirm(&prompt, global.yes)? {
                return Ok(());
            }

            let updated = backend.set_resource_groups(&id, &group_ids).await?;
            if !global.quiet {
                eprintln!(
                    "Resource {} now in {} group(s)",
                    updated.id(),
                    updated.resource_group_ids.len()
                );
            }
            Ok(())
        }
    }
}
