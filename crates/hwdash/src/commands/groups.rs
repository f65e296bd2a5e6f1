//! Resource group command handlers.

use chrono::{DateTime, Utc};
use tabled::Tabled;

use hwdash_core::filter::{DateRange, records_from};
use hwdash_core::{Backend, EntityId, ResourceGroup, ResourceGroupListFilter};

use crate::cli::{GlobalOpts, GroupListArgs, GroupsArgs, GroupsCommand, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Created")]
    created_at: String,
    #[tabled(rename = "Updated")]
    updated_at: String,
}

fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

impl From<&ResourceGroup> for GroupRow {
    fn from(g: &ResourceGroup) -> Self {
        Self {
            id: g.id.to_string(),
            name: g.name.clone(),
            description: util::or_dash(&g.description),
            created_at: timestamp(g.created_at),
            updated_at: timestamp(g.updated_at),
        }
    }
}

fn detail(g: &ResourceGroup) -> String {
    [
        format!("ID:          {}", g.id),
        format!("Name:        {}", g.name),
        format!("Description: {}", util::or_dash(&g.description)),
        format!("Created:     {}", timestamp(g.created_at)),
        format!("Updated:     {}", timestamp(g.updated_at)),
    ]
    .join("\n")
}

fn render_rows(format: &OutputFormat, rows: &[ResourceGroup]) -> Result<String, CliError> {
    output::render_list(format, rows, |g| GroupRow::from(g), |g| g.id.to_string())
}

fn apply_filters(filter: &mut ResourceGroupListFilter, args: GroupListArgs) {
    if let Some(id) = args.id {
        filter.set_id(id);
    }
    if let Some(name) = args.name {
        filter.set_name(name);
    }
    if let Some(description) = args.description {
        filter.set_description(description);
    }
    let created = DateRange::new(args.created_from, args.created_to);
    if !created.is_unbounded() {
        filter.set_created_at(created);
    }
    let updated = DateRange::new(args.updated_from, args.updated_to);
    if !updated.is_unbounded() {
        filter.set_updated_at(updated);
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    backend: &Backend,
    args: GroupsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        GroupsCommand::List(list) => {
            let groups = backend.resource_groups().await?;
            let mut filter = ResourceGroupListFilter::new(records_from(groups), backend.debounce());
            apply_filters(&mut filter, list);
            let rows = util::settle(filter).await;

            let out = render_rows(&global.output, &rows)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GroupsCommand::Get { id } => {
            let group = backend.resource_group(&EntityId::from(id)).await?;
            let out = output::render_single(&global.output, &group, detail, |g| g.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GroupsCommand::Create { name, description } => {
            let group = backend.create_resource_group(&name, &description).await?;
            let out = output::render_single(&global.output, &group, detail, |g| g.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GroupsCommand::Update {
            id,
            name,
            description,
        } => {
            let group = backend
                .update_resource_group(&EntityId::from(id), &name, &description)
                .await?;
            let out = output::render_single(&global.output, &group, detail, |g| g.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GroupsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete resource group {id}?"), global.yes)? {
                return Ok(());
            }
            backend.delete_resource_group(&EntityId::from(id)).await?;
            if !global.quiet {
                eprintln!("Resource group deleted");
            }
            Ok(())
        }
    }
}
