//! CXL switch command handlers.

use tabled::Tabled;

use hwdash_core::filter::records_from;
use hwdash_core::{Backend, CxlSwitch, CxlSwitchListFilter};

use crate::cli::{
    GlobalOpts, OutputFormat, SwitchListArgs, SwitchesArgs, SwitchesCommand, convert_all,
};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct SwitchRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Devices")]
    devices: u64,
    #[tabled(rename = "Allocated")]
    allocated: u64,
    #[tabled(rename = "Unallocated")]
    unallocated: u64,
    #[tabled(rename = "Types")]
    types: String,
}

impl From<&CxlSwitch> for SwitchRow {
    fn from(s: &CxlSwitch) -> Self {
        Self {
            id: s.id.to_string(),
            devices: s.devices,
            allocated: s.allocated_devices,
            unallocated: s.unallocated_devices,
            types: util::join_or_dash(&s.device_types),
        }
    }
}

fn render_rows(format: &OutputFormat, rows: &[CxlSwitch]) -> Result<String, CliError> {
    output::render_list(format, rows, |s| SwitchRow::from(s), |s| s.id.to_string())
}

fn apply_filters(filter: &mut CxlSwitchListFilter, args: SwitchListArgs) {
    if let Some(id) = args.id {
        filter.set_id(id);
    }
    if !args.allocated.is_empty() {
        filter.set_allocated(convert_all(&args.allocated));
    }
    if !args.unallocated.is_empty() {
        filter.set_unallocated(convert_all(&args.unallocated));
    }
    if !args.device_type.is_empty() {
        filter.set_device_type(args.device_type);
    }
}

pub async fn handle(
    backend: &Backend,
    args: SwitchesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SwitchesCommand::List(list) => {
            let switches = backend.cxl_switches().await?;
            let mut filter = CxlSwitchListFilter::new(records_from(switches), backend.debounce());
            apply_filters(&mut filter, list);
            let rows = util::settle(filter).await;

            let out = render_rows(&global.output, &rows)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hwdash_core::{DeviceType, EntityId};

    #[test]
    fn table_rows_show_allocation_split() {
        let switch = CxlSwitch {
            id: EntityId::from("CXL11"),
            devices: 3,
            allocated_devices: 1,
            unallocated_devices: 2,
            device_types: vec![DeviceType::Memory],
        };
        let out = render_rows(&OutputFormat::Table, &[switch]).unwrap();
        assert!(out.contains("CXL11"), "{out}");
        assert!(out.contains("memory"), "{out}");
    }

    #[test]
    fn switch_without_devices_renders_dash() {
        let switch = CxlSwitch {
            id: EntityId::from("CXL12"),
            ..CxlSwitch::default()
        };
        assert_eq!(SwitchRow::from(&switch).types, "-");
    }
}
