//! Shared helpers for command handlers.

use bytesize::ByteSize;

use hwdash_core::filter::{FilterSchema, ListFilter};

use crate::error::CliError;

/// Let every debounced setter land, then take the filtered snapshot.
pub async fn settle<S: FilterSchema>(mut filter: ListFilter<S>) -> Vec<S::Record>
where
    S::Record: Clone,
{
    filter.wait_settled().await;
    let rows = filter.filtered().iter().map(|r| (**r).clone()).collect();
    filter.dispose();
    rows
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// `"-"` for an empty cell.
pub fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".into()
    } else {
        value.to_owned()
    }
}

pub fn join_or_dash<T: ToString>(items: &[T]) -> String {
    if items.is_empty() {
        "-".into()
    } else {
        items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    }
}

pub fn mib(value: u64) -> String {
    ByteSize::mib(value).to_string()
}

pub fn bytes(value: u64) -> String {
    ByteSize::b(value).to_string()
}
