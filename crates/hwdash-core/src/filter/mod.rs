// ── List filter engines ──
//
// One generic engine (`ListFilter<S>`) owns the query state of a table.
// Each entity plugs in a `FilterSchema` that declares its typed query,
// its field kinds, the matching rule and the static select options.

mod cxl_switch;
mod node;
pub mod predicate;
mod resource;
mod resource_group;

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub use cxl_switch::{CxlSwitchField, CxlSwitchFilter, CxlSwitchListFilter, CxlSwitchQuery};
pub use node::{NodeField, NodeFilter, NodeListFilter, NodeQuery};
pub use predicate::{DateRange, NumericBucket};
pub use resource::{ResourceField, ResourceFilter, ResourceListFilter, ResourceQuery};
pub use resource_group::{
    ResourceGroupField, ResourceGroupFilter, ResourceGroupListFilter, ResourceGroupQuery,
};

/// Shared, immutable record snapshot (same shape the fetch layer hands out).
pub type Records<R> = Arc<Vec<Arc<R>>>;

/// Wrap owned records into a snapshot.
pub fn records_from<R>(items: Vec<R>) -> Records<R> {
    Arc::new(items.into_iter().map(Arc::new).collect())
}

// ── Field metadata ──────────────────────────────────────────────────

/// How a query field is matched, which also decides its debounce window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, token substring match.
    Text,
    /// Multi-select over enum values.
    Categorical,
    /// Multi-select over `NumericBucket`.
    Numeric,
    /// Calendar-day range from a date picker.
    DateRange,
}

/// Debounce window per field kind. A zero window applies synchronously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceTiming {
    pub text: Duration,
    pub numeric: Duration,
    pub categorical: Duration,
    pub date_range: Duration,
}

impl Default for DebounceTiming {
    fn default() -> Self {
        Self {
            text: Duration::from_millis(300),
            numeric: Duration::from_millis(300),
            categorical: Duration::ZERO,
            date_range: Duration::ZERO,
        }
    }
}

impl DebounceTiming {
    /// Every field applies synchronously (batch / CLI use).
    pub const fn immediate() -> Self {
        Self {
            text: Duration::ZERO,
            numeric: Duration::ZERO,
            categorical: Duration::ZERO,
            date_range: Duration::ZERO,
        }
    }

    pub fn window(&self, kind: FieldKind) -> Duration {
        match kind {
            FieldKind::Text => self.text,
            FieldKind::Numeric => self.numeric,
            FieldKind::Categorical => self.categorical,
            FieldKind::DateRange => self.date_range,
        }
    }
}

/// One choice a filter UI offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Static option lists keyed by field, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOptions<F> {
    fields: Vec<(F, Vec<SelectOption>)>,
}

impl<F: Copy + Eq> SelectOptions<F> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn with(mut self, field: F, options: Vec<SelectOption>) -> Self {
        self.fields.push((field, options));
        self
    }

    /// Options for `field`; empty for fields without a picker.
    pub fn get(&self, field: F) -> &[SelectOption] {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map_or(&[], |(_, options)| options.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &[SelectOption])> {
        self.fields.iter().map(|(f, o)| (*f, o.as_slice()))
    }
}

impl<F: Copy + Eq> Default for SelectOptions<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// The two choices of every numeric-as-categorical field.
pub fn numeric_options() -> Vec<SelectOption> {
    vec![
        SelectOption::new(NumericBucket::NotExist.as_ref(), "equal 0"),
        SelectOption::new(NumericBucket::Exist.as_ref(), "1 or more"),
    ]
}

/// One option per enum variant: wire value plus a display label.
pub fn enum_options<E>(label: impl Fn(&E) -> String) -> Vec<SelectOption>
where
    E: IntoEnumIterator + AsRef<str>,
{
    E::iter()
        .map(|variant| SelectOption::new(variant.as_ref(), label(&variant)))
        .collect()
}

// ── Schema ──────────────────────────────────────────────────────────

/// Per-entity declaration consumed by `ListFilter`.
pub trait FilterSchema: 'static {
    type Record: Send + Sync + 'static;
    type Query: Clone + Default + PartialEq + Debug + Send + Sync + 'static;
    type Field: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    /// Table name used in log lines.
    const NAME: &'static str;

    fn kind(field: Self::Field) -> FieldKind;

    /// AND over all fields of `query`.
    fn matches(query: &Self::Query, record: &Self::Record) -> bool;

    fn select_options() -> SelectOptions<Self::Field>;
}

// ── Engine ──────────────────────────────────────────────────────────

#[derive(Debug)]
struct Settled<Q> {
    query: Q,
    generation: u64,
}

struct Memo<R> {
    source: Records<R>,
    generation: u64,
    output: Records<R>,
}

/// Query state and memoised filtered view for one table.
///
/// Setters update [`query`](Self::query) at once and the settled query
/// (the one [`filtered`](Self::filtered) uses) after the field's debounce
/// window. Setting the same field again cancels the pending timer, so the
/// latest value always wins. Debounced setters need a tokio runtime; without
/// one they apply synchronously.
pub struct ListFilter<S: FilterSchema> {
    records: Records<S::Record>,
    query: S::Query,
    settled: Arc<watch::Sender<Settled<S::Query>>>,
    settled_rx: watch::Receiver<Settled<S::Query>>,
    pending: HashMap<S::Field, CancellationToken>,
    cancel: CancellationToken,
    timing: DebounceTiming,
    options: SelectOptions<S::Field>,
    memo: Option<Memo<S::Record>>,
    recomputations: u64,
}

impl<S: FilterSchema> ListFilter<S> {
    pub fn new(records: Records<S::Record>, timing: DebounceTiming) -> Self {
        let (settled, settled_rx) = watch::channel(Settled {
            query: S::Query::default(),
            generation: 0,
        });

        Self {
            records,
            query: S::Query::default(),
            settled: Arc::new(settled),
            settled_rx,
            pending: HashMap::new(),
            cancel: CancellationToken::new(),
            timing,
            options: S::select_options(),
            memo: None,
            recomputations: 0,
        }
    }

    /// The query as last set (what input widgets display).
    pub fn query(&self) -> &S::Query {
        &self.query
    }

    /// The query the filtered view is computed from.
    pub fn settled_query(&self) -> S::Query {
        self.settled_rx.borrow().query.clone()
    }

    pub fn select_options(&self) -> &SelectOptions<S::Field> {
        &self.options
    }

    pub fn records(&self) -> &Records<S::Record> {
        &self.records
    }

    pub fn set_records(&mut self, records: Records<S::Record>) {
        self.records = records;
    }

    /// How many times the filtered view has been rebuilt.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// `true` once [`dispose`](Self::dispose) ran.
    pub fn is_disposed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Records passing every settled predicate.
    ///
    /// Returns the cached `Arc` while neither the records snapshot nor the
    /// settled query changed, and the input snapshot itself while the
    /// settled query matches everything.
    pub fn filtered(&mut self) -> Records<S::Record> {
        let generation = self.settled_rx.borrow().generation;
        if let Some(memo) = &self.memo {
            if memo.generation == generation && Arc::ptr_eq(&memo.source, &self.records) {
                return Arc::clone(&memo.output);
            }
        }

        let query = self.settled_query();
        let output = if query == S::Query::default() {
            Arc::clone(&self.records)
        } else {
            Arc::new(
                self.records
                    .iter()
                    .filter(|record| S::matches(&query, record))
                    .cloned()
                    .collect(),
            )
        };

        self.recomputations += 1;
        debug!(
            filter = S::NAME,
            generation,
            total = self.records.len(),
            matched = output.len(),
            "recomputed filtered records"
        );

        self.memo = Some(Memo {
            source: Arc::clone(&self.records),
            generation,
            output: Arc::clone(&output),
        });
        output
    }

    /// Resolve once every pending debounced value has landed, or the
    /// filter was disposed.
    pub async fn wait_settled(&self) {
        let target = self.query.clone();
        let mut rx = self.settled.subscribe();
        tokio::select! {
            _ = rx.wait_for(|s| s.query == target) => {}
            () = self.cancel.cancelled() => {}
        }
    }

    /// Cancel every pending timer. Later setters only touch the visible query.
    pub fn dispose(&mut self) {
        self.cancel.cancel();
        self.pending.clear();
    }

    /// Apply `apply` to the visible query now and to the settled query after
    /// the debounce window of `field`.
    pub(crate) fn update<F>(&mut self, field: S::Field, apply: F)
    where
        F: Fn(&mut S::Query) + Send + Sync + 'static,
    {
        apply(&mut self.query);

        if let Some(previous) = self.pending.remove(&field) {
            previous.cancel();
        }
        if self.cancel.is_cancelled() {
            debug!(filter = S::NAME, ?field, "filter disposed, update not applied");
            return;
        }

        let window = self.timing.window(S::kind(field));
        if window.is_zero() {
            apply_settled(&self.settled, &apply);
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(
                filter = S::NAME,
                ?field,
                "no async runtime, applying filter change without debounce"
            );
            apply_settled(&self.settled, &apply);
            return;
        };

        let token = self.cancel.child_token();
        self.pending.insert(field, token.clone());
        let settled = Arc::clone(&self.settled);

        runtime.spawn(async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(window) => {
                    if !token.is_cancelled() {
                        apply_settled(&settled, &apply);
                    }
                }
            }
        });
    }
}

impl<S: FilterSchema> Drop for ListFilter<S> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Write into the settled query, bumping the generation only on change.
fn apply_settled<Q, F>(settled: &watch::Sender<Settled<Q>>, apply: &F)
where
    Q: Clone + PartialEq,
    F: Fn(&mut Q),
{
    settled.send_if_modified(|state| {
        let before = state.query.clone();
        apply(&mut state.query);
        if state.query == before {
            return false;
        }
        state.generation += 1;
        true
    });
}
