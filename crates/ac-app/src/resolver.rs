//! Series resolution capability used by the orchestrator.
//!
//! The orchestrator never reads storage directly; it asks a
//! [`SeriesResolver`] for one series per participant. Resolution failures
//! are surfaced as-is and never retried here.

use std::collections::HashMap;

use ac_core::SimulationId;
use ac_results::{ResultsError, Selectors, SeriesStore};
use ac_stats::NamedSeries;
use async_trait::async_trait;
use parking_lot::Mutex;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolveError {
    #[error("no '{variable}' data for simulation '{simulation_id}'")]
    NotFound {
        simulation_id: SimulationId,
        variable: String,
    },

    #[error("{0}")]
    Backend(String),
}

/// Resolves `(simulation, variable, selectors)` to a series.
///
/// Implementations must be `Send + Sync` so one resolver can serve
/// concurrent comparisons.
#[async_trait]
pub trait SeriesResolver: Send + Sync {
    async fn resolve(
        &self,
        simulation_id: &SimulationId,
        variable: &str,
        selectors: &Selectors,
    ) -> Result<NamedSeries, ResolveError>;
}

type SeriesKey = (SimulationId, String, Selectors);

/// Resolver over series held in memory.
///
/// A series registered with [`InMemoryResolver::insert`] answers any
/// selectors; [`InMemoryResolver::insert_selected`] registers a series for
/// one exact selection, which takes precedence.
#[derive(Default)]
pub struct InMemoryResolver {
    series: HashMap<SeriesKey, NamedSeries>,
}

impl InMemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, series: NamedSeries) -> Self {
        self.insert(series);
        self
    }

    pub fn insert(&mut self, series: NamedSeries) {
        self.insert_selected(series, Selectors::default());
    }

    pub fn insert_selected(&mut self, series: NamedSeries, selectors: Selectors) {
        let key = (
            series.simulation_id.clone(),
            series.variable.clone(),
            selectors,
        );
        self.series.insert(key, series);
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[async_trait]
impl SeriesResolver for InMemoryResolver {
    async fn resolve(
        &self,
        simulation_id: &SimulationId,
        variable: &str,
        selectors: &Selectors,
    ) -> Result<NamedSeries, ResolveError> {
        let exact = (
            simulation_id.clone(),
            variable.to_string(),
            selectors.clone(),
        );
        let any = (
            simulation_id.clone(),
            variable.to_string(),
            Selectors::default(),
        );
        self.series
            .get(&exact)
            .or_else(|| self.series.get(&any))
            .cloned()
            .ok_or_else(|| ResolveError::NotFound {
                simulation_id: simulation_id.clone(),
                variable: variable.to_string(),
            })
    }
}

/// Resolver reading the on-disk [`SeriesStore`].
#[derive(Clone)]
pub struct StoreResolver {
    store: SeriesStore,
}

impl StoreResolver {
    pub fn new(store: SeriesStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SeriesResolver for StoreResolver {
    async fn resolve(
        &self,
        simulation_id: &SimulationId,
        variable: &str,
        selectors: &Selectors,
    ) -> Result<NamedSeries, ResolveError> {
        let store = self.store.clone();
        let sim = simulation_id.clone();
        let var = variable.to_string();
        let sel = selectors.clone();

        let loaded =
            tokio::task::spawn_blocking(move || store.load_series(sim.as_str(), &var, &sel))
                .await
                .map_err(|e| ResolveError::Backend(format!("Task join error: {e}")))?;

        loaded.map_err(|e| match e {
            ResultsError::SeriesNotFound { .. } => ResolveError::NotFound {
                simulation_id: simulation_id.clone(),
                variable: variable.to_string(),
            },
            other => ResolveError::Backend(other.to_string()),
        })
    }
}

/// Memoizing wrapper keyed by simulation, variable, region, level and time.
///
/// Failures are not cached.
pub struct MemoResolver<R> {
    inner: R,
    cache: Mutex<HashMap<SeriesKey, NamedSeries>>,
}

impl<R: SeriesResolver> MemoResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[async_trait]
impl<R: SeriesResolver> SeriesResolver for MemoResolver<R> {
    async fn resolve(
        &self,
        simulation_id: &SimulationId,
        variable: &str,
        selectors: &Selectors,
    ) -> Result<NamedSeries, ResolveError> {
        let key = (
            simulation_id.clone(),
            variable.to_string(),
            selectors.clone(),
        );
        let cached = self.cache.lock().get(&key).cloned();
        if let Some(hit) = cached {
            tracing::debug!(%simulation_id, variable, "series cache hit");
            return Ok(hit);
        }

        let series = self
            .inner
            .resolve(simulation_id, variable, selectors)
            .await?;
        self.cache.lock().insert(key, series.clone());
        Ok(series)
    }
}
