use std::borrow::Borrow;
use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::Duration;

use log::{debug, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::cache::PlanCache;
use crate::convert::ConversionResolver;
use crate::descriptor::Mappable;
use crate::error::{MapError, Result};
use crate::introspect::Introspector;
use crate::plan::MappingPlan;

/// Batches at least this long are mapped in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 200;
/// Upper bound on batch workers, whatever the number of available cores.
pub const DEFAULT_MAX_PARALLELISM: usize = 8;

/// Tuning of a [`Mapper`]. None of these settings changes what a mapping produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperConfig {
  pub parallel_threshold: usize,
  pub max_parallelism: usize,
  /// Idle time after which a cached plan is rebuilt. `None` keeps plans until cleared.
  pub plan_ttl: Option<Duration>,
}

impl Default for MapperConfig {
  fn default() -> Self {
    Self {
      parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
      max_parallelism: DEFAULT_MAX_PARALLELISM,
      plan_ttl: None,
    }
  }
}

impl MapperConfig {
  pub fn parallel_threshold(mut self, threshold: usize) -> Self {
    self.parallel_threshold = threshold;
    self
  }

  pub fn max_parallelism(mut self, workers: usize) -> Self {
    self.max_parallelism = workers;
    self
  }

  pub fn plan_ttl(mut self, ttl: Duration) -> Self {
    self.plan_ttl = Some(ttl);
    self
  }
}

/// Compiles, caches and runs mapping plans.
///
/// ```
/// use valuemapper::{Mappable, Mapper};
///
/// #[derive(Default, Mappable)]
/// pub struct Order { pub id: i32, pub total: f64 }
///
/// #[derive(Debug, Default, PartialEq, Mappable)]
/// pub struct OrderRow { pub id: i64, pub total: String }
///
/// let mapper = Mapper::default();
/// let row = mapper.map::<Order, OrderRow>(&Order { id: 7, total: 9.5 }).unwrap();
/// assert_eq!(row, OrderRow { id: 7, total: "9.5".to_owned() });
/// ```
pub struct Mapper {
  config: MapperConfig,
  introspector: Introspector,
  resolver: ConversionResolver,
  plans: PlanCache,
  pool: OnceLock<Option<ThreadPool>>,
}

impl Default for Mapper {
  fn default() -> Self {
    Self::new(MapperConfig::default())
  }
}

impl Mapper {
  pub fn new(config: MapperConfig) -> Self {
    Self {
      plans: PlanCache::new(config.plan_ttl),
      config,
      introspector: Introspector::new(),
      resolver: ConversionResolver::new(),
      pool: OnceLock::new(),
    }
  }

  pub fn config(&self) -> &MapperConfig {
    &self.config
  }

  pub fn introspector(&self) -> &Introspector {
    &self.introspector
  }

  /// The cached plan for the pair, compiled on first use.
  pub fn plan<S: Mappable, D: Mappable>(&self) -> Arc<MappingPlan<S, D>> {
    self
      .plans
      .get_or_build(|| MappingPlan::compile(&self.introspector, &self.resolver))
  }

  pub fn map<'a, S, D>(&self, source: impl Into<Option<&'a S>>) -> Result<D>
  where
    S: Mappable,
    D: Mappable + Default,
  {
    self.map_ignoring(source, &[])
  }

  /// Maps one instance without assigning the destination properties named in `ignored`.
  pub fn map_ignoring<'a, S, D>(
    &self,
    source: impl Into<Option<&'a S>>,
    ignored: &[&str],
  ) -> Result<D>
  where
    S: Mappable,
    D: Mappable + Default,
  {
    let source = source
      .into()
      .ok_or(MapError::NullArgument { argument: "source" })?;
    self.plan::<S, D>().execute(source, ignored)
  }

  /// Maps a batch given as `&[S]` or `Option<&[S]>`.
  pub fn map_list<'a, S, D>(&self, sources: impl Into<Option<&'a [S]>>) -> Result<Vec<D>>
  where
    S: Mappable,
    D: Mappable + Default,
  {
    self.map_list_ignoring(sources, &[])
  }

  /// Maps a batch, keeping the input order.
  pub fn map_list_ignoring<'a, S, D>(
    &self,
    sources: impl Into<Option<&'a [S]>>,
    ignored: &[&str],
  ) -> Result<Vec<D>>
  where
    S: Mappable,
    D: Mappable + Default,
  {
    let sources = sources
      .into()
      .ok_or(MapError::NullArgument { argument: "sources" })?;
    self.run_batch::<S, D, S>(sources, ignored)
  }

  /// Collects the iterator first, then maps it like [`Mapper::map_list`].
  pub fn map_iter<'a, S, D, I>(&self, sources: I, ignored: &[&str]) -> Result<Vec<D>>
  where
    S: Mappable,
    D: Mappable + Default,
    I: IntoIterator<Item = &'a S>,
  {
    let buffer: Vec<&S> = sources.into_iter().collect();
    self.run_batch::<S, D, &S>(&buffer, ignored)
  }

  fn run_batch<S, D, T>(&self, items: &[T], ignored: &[&str]) -> Result<Vec<D>>
  where
    S: Mappable,
    D: Mappable + Default,
    T: Borrow<S> + Sync,
  {
    if items.is_empty() {
      return Ok(Vec::new());
    }

    let plan = self.plan::<S, D>();
    if items.len() < self.config.parallel_threshold {
      let mut out = Vec::with_capacity(items.len());
      for item in items {
        out.push(plan.execute(item.borrow(), ignored)?);
      }
      return Ok(out);
    }

    let mut slots = Vec::with_capacity(items.len());
    let fill = |slots: &mut Vec<Result<D>>| {
      items
        .par_iter()
        .map(|item| plan.execute(item.borrow(), ignored))
        .collect_into_vec(slots)
    };
    match self.pool() {
      Some(pool) => pool.install(|| fill(&mut slots)),
      None => fill(&mut slots),
    }
    slots.into_iter().collect()
  }

  fn pool(&self) -> Option<&ThreadPool> {
    self
      .pool
      .get_or_init(|| {
        let cores = thread::available_parallelism().map_or(1, |n| n.get());
        let workers = cores.min(self.config.max_parallelism).max(1);
        let built = ThreadPoolBuilder::new()
          .num_threads(workers)
          .thread_name(|i| format!("valuemapper-{}", i))
          .build();
        match built {
          Ok(pool) => {
            debug!("batch pool started with {} workers", workers);
            Some(pool)
          }
          Err(err) => {
            warn!("cannot build the batch pool, using the global rayon pool: {}", err);
            None
          }
        }
      })
      .as_ref()
  }

  /// Compiles the plan for the pair without mapping anything.
  pub fn pre_warm<S: Mappable, D: Mappable>(&self) {
    self.plan::<S, D>();
  }

  /// Forces the pair's plan to be rebuilt on next use.
  pub fn clear<S: Mappable, D: Mappable>(&self) {
    if self.plans.invalidate::<S, D>() {
      debug!(
        "cleared plan `{}` -> `{}`",
        std::any::type_name::<S>(),
        std::any::type_name::<D>()
      );
    }
  }

  /// Drops every plan, converter and type description.
  pub fn clear_caches(&self) {
    self.plans.clear();
    self.resolver.clear();
    self.introspector.clear();
    debug!("cleared all mapping caches");
  }

  /// Number of plans served without a rebuild.
  pub fn cached_plans(&self) -> usize {
    self.plans.live_len()
  }
}
