//! The registry facade (component D): a name/label-interning frontend over registered metrics,
//! supporting hierarchical namespaces/subsystems and constant labels.
//!
//! A [`Registry`] owns nothing about how metrics are observed — callers keep their own `Counter`,
//! `Family<Gauge>`, etc. handles and clone them into the registry at registration time. The
//! registry's only job is bookkeeping: assigning each registered metric a fully-qualified name and
//! a set of constant labels, detecting name collisions, and producing an ordered, duplicate-free
//! [`MetricSnapshots`] from a collect pass.

use std::borrow::Cow;

use crate::{
    error::{Error, Result},
    raw::{
        labels::{reject_reserved_names, Labels},
        metadata::{Metadata, Unit},
        MetricType,
    },
    snapshot::{Metric, MetricSnapshot, MetricSnapshots},
    validate::{validate_metric_name, validate_namespace_component, RESERVED_LABEL_NAMES},
};

fn full_name(namespace: Option<&str>, name: &str) -> String {
    match namespace {
        Some(namespace) => format!("{namespace}_{name}"),
        None => name.to_string(),
    }
}

/// Metric kinds that carry no inherent unit of measurement; registering one with a unit is
/// almost certainly a mistake, so it is rejected.
fn rejects_unit(ty: MetricType) -> bool {
    matches!(ty, MetricType::Info | MetricType::StateSet)
}

/// A collection of registered metrics, optionally namespaced, carrying constant labels attached
/// to every metric it holds (directly or via a nested subsystem).
///
/// # Example
///
/// ```rust
/// use expomet::{metrics::counter::Counter, registry::Registry};
///
/// let mut registry = Registry::builder().with_namespace("myapp").build().unwrap();
/// let connections = Counter::new();
/// registry.register("connections_total", "Total accepted connections", connections.clone()).unwrap();
///
/// let database = registry.subsystem("database");
/// let queries = Counter::new();
/// database.register("queries_total", "Total queries executed", queries.clone()).unwrap();
///
/// let snapshot = registry.collect().unwrap();
/// assert_eq!(snapshot.len(), 2);
/// ```
#[derive(Default)]
pub struct Registry {
    namespace: Option<Cow<'static, str>>,
    const_labels: Labels,
    metrics: Vec<(Metadata, Box<dyn Metric>)>,
    subsystems: Vec<(Cow<'static, str>, Registry)>,
}

impl Registry {
    /// Starts building a [`Registry`] with an optional namespace and constant labels.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registers a metric under `name`, with no unit.
    ///
    /// `name` is combined with this registry's namespace (and any ancestor namespaces, for a
    /// subsystem) to produce the metric's fully-qualified name.
    pub fn register(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        help: impl Into<Cow<'static, str>>,
        metric: impl Metric + 'static,
    ) -> Result<()> {
        self.register_with_unit(name, help, None, metric)
    }

    /// Registers a metric under `name`, with an explicit [`Unit`] appended to its exposed name.
    ///
    /// Returns [`Error::invalid_name`] if `name` is malformed, if the fully-qualified name
    /// collides with one already registered in this registry, or if `unit` is given for a metric
    /// kind that carries no inherent unit ([`Info`](MetricType::Info),
    /// [`StateSet`](MetricType::StateSet)).
    pub fn register_with_unit(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        help: impl Into<Cow<'static, str>>,
        unit: Option<Unit>,
        metric: impl Metric + 'static,
    ) -> Result<()> {
        let name = name.into();
        validate_metric_name(&name)?;

        let ty = metric.metric_type();
        if unit.is_some() && rejects_unit(ty) {
            return Err(Error::invalid_name(format!("metric type {ty} does not carry a unit")));
        }

        let qualified = full_name(self.namespace.as_deref(), &name);
        if self.metrics.iter().any(|(m, _)| m.name() == qualified) {
            return Err(Error::invalid_name(format!(
                "metric name {qualified:?} is already registered"
            )));
        }

        let metadata = Metadata::new(qualified, help, ty, unit, self.const_labels.clone());
        self.metrics.push((metadata, Box::new(metric)));
        Ok(())
    }

    /// Returns the subsystem registered under `name`, creating it with no additional constant
    /// labels if it doesn't exist yet.
    ///
    /// The subsystem's fully-qualified namespace is `{parent_namespace}_{name}`; metrics
    /// registered on it inherit the parent's constant labels.
    pub fn subsystem(&mut self, name: impl Into<Cow<'static, str>>) -> &mut Registry {
        self.subsystem_builder(name).build_in_place()
    }

    /// Starts building a subsystem registered under `name`, allowing additional constant labels
    /// to be merged in before it is created.
    pub fn subsystem_builder(
        &mut self,
        name: impl Into<Cow<'static, str>>,
    ) -> RegistrySubsystemBuilder<'_> {
        RegistrySubsystemBuilder { parent: self, name: name.into(), const_labels: Vec::new() }
    }

    /// Collects every metric registered directly on this registry and on every nested subsystem
    /// into one ordered, duplicate-free snapshot set.
    ///
    /// Returns [`Error::invalid_name`] if two metrics anywhere in the tree share a fully-qualified
    /// name — this can only happen if a subsystem's namespace collides with another registered
    /// name, since registration within a single registry already rejects local duplicates.
    pub fn collect(&self) -> Result<MetricSnapshots> {
        let mut snapshots = Vec::new();
        self.collect_into(&mut snapshots);
        MetricSnapshots::of(snapshots)
    }

    fn collect_into(&self, out: &mut Vec<MetricSnapshot>) {
        for (metadata, metric) in &self.metrics {
            out.push(MetricSnapshot::new(metadata.clone(), metric.collect()));
        }
        for (_, subsystem) in &self.subsystems {
            subsystem.collect_into(out);
        }
    }
}

/// Builds a top-level [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    namespace: Option<Cow<'static, str>>,
    const_labels: Vec<(Cow<'static, str>, String)>,
}

impl RegistryBuilder {
    /// Sets the registry's namespace; every metric's fully-qualified name becomes
    /// `{namespace}_{name}`.
    ///
    /// The namespace must be `snake_case`.
    pub fn with_namespace(mut self, namespace: impl Into<Cow<'static, str>>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Attaches constant labels applied to every metric registered on this registry (and its
    /// subsystems).
    pub fn with_const_labels<N, V>(mut self, labels: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<Cow<'static, str>>,
        V: Into<String>,
    {
        self.const_labels.extend(labels.into_iter().map(|(n, v)| (n.into(), v.into())));
        self
    }

    /// Finalizes the builder into a [`Registry`].
    ///
    /// Returns [`Error::invalid_name`] if the namespace is not `snake_case`, and
    /// [`Error::invalid_label`] if the constant labels are malformed or use a reserved name.
    pub fn build(self) -> Result<Registry> {
        if let Some(namespace) = &self.namespace {
            validate_namespace_component(namespace)?;
        }
        let const_labels = Labels::from_pairs(self.const_labels)?;
        reject_reserved_names(&const_labels, RESERVED_LABEL_NAMES)?;
        Ok(Registry {
            namespace: self.namespace,
            const_labels,
            metrics: Vec::new(),
            subsystems: Vec::new(),
        })
    }
}

/// Builds a subsystem [`Registry`] nested under a parent.
pub struct RegistrySubsystemBuilder<'a> {
    parent: &'a mut Registry,
    name: Cow<'static, str>,
    const_labels: Vec<(Cow<'static, str>, String)>,
}

impl<'a> RegistrySubsystemBuilder<'a> {
    /// Attaches constant labels specific to this subsystem, merged with the parent's.
    pub fn with_const_labels<N, V>(mut self, labels: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<Cow<'static, str>>,
        V: Into<String>,
    {
        self.const_labels.extend(labels.into_iter().map(|(n, v)| (n.into(), v.into())));
        self
    }

    /// Finalizes the builder, returning the subsystem registry.
    ///
    /// If a subsystem with this name already exists on the parent, it is returned unchanged — any
    /// constant labels passed to this call are ignored in that case, matching the idempotent
    /// behavior of [`Registry::subsystem`].
    pub fn build_in_place(self) -> &'a mut Registry {
        let RegistrySubsystemBuilder { parent, name, const_labels } = self;
        if !parent.subsystems.iter().any(|(n, _)| *n == name) {
            let namespace = full_name(parent.namespace.as_deref(), &name);
            let merged = Labels::from_pairs(const_labels)
                .and_then(|own| parent.const_labels.merge(&own))
                .unwrap_or_else(|_| parent.const_labels.clone());
            let subsystem = Registry {
                namespace: Some(Cow::Owned(namespace)),
                const_labels: merged,
                metrics: Vec::new(),
                subsystems: Vec::new(),
            };
            parent.subsystems.push((name.clone(), subsystem));
        }
        &mut parent.subsystems.iter_mut().find(|(n, _)| *n == name).unwrap().1
    }
}
