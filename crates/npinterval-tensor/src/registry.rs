//! Element type registry.
//!
//! Hosts that dispatch on a named element type (the Python adapter, for
//! one) look the `interval` dtype up here. A name can be claimed once;
//! registering a different descriptor under a taken name is a conflict, so
//! two incompatible interval implementations cannot both be installed.

use std::any::{type_name, TypeId};
use std::mem::size_of;
use std::sync::OnceLock;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ndarray::{ArrayBase, Dimension, RawData};
use npinterval_core::{Interval, IntervalError, Result};
use tracing::{debug, info, warn};

use crate::ops::{BinaryOp, CompareOp, RelationOp, SetOp, UnaryOp};

/// Name under which [`Interval`] is registered.
pub const INTERVAL_DTYPE: &str = "interval";

/// Identity and loop table of a registered element type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtypeDescriptor {
    pub name: String,
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub itemsize: usize,
    /// Names of the operations with a loop for this type.
    pub loops: Vec<String>,
}

impl DtypeDescriptor {
    pub fn of<T: 'static>(name: impl Into<String>, loops: Vec<String>) -> Self {
        Self {
            name: name.into(),
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            itemsize: size_of::<T>(),
            loops,
        }
    }

    /// The descriptor for [`Interval`], listing every operation in
    /// [`crate::ops`] plus `matmul`.
    pub fn interval() -> Self {
        let loops = BinaryOp::ALL
            .iter()
            .map(|op| op.name())
            .chain(CompareOp::ALL.iter().map(|op| op.name()))
            .chain(SetOp::ALL.iter().map(|op| op.name()))
            .chain(RelationOp::ALL.iter().map(|op| op.name()))
            .chain(UnaryOp::ALL.iter().map(|op| op.name()))
            .chain(["matmul"])
            .map(str::to_string)
            .collect();
        Self::of::<Interval>(INTERVAL_DTYPE, loops)
    }

    pub fn has_loop(&self, name: &str) -> bool {
        self.loops.iter().any(|l| l == name)
    }
}

/// Concurrent name → descriptor table.
#[derive(Debug, Default)]
pub struct DtypeRegistry {
    entries: DashMap<String, DtypeDescriptor>,
}

impl DtypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its name. Any existing entry is a conflict,
    /// even an identical one; use [`init_once_in`] for idempotent setup.
    pub fn register(&self, descriptor: DtypeDescriptor) -> Result<()> {
        match self.entries.entry(descriptor.name.clone()) {
            Entry::Occupied(existing) => {
                warn!(
                    name = %descriptor.name,
                    existing = existing.get().type_name,
                    "dtype name already registered"
                );
                Err(IntervalError::ConflictingRegistration {
                    name: descriptor.name,
                })
            }
            Entry::Vacant(slot) => {
                info!(
                    name = %descriptor.name,
                    type_name = descriptor.type_name,
                    loops = descriptor.loops.len(),
                    "registered dtype"
                );
                slot.insert(descriptor);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<DtypeDescriptor> {
        self.entries.get(name).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered descriptor for element type `T`, if any.
    pub fn lookup_type<T: 'static>(&self) -> Option<DtypeDescriptor> {
        let id = TypeId::of::<T>();
        self.entries
            .iter()
            .find(|entry| entry.value().type_id == id)
            .map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static GLOBAL_REGISTRY: OnceLock<DtypeRegistry> = OnceLock::new();

/// The process-wide registry, created empty on first use.
#[inline]
pub fn global_registry() -> &'static DtypeRegistry {
    GLOBAL_REGISTRY.get_or_init(DtypeRegistry::new)
}

/// Install the interval dtype into `registry`.
///
/// Repeated calls are no-ops once the identical descriptor is present. A
/// different descriptor under the same name is a
/// [`IntervalError::ConflictingRegistration`].
pub fn init_once_in(registry: &DtypeRegistry) -> Result<()> {
    let descriptor = DtypeDescriptor::interval();
    match registry.entries.entry(descriptor.name.clone()) {
        Entry::Occupied(existing) if *existing.get() == descriptor => {
            debug!(name = INTERVAL_DTYPE, "interval dtype already registered");
            Ok(())
        }
        Entry::Occupied(existing) => {
            warn!(
                name = INTERVAL_DTYPE,
                existing = existing.get().type_name,
                "interval dtype name claimed by another type"
            );
            Err(IntervalError::ConflictingRegistration {
                name: descriptor.name,
            })
        }
        Entry::Vacant(slot) => {
            info!(
                name = INTERVAL_DTYPE,
                itemsize = descriptor.itemsize,
                loops = descriptor.loops.len(),
                "registered interval dtype"
            );
            slot.insert(descriptor);
            Ok(())
        }
    }
}

/// [`init_once_in`] on the [`global_registry`].
pub fn init_once() -> Result<()> {
    init_once_in(global_registry())
}

/// Whether the array's element type is the registered interval dtype.
pub fn is_interval_array_in<S, D>(registry: &DtypeRegistry, _array: &ArrayBase<S, D>) -> bool
where
    S: RawData,
    S::Elem: 'static,
    D: Dimension,
{
    registry
        .get(INTERVAL_DTYPE)
        .is_some_and(|desc| desc.type_id == TypeId::of::<S::Elem>())
}

/// [`is_interval_array_in`] on the [`global_registry`]. False until the
/// interval dtype has been registered.
pub fn is_interval_array<S, D>(array: &ArrayBase<S, D>) -> bool
where
    S: RawData,
    S::Elem: 'static,
    D: Dimension,
{
    is_interval_array_in(global_registry(), array)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, ArrayD, IxDyn};

    #[test]
    fn test_interval_descriptor() {
        let desc = DtypeDescriptor::interval();
        assert_eq!(desc.name, "interval");
        assert_eq!(desc.itemsize, 16);
        assert_eq!(desc.type_id, TypeId::of::<Interval>());
        for name in ["add", "divide", "less_equal", "union", "subset", "arctan", "matmul"] {
            assert!(desc.has_loop(name), "missing loop {name}");
        }
        assert!(!desc.has_loop("power"));
    }

    #[test]
    fn test_init_once_is_idempotent() {
        let registry = DtypeRegistry::new();
        init_once_in(&registry).unwrap();
        init_once_in(&registry).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.lookup_type::<Interval>().map(|d| d.name),
            Some("interval".to_string())
        );
    }

    #[test]
    fn test_conflicting_registration() {
        let registry = DtypeRegistry::new();
        registry
            .register(DtypeDescriptor::of::<[f64; 2]>("interval", vec![]))
            .unwrap();
        assert_eq!(
            init_once_in(&registry).unwrap_err(),
            IntervalError::ConflictingRegistration {
                name: "interval".to_string()
            }
        );
    }

    #[test]
    fn test_register_is_strict() {
        let registry = DtypeRegistry::new();
        registry.register(DtypeDescriptor::interval()).unwrap();
        assert!(registry.register(DtypeDescriptor::interval()).is_err());
        assert!(registry.contains("interval"));
        assert!(registry.get("float").is_none());
    }

    #[test]
    fn test_is_interval_array() {
        let registry = DtypeRegistry::new();
        let intervals = ArrayD::from_elem(IxDyn(&[2]), Interval::ONE);
        let floats = arr1(&[1.0, 2.0]);

        assert!(!is_interval_array_in(&registry, &intervals));
        init_once_in(&registry).unwrap();
        assert!(is_interval_array_in(&registry, &intervals));
        assert!(is_interval_array_in(&registry, &intervals.view()));
        assert!(!is_interval_array_in(&registry, &floats));
    }

    #[test]
    fn test_global_registry() {
        init_once().unwrap();
        init_once().unwrap();
        assert!(global_registry().contains(INTERVAL_DTYPE));
        assert!(is_interval_array(&arr1(&[Interval::ZERO])));
        assert!(!is_interval_array(&arr1(&[0.0])));
    }
}
