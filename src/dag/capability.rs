// src/dag/capability.rs

//! Runtime capability checks.
//!
//! A capability is any trait-object type (`dyn makefile::Compiler`,
//! `dyn SkipAsDependency`, ...). A node registers, per capability, a cast from
//! its concrete type to that trait object. The graph stores the casts in a
//! type-erased [`CapabilitySet`] keyed by the capability's `TypeId`, so
//! "does this node implement X?" is answered without the graph core knowing
//! either the concrete node type or the list of capabilities that exist.
//!
//! ```ignore
//! impl Node for Build {
//!     // ...
//!     fn capabilities(&self, caps: &mut Capabilities<Self>) {
//!         caps.provide::<dyn makefile::Compiler>(|n| n)
//!             .provide::<dyn ci::Compiler>(|n| n);
//!     }
//! }
//! ```

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use crate::dag::graph::NodeRef;
use crate::dag::node::Node;

/// Marker capability: the node participates in the graph (and renders its
/// own fragments) but is never listed as a gathered dependency.
pub trait SkipAsDependency {}

type ErasedCast<C> = Box<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a C>>;

struct Cast<C: ?Sized + 'static>(ErasedCast<C>);

// Pins the higher-ranked signature on the closure below.
fn constrain<C: ?Sized, F>(f: F) -> F
where
    F: for<'a> Fn(&'a dyn Any) -> Option<&'a C>,
{
    f
}

/// Registration handle passed to [`Node::capabilities`].
pub struct Capabilities<N> {
    set: CapabilitySet,
    _node: PhantomData<fn(&N)>,
}

impl<N: Node> Capabilities<N> {
    pub(crate) fn new() -> Self {
        Self {
            set: CapabilitySet::default(),
            _node: PhantomData,
        }
    }

    /// Declare that `N` implements capability `C`; `cast` is normally just
    /// `|n| n` and relies on unsizing.
    pub fn provide<C: ?Sized + 'static>(&mut self, cast: fn(&N) -> &C) -> &mut Self {
        let erased = constrain(move |any: &dyn Any| any.downcast_ref::<N>().map(cast));
        self.set.insert::<C>(Box::new(erased));
        self
    }

    pub(crate) fn into_set(self) -> CapabilitySet {
        self.set
    }
}

/// Type-erased capability casts of one node.
#[derive(Default)]
pub struct CapabilitySet {
    casts: HashMap<TypeId, Box<dyn Any>>,
    names: Vec<&'static str>,
}

impl CapabilitySet {
    fn insert<C: ?Sized + 'static>(&mut self, cast: ErasedCast<C>) {
        if self
            .casts
            .insert(TypeId::of::<C>(), Box::new(Cast(cast)))
            .is_none()
        {
            self.names.push(type_name::<C>());
        }
    }

    /// Resolve capability `C` against the node value it was registered for.
    pub fn get<'a, C: ?Sized + 'static>(&self, node: &'a dyn Any) -> Option<&'a C> {
        let cast = self
            .casts
            .get(&TypeId::of::<C>())?
            .downcast_ref::<Cast<C>>()?;
        (cast.0)(node)
    }

    pub fn contains<C: ?Sized + 'static>(&self) -> bool {
        self.casts.contains_key(&TypeId::of::<C>())
    }

    /// Registered capability type names, in registration order.
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names.iter()).finish()
    }
}

/// Predicate for [`NodeRef::gather_matching_input_names`]: matches nodes
/// implementing capability `C`.
pub fn implements<C: ?Sized + 'static>() -> impl Fn(NodeRef<'_>) -> bool {
    |node: NodeRef<'_>| node.implements::<C>()
}
