//! Store query predicates.
//!
//! List handlers narrow store queries with [`By`] predicates. The replicated
//! store evaluates them through its own indexes; [`By::matches`] and [`find`]
//! give the same semantics over plain slices.
//!
//! `Or` and `And` over zero terms place no constraint on the result set. List
//! handlers rely on this: a filter field left empty by the client builds an
//! empty `Or` and must not hide any object.

use crate::controlapi::types::Annotations;

/// An object that list queries can select.
pub trait StoreObject {
    fn id(&self) -> &str;

    fn annotations(&self) -> &Annotations;

    /// Owning service, for tasks.
    fn service_id(&self) -> Option<&str> {
        None
    }

    /// Assigned node, for tasks.
    fn node_id(&self) -> Option<&str> {
        None
    }
}

/// Query predicate over store objects.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum By {
    /// Every object
    All,
    /// Exact name
    Name(String),
    /// Name prefix
    NamePrefix(String),
    /// Identifier prefix
    IdPrefix(String),
    /// Owning service identifier
    ServiceId(String),
    /// Assigned node identifier
    NodeId(String),
    /// Any of the terms; no terms selects everything
    Or(Vec<By>),
    /// All of the terms
    And(Vec<By>),
}

impl By {
    pub fn matches<T: StoreObject + ?Sized>(&self, object: &T) -> bool {
        match self {
            By::All => true,
            By::Name(name) => object.annotations().name == *name,
            By::NamePrefix(prefix) => object.annotations().name.starts_with(prefix.as_str()),
            By::IdPrefix(prefix) => object.id().starts_with(prefix.as_str()),
            By::ServiceId(id) => object.service_id() == Some(id.as_str()),
            By::NodeId(id) => object.node_id() == Some(id.as_str()),
            By::Or(terms) => terms.is_empty() || terms.iter().any(|term| term.matches(object)),
            By::And(terms) => terms.iter().all(|term| term.matches(object)),
        }
    }
}

/// Returns the objects selected by `by`, in input order.
pub fn find<'a, T: StoreObject>(objects: &'a [T], by: &By) -> Vec<&'a T> {
    objects.iter().filter(|object| by.matches(*object)).collect()
}
