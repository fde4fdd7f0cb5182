//! Ordered, kind-queryable component registry.
//!
//! Parsers, renderers and extensions are stored in an [`OrderedList`]. The
//! order of the list is the dispatch priority: the first parser that matches
//! wins, the first renderer that accepts a node writes it.
//!
//! # Kinds
//!
//! Every component has an *exact* kind, its concrete Rust type. A component
//! may additionally expose *base* kinds by returning a view of an embedded
//! component from [`Component::upcast_ref`]. Queries come in two flavours:
//!
//! - assignable (`find`, `contains`, `insert_before`, ...): exact kind or any
//!   exposed base kind matches
//! - exact (`find_exact`, `position_exact`): only the concrete type matches
//!
//! ```
//! use std::any::{Any, TypeId};
//! use mdweave_pipeline::registry::{AsComponent, Component, OrderedList};
//!
//! trait Stage: AsComponent {}
//!
//! struct Base;
//! impl Component for Base {}
//! impl Stage for Base {}
//!
//! // `Wrapped` embeds a `Base` and exposes it as a base kind.
//! struct Wrapped(Base);
//! impl Component for Wrapped {
//!     fn upcast_ref(&self, kind: TypeId) -> Option<&dyn Any> {
//!         (kind == TypeId::of::<Base>()).then_some(&self.0 as &dyn Any)
//!     }
//! }
//! impl Stage for Wrapped {}
//!
//! let mut stages: OrderedList<dyn Stage> = OrderedList::new();
//! stages.push(Box::new(Wrapped(Base)));
//!
//! assert!(stages.find::<Base>().is_some());
//! assert!(stages.find_exact::<Base>().is_none());
//! ```

use std::any::{Any, TypeId};
use std::fmt;

/// A pluggable pipeline component.
///
/// Components are `Send + Sync` so that a built pipeline can be shared
/// between threads.
pub trait Component: Any + Send + Sync {
    /// View of this component as the base kind `kind`, if it exposes one.
    ///
    /// The returned value must downcast to the type identified by `kind`.
    fn upcast_ref(&self, kind: TypeId) -> Option<&dyn Any> {
        let _ = kind;
        None
    }

    /// Mutable counterpart of [`upcast_ref`](Self::upcast_ref).
    fn upcast_mut(&mut self, kind: TypeId) -> Option<&mut dyn Any> {
        let _ = kind;
        None
    }
}

/// Object-safe access to the concrete type behind a component.
///
/// Implemented for every sized [`Component`]; component traits such as
/// `BlockParser` use it as a supertrait so trait objects can be queried.
pub trait AsComponent: Component {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Type name of the concrete component, for diagnostics.
    fn kind_name(&self) -> &'static str;
}

impl<C: Component> AsComponent for C {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn kind_name(&self) -> &'static str {
        std::any::type_name::<C>()
    }
}

fn is_exact<K: Any, T: ?Sized + AsComponent>(item: &T) -> bool {
    item.as_any().is::<K>()
}

fn is_assignable<K: Any, T: ?Sized + AsComponent>(item: &T) -> bool {
    is_exact::<K, T>(item) || item.upcast_ref(TypeId::of::<K>()).is_some()
}

fn view<K: Any, T: ?Sized + AsComponent>(item: &T) -> Option<&K> {
    if let Some(exact) = item.as_any().downcast_ref::<K>() {
        return Some(exact);
    }
    item.upcast_ref(TypeId::of::<K>())?.downcast_ref::<K>()
}

fn view_mut<K: Any, T: ?Sized + AsComponent>(item: &mut T) -> Option<&mut K> {
    if is_exact::<K, T>(item) {
        return item.as_any_mut().downcast_mut::<K>();
    }
    item.upcast_mut(TypeId::of::<K>())?.downcast_mut::<K>()
}

/// Ordered list of boxed components with relative-position insertion.
///
/// No uniqueness is enforced; use [`add_if_not_already`](Self::add_if_not_already)
/// for idempotent registration.
pub struct OrderedList<T: ?Sized + AsComponent> {
    items: Vec<Box<T>>,
}

impl<T: ?Sized + AsComponent> Default for OrderedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + AsComponent> fmt::Debug for OrderedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.kind_names()).finish()
    }
}

impl<T: ?Sized + AsComponent> OrderedList<T> {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Component at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index).map(AsRef::as_ref)
    }

    /// Iterate components in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(AsRef::as_ref)
    }

    /// Iterate components mutably in order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut().map(AsMut::as_mut)
    }

    /// Concrete type names in order.
    pub fn kind_names(&self) -> Vec<&'static str> {
        self.items.iter().map(|item| item.kind_name()).collect()
    }

    /// Append a component.
    pub fn push(&mut self, item: Box<T>) {
        self.items.push(item);
    }

    /// Insert a component at `index`, shifting later components.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, item: Box<T>) {
        self.items.insert(index, item);
    }

    /// Remove the component at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Box<T>> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Index of the first component assignable to `K`.
    #[must_use]
    pub fn position<K: Any>(&self) -> Option<usize> {
        self.items.iter().position(|item| is_assignable::<K, T>(item.as_ref()))
    }

    /// Index of the first component whose concrete type is `K`.
    #[must_use]
    pub fn position_exact<K: Any>(&self) -> Option<usize> {
        self.items.iter().position(|item| is_exact::<K, T>(item.as_ref()))
    }

    /// Insert `item` immediately before the first component assignable to `K`.
    ///
    /// Returns `false` and leaves the list unchanged if there is no such
    /// component; callers that need the item regardless must fall back to
    /// [`push`](Self::push) or [`insert`](Self::insert).
    pub fn insert_before<K: Any>(&mut self, item: Box<T>) -> bool {
        match self.position::<K>() {
            Some(index) => {
                self.items.insert(index, item);
                true
            }
            None => false,
        }
    }

    /// Insert `item` immediately after the first component assignable to `K`.
    ///
    /// Returns `false` and leaves the list unchanged if there is no such component.
    pub fn insert_after<K: Any>(&mut self, item: Box<T>) -> bool {
        match self.position::<K>() {
            Some(index) => {
                self.items.insert(index + 1, item);
                true
            }
            None => false,
        }
    }

    /// First component assignable to `K`.
    #[must_use]
    pub fn find<K: Any>(&self) -> Option<&K> {
        self.items.iter().find_map(|item| view::<K, T>(item.as_ref()))
    }

    /// Mutable access to the first component assignable to `K`.
    pub fn find_mut<K: Any>(&mut self) -> Option<&mut K> {
        let index = self.position::<K>()?;
        view_mut::<K, T>(self.items[index].as_mut())
    }

    /// First component whose concrete type is exactly `K`.
    ///
    /// Components that only expose `K` as a base kind are skipped, so this
    /// can return `None` where [`find`](Self::find) succeeds.
    #[must_use]
    pub fn find_exact<K: Any>(&self) -> Option<&K> {
        self.items
            .iter()
            .find_map(|item| item.as_any().downcast_ref::<K>())
    }

    /// Mutable access to the first component whose concrete type is exactly `K`.
    pub fn find_exact_mut<K: Any>(&mut self) -> Option<&mut K> {
        self.items
            .iter_mut()
            .find_map(|item| item.as_any_mut().downcast_mut::<K>())
    }

    /// Whether any component is assignable to `K`.
    #[must_use]
    pub fn contains<K: Any>(&self) -> bool {
        self.position::<K>().is_some()
    }

    /// Append `item` unless a component assignable to `K` is already present.
    ///
    /// Returns whether the item was added.
    pub fn add_if_not_already<K: Any>(&mut self, item: Box<T>) -> bool {
        self.add_if_not_already_with::<K>(|| item)
    }

    /// Append the component built by `make` unless one assignable to `K` is
    /// already present. `make` only runs when the component is missing.
    pub fn add_if_not_already_with<K: Any>(&mut self, make: impl FnOnce() -> Box<T>) -> bool {
        if self.contains::<K>() {
            return false;
        }
        self.items.push(make());
        true
    }

    /// Replace the first component assignable to `K` with `replacement`,
    /// keeping its position.
    ///
    /// Returns `false` (dropping `replacement`) if there is nothing to replace.
    pub fn replace<K: Any>(&mut self, replacement: Box<T>) -> bool {
        match self.position::<K>() {
            Some(index) => {
                self.items[index] = replacement;
                true
            }
            None => false,
        }
    }

    /// Replace the first component assignable to `K`, or append `item`.
    ///
    /// Returns `true` if a replacement was made, `false` if the item was appended.
    pub fn replace_or_add<K: Any>(&mut self, item: Box<T>) -> bool {
        match self.position::<K>() {
            Some(index) => {
                self.items[index] = item;
                true
            }
            None => {
                self.items.push(item);
                false
            }
        }
    }

    /// Remove the first component assignable to `K`.
    ///
    /// Returns whether a component was removed.
    pub fn try_remove<K: Any>(&mut self) -> bool {
        match self.position::<K>() {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }
}

impl<'a, T: ?Sized + AsComponent> IntoIterator for &'a OrderedList<T> {
    type Item = &'a T;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, Box<T>>, fn(&'a Box<T>) -> &'a T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter().map(AsRef::as_ref as fn(&'a Box<T>) -> &'a T)
    }
}
