//! Lexical scopes stored in an arena and addressed by index.
//!
//! A scope names its parent by index. A function value holds a [`ScopeHandle`]
//! for the scope it closes over, and the arena keeps only a weak reference to
//! that handle, so it can tell whether any closure still needs the scope.
//!
//! A released scope with no live handle and no remaining children is freed on
//! the spot. Scopes kept alive only by closures stored in themselves (a loop
//! body that declares a function, say) form cycles; those are found by
//! [`ScopeArena::collect`], which runs once enough released scopes pile up.
//! Freed slots go on a free list and are reused by the next new scope.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    rc::{Rc, Weak},
};

use tracing::trace;

use crate::errors::runtime::RuntimeError;

use super::value::{Fields, Value};

pub type ScopeId = usize;

/// Released scopes allowed to wait for a collection.
const MIN_COLLECT_THRESHOLD: usize = 64;

/// Proof that a closure still refers to a scope.
#[derive(Debug, PartialEq)]
pub struct ScopeHandle {
    id: ScopeId,
}

impl ScopeHandle {
    pub fn id(&self) -> ScopeId {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeState {
    /// A module's top-level scope; never freed.
    Pinned,
    /// Still being evaluated.
    Active,
    /// Control has left it.
    Released,
}

#[derive(Debug)]
pub struct Scope {
    pub parent: Option<ScopeId>,
    variables: HashMap<String, Value>,
    return_value: Option<Value>,
    state: ScopeState,
    handle: Weak<ScopeHandle>,
    children: usize,
}

impl Scope {
    fn new(parent: Option<ScopeId>, state: ScopeState) -> Self {
        Scope {
            parent,
            variables: HashMap::new(),
            return_value: None,
            state,
            handle: Weak::new(),
            children: 0,
        }
    }

    fn values(&self) -> impl Iterator<Item = &Value> {
        self.variables.values().chain(self.return_value.iter())
    }

    fn is_unreferenced(&self) -> bool {
        self.state == ScopeState::Released && self.children == 0 && self.handle.strong_count() == 0
    }
}

#[derive(Debug)]
pub struct ScopeArena {
    slots: Vec<Option<Scope>>,
    free: Vec<ScopeId>,
    live: usize,
    released: usize,
    threshold: usize,
}

impl Default for ScopeArena {
    fn default() -> Self {
        ScopeArena {
            slots: vec![],
            free: vec![],
            live: 0,
            released: 0,
            threshold: MIN_COLLECT_THRESHOLD,
        }
    }
}

/// References to handles and objects found inside the arena itself.
#[derive(Default)]
struct Census {
    handles: HashMap<ScopeId, usize>,
    /// Keyed by address: (references from inside the arena, strong count, the object).
    objects: HashMap<usize, (usize, usize, Fields)>,
}

impl Census {
    /// Returns false if an object is mutably borrowed and cannot be inspected.
    fn count(&mut self, value: &Value) -> bool {
        match value {
            Value::Function(function) => {
                *self.handles.entry(function.scope()).or_default() += 1;
                true
            }
            Value::Array(elements) => elements.iter().all(|element| self.count(element)),
            Value::Object(fields) => {
                let key = Rc::as_ptr(fields) as usize;
                if let Some((internal, _, _)) = self.objects.get_mut(&key) {
                    *internal += 1;
                    return true;
                }

                let strong = Rc::strong_count(fields);
                self.objects.insert(key, (1, strong, Rc::clone(fields)));
                match fields.try_borrow() {
                    Ok(map) => map.values().all(|field| self.count(field)),
                    Err(_) => false,
                }
            }
            _ => true,
        }
    }
}

/// Pushes every scope `value` keeps alive onto `pending`.
fn trace_value(value: &Value, pending: &mut Vec<ScopeId>, seen: &mut HashSet<usize>) -> bool {
    match value {
        Value::Function(function) => {
            pending.push(function.scope());
            true
        }
        Value::Array(elements) => elements.iter().all(|element| trace_value(element, pending, seen)),
        Value::Object(fields) => trace_fields(fields, pending, seen),
        _ => true,
    }
}

fn trace_fields(fields: &Fields, pending: &mut Vec<ScopeId>, seen: &mut HashSet<usize>) -> bool {
    if !seen.insert(Rc::as_ptr(fields) as usize) {
        return true;
    }

    match fields.try_borrow() {
        Ok(map) => trace_map(&map, pending, seen),
        Err(_) => false,
    }
}

fn trace_map(map: &BTreeMap<String, Value>, pending: &mut Vec<ScopeId>, seen: &mut HashSet<usize>) -> bool {
    map.values().all(|value| trace_value(value, pending, seen))
}

impl ScopeArena {
    pub fn new() -> Self {
        ScopeArena::default()
    }

    /// A module's top-level scope. Its exports may hold closures over it, so it is pinned.
    pub fn root(&mut self) -> ScopeId {
        self.allocate(Scope::new(None, ScopeState::Pinned))
    }

    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        if let Some(scope) = self.slot_mut(parent) {
            scope.children += 1;
        }
        self.allocate(Scope::new(Some(parent), ScopeState::Active))
    }

    fn allocate(&mut self, scope: Scope) -> ScopeId {
        self.live += 1;
        match self.free.pop() {
            Some(id) => {
                self.slots[id] = Some(scope);
                id
            }
            None => {
                self.slots.push(Some(scope));
                self.slots.len() - 1
            }
        }
    }

    /// Marks `scope` as left by control and frees whatever is no longer referenced.
    pub fn release(&mut self, scope: ScopeId) {
        match self.slot_mut(scope) {
            Some(slot) if slot.state == ScopeState::Active => slot.state = ScopeState::Released,
            _ => return,
        }
        self.released += 1;
        self.free_chain(scope);

        if self.released > self.threshold {
            self.collect();
            self.threshold = MIN_COLLECT_THRESHOLD.max(self.released * 2);
        }
    }

    /// Frees `scope` and then each parent that the free left unreferenced.
    fn free_chain(&mut self, scope: ScopeId) {
        let mut current = Some(scope);
        while let Some(id) = current {
            if !self.slot(id).is_some_and(Scope::is_unreferenced) {
                return;
            }

            current = self.free_slot(id).and_then(|freed| freed.parent);
            if let Some(parent) = current.and_then(|parent| self.slot_mut(parent)) {
                parent.children = parent.children.saturating_sub(1);
            }
        }
    }

    fn free_slot(&mut self, id: ScopeId) -> Option<Scope> {
        let scope = self.slots.get_mut(id)?.take()?;
        self.free.push(id);
        self.live -= 1;
        if scope.state == ScopeState::Released {
            self.released -= 1;
        }
        Some(scope)
    }

    /// Frees every released scope that nothing outside the arena can reach.
    ///
    /// Handles and objects referenced from outside the arena (a value being
    /// returned, a module's exports) are found by comparing their strong counts
    /// with the references the arena holds itself. Those, plus pinned and
    /// active scopes, are the roots. Nothing is freed if an object is
    /// mutably borrowed.
    pub fn collect(&mut self) {
        let mut census = Census::default();
        for scope in self.slots.iter().flatten() {
            if !scope.values().all(|value| census.count(value)) {
                return;
            }
        }

        let mut pending = vec![];
        let mut seen = HashSet::new();
        for (id, scope) in self.slots.iter().enumerate() {
            let Some(scope) = scope else { continue };
            let internal = census.handles.get(&id).copied().unwrap_or(0);
            if scope.state != ScopeState::Released || scope.handle.strong_count() > internal {
                pending.push(id);
            }
        }

        for (internal, strong, fields) in census.objects.values() {
            // `strong` was read before the census took its own reference.
            if strong > internal && !trace_fields(fields, &mut pending, &mut seen) {
                return;
            }
        }

        let mut marked = vec![false; self.slots.len()];
        while let Some(id) = pending.pop() {
            let Some(scope) = self.slot(id) else { continue };
            if std::mem::replace(&mut marked[id], true) {
                continue;
            }

            pending.extend(scope.parent);
            for value in scope.values() {
                if !trace_value(value, &mut pending, &mut seen) {
                    return;
                }
            }
        }
        drop(census);

        let before = self.live;
        let mut garbage = vec![];
        for (id, keep) in marked.iter().enumerate() {
            if !keep {
                garbage.extend(self.free_slot(id));
            }
        }

        let mut children = vec![0; self.slots.len()];
        for parent in self.slots.iter().flatten().filter_map(|scope| scope.parent) {
            children[parent] += 1;
        }
        for (id, scope) in self.slots.iter_mut().enumerate() {
            if let Some(scope) = scope {
                scope.children = children[id];
            }
        }

        trace!(freed = before - self.live, live = self.live, "collected scopes");
        drop(garbage);
    }

    /// The handle a function value keeps to hold `scope` alive.
    pub fn capture(&mut self, scope: ScopeId) -> Rc<ScopeHandle> {
        let Some(slot) = self.slot_mut(scope) else {
            return Rc::new(ScopeHandle { id: scope });
        };

        match slot.handle.upgrade() {
            Some(handle) => handle,
            None => {
                let handle = Rc::new(ScopeHandle { id: scope });
                slot.handle = Rc::downgrade(&handle);
                handle
            }
        }
    }

    /// Number of scopes currently held.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn slot(&self, id: ScopeId) -> Option<&Scope> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        self.slots.get_mut(id).and_then(Option::as_mut)
    }

    /// The nearest scope on the chain from `scope` that binds `name`.
    fn owner(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.slot(id)?;
            if scope.variables.contains_key(name) {
                return Some(id);
            }
            current = scope.parent;
        }
        None
    }

    pub fn get(&self, scope: ScopeId, name: &str) -> Option<&Value> {
        self.owner(scope, name)
            .and_then(|owner| self.slot(owner))
            .and_then(|owner| owner.variables.get(name))
    }

    pub fn has_local(&self, scope: ScopeId, name: &str) -> bool {
        self.slot(scope).is_some_and(|scope| scope.variables.contains_key(name))
    }

    pub fn locals(&self, scope: ScopeId) -> impl Iterator<Item = (&String, &Value)> {
        self.slot(scope).into_iter().flat_map(|scope| scope.variables.iter())
    }

    /// Binds `name` in `scope` itself, replacing any local binding.
    pub fn define(&mut self, scope: ScopeId, name: &str, value: Value) {
        if let Some(scope) = self.slot_mut(scope) {
            scope.variables.insert(String::from(name), value);
        }
    }

    /// Like [`ScopeArena::define`], but a second declaration in the same scope is an error.
    pub fn declare(&mut self, scope: ScopeId, name: &str, value: Value) -> Result<(), RuntimeError> {
        if self.has_local(scope, name) {
            return Err(RuntimeError::AlreadyDeclared {
                name: String::from(name),
            });
        }

        self.define(scope, name, value);
        Ok(())
    }

    /// Updates the nearest existing binding. Returns false if `name` is unbound.
    pub fn assign(&mut self, scope: ScopeId, name: &str, value: Value) -> bool {
        match self.owner(scope, name) {
            Some(owner) => {
                self.define(owner, name, value);
                true
            }
            None => false,
        }
    }

    /// Assigns if `name` is bound anywhere on the chain, otherwise defines it locally.
    pub fn set(&mut self, scope: ScopeId, name: &str, value: Value) {
        let owner = self.owner(scope, name).unwrap_or(scope);
        self.define(owner, name, value);
    }

    pub fn set_return(&mut self, scope: ScopeId, value: Value) {
        if let Some(scope) = self.slot_mut(scope) {
            scope.return_value = Some(value);
        }
    }

    pub fn take_return(&mut self, scope: ScopeId) -> Option<Value> {
        self.slot_mut(scope)?.return_value.take()
    }

    pub fn is_returning(&self, scope: ScopeId) -> bool {
        self.slot(scope).is_some_and(|scope| scope.return_value.is_some())
    }
}
