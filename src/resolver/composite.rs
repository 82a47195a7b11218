use std::{fmt, sync::Arc};

use parking_lot::RwLock;
use thiserror::Error;

use crate::{
    interpreter::{evaluator::core::EvalResult, value::core::Value},
    resolver::core::Resolver,
};

/// Returned when an insertion names a target resolver that is not a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("resolver is not a member of this composite")]
pub struct UnknownMember;

/// Tries an ordered list of resolvers one after another.
///
/// The first member that knows a name answers for it. Members are identified
/// by the address of their `Arc`, so adding a resolver that is already present
/// moves it instead of duplicating it.
///
/// The member list may change after expressions were compiled against the
/// composite; compiled evaluators see the current list on every call. The
/// member that answers is only known then, so the composite declares no
/// property types or signatures: its reads and calls are `Dynamic` and each
/// member checks its own arguments.
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use formulary::{
///     compiler::Compiler,
///     resolver::{CompositeResolver, Members, ObjectResolver, Reflect, Resolver},
/// };
///
/// struct Speed(i64);
///
/// impl Reflect for Speed {
///     fn members(members: &mut Members<Self>) {
///         members.property("speed", |s: &Self| s.0);
///     }
/// }
///
/// let fast: Arc<dyn Resolver> = Arc::new(ObjectResolver::new(Speed(10)));
/// let slow: Arc<dyn Resolver> = Arc::new(ObjectResolver::new(Speed(1)));
///
/// let composite = Arc::new(CompositeResolver::new());
/// composite.add(Arc::clone(&fast));
/// composite.add(slow);
///
/// let shared: Arc<dyn Resolver> = composite.clone();
/// let f = Compiler::default().compile::<(), i64>("speed", &[], Some(shared)).unwrap();
/// assert_eq!(f.call(()).unwrap(), 10);
///
/// composite.remove(&fast);
/// assert_eq!(f.call(()).unwrap(), 1);
/// ```
#[derive(Default)]
pub struct CompositeResolver {
    members: RwLock<Vec<Arc<dyn Resolver>>>,
}

/// Compares resolvers by the address of their shared allocation.
fn same(a: &Arc<dyn Resolver>, b: &Arc<dyn Resolver>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

impl CompositeResolver {
    /// Creates an empty composite.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a composite over `members`, in order.
    #[must_use]
    pub fn from_members(members: impl IntoIterator<Item = Arc<dyn Resolver>>) -> Self {
        let composite = Self::new();
        for member in members {
            composite.add_last(member);
        }
        composite
    }

    /// Appends `resolver`. Same as [`CompositeResolver::add_last`].
    pub fn add(&self, resolver: Arc<dyn Resolver>) {
        self.add_last(resolver);
    }

    /// Appends `resolver`, moving it if it is already a member.
    pub fn add_last(&self, resolver: Arc<dyn Resolver>) {
        let mut members = self.members.write();
        members.retain(|member| !same(member, &resolver));
        members.push(resolver);
    }

    /// Prepends `resolver`, moving it if it is already a member.
    pub fn add_first(&self, resolver: Arc<dyn Resolver>) {
        let mut members = self.members.write();
        members.retain(|member| !same(member, &resolver));
        members.insert(0, resolver);
    }

    /// Inserts `resolver` directly before `target`.
    ///
    /// # Errors
    /// [`UnknownMember`] if `target` is not a member. The composite is left
    /// unchanged in that case.
    pub fn add_before(&self,
                      target: &Arc<dyn Resolver>,
                      resolver: Arc<dyn Resolver>)
                      -> Result<(), UnknownMember> {
        self.insert_relative(target, resolver, 0)
    }

    /// Inserts `resolver` directly after `target`.
    ///
    /// # Errors
    /// [`UnknownMember`] if `target` is not a member. The composite is left
    /// unchanged in that case.
    pub fn add_after(&self,
                     target: &Arc<dyn Resolver>,
                     resolver: Arc<dyn Resolver>)
                     -> Result<(), UnknownMember> {
        self.insert_relative(target, resolver, 1)
    }

    fn insert_relative(&self,
                       target: &Arc<dyn Resolver>,
                       resolver: Arc<dyn Resolver>,
                       offset: usize)
                       -> Result<(), UnknownMember> {
        let mut members = self.members.write();
        if !members.iter().any(|member| same(member, target)) {
            return Err(UnknownMember);
        }
        if same(target, &resolver) {
            return Ok(());
        }

        members.retain(|member| !same(member, &resolver));
        let position = members.iter()
                              .position(|member| same(member, target))
                              .ok_or(UnknownMember)?;
        members.insert(position + offset, resolver);
        Ok(())
    }

    /// Removes `resolver`. Returns `true` if it was a member.
    pub fn remove(&self, resolver: &Arc<dyn Resolver>) -> bool {
        let mut members = self.members.write();
        let before = members.len();
        members.retain(|member| !same(member, resolver));
        members.len() != before
    }

    /// Returns `true` if `resolver` is a member.
    #[must_use]
    pub fn contains(&self, resolver: &Arc<dyn Resolver>) -> bool {
        self.members.read().iter().any(|member| same(member, resolver))
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.read().len()
    }

    /// Returns `true` if the composite has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.read().is_empty()
    }

    /// Removes every member.
    pub fn clear(&self) {
        self.members.write().clear();
    }

    /// Copies the member list so host code runs without the lock held.
    fn snapshot(&self) -> Vec<Arc<dyn Resolver>> {
        self.members.read().clone()
    }
}

impl Resolver for CompositeResolver {
    fn try_call(&self, name: &str, args: &[Value]) -> EvalResult<Option<Value>> {
        for member in self.snapshot() {
            if let Some(value) = member.try_call(name, args)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    fn try_read(&self, name: &str) -> EvalResult<Option<Value>> {
        for member in self.snapshot() {
            if let Some(value) = member.try_read(name)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

impl fmt::Debug for CompositeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeResolver")
         .field("members", &self.len())
         .finish()
    }
}
