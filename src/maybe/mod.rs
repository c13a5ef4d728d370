//! Maybe: presence or absence of a value
//!
//! `Maybe<T>` is a two-variant sum type with a fixed set of composition
//! operations (map, chain, fallbacks, matching) plus async continuations.
//! Absence is not a failure: there is no error payload, and anything a
//! user-supplied closure raises (a panic, or an error it returns inside
//! `U`) travels to the caller untouched.
//!
//! Nullable inputs are plain `std::option::Option<T>`; [`lift`] normalizes
//! `None` to [`Maybe::Absent`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::future::Future;

pub mod sequence;

pub use sequence::{
    FilterPresent, MaybeIterExt, filter_present, first_or_absent, first_or_absent_by,
};

/// A value that is either present or absent
#[must_use = "a Maybe carries a value that may be silently dropped"]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Maybe<T> {
    /// No value exists
    Absent,
    /// A value exists
    Present(T),
}

/// Lift a nullable value, `None` becomes `Absent`
pub fn lift<T>(value: Option<T>) -> Maybe<T> {
    match value {
        Some(value) => Maybe::Present(value),
        None => Maybe::Absent,
    }
}

/// The canonical absent value for any element type
pub const fn absent<T>() -> Maybe<T> {
    Maybe::Absent
}

/// `Present(obj)` when `condition` holds, otherwise `Absent`
pub fn when<T>(obj: T, condition: bool) -> Maybe<T> {
    if condition { Maybe::Present(obj) } else { Maybe::Absent }
}

/// `Present(obj)` when `predicate(&obj)` holds, otherwise `Absent`
///
/// The predicate runs exactly once, against `obj` itself.
pub fn when_with<T, P>(obj: T, predicate: P) -> Maybe<T>
where
    P: FnOnce(&T) -> bool,
{
    let condition = predicate(&obj);
    when(obj, condition)
}

impl<T> Maybe<T> {
    /// Wrap a value that is known to exist
    pub const fn present(value: T) -> Self {
        Maybe::Present(value)
    }

    pub const fn is_present(&self) -> bool {
        matches!(self, Maybe::Present(_))
    }

    pub const fn is_absent(&self) -> bool {
        matches!(self, Maybe::Absent)
    }

    /// Borrow the wrapped value without consuming `self`
    pub const fn as_ref(&self) -> Maybe<&T> {
        match self {
            Maybe::Present(value) => Maybe::Present(value),
            Maybe::Absent => Maybe::Absent,
        }
    }

    /// Convert back into a nullable `Option`
    pub fn into_option(self) -> Option<T> {
        match self {
            Maybe::Present(value) => Some(value),
            Maybe::Absent => None,
        }
    }

    /// Transform the wrapped value, keeping the variant
    pub fn map<U, F>(self, f: F) -> Maybe<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Maybe::Present(value) => Maybe::Present(f(value)),
            Maybe::Absent => Maybe::Absent,
        }
    }

    /// Async counterpart of [`Maybe::map`]
    ///
    /// `f` is called at most once and only when present; an absent value
    /// resolves without ever creating the future.
    pub async fn map_async<U, F, Fut>(self, f: F) -> Maybe<U>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = U>,
    {
        match self {
            Maybe::Present(value) => Maybe::Present(f(value).await),
            Maybe::Absent => Maybe::Absent,
        }
    }

    /// Monadic bind: feed the value into a continuation that itself may be absent
    pub fn chain<U, F>(self, f: F) -> Maybe<U>
    where
        F: FnOnce(T) -> Maybe<U>,
    {
        match self {
            Maybe::Present(value) => f(value),
            Maybe::Absent => Maybe::Absent,
        }
    }

    /// Async counterpart of [`Maybe::chain`]
    pub async fn chain_async<U, F, Fut>(self, f: F) -> Maybe<U>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Maybe<U>>,
    {
        match self {
            Maybe::Present(value) => f(value).await,
            Maybe::Absent => Maybe::Absent,
        }
    }

    /// Run a side effect on the value when present, returning `self` unchanged
    pub fn tap<F>(self, f: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Maybe::Present(value) = &self {
            f(value);
        }
        self
    }

    /// The wrapped value, or `fallback`
    pub fn reduce(self, fallback: T) -> T {
        match self {
            Maybe::Present(value) => value,
            Maybe::Absent => fallback,
        }
    }

    /// The wrapped value, or the result of `fallback`
    ///
    /// `fallback` is only evaluated when absent.
    pub fn reduce_with<F>(self, fallback: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self {
            Maybe::Present(value) => value,
            Maybe::Absent => fallback(),
        }
    }

    /// Total fold over both variants; exactly one branch runs
    pub fn fold<R, A, P>(self, on_absent: A, on_present: P) -> R
    where
        A: FnOnce() -> R,
        P: FnOnce(T) -> R,
    {
        match self {
            Maybe::Present(value) => on_present(value),
            Maybe::Absent => on_absent(),
        }
    }

    /// Side-effecting form of [`Maybe::fold`]
    pub fn fold_void<A, P>(self, on_absent: A, on_present: P)
    where
        A: FnOnce(),
        P: FnOnce(T),
    {
        self.fold(on_absent, on_present)
    }

    /// Recover from absence with a nullable supplier
    ///
    /// The supplier's result is lifted again, so a `None` stays absent.
    pub fn if_absent<F>(self, supplier: F) -> Self
    where
        F: FnOnce() -> Option<T>,
    {
        match self {
            Maybe::Absent => lift(supplier()),
            present => present,
        }
    }

    /// Run `action` when absent, returning `self` unchanged
    pub fn if_absent_do<F>(self, action: F) -> Self
    where
        F: FnOnce(),
    {
        if self.is_absent() {
            action();
        }
        self
    }

    /// Collapse to `Absent` unless `condition` holds
    pub fn keep_if(self, condition: bool) -> Self {
        if condition { self } else { Maybe::Absent }
    }

    /// Collapse to `Absent` unless `predicate` holds for the value
    ///
    /// An absent value never reaches the predicate.
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnOnce(&T) -> bool,
    {
        match self {
            Maybe::Present(value) => {
                let condition = predicate(&value);
                Maybe::Present(value).keep_if(condition)
            }
            Maybe::Absent => Maybe::Absent,
        }
    }
}

impl<T> Maybe<Maybe<T>> {
    pub fn flatten(self) -> Maybe<T> {
        self.chain(|inner| inner)
    }
}

impl<T, E> Maybe<Result<T, E>> {
    /// `Present(Err(e))` becomes `Err(e)`; everything else is `Ok`
    pub fn transpose(self) -> Result<Maybe<T>, E> {
        match self {
            Maybe::Present(Ok(value)) => Ok(Maybe::Present(value)),
            Maybe::Present(Err(err)) => Err(err),
            Maybe::Absent => Ok(Maybe::Absent),
        }
    }
}

impl<T> Default for Maybe<T> {
    fn default() -> Self {
        Maybe::Absent
    }
}

impl<T> From<Option<T>> for Maybe<T> {
    fn from(value: Option<T>) -> Self {
        lift(value)
    }
}

impl<T> From<Maybe<T>> for Option<T> {
    fn from(value: Maybe<T>) -> Self {
        value.into_option()
    }
}

impl<T> IntoIterator for Maybe<T> {
    type Item = T;
    type IntoIter = std::option::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_option().into_iter()
    }
}

// Serialized exactly like a nullable field: `null` when absent.
impl<T: Serialize> Serialize for Maybe<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Maybe::Present(value) => serializer.serialize_some(value),
            Maybe::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Maybe<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(lift)
    }
}
