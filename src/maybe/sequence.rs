//! Sequence helpers bridging iterators and `Maybe`

use super::Maybe;
use std::fmt;
use std::iter::FusedIterator;

/// First element of `sequence`, pulling at most one item
pub fn first_or_absent<I>(sequence: I) -> Maybe<I::Item>
where
    I: IntoIterator,
{
    sequence.into_iter().next().into()
}

/// First element satisfying `predicate`
///
/// Stops at the first match; later elements are never pulled or tested.
pub fn first_or_absent_by<I, P>(sequence: I, predicate: P) -> Maybe<I::Item>
where
    I: IntoIterator,
    P: FnMut(&I::Item) -> bool,
{
    sequence.into_iter().find(predicate).into()
}

/// Lazily map each element to a `Maybe`, keeping only present values in order
pub fn filter_present<I, F, U>(sequence: I, f: F) -> FilterPresent<I::IntoIter, F>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Maybe<U>,
{
    FilterPresent {
        iter: sequence.into_iter(),
        f,
    }
}

/// Iterator returned by [`filter_present`]
///
/// Cloneable (restartable) only when the source iterator and closure are.
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Clone)]
pub struct FilterPresent<I, F> {
    iter: I,
    f: F,
}

impl<I: fmt::Debug, F> fmt::Debug for FilterPresent<I, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterPresent").field("iter", &self.iter).finish()
    }
}

impl<I, F, U> Iterator for FilterPresent<I, F>
where
    I: Iterator,
    F: FnMut(I::Item) -> Maybe<U>,
{
    type Item = U;

    fn next(&mut self) -> Option<U> {
        for item in self.iter.by_ref() {
            if let Maybe::Present(value) = (self.f)(item) {
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.iter.size_hint();
        (0, upper)
    }
}

impl<I, F, U> DoubleEndedIterator for FilterPresent<I, F>
where
    I: DoubleEndedIterator,
    F: FnMut(I::Item) -> Maybe<U>,
{
    fn next_back(&mut self) -> Option<U> {
        while let Some(item) = self.iter.next_back() {
            if let Maybe::Present(value) = (self.f)(item) {
                return Some(value);
            }
        }
        None
    }
}

impl<I, F, U> FusedIterator for FilterPresent<I, F>
where
    I: FusedIterator,
    F: FnMut(I::Item) -> Maybe<U>,
{
}

/// Method-style access to the sequence helpers on any iterator
pub trait MaybeIterExt: Iterator + Sized {
    fn first_or_absent(self) -> Maybe<Self::Item> {
        first_or_absent(self)
    }

    fn first_or_absent_by<P>(self, predicate: P) -> Maybe<Self::Item>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        first_or_absent_by(self, predicate)
    }

    fn filter_present<F, U>(self, f: F) -> FilterPresent<Self, F>
    where
        F: FnMut(Self::Item) -> Maybe<U>,
    {
        filter_present(self, f)
    }
}

impl<I: Iterator> MaybeIterExt for I {}
