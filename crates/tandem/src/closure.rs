//! Adapters giving plain and indexed closures one calling convention.
//!
//! Policies always hand the step index to their closures; [`Plain`] drops it,
//! [`Indexed`] forwards it as the first argument.

#[derive(Debug, Clone, Copy)]
pub struct Plain<F>(pub F);

#[derive(Debug, Clone, Copy)]
pub struct Indexed<F>(pub F);

/// Consumes a step tuple.
pub trait Transform<T> {
    type Output;

    fn call(&mut self, index: u64, item: T) -> Self::Output;
}

/// Inspects a step tuple. `R` is `bool`, or `Result<bool, E>` for fallible loops.
pub trait Predicate<T, R> {
    fn test(&mut self, index: u64, item: &T) -> R;
}

impl<T, R, F> Transform<T> for Plain<F>
where
    F: FnMut(T) -> R,
{
    type Output = R;

    #[inline]
    fn call(&mut self, _index: u64, item: T) -> R {
        (self.0)(item)
    }
}

impl<T, R, F> Transform<T> for Indexed<F>
where
    F: FnMut(u64, T) -> R,
{
    type Output = R;

    #[inline]
    fn call(&mut self, index: u64, item: T) -> R {
        (self.0)(index, item)
    }
}

impl<T, R, F> Predicate<T, R> for Plain<F>
where
    F: FnMut(&T) -> R,
{
    #[inline]
    fn test(&mut self, _index: u64, item: &T) -> R {
        (self.0)(item)
    }
}

impl<T, R, F> Predicate<T, R> for Indexed<F>
where
    F: FnMut(u64, &T) -> R,
{
    #[inline]
    fn test(&mut self, index: u64, item: &T) -> R {
        (self.0)(index, item)
    }
}
