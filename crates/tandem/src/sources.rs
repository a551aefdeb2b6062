//! Source sets walked in lock-step.
//!
//! A source set is a tuple of 1 to 16 `IntoIterator`s. Acquiring a set turns every source into its cursor; advancing the cursor set
//! pulls one element from each cursor in source order and stops at the first
//! exhausted one.

/// Largest number of sources a single lock-step loop accepts.
pub const MAX_ARITY: usize = 16;

pub trait Sources {
    /// The step tuple: one element per source.
    type Item;
    type Cursors: Cursors<Item = Self::Item>;

    fn arity(&self) -> usize;

    /// Creates one cursor per source.
    fn acquire(self) -> Self::Cursors;
}

pub trait Cursors {
    type Item;

    /// Advances every cursor by one position, or returns `None` as soon as one
    /// of them is exhausted. Cursors after the exhausted one are left untouched.
    fn advance(&mut self) -> Option<Self::Item>;

    fn size_hint(&self) -> (usize, Option<usize>);
}

/// A source set whose members may individually be absent.
pub trait MaybeSources {
    type Sources: Sources;

    /// `None` if any member is absent.
    fn present(self) -> Option<Self::Sources>;
}

/// The step tuple produced by a possibly-absent source set.
pub type StepItem<M> = <<M as MaybeSources>::Sources as Sources>::Item;

fn min_hint(a: (usize, Option<usize>), b: (usize, Option<usize>)) -> (usize, Option<usize>) {
    let hi = match (a.1, b.1) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    };
    (a.0.min(b.0), hi)
}

macro_rules! lockstep_tuple {
    ( $arity:literal; $( $S:ident $n:tt ),+ ) => {
        impl<$($S),+> Sources for ($($S,)+)
        where
            $( $S: IntoIterator ),+
        {
            type Item = ($(<$S as IntoIterator>::Item,)+);
            type Cursors = ($(<$S as IntoIterator>::IntoIter,)+);

            fn arity(&self) -> usize {
                $arity
            }

            fn acquire(self) -> Self::Cursors {
                ($(self.$n.into_iter(),)+)
            }
        }

        impl<$($S),+> Cursors for ($($S,)+)
        where
            $( $S: Iterator ),+
        {
            type Item = ($(<$S as Iterator>::Item,)+);

            #[inline]
            fn advance(&mut self) -> Option<Self::Item> {
                Some(($(self.$n.next()?,)+))
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                let hint = (usize::MAX, None);
                $( let hint = min_hint(hint, self.$n.size_hint()); )+
                hint
            }
        }

        impl<$($S),+> MaybeSources for ($(Option<$S>,)+)
        where
            $( $S: IntoIterator ),+
        {
            type Sources = ($($S,)+);

            fn present(self) -> Option<Self::Sources> {
                Some(($(self.$n?,)+))
            }
        }
    };
}

lockstep_tuple!(1; A 0);
lockstep_tuple!(2; A 0, B 1);
lockstep_tuple!(3; A 0, B 1, C 2);
lockstep_tuple!(4; A 0, B 1, C 2, D 3);
lockstep_tuple!(5; A 0, B 1, C 2, D 3, E 4);
lockstep_tuple!(6; A 0, B 1, C 2, D 3, E 4, F 5);
lockstep_tuple!(7; A 0, B 1, C 2, D 3, E 4, F 5, G 6);
lockstep_tuple!(8; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);
lockstep_tuple!(9; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8);
lockstep_tuple!(10; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9);
lockstep_tuple!(11; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10);
lockstep_tuple!(12; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11);
lockstep_tuple!(13; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11, M 12);
lockstep_tuple!(14; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11, M 12, N 13);
lockstep_tuple!(15; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11, M 12, N 13, O 14);
lockstep_tuple!(16; A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7, I 8, J 9, K 10, L 11, M 12, N 13, O 14, P 15);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuple_advance_stops_at_first_exhausted_cursor() {
        let mut cursors = (vec![1, 2, 3], vec!['a'], vec![true, false]).acquire();
        assert_eq!(cursors.advance(), Some((1, 'a', true)));
        assert_eq!(cursors.advance(), None);
        // The first cursor moved on the failing attempt, the third did not.
        assert_eq!(cursors.0.next(), Some(3));
        assert_eq!(cursors.2.next(), Some(false));
    }

    #[test]
    fn tuple_size_hint_is_the_minimum() {
        let cursors = (0..10, 0..4, std::iter::repeat(1)).acquire();
        assert_eq!(cursors.size_hint(), (4, Some(4)));

        let unbounded = (std::iter::repeat(1),).acquire();
        assert_eq!(unbounded.size_hint(), (usize::MAX, None));
    }

    #[test]
    fn tuple_arity_matches_member_count() {
        assert_eq!((vec![1],).arity(), 1);
        let sixteen = (
            0..1, 0..1, 0..1, 0..1, 0..1, 0..1, 0..1, 0..1,
            0..1, 0..1, 0..1, 0..1, 0..1, 0..1, 0..1, 0..1,
        );
        assert_eq!(sixteen.arity(), MAX_ARITY);
    }

    #[test]
    fn presence_requires_every_member() {
        assert_eq!(
            (Some(vec![1]), Some(vec![2])).present(),
            Some((vec![1], vec![2]))
        );
        assert_eq!((Some(vec![1]), None::<Vec<i32>>).present(), None);
        // Empty is not absent.
        assert_eq!(
            (Some(Vec::<i32>::new()),).present(),
            Some((Vec::<i32>::new(),))
        );
    }
}
