#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct Counters {
    acquired: Cell<u32>,
    released: Cell<u32>,
    pulls: Cell<u32>,
}

impl Counters {
    pub fn acquired(&self) -> u32 {
        self.acquired.get()
    }

    pub fn released(&self) -> u32 {
        self.released.get()
    }

    pub fn pulls(&self) -> u32 {
        self.pulls.get()
    }

    pub fn is_balanced(&self) -> bool {
        self.acquired.get() == self.released.get()
    }
}

/// A sequence that records when its cursor is created, pulled and dropped.
pub struct Counted<T> {
    items: Vec<T>,
    counters: Rc<Counters>,
}

pub fn counted<T>(items: Vec<T>) -> (Counted<T>, Rc<Counters>) {
    let counters = Rc::new(Counters::default());
    let seq = Counted {
        items,
        counters: Rc::clone(&counters),
    };
    (seq, counters)
}

pub struct CountedCursor<T> {
    inner: std::vec::IntoIter<T>,
    counters: Rc<Counters>,
}

impl<T> IntoIterator for Counted<T> {
    type Item = T;
    type IntoIter = CountedCursor<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.counters.acquired.set(self.counters.acquired.get() + 1);
        CountedCursor {
            inner: self.items.into_iter(),
            counters: self.counters,
        }
    }
}

impl<T> Iterator for CountedCursor<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.counters.pulls.set(self.counters.pulls.get() + 1);
        self.inner.next()
    }
}

impl<T> Drop for CountedCursor<T> {
    fn drop(&mut self) {
        self.counters.released.set(self.counters.released.get() + 1);
    }
}
