use std::cell::RefCell;
use std::ops::ControlFlow;

use tandem::{CancelFlag, ExecCtx, Fuel, Unbounded};

mod counting;

use counting::counted;

/// Records every site it is polled with; never cancels.
#[derive(Default)]
struct Recorder {
    sites: RefCell<Vec<String>>,
}

impl Recorder {
    fn polls(&self) -> usize {
        self.sites.borrow().len()
    }
}

impl<'a> ExecCtx<&'a str> for Recorder {
    fn poll(&self, site: &&'a str) -> ControlFlow<()> {
        self.sites.borrow_mut().push(site.to_string());
        ControlFlow::Continue(())
    }
}

#[test]
fn rejected_elements_are_skipped_not_stopping() {
    let out: Vec<i32> = tandem::filter_map(
        (Some(vec![1, 2, 3, 4, 5, 6]),),
        |(x,)| x % 2 == 0,
        |(x,)| x,
        Unbounded,
        "loop",
    )
    .expect("present")
    .collect();
    assert_eq!(out, vec![2, 4, 6]);
}

#[test]
fn absent_source_makes_absent_result() {
    let ctx = Recorder::default();
    let out = tandem::filter_map(
        (Some(vec![1, 2]), None::<Vec<i32>>),
        |_| true,
        |(a, b)| a + b,
        &ctx,
        "loop",
    );
    assert!(out.is_none());
    assert_eq!(ctx.polls(), 0);
}

#[test]
fn polls_once_per_advance_attempt() {
    let ctx = Recorder::default();
    let out: Vec<i32> = tandem::filter_map(
        (Some(vec![1, 2, 3, 4, 5, 6]), Some(vec![0; 10])),
        |_| false,
        |(a, b)| a + b,
        &ctx,
        "loop#3",
    )
    .expect("present")
    .collect();
    assert!(out.is_empty());
    // Six successful advances plus the attempt that found the first source exhausted.
    assert_eq!(ctx.polls(), 7);
    assert!(ctx.sites.borrow().iter().all(|s| s == "loop#3"));
}

#[test]
fn poll_count_is_independent_of_yields() {
    let ctx = Recorder::default();
    let mut out = tandem::filter_map(
        (Some(vec![1, 2, 3, 4]),),
        |(x,)| *x >= 3,
        |(x,)| x * 10,
        &ctx,
        "loop",
    )
    .expect("present");

    assert_eq!(out.next(), Some(30));
    assert_eq!(ctx.polls(), 3);
    assert_eq!(out.next(), Some(40));
    assert_eq!(ctx.polls(), 4);
    assert_eq!(out.next(), None);
    assert_eq!(ctx.polls(), 5);
    assert_eq!(out.steps(), 4);
}

#[test]
fn polls_before_testing_exhaustion() {
    let ctx = Recorder::default();
    let mut out = tandem::filter_map(
        (Some(Vec::<i32>::new()),),
        |_| true,
        |(x,)| x,
        &ctx,
        "empty",
    )
    .expect("present");
    assert_eq!(ctx.polls(), 0);
    assert_eq!(out.next(), None);
    assert_eq!(ctx.polls(), 1);
    // Stopped loops are not polled again.
    assert_eq!(out.next(), None);
    assert_eq!(ctx.polls(), 1);
}

#[test]
fn indexed_counts_advances_not_outputs() {
    let out: Vec<(u64, i32)> = tandem::filter_map_indexed(
        (Some(vec![5, 6, 7, 8]),),
        |_, (x,)| x % 2 == 0,
        |i, (x,)| (i, x),
        Unbounded,
        (),
    )
    .expect("present")
    .collect();
    assert_eq!(out, vec![(1, 6), (3, 8)]);
}

#[test]
fn fuel_ends_an_unbounded_filtered_loop() {
    let fuel = Fuel::new(3);
    let mut out = tandem::filter_map(
        (Some(std::iter::repeat(1)), Some(0..)),
        |_| false,
        |(a, b)| a + b,
        &fuel,
        "spin",
    )
    .expect("present");

    assert_eq!(out.next(), None);
    assert!(fuel.is_exhausted());
    assert_eq!(fuel.polls(), 4);
    assert_eq!(out.steps(), 3);
}

#[test]
fn cancellation_requested_mid_loop_stops_and_releases() {
    let flag = CancelFlag::new();
    let controller = flag.clone();
    let (seq, counters) = counted((1..=10).collect::<Vec<i32>>());

    let out: Vec<i32> = tandem::filter_map(
        (Some(seq),),
        |(x,)| {
            if *x == 3 {
                controller.cancel();
            }
            true
        },
        |(x,)| x,
        flag,
        0u32,
    )
    .expect("present")
    .collect();

    assert_eq!(out, vec![1, 2, 3]);
    assert!(counters.is_balanced());
    assert_eq!(counters.pulls(), 3);
}

#[test]
fn no_poll_before_the_first_pull() {
    let ctx = Recorder::default();
    let out = tandem::filter_map((Some(vec![1]),), |_| true, |(x,)| x, &ctx, "lazy")
        .expect("present");
    assert_eq!(ctx.polls(), 0);
    drop(out);
    assert_eq!(ctx.polls(), 0);
}
