//! Algebraic laws and short-circuit guarantees of `Maybe`

use machine_api::maybe::{
    Maybe, MaybeIterExt, absent, filter_present, first_or_absent, first_or_absent_by, lift, when,
    when_with,
};
use std::cell::Cell;

fn samples() -> Vec<Maybe<i32>> {
    vec![Maybe::Present(0), Maybe::Present(7), Maybe::Present(-3), Maybe::Absent]
}

fn half(x: i32) -> Maybe<i32> {
    when(x / 2, x % 2 == 0)
}

fn positive(x: i32) -> Maybe<i32> {
    when_with(x, |n| *n > 0)
}

#[test]
fn test_lift_none_is_absent() {
    assert_eq!(lift::<&str>(None), Maybe::Absent);
    assert_eq!(lift(Some("v")), Maybe::Present("v"));
}

#[test]
fn test_functor_identity() {
    for o in samples() {
        assert_eq!(o.map(|x| x), o);
    }
}

#[test]
fn test_functor_composition() {
    let f = |x: i32| x * 3;
    let g = |x: i32| x - 1;
    for o in samples() {
        assert_eq!(o.map(f).map(g), o.map(|x| g(f(x))));
    }
}

#[test]
fn test_monad_left_identity() {
    for v in [0, 4, 7, -2] {
        assert_eq!(lift(Some(v)).chain(half), half(v));
    }
}

#[test]
fn test_monad_right_identity() {
    for o in samples() {
        assert_eq!(o.chain(|x| lift(Some(x))), o);
    }
}

#[test]
fn test_associativity() {
    for o in samples() {
        assert_eq!(o.chain(half).chain(positive), o.chain(|x| half(x).chain(positive)));
    }
}

#[tokio::test]
async fn test_absent_never_calls_continuations() {
    let calls = Cell::new(0);
    let counted = |x: i32| {
        calls.set(calls.get() + 1);
        x
    };

    let _ = absent::<i32>().map(counted);
    let _ = absent::<i32>().chain(|x| Maybe::Present(counted(x)));
    let _ = absent::<i32>().filter(|x| counted(*x) > 0);
    let _ = absent::<i32>().map_async(|x| async move { x }).await;
    let _ = absent::<i32>()
        .chain_async(|x| {
            calls.set(calls.get() + 1);
            async move { Maybe::Present(x) }
        })
        .await;

    assert_eq!(calls.get(), 0);
}

#[test]
fn test_reduce_laziness() {
    let calls = Cell::new(0);
    let supplier = || {
        calls.set(calls.get() + 1);
        -1
    };

    assert_eq!(Maybe::Present(5).reduce_with(supplier), 5);
    assert_eq!(calls.get(), 0);

    assert_eq!(absent::<i32>().reduce_with(supplier), -1);
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_if_absent_relifts_supplier() {
    assert_eq!(absent::<String>().if_absent(|| None), Maybe::Absent);
    assert_eq!(absent::<i32>().if_absent(|| Some(9)), Maybe::Present(9));
    assert_eq!(Maybe::Present(1).if_absent(|| Some(9)), Maybe::Present(1));
}

#[test]
fn test_first_or_absent_by_stops_at_first_match() {
    let calls = Cell::new(0);
    let found = first_or_absent_by(0u64.., |_| {
        calls.set(calls.get() + 1);
        true
    });

    assert_eq!(found, Maybe::Present(0));
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_first_or_absent_pulls_one_element() {
    let pulled = Cell::new(0);
    let seq = (1..).inspect(|_| pulled.set(pulled.get() + 1));

    assert_eq!(first_or_absent(seq), Maybe::Present(1));
    assert_eq!(pulled.get(), 1);
}

#[test]
fn test_filter_present_preserves_order() {
    let evens: Vec<i32> = filter_present(vec![1, 2, 3, 4], |x| when(x, x % 2 == 0)).collect();
    assert_eq!(evens, vec![2, 4]);

    let lazy: Vec<u32> = (1..).filter_present(|x: u32| when(x * x, x % 3 == 0)).take(3).collect();
    assert_eq!(lazy, vec![9, 36, 81]);
}

#[test]
fn test_end_to_end() {
    assert_eq!(lift(Some("hello")).map(|s| s.len()).reduce(0), 5);
    assert_eq!(lift::<&str>(None).map(|s| s.len()).reduce(0), 0);
    assert_eq!(when_with(42, |n| *n > 100).reduce(-1), -1);

    let empty: Vec<i32> = Vec::new();
    let label = first_or_absent_by(empty, |_| true).fold(|| "none", |_| "some");
    assert_eq!(label, "none");
}

#[test]
fn test_method_style_sequence_helpers() {
    let names = ["alpha", "beta", "gamma"];
    assert_eq!(
        names.iter().first_or_absent_by(|n| n.starts_with('g')),
        Maybe::Present(&"gamma")
    );
    assert_eq!(names.iter().skip(3).first_or_absent(), Maybe::Absent);
}
