use babygc::{Context, GcConfig, GcError};

#[test]
fn scenario_rooted_leaves_survive() {
    let mut ctx = Context::new();
    ctx.push_leaf(1).expect("push 1");
    ctx.push_leaf(2).expect("push 2");

    ctx.force_collect();
    assert_eq!(ctx.live_object_count(), 2);
}

#[test]
fn scenario_popped_leaves_are_collected() {
    let mut ctx = Context::new();
    ctx.push_leaf(1).expect("push 1");
    ctx.push_leaf(2).expect("push 2");
    ctx.pop().expect("pop 2");
    ctx.pop().expect("pop 1");

    ctx.force_collect();
    assert_eq!(ctx.live_object_count(), 0);
}

#[test]
fn scenario_nested_pairs_are_reached() {
    let mut ctx = Context::new();
    ctx.push_leaf(1).expect("push 1");
    ctx.push_leaf(2).expect("push 2");
    ctx.push_pair().expect("pair 1 2");
    ctx.push_leaf(3).expect("push 3");
    ctx.push_leaf(4).expect("push 4");
    ctx.push_pair().expect("pair 3 4");
    ctx.push_pair().expect("outer pair");

    ctx.force_collect();
    assert_eq!(ctx.live_object_count(), 7);
    assert_eq!(ctx.stack().len(), 1);
}

#[test]
fn scenario_cyclic_pairs_survive() {
    let mut ctx = Context::new();
    ctx.push_leaf(1).expect("push 1");
    ctx.push_leaf(2).expect("push 2");
    let a = ctx.push_pair().expect("pair a");
    ctx.push_leaf(3).expect("push 3");
    ctx.push_leaf(4).expect("push 4");
    let b = ctx.push_pair().expect("pair b");

    ctx.set_tail(a, b).expect("rewire a");
    ctx.set_tail(b, a).expect("rewire b");

    ctx.force_collect();
    // leaves 2 and 4 lost their only references
    assert_eq!(ctx.live_object_count(), 4);
    ctx.verify().expect("heap should be consistent");
}

#[test]
fn pair_head_is_the_earlier_operand() {
    let mut ctx = Context::new();
    let first = ctx.push_leaf(10).expect("push 10");
    let second = ctx.push_leaf(20).expect("push 20");
    let pair = ctx.push_pair().expect("pair");

    let (head, tail) = ctx
        .get(pair)
        .and_then(|object| object.as_pair())
        .expect("top of stack should be a pair");
    assert_eq!(head, first);
    assert_eq!(tail, second);
    assert_eq!(ctx.get(head).and_then(|o| o.as_leaf()), Some(10));
    assert_eq!(ctx.get(tail).and_then(|o| o.as_leaf()), Some(20));
    assert_eq!(ctx.stack().peek().expect("stack holds the pair"), pair);
}

#[test]
fn pair_operands_survive_collection_triggered_by_pair() {
    let config = GcConfig::new().with_initial_threshold(2);
    let mut ctx = Context::with_config(config);
    let head = ctx.push_leaf(1).expect("push 1");
    let tail = ctx.push_leaf(2).expect("push 2");

    let pair = ctx.push_pair().expect("pair");
    assert_eq!(ctx.heap().total_collections(), 1);
    assert_eq!(ctx.live_object_count(), 3);
    assert_eq!(ctx.get(pair).and_then(|o| o.as_pair()), Some((head, tail)));
}

#[test]
fn push_pair_with_one_operand_underflows() {
    let mut ctx = Context::new();
    ctx.push_leaf(1).expect("push 1");

    let err = ctx.push_pair().expect_err("one operand is not enough");
    assert_eq!(
        err,
        GcError::StackUnderflow {
            needed: 2,
            available: 1
        }
    );
    assert_eq!(ctx.live_object_count(), 1);
    assert_eq!(ctx.stack().len(), 1);
}

#[test]
fn pop_on_empty_stack_underflows() {
    let mut ctx = Context::new();
    assert!(matches!(
        ctx.pop(),
        Err(GcError::StackUnderflow { needed: 1, .. })
    ));
}

#[test]
fn push_beyond_capacity_overflows_without_allocating() {
    let config = GcConfig::new().with_stack_capacity(3);
    let mut ctx = Context::with_config(config);
    for i in 0..3 {
        ctx.push_leaf(i).expect("push within capacity");
    }

    let err = ctx.push_leaf(99).expect_err("stack is full");
    assert_eq!(err, GcError::StackOverflow { capacity: 3 });
    assert_eq!(ctx.live_object_count(), 3);
}

#[test]
fn huge_stack_capacity_is_a_limit_not_a_reservation() {
    let config = GcConfig::new().with_stack_capacity(usize::MAX);
    let mut ctx = Context::with_config(config);
    assert_eq!(ctx.stack().capacity(), usize::MAX);

    for i in 0..300 {
        ctx.push_leaf(i).expect("push within capacity");
    }
    assert_eq!(ctx.stack().len(), 300);
}

#[test]
fn default_stack_holds_256_roots() {
    let mut ctx = Context::new();
    for i in 0..256 {
        ctx.push_leaf(i).expect("push within capacity");
    }
    assert!(matches!(
        ctx.push_leaf(256),
        Err(GcError::StackOverflow { capacity: 256 })
    ));

    ctx.force_collect();
    assert_eq!(ctx.live_object_count(), 256);
}

#[test]
fn threshold_tracks_live_set_after_automatic_collections() {
    let mut ctx = Context::new();
    for i in 0..8 {
        ctx.push_leaf(i).expect("push");
    }
    assert_eq!(ctx.heap().collect_threshold(), 8);

    ctx.push_leaf(8).expect("push triggers collection");
    assert_eq!(ctx.heap().total_collections(), 1);
    assert_eq!(ctx.heap().collect_threshold(), 16);
    assert_eq!(ctx.live_object_count(), 9);
}

#[test]
fn destroy_reclaims_everything() {
    let mut ctx = Context::new();
    ctx.push_leaf(1).expect("push 1");
    ctx.push_leaf(2).expect("push 2");
    ctx.push_pair().expect("pair");

    let stats = ctx.destroy();
    assert_eq!(stats.before, 3);
    assert_eq!(stats.collected, 3);
    assert_eq!(stats.after, 0);
}

#[test]
fn live_count_matches_stats_snapshot() {
    let mut ctx = Context::new();
    ctx.push_leaf(1).expect("push 1");
    ctx.push_leaf(2).expect("push 2");
    ctx.push_pair().expect("pair");
    ctx.push_leaf(3).expect("push 3");
    ctx.pop().expect("pop 3");
    ctx.force_collect();

    let stats = ctx.stats();
    assert_eq!(stats.live, ctx.live_object_count());
    assert_eq!(stats.leaves, 2);
    assert_eq!(stats.pairs, 1);
    assert_eq!(stats.total_allocations, 4);
    assert_eq!(stats.total_freed, 1);

    let json = serde_json::to_value(&stats).expect("stats serialize");
    assert_eq!(json["live"], 3);
}
