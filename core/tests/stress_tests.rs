use babygc::{Context, GcConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEEDS: [u64; 4] = [0, 1, 0x5eed, 1_700_000_000];

fn check(ctx: &Context) {
    ctx.verify().expect("heap invariants should hold");
}

fn check_collected(ctx: &Context) {
    ctx.heap()
        .verify_collected(ctx.stack().roots())
        .expect("only reachable objects should survive a collection");
}

#[test]
fn random_leaf_rounds_never_leak() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ctx = Context::new();
        let capacity = ctx.stack().capacity();

        for i in 0..500i64 {
            let round = rng.gen_range(1..=capacity);
            for j in 0..round {
                ctx.push_leaf(i + j as i64).expect("round fits the stack");
            }
            check(&ctx);
            for _ in 0..round {
                ctx.pop().expect("popping what was pushed");
            }
        }

        ctx.force_collect();
        assert_eq!(ctx.live_object_count(), 0, "seed {seed}");
        assert_eq!(ctx.heap().collect_threshold(), ctx.config().initial_threshold);
    }
}

#[test]
fn random_pair_rounds_keep_reachable_objects() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ctx = Context::new();
        let capacity = ctx.stack().capacity();

        for i in 0..500i64 {
            let round = rng.gen_range(1..=capacity);
            let mut paired = 0;
            for j in 0..round {
                ctx.push_leaf(i + j as i64).expect("round fits the stack");
                if j % 2 == 1 {
                    ctx.push_pair().expect("two operands are available");
                    paired += 1;
                }
            }

            ctx.force_collect();
            check_collected(&ctx);
            // every pushed leaf is still reachable, plus one pair per merge
            assert_eq!(ctx.live_object_count(), round + paired, "seed {seed}");

            for _ in 0..round - paired {
                ctx.pop().expect("popping what was pushed");
            }
        }

        let stats = ctx.destroy();
        assert_eq!(stats.after, 0);
    }
}

#[test]
fn random_mixed_operations_respect_reachability() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut ctx = Context::with_config(GcConfig::new().with_stack_capacity(64));

        for step in 0..20_000i64 {
            match rng.gen_range(0..10) {
                0..=4 if ctx.stack().len() < ctx.stack().capacity() => {
                    ctx.push_leaf(step).expect("room was checked");
                }
                5..=6 if ctx.stack().len() >= 2 => {
                    ctx.push_pair().expect("two operands were checked");
                }
                7..=8 if !ctx.stack().is_empty() => {
                    ctx.pop().expect("stack was non-empty");
                }
                9 => {
                    ctx.force_collect();
                    check_collected(&ctx);
                }
                _ => {}
            }
            check(&ctx);
        }

        ctx.force_collect();
        let reachable = ctx.heap().reachable_from(ctx.stack().roots());
        assert_eq!(ctx.live_object_count(), reachable.len(), "seed {seed}");
    }
}
