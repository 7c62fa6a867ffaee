use babygc::{Context, GcConfig, GcError};
use owo_colors::OwoColorize;

pub struct Scenario {
    pub name: &'static str,
    pub expected_live: usize,
    build: fn(&mut Context) -> Result<(), GcError>,
}

pub const SCENARIOS: [Scenario; 4] = [
    Scenario {
        name: "collector keeps rooted objects",
        expected_live: 2,
        build: rooted_leaves,
    },
    Scenario {
        name: "collector frees unreached objects",
        expected_live: 0,
        build: popped_leaves,
    },
    Scenario {
        name: "collector reaches nested objects",
        expected_live: 7,
        build: nested_pairs,
    },
    Scenario {
        name: "collector handles cyclic references",
        expected_live: 4,
        build: cyclic_pairs,
    },
];

fn rooted_leaves(ctx: &mut Context) -> Result<(), GcError> {
    ctx.push_leaf(1)?;
    ctx.push_leaf(2)?;
    Ok(())
}

fn popped_leaves(ctx: &mut Context) -> Result<(), GcError> {
    rooted_leaves(ctx)?;
    ctx.pop()?;
    ctx.pop()?;
    Ok(())
}

fn nested_pairs(ctx: &mut Context) -> Result<(), GcError> {
    ctx.push_leaf(1)?;
    ctx.push_leaf(2)?;
    ctx.push_pair()?;
    ctx.push_leaf(3)?;
    ctx.push_leaf(4)?;
    ctx.push_pair()?;
    ctx.push_pair()?;
    Ok(())
}

fn cyclic_pairs(ctx: &mut Context) -> Result<(), GcError> {
    ctx.push_leaf(1)?;
    ctx.push_leaf(2)?;
    let a = ctx.push_pair()?;
    ctx.push_leaf(3)?;
    ctx.push_leaf(4)?;
    let b = ctx.push_pair()?;
    ctx.set_tail(a, b)?;
    ctx.set_tail(b, a)?;
    Ok(())
}

pub enum Verdict {
    Passed,
    WrongCount(usize),
    Failed(GcError),
}

impl Scenario {
    pub fn run(&self, config: GcConfig) -> Verdict {
        let mut ctx = Context::with_config(config);
        if let Err(err) = (self.build)(&mut ctx) {
            return Verdict::Failed(err);
        }

        let stats = ctx.force_collect();
        println!(
            "  {} - {} = {}",
            stats.before,
            stats.collected.bright_black(),
            stats.after.bold()
        );

        let live = ctx.live_object_count();
        ctx.destroy();
        if live == self.expected_live {
            Verdict::Passed
        } else {
            Verdict::WrongCount(live)
        }
    }
}

/// Runs every scenario and reports whether all of them passed.
pub fn run_all(config: GcConfig) -> bool {
    let mut passed = 0;
    for (idx, scenario) in SCENARIOS.iter().enumerate() {
        println!("{} {}", format!("Test {}", idx + 1).bright_cyan().bold(), scenario.name);
        match scenario.run(config) {
            Verdict::Passed => {
                passed += 1;
                println!("  {}", "ok".green());
            }
            Verdict::WrongCount(live) => println!(
                "  {} expected {} live object(s), found {live}",
                "FAILED".red().bold(),
                scenario.expected_live
            ),
            Verdict::Failed(err) => println!("  {} {err}", "FAILED".red().bold()),
        }
    }

    println!(
        "\n{} {passed}/{} scenarios passed",
        "summary:".bold(),
        SCENARIOS.len()
    );
    passed == SCENARIOS.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_scenario_passes_with_default_config() {
        for scenario in &SCENARIOS {
            assert!(
                matches!(scenario.run(GcConfig::default()), Verdict::Passed),
                "scenario '{}' failed",
                scenario.name
            );
        }
    }

    #[test]
    fn scenarios_hold_under_aggressive_collection() {
        let config = GcConfig::new().with_initial_threshold(1);
        for scenario in &SCENARIOS {
            assert!(
                matches!(scenario.run(config), Verdict::Passed),
                "scenario '{}' failed",
                scenario.name
            );
        }
    }
}
