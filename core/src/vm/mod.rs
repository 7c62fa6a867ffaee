pub mod bytecode;
pub mod machine;

use crate::config::GcConfig;
use crate::context::Context;
use crate::errors::BabyGcError;

pub fn run_source(source: &str) -> Result<Context, BabyGcError> {
    run_source_with_config(source, GcConfig::default())
}

/// Parses `source` and runs it on a fresh context, returning the context
/// so callers can inspect the resulting heap.
pub fn run_source_with_config(source: &str, config: GcConfig) -> Result<Context, BabyGcError> {
    let program = bytecode::Program::parse(source)?;
    let mut ctx = Context::with_config(config);
    ctx.run_program(&program)?;
    Ok(ctx)
}
