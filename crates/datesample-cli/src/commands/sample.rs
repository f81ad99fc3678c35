use datesample_core::DateSampler;
use serde_json::json;

use super::{raw_input, CommandResult};
use crate::cli::SampleArgs;
use crate::error::CliError;

pub async fn run(args: &SampleArgs, sampler: &DateSampler) -> Result<CommandResult, CliError> {
    let mut input = raw_input(&args.range);
    input.batch_size = args.size.clone();
    input.seed = args.seed.clone();

    let outcome = sampler.sample(&input).await?;
    tracing::info!(
        seed = outcome.request.seed.get(),
        size = outcome.batch.len(),
        candidates = outcome.candidate_count,
        "sample drawn"
    );

    let data = json!({
        "dates": outcome.dates(),
        "request": outcome.request,
        "candidate_count": outcome.candidate_count,
        "draws": outcome.batch.draws(),
        "holidays_applied": outcome.holidays_applied,
        "holidays_removed": outcome.holidays_removed,
    });

    Ok(CommandResult::new(data, outcome.dates().to_vec())
        .with_seed(outcome.request.seed.get())
        .with_warnings(outcome.warnings))
}
