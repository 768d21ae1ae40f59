mod plan;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::AgentArgs;
use crate::error::AppResult;
use plan::{build_plan, execute_plan};

/// Parses the command line, initializes logging and runs the agent to
/// completion.
///
/// # Errors
///
/// Returns the first fatal error of the run; it has already been logged.
pub fn run() -> AppResult<()> {
    let (args, matches) = parse_args()?;

    crate::system::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args, &matches))
}

fn parse_args() -> AppResult<(AgentArgs, ArgMatches)> {
    let matches = AgentArgs::command().get_matches();
    let args = AgentArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

async fn run_async(args: AgentArgs, matches: &ArgMatches) -> AppResult<()> {
    let outcome = match build_plan(args, matches) {
        Ok(plan) => execute_plan(plan).await,
        Err(err) => Err(err),
    };
    if let Err(err) = &outcome {
        tracing::error!("promingest failed: {}", err);
    }
    outcome
}
