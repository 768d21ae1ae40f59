use clap::ArgMatches;

use crate::args::{AgentArgs, Command};
use crate::collector::CollectOptions;
use crate::config::{apply_config, load_config};
use crate::error::AppResult;
use crate::session::SessionOptions;
use crate::store::StoreConfig;
use crate::supervisor::ProcessSpec;

use super::types::{AgentPlan, RunPlan, SupervisionPlan};

pub(crate) fn build_plan(mut args: AgentArgs, matches: &ArgMatches) -> AppResult<RunPlan> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config)?;
    }

    let store = StoreConfig {
        url: args.db_url.clone(),
        write_timeout: args.write_timeout,
    };

    if let Some(Command::InitDb) = args.command {
        return Ok(RunPlan::InitDb {
            store,
            no_color: args.no_color,
        });
    }

    let supervision = args.supervise.then(|| SupervisionPlan {
        processes: supervised_processes(&args),
        startup_timeout: args.startup_timeout,
    });

    Ok(RunPlan::Agent(AgentPlan {
        session: SessionOptions {
            catalog_path: args.catalog,
            collect_timeout: args.collect_timeout,
            collect: CollectOptions {
                eval_instant: args.eval_instant,
                failure_policy: args.on_query_error,
            },
        },
        prometheus_url: args.prometheus_url,
        request_timeout: args.request_timeout,
        store,
        init_schema: args.init_schema,
        supervision,
        once: args.once,
        no_color: args.no_color,
    }))
}

fn supervised_processes(args: &AgentArgs) -> Vec<ProcessSpec> {
    vec![
        ProcessSpec::new("node-exporter", args.node_exporter_bin.clone()),
        ProcessSpec::new("prometheus", args.prometheus_bin.clone()).arg(format!(
            "--config.file={}",
            args.prometheus_config.display()
        )),
    ]
}
