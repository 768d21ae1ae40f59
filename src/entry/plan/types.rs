use std::time::Duration;

use crate::session::SessionOptions;
use crate::store::StoreConfig;
use crate::supervisor::ProcessSpec;

pub(in crate::entry) struct SupervisionPlan {
    pub(super) processes: Vec<ProcessSpec>,
    pub(super) startup_timeout: Duration,
}

pub(in crate::entry) struct AgentPlan {
    pub(super) prometheus_url: String,
    pub(super) request_timeout: Duration,
    pub(super) store: StoreConfig,
    pub(super) init_schema: bool,
    pub(super) session: SessionOptions,
    pub(super) supervision: Option<SupervisionPlan>,
    pub(super) once: bool,
    pub(super) no_color: bool,
}

pub(in crate::entry) enum RunPlan {
    InitDb { store: StoreConfig, no_color: bool },
    Agent(AgentPlan),
}
