#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    CatalogLoaded,
    Collected,
    Ingested,
    Done,
    Failed,
}

impl SessionState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::CatalogLoaded => "catalog-loaded",
            SessionState::Collected => "collected",
            SessionState::Ingested => "ingested",
            SessionState::Done => "done",
            SessionState::Failed => "failed",
        }
    }
}
