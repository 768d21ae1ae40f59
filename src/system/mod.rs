pub(crate) mod banner;
pub(crate) mod logger;
pub(crate) mod shutdown_handlers;
