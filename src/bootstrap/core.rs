use std::sync::Arc;

use crate::{
    config::{self, Config},
    managers::{self, Managers},
};

pub(crate) struct CoreBootstrap {
    pub(crate) config: Arc<Config>,
    pub(crate) managers: Managers,
}

pub(crate) async fn build_core() -> CoreBootstrap {
    let config = Arc::new(config::initialize_configuration());
    crate::logger::initialize(&config.logger, &config.telemetry);

    let managers = managers::initialize(&config.managers, &config.accounts).await;

    CoreBootstrap { config, managers }
}
