pub mod artwork;
pub mod de;
pub mod error;
mod fetch;
pub mod ugoira;

use ureq::Agent;

use crate::config::Config;

/// Blocking pixiv client. Holds the HTTP agent together with the immutable
/// [`Config`] it was built from.
#[derive(Clone)]
pub struct Client {
    agent: Agent,
    config: Config,
}

impl Client {
    pub fn new(config: Config) -> Self {
        let agent: Agent = Agent::config_builder()
            /* Status errors are reported with their body by `fetch` */
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .build()
            .into();

        Self { agent, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
