use crate::ai::config::AiConfig;
use crate::github::GithubConfig;

#[derive(Clone)]
pub struct Config {
    pub ai: Option<AiConfig>,
    pub github: Option<GithubConfig>,
}

impl Config {
    /// Pure read of the process environment; `run()` loads the `.env`
    /// file beforehand.
    pub fn from_env() -> Self {
        Self {
            ai: AiConfig::from_env(),
            github: GithubConfig::from_env(),
        }
    }
}
