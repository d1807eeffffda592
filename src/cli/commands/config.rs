//! Implementation of the `casimir-sweep config` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ConfigOutput {
    pub config: Config,
}

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        serde_yaml::to_string(&self.config)
            .unwrap_or_else(|e| format!("# failed to render configuration: {e}"))
    }
}

pub async fn execute(_args: ConfigArgs, config: Config, json_mode: bool) -> Result<()> {
    output(&ConfigOutput { config }, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_rendering_round_trips() {
        let rendered = ConfigOutput {
            config: Config::default(),
        }
        .to_human();
        let parsed: Config = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(parsed.pool_size, 6);
        assert_eq!(parsed.evaluator.program, "casimir-logdetd");
    }

    #[test]
    fn test_json_is_the_bare_config() {
        let json = ConfigOutput {
            config: Config::default(),
        }
        .to_json();
        assert_eq!(json["lmax"], 160);
        assert_eq!(json["executor"]["backend"], "blocking");
    }
}
