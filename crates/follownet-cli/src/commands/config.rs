//! Print the effective configuration

use crate::error::Result;
use crate::output;
use follownet::config::PipelineConfig;

pub(crate) fn run(config: &PipelineConfig, json: bool) -> Result<()> {
    config.validate()?;
    if json {
        return output::json(config);
    }
    print!("{}", config.to_toml_string()?);
    Ok(())
}
