use serde::{Deserialize, Serialize};

use crate::model::Template;
use crate::scoring::ScoringConfig;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub template: Template,
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
}
