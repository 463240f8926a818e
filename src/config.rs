use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub league: LeagueConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub sales: SalesConfig,
    #[serde(default)]
    pub replacements: ReplacementsConfig,
    #[serde(default)]
    pub transfers: TransfersConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LeagueConfig {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_metric")]
    pub metric: String,
    #[serde(default = "default_goal")]
    pub goal: String,
}

/// Heuristic constants behind the sale rules. The defaults are the observed
/// production values; treat retuning as a stakeholder decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesConfig {
    #[serde(default = "default_expected_value_haircut")]
    pub expected_value_haircut: f64,
    #[serde(default = "default_budget_pressure_ratio")]
    pub budget_pressure_ratio: f64,
    #[serde(default = "default_overpriced_multiplier")]
    pub overpriced_multiplier: f64,
    #[serde(default = "default_performance_floor")]
    pub performance_floor: f64,
    #[serde(default = "default_sell_high_ratio")]
    pub sell_high_ratio: f64,
    #[serde(default = "default_value_drop_alert")]
    pub value_drop_alert: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplacementsConfig {
    #[serde(default = "default_price_penalty_per_million")]
    pub price_penalty_per_million: f64,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransfersConfig {
    #[serde(default = "default_season_rounds")]
    pub season_rounds: u32,
    #[serde(default = "default_form_trend_reference")]
    pub form_trend_reference: i64,
    #[serde(default = "default_collapse_trend")]
    pub collapse_trend: i64,
    #[serde(default = "default_affordability_scale")]
    pub affordability_scale: i64,
    #[serde(default = "default_weight_performance")]
    pub weight_performance: f64,
    #[serde(default = "default_weight_value")]
    pub weight_value: f64,
    #[serde(default = "default_weight_need")]
    pub weight_need: f64,
    #[serde(default = "default_weight_risk")]
    pub weight_risk: f64,
    #[serde(default = "default_risk_low_max")]
    pub risk_low_max: f64,
    #[serde(default = "default_risk_medium_max")]
    pub risk_medium_max: f64,
    #[serde(default = "default_essential_need_floor")]
    pub essential_need_floor: f64,
    #[serde(default = "default_essential_score_floor")]
    pub essential_score_floor: f64,
    #[serde(default = "default_recommended_score_floor")]
    pub recommended_score_floor: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub league_id: Option<String>,
    pub metric: Option<String>,
    pub goal: Option<String>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/squad-oracle/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(league_id) = overrides.league_id {
            self.league.id = league_id;
        }
        if let Some(metric) = overrides.metric {
            self.engine.metric = metric;
        }
        if let Some(goal) = overrides.goal {
            self.engine.goal = goal;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn default_template() -> String {
        let template = r#"[league]
id = ""

[engine]
metric = "average_points"
goal = "balance_budget"

[sales]
expected_value_haircut = 0.95
budget_pressure_ratio = 0.5
overpriced_multiplier = 1.4
performance_floor = 0.6
sell_high_ratio = 0.1
value_drop_alert = 100000

[replacements]
price_penalty_per_million = 0.5
max_suggestions = 5

[transfers]
season_rounds = 38
form_trend_reference = 300000
collapse_trend = 100000
affordability_scale = 5000000
weight_performance = 0.35
weight_value = 0.25
weight_need = 0.25
weight_risk = 0.15
risk_low_max = 0.35
risk_medium_max = 0.65
essential_need_floor = 0.75
essential_score_floor = 0.55
recommended_score_floor = 0.4
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            league: LeagueConfig::default(),
            engine: EngineConfig::default(),
            sales: SalesConfig::default(),
            replacements: ReplacementsConfig::default(),
            transfers: TransfersConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            metric: default_metric(),
            goal: default_goal(),
        }
    }
}

impl Default for SalesConfig {
    fn default() -> Self {
        Self {
            expected_value_haircut: default_expected_value_haircut(),
            budget_pressure_ratio: default_budget_pressure_ratio(),
            overpriced_multiplier: default_overpriced_multiplier(),
            performance_floor: default_performance_floor(),
            sell_high_ratio: default_sell_high_ratio(),
            value_drop_alert: default_value_drop_alert(),
        }
    }
}

impl Default for ReplacementsConfig {
    fn default() -> Self {
        Self {
            price_penalty_per_million: default_price_penalty_per_million(),
            max_suggestions: default_max_suggestions(),
        }
    }
}

impl Default for TransfersConfig {
    fn default() -> Self {
        Self {
            season_rounds: default_season_rounds(),
            form_trend_reference: default_form_trend_reference(),
            collapse_trend: default_collapse_trend(),
            affordability_scale: default_affordability_scale(),
            weight_performance: default_weight_performance(),
            weight_value: default_weight_value(),
            weight_need: default_weight_need(),
            weight_risk: default_weight_risk(),
            risk_low_max: default_risk_low_max(),
            risk_medium_max: default_risk_medium_max(),
            essential_need_floor: default_essential_need_floor(),
            essential_score_floor: default_essential_score_floor(),
            recommended_score_floor: default_recommended_score_floor(),
        }
    }
}

fn default_metric() -> String {
    "average_points".to_string()
}

fn default_goal() -> String {
    "balance_budget".to_string()
}

fn default_expected_value_haircut() -> f64 {
    0.95
}

fn default_budget_pressure_ratio() -> f64 {
    0.5
}

fn default_overpriced_multiplier() -> f64 {
    1.4
}

fn default_performance_floor() -> f64 {
    0.6
}

fn default_sell_high_ratio() -> f64 {
    0.1
}

fn default_value_drop_alert() -> i64 {
    100_000
}

fn default_price_penalty_per_million() -> f64 {
    0.5
}

fn default_max_suggestions() -> usize {
    5
}

fn default_season_rounds() -> u32 {
    38
}

fn default_form_trend_reference() -> i64 {
    300_000
}

fn default_collapse_trend() -> i64 {
    100_000
}

fn default_affordability_scale() -> i64 {
    5_000_000
}

fn default_weight_performance() -> f64 {
    0.35
}

fn default_weight_value() -> f64 {
    0.25
}

fn default_weight_need() -> f64 {
    0.25
}

fn default_weight_risk() -> f64 {
    0.15
}

fn default_risk_low_max() -> f64 {
    0.35
}

fn default_risk_medium_max() -> f64 {
    0.65
}

fn default_essential_need_floor() -> f64 {
    0.75
}

fn default_essential_score_floor() -> f64 {
    0.55
}

fn default_recommended_score_floor() -> f64 {
    0.4
}
