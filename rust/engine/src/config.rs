use serde::{Deserialize, Serialize};
use std::fs;

use crate::errors::ConfigError;
use crate::game::RoundType;
use crate::player::STARTING_HAND_SIZE;

/// Most French decks a table may shuffle together.
pub const MAX_DECK_COPIES: usize = 8;
/// Most jokers a table may add to the deck.
pub const MAX_JOKERS: usize = 64;

/// Table setup: seats, deck composition, dealing and seed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableConfig {
    pub seats: usize,
    pub hand_size: usize,
    pub jokers: usize,
    pub deck_copies: usize,
    pub seed: Option<u64>,
    pub round_type: RoundType,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seats: 1,
            hand_size: STARTING_HAND_SIZE,
            jokers: 2,
            deck_copies: 1,
            seed: None,
            round_type: RoundType::TwoTrios,
        }
    }
}

impl TableConfig {
    /// Two French decks and four jokers, the traditional Carioca pool.
    pub fn double_deck() -> Self {
        Self {
            jokers: 4,
            deck_copies: 2,
            ..Self::default()
        }
    }

    /// Cards in the full deck; saturates for configs `validate` would reject.
    pub fn deck_size(&self) -> usize {
        52usize
            .saturating_mul(self.deck_copies)
            .saturating_add(self.jokers)
    }

    /// Parses a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let f: FileConfig = toml::from_str(s)?;
        let mut cfg = TableConfig::default();
        f.apply(&mut cfg, &mut ConfigSources::default());
        validate(&cfg)?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seats: ValueSource,
    pub hand_size: ValueSource,
    pub jokers: ValueSource,
    pub deck_copies: ValueSource,
    pub seed: ValueSource,
    pub round_type: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seats: ValueSource::Default,
            hand_size: ValueSource::Default,
            jokers: ValueSource::Default,
            deck_copies: ValueSource::Default,
            seed: ValueSource::Default,
            round_type: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: TableConfig,
    pub sources: ConfigSources,
}

pub fn load() -> Result<TableConfig, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Defaults, then the TOML file named by `CARIOCA_CONFIG`, then the
/// `CARIOCA_*` environment overrides.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = TableConfig::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("CARIOCA_CONFIG") {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        f.apply(&mut cfg, &mut sources);
    }

    if let Some(v) = env_number("CARIOCA_SEED")? {
        cfg.seed = Some(v);
        sources.seed = ValueSource::Env;
    }
    if let Some(v) = env_number("CARIOCA_SEATS")? {
        cfg.seats = v;
        sources.seats = ValueSource::Env;
    }
    if let Some(v) = env_number("CARIOCA_HAND_SIZE")? {
        cfg.hand_size = v;
        sources.hand_size = ValueSource::Env;
    }
    if let Some(v) = env_number("CARIOCA_JOKERS")? {
        cfg.jokers = v;
        sources.jokers = ValueSource::Env;
    }
    if let Some(v) = env_number("CARIOCA_DECK_COPIES")? {
        cfg.deck_copies = v;
        sources.deck_copies = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn env_number<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", key, v))),
        _ => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    seats: Option<usize>,
    #[serde(default)]
    hand_size: Option<usize>,
    #[serde(default)]
    jokers: Option<usize>,
    #[serde(default)]
    deck_copies: Option<usize>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    round_type: Option<RoundType>,
}

impl FileConfig {
    fn apply(self, cfg: &mut TableConfig, sources: &mut ConfigSources) {
        if let Some(v) = self.seats {
            cfg.seats = v;
            sources.seats = ValueSource::File;
        }
        if let Some(v) = self.hand_size {
            cfg.hand_size = v;
            sources.hand_size = ValueSource::File;
        }
        if let Some(v) = self.jokers {
            cfg.jokers = v;
            sources.jokers = ValueSource::File;
        }
        if let Some(v) = self.deck_copies {
            cfg.deck_copies = v;
            sources.deck_copies = ValueSource::File;
        }
        if let Some(v) = self.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = self.round_type {
            cfg.round_type = v;
            sources.round_type = ValueSource::File;
        }
    }
}

fn validate(cfg: &TableConfig) -> Result<(), ConfigError> {
    if cfg.seats == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: seats must be >=1".into(),
        ));
    }
    if cfg.hand_size == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: hand_size must be >=1".into(),
        ));
    }
    if cfg.deck_copies == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: deck_copies must be >=1".into(),
        ));
    }
    if cfg.deck_copies > MAX_DECK_COPIES {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: deck_copies must be <={}",
            MAX_DECK_COPIES
        )));
    }
    if cfg.jokers > MAX_JOKERS {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: jokers must be <={}",
            MAX_JOKERS
        )));
    }
    // every seat is dealt and one natural card must remain for the discard
    let naturals = 52 * cfg.deck_copies;
    let fits = cfg
        .seats
        .checked_mul(cfg.hand_size)
        .is_some_and(|dealt| dealt < naturals);
    if !fits {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: {} seats x {} cards do not fit a {}-card deck",
            cfg.seats,
            cfg.hand_size,
            cfg.deck_size()
        )));
    }
    Ok(())
}
