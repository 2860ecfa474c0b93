//! Generation settings and TOML scramble profiles
//!
//! A profile file mirrors the call contract of [`crate::generate`]:
//!
//! ```toml
//! top_layer = "RRRRRRRRRRRR"
//! bottom_layer = "RRRRRRRRRRRR"
//! middle_layer = ["/", "|"]
//! rul = [0, 1, -1]
//! rdl = [0]
//! auf = ["U0", "U", "U2", "U'"]
//! adf = ["D0"]
//! parity = ["tnbn", "tpbp"]
//! budget_ms = 100
//!
//! [constraints]
//! AB = "1357"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::assign::{ParityMode, DEFAULT_BUDGET};
use crate::piece::{ConstraintMap, PieceSet};
use crate::shape::rotation::ROTATIONS;
use crate::shape::slot::{letter_slot, Layer, LAYER_SLOTS};
use crate::state::DEFAULT_DIVIDER;
use crate::transform::{FaceTurn, TransformPipeline, UnknownTurn};

/// Layer text with every slot free
pub const FREE_LAYER: &str = "RRRRRRRRRRRR";

/// Errors in a generation profile
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read profile file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse profile TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    UnknownTurn(#[from] UnknownTurn),

    #[error("rotation {0} is outside -5..=6")]
    RotationOutOfRange(i64),

    #[error("equator '{0}' must be a single character")]
    InvalidEquator(String),

    #[error("constraint label '{0}' does not name a slot or a pair of adjacent slots")]
    InvalidLabel(String),

    #[error("constraint '{label}' allows '{ch}', which is not a hex digit")]
    InvalidConstraint { label: String, ch: char },
}

/// Everything one generation call needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Twelve placeholders for the top layer
    pub top_layer: String,
    /// Twelve placeholders for the bottom layer
    pub bottom_layer: String,
    /// Divider characters to choose the equator from
    pub middle_layer: Vec<char>,
    /// Candidate top-layer rotations
    pub rul: Vec<i8>,
    /// Candidate bottom-layer rotations
    pub rdl: Vec<i8>,
    /// Candidate relabels for the `0`-`7` group
    pub auf: Vec<FaceTurn>,
    /// Candidate relabels for the `8`-`f` group
    pub adf: Vec<FaceTurn>,
    /// Extra constraints, overriding those implied by the layer text
    pub constraints: ConstraintMap,
    /// Acceptable parity modes
    pub parity: Vec<ParityMode>,
    /// Solver time per parity mode
    pub budget: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            top_layer: FREE_LAYER.to_string(),
            bottom_layer: FREE_LAYER.to_string(),
            middle_layer: vec![DEFAULT_DIVIDER],
            rul: vec![0],
            rdl: vec![0],
            auf: vec![FaceTurn::Zero],
            adf: vec![FaceTurn::Zero],
            constraints: ConstraintMap::new(),
            parity: vec![ParityMode::On],
            budget: DEFAULT_BUDGET,
        }
    }
}

/// TOML structure for deserializing profiles
#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct TomlProfile {
    top_layer: Option<String>,
    bottom_layer: Option<String>,
    middle_layer: Option<Vec<String>>,
    rul: Option<Vec<i64>>,
    rdl: Option<Vec<i64>>,
    auf: Option<Vec<String>>,
    adf: Option<Vec<String>>,
    constraints: Option<std::collections::BTreeMap<String, String>>,
    parity: Option<Vec<ParityMode>>,
    budget_ms: Option<u64>,
}

impl GeneratorConfig {
    /// Create a configuration with the default (fully random) settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a profile from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a profile from a TOML string. Missing keys keep their defaults.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlProfile = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(top) = parsed.top_layer {
            config.top_layer = top;
        }
        if let Some(bottom) = parsed.bottom_layer {
            config.bottom_layer = bottom;
        }
        if let Some(middle) = parsed.middle_layer {
            config.middle_layer = middle
                .into_iter()
                .map(|s| parse_equator(&s))
                .collect::<Result<_, _>>()?;
        }
        if let Some(rul) = parsed.rul {
            config.rul = parse_rotations(&rul)?;
        }
        if let Some(rdl) = parsed.rdl {
            config.rdl = parse_rotations(&rdl)?;
        }
        if let Some(auf) = parsed.auf {
            config.auf = parse_turns(Layer::Top, &auf)?;
        }
        if let Some(adf) = parsed.adf {
            config.adf = parse_turns(Layer::Bottom, &adf)?;
        }
        if let Some(constraints) = parsed.constraints {
            for (label, digits) in constraints {
                let allowed = PieceSet::from_hex_str(&digits).map_err(|ch| {
                    ConfigError::InvalidConstraint {
                        label: label.clone(),
                        ch,
                    }
                })?;
                config.constraints.insert(label, allowed);
            }
        }
        if let Some(parity) = parsed.parity {
            config.parity = parity;
        }
        if let Some(ms) = parsed.budget_ms {
            config.budget = Duration::from_millis(ms);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set both layer placeholder strings
    pub fn with_layers(mut self, top: impl Into<String>, bottom: impl Into<String>) -> Self {
        self.top_layer = top.into();
        self.bottom_layer = bottom.into();
        self
    }

    /// Set the divider characters to choose from
    pub fn with_middle_layer(mut self, dividers: Vec<char>) -> Self {
        self.middle_layer = dividers;
        self
    }

    pub fn with_rotations(mut self, rul: Vec<i8>, rdl: Vec<i8>) -> Self {
        self.rul = rul;
        self.rdl = rdl;
        self
    }

    pub fn with_face_turns(mut self, auf: Vec<FaceTurn>, adf: Vec<FaceTurn>) -> Self {
        self.auf = auf;
        self.adf = adf;
        self
    }

    /// Restrict a labelled position to the given identities
    pub fn with_constraint(mut self, label: impl Into<String>, allowed: PieceSet) -> Self {
        self.constraints.insert(label.into(), allowed);
        self
    }

    pub fn with_parity(mut self, modes: Vec<ParityMode>) -> Self {
        self.parity = modes;
        self
    }

    /// Set the solver time budget per parity mode
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    /// Check rotations and constraint labels
    pub fn validate(&self) -> Result<(), ConfigError> {
        for rotation in self.rul.iter().chain(&self.rdl) {
            if !ROTATIONS.contains(rotation) {
                return Err(ConfigError::RotationOutOfRange(*rotation as i64));
            }
        }
        for label in self.constraints.keys() {
            if !is_valid_label(label) {
                return Err(ConfigError::InvalidLabel(label.clone()));
            }
        }
        Ok(())
    }

    /// Transform candidates, with empty lists falling back to the defaults
    pub fn pipeline(&self) -> TransformPipeline<'_> {
        TransformPipeline {
            equators: &self.middle_layer,
            auf: &self.auf,
            adf: &self.adf,
            rul: &self.rul,
            rdl: &self.rdl,
        }
    }
}

fn parse_equator(text: &str) -> Result<char, ConfigError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(ConfigError::InvalidEquator(text.to_string())),
    }
}

fn parse_rotations(values: &[i64]) -> Result<Vec<i8>, ConfigError> {
    values
        .iter()
        .map(|v| {
            i8::try_from(*v)
                .ok()
                .filter(|r| ROTATIONS.contains(r))
                .ok_or(ConfigError::RotationOutOfRange(*v))
        })
        .collect()
}

fn parse_turns(layer: Layer, codes: &[String]) -> Result<Vec<FaceTurn>, ConfigError> {
    codes
        .iter()
        .map(|code| FaceTurn::parse(layer, code).map_err(ConfigError::from))
        .collect()
}

/// One slot letter, or two letters naming adjacent slots of the same layer
fn is_valid_label(label: &str) -> bool {
    let slots: Option<Vec<usize>> = label.chars().map(letter_slot).collect();
    match slots.as_deref() {
        Some([_]) => true,
        Some([a, b]) => *b == a + 1 && a % LAYER_SLOTS != LAYER_SLOTS - 1,
        _ => false,
    }
}
