use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::piece::{Color, PieceType};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("auto_promotion must be Queen, Rook, Bishop or Knight, not {0:?}")]
    InvalidPromotion(PieceType),
}

/// Which sides are driven by a policy rather than a person. Policy sides never
/// wait on a promotion choice.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    #[default]
    HumanVsHuman,
    WhiteAi,
    BlackAi,
    AiVsAi,
}

impl GameMode {
    pub fn is_ai(self, color: Color) -> bool {
        match self {
            GameMode::HumanVsHuman => false,
            GameMode::WhiteAi => color == Color::White,
            GameMode::BlackAi => color == Color::Black,
            GameMode::AiVsAi => true,
        }
    }
}

/// Result when the side to move has no piece move at all.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StalemateRule {
    /// The stalemated side loses.
    #[default]
    LossForStalemated,
    Draw,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub mode: GameMode,
    pub stalemate_rule: StalemateRule,
    /// Plies without a pawn move or capture before the game is drawn.
    pub halfmove_limit: u32,
    /// Occurrences of one position that draw the game.
    pub repetition_limit: usize,
    /// Kind chosen for policy-driven sides on promotion.
    pub auto_promotion: PieceType,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    pub fn new() -> Self {
        GameConfig {
            mode: GameMode::HumanVsHuman,
            stalemate_rule: StalemateRule::LossForStalemated,
            halfmove_limit: 100,
            repetition_limit: 3,
            auto_promotion: PieceType::Queen,
        }
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.auto_promotion.is_promotion_target() {
            return Err(ConfigError::InvalidPromotion(self.auto_promotion));
        }
        Ok(())
    }

    /// The kind policy-driven sides promote to. A config built in code can
    /// skip `validate`, so anything that is not a promotion target reads as Queen.
    pub fn promotion_kind(&self) -> PieceType {
        if self.auto_promotion.is_promotion_target() {
            self.auto_promotion
        } else {
            PieceType::Queen
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = GameConfig::from_json(r#"{ "stalemate_rule": "draw", "mode": "ai_vs_ai" }"#)
            .expect("valid config");
        assert_eq!(config.stalemate_rule, StalemateRule::Draw);
        assert_eq!(config.mode, GameMode::AiVsAi);
        assert_eq!(config.halfmove_limit, 100);
        assert_eq!(config.repetition_limit, 3);
        assert_eq!(config.auto_promotion, PieceType::Queen);
    }

    #[test]
    fn json_survives_a_round_trip() {
        let mut config = GameConfig::new();
        config.mode = GameMode::BlackAi;
        config.auto_promotion = PieceType::Knight;
        let text = config.to_json().expect("serializable");
        assert_eq!(GameConfig::from_json(&text).expect("parsable"), config);
    }

    #[test]
    fn non_promotion_kinds_are_rejected() {
        for text in [r#"{ "auto_promotion": "King" }"#, r#"{ "auto_promotion": "Pawn" }"#] {
            assert!(matches!(
                GameConfig::from_json(text),
                Err(ConfigError::InvalidPromotion(_))
            ));
        }
        let mut config = GameConfig::new();
        config.auto_promotion = PieceType::King;
        assert_eq!(config.promotion_kind(), PieceType::Queen);
        config.auto_promotion = PieceType::Rook;
        assert_eq!(config.promotion_kind(), PieceType::Rook);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(GameConfig::from_json(r#"{ "mode": "robots" }"#).is_err());
    }

    #[test]
    fn mode_marks_ai_sides() {
        assert!(GameMode::WhiteAi.is_ai(Color::White));
        assert!(!GameMode::WhiteAi.is_ai(Color::Black));
        assert!(GameMode::AiVsAi.is_ai(Color::Black));
        assert!(!GameMode::HumanVsHuman.is_ai(Color::White));
    }
}
