//! Configuration structures for the extraction engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the docfield engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocfieldConfig {
    /// Block clustering configuration.
    pub cluster: ClusterConfig,

    /// Identifier candidate scoring configuration.
    pub scoring: ScoringConfig,

    /// Label-proximity matching configuration.
    pub labels: LabelConfig,

    /// OCR collaborator configuration.
    pub ocr: OcrConfig,
}

/// Block clustering thresholds, as fractions of the image dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Maximum vertical gap between merged boxes (fraction of image height).
    pub vertical_threshold: f32,

    /// Maximum left or right edge offset for column alignment (fraction of
    /// image width).
    pub horizontal_threshold: f32,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            vertical_threshold: 0.016,
            horizontal_threshold: 0.016,
        }
    }
}

/// How the proximity window around the anchor is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ProximityWindow {
    /// Keep the anchor origin and scale its width and height.
    Multiplicative { width_factor: f32, height_factor: f32 },
    /// Grow the anchor by a fixed normalized margin on every side.
    Additive { dx: f32, dy: f32 },
}

impl Default for ProximityWindow {
    fn default() -> Self {
        ProximityWindow::Multiplicative {
            width_factor: 3.0,
            height_factor: 5.0,
        }
    }
}

/// Identifier candidate scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Keyword whose location seeds proximity scoring.
    pub anchor: String,

    /// Characters allowed inside an identifier besides letters and digits.
    pub separators: String,

    /// Proximity window policy.
    pub window: ProximityWindow,

    /// Bonus for tokens inside the proximity window.
    pub proximity_weight: i32,

    /// Bonus for fully upper-case tokens.
    pub uppercase_weight: i32,

    /// Bonus for tokens mixing letters and digits.
    pub alnum_weight: i32,

    /// Bonus for tokens containing a separator.
    pub separator_weight: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            anchor: "invoice".to_string(),
            separators: "-/\\".to_string(),
            window: ProximityWindow::default(),
            proximity_weight: 10,
            uppercase_weight: 1,
            alnum_weight: 1,
            separator_weight: 1,
        }
    }
}

/// Label-proximity matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Label keywords, in assignment order.
    pub keywords: Vec<String>,

    /// Render assigned values as `YYYY-MM-DD` instead of the raw text.
    pub canonical_values: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            keywords: vec![
                "Invoice Date".to_string(),
                "Due Date".to_string(),
                "Tax Point Date".to_string(),
                "Delivery Date".to_string(),
            ],
            canonical_values: false,
        }
    }
}

/// OCR collaborator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` markers in recognized text.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
        }
    }
}

impl OcrConfig {
    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.model_dir.join(model_name)
    }
}

impl DocfieldConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{"scoring": {"anchor": "rechnung"}, "labels": {"canonical_values": true}}"#;
        let config: DocfieldConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.scoring.anchor, "rechnung");
        assert_eq!(config.scoring.proximity_weight, 10);
        assert!(config.labels.canonical_values);
        assert_eq!(config.labels.keywords.len(), 4);
        assert_eq!(config.cluster, ClusterConfig::default());
    }

    #[test]
    fn test_window_policy_serde() {
        let json = r#"{"policy": "additive", "dx": 0.05, "dy": 0.02}"#;
        let window: ProximityWindow = serde_json::from_str(json).unwrap();
        assert_eq!(window, ProximityWindow::Additive { dx: 0.05, dy: 0.02 });
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = DocfieldConfig::default();
        config.cluster.vertical_threshold = 0.02;
        config.save(&path).unwrap();

        let loaded = DocfieldConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
