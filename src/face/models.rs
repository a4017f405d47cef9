//! Wire types for the Face API detect response.
//!
//! Field optionality mirrors the service contract: attributes and landmarks
//! are present only when requested in the detect call.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// A single face found by the detection call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedFace {
    pub face_id: Option<Uuid>,
    pub face_rectangle: FaceRectangle,
    pub face_landmarks: Option<HashMap<String, LandmarkPoint>>,
    pub face_attributes: Option<FaceAttributes>,
}

/// Bounding box of a detected face, in pixels.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FaceRectangle {
    pub top: u32,
    pub left: u32,
    pub width: u32,
    pub height: u32,
}

/// A named landmark coordinate (pupilLeft, noseTip, ...).
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LandmarkPoint {
    pub x: f64,
    pub y: f64,
}

/// The per-face attributes bag.
#[derive(Debug, Clone, Deserialize)]
pub struct FaceAttributes {
    pub age: Option<f64>,
    pub gender: Option<Gender>,
    pub emotion: Option<EmotionScores>,
}

/// Gender as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// Confidence per emotion label, each in [0, 1].
///
/// The label set is fixed by the service; [`scores`](Self::scores) exposes
/// it as ordered pairs so ranking never depends on map iteration order.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct EmotionScores {
    pub anger: f64,
    pub contempt: f64,
    pub disgust: f64,
    pub fear: f64,
    pub happiness: f64,
    pub neutral: f64,
    pub sadness: f64,
    pub surprise: f64,
}

impl EmotionScores {
    /// All (label, confidence) pairs, in declaration order.
    pub fn scores(&self) -> [(&'static str, f64); 8] {
        [
            ("anger", self.anger),
            ("contempt", self.contempt),
            ("disgust", self.disgust),
            ("fear", self.fear),
            ("happiness", self.happiness),
            ("neutral", self.neutral),
            ("sadness", self.sadness),
            ("surprise", self.surprise),
        ]
    }
}

/// Error envelope returned by the service on non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_face() {
        let body = serde_json::json!([{
            "faceId": "c5c24a82-6845-4031-9d5d-978df9175426",
            "faceRectangle": {"top": 621, "left": 616, "width": 195, "height": 195},
            "faceAttributes": {
                "age": 45.0,
                "gender": "male",
                "emotion": {
                    "anger": 0.0, "contempt": 0.001, "disgust": 0.0, "fear": 0.0,
                    "happiness": 0.97, "neutral": 0.02, "sadness": 0.0, "surprise": 0.009
                }
            }
        }]);

        let faces: Vec<DetectedFace> = serde_json::from_value(body).unwrap();
        assert_eq!(faces.len(), 1);

        let face = &faces[0];
        assert_eq!(
            face.face_id,
            Some(Uuid::parse_str("c5c24a82-6845-4031-9d5d-978df9175426").unwrap())
        );
        assert_eq!(face.face_rectangle.width, 195);
        assert!(face.face_landmarks.is_none());

        let attributes = face.face_attributes.as_ref().unwrap();
        assert_eq!(attributes.age, Some(45.0));
        assert_eq!(attributes.gender, Some(Gender::Male));
        assert_eq!(attributes.emotion.unwrap().happiness, 0.97);
    }

    #[test]
    fn test_decode_face_without_attributes() {
        let body = serde_json::json!([{
            "faceId": "c5c24a82-6845-4031-9d5d-978df9175426",
            "faceRectangle": {"top": 0, "left": 0, "width": 10, "height": 10}
        }]);

        let faces: Vec<DetectedFace> = serde_json::from_value(body).unwrap();
        assert!(faces[0].face_attributes.is_none());
        assert!(faces[0].face_landmarks.is_none());
    }

    #[test]
    fn test_decode_landmarks() {
        let body = serde_json::json!({
            "faceRectangle": {"top": 0, "left": 0, "width": 10, "height": 10},
            "faceLandmarks": {
                "pupilLeft": {"x": 686.2, "y": 695.1},
                "noseTip": {"x": 707.4, "y": 782.8}
            }
        });

        let face: DetectedFace = serde_json::from_value(body).unwrap();
        let landmarks = face.face_landmarks.unwrap();
        assert_eq!(landmarks.len(), 2);
        assert_eq!(landmarks["noseTip"].y, 782.8);
    }

    #[test]
    fn test_decode_partial_emotion() {
        // Labels missing from the payload score zero
        let body = serde_json::json!({"happiness": 0.9});
        let emotion: EmotionScores = serde_json::from_value(body).unwrap();
        assert_eq!(emotion.happiness, 0.9);
        assert_eq!(emotion.anger, 0.0);
        assert_eq!(emotion.surprise, 0.0);
    }

    #[test]
    fn test_scores_order() {
        let labels: Vec<&str> = EmotionScores::default()
            .scores()
            .iter()
            .map(|(label, _)| *label)
            .collect();
        assert_eq!(
            labels,
            ["anger", "contempt", "disgust", "fear", "happiness", "neutral", "sadness", "surprise"]
        );
    }

    #[test]
    fn test_dominant_emotion_from_scores() {
        let scores = EmotionScores {
            happiness: 0.97,
            neutral: 0.02,
            surprise: 0.009,
            ..Default::default()
        };
        let selection = crate::emotion::select_max(scores.scores()).unwrap();
        assert_eq!(selection.label, "happiness");
        assert_eq!(selection.score, 0.97);
    }

    #[test]
    fn test_decode_error_body() {
        let body = serde_json::json!({
            "error": {"code": "InvalidURL", "message": "Invalid image URL."}
        });
        let decoded: ApiErrorBody = serde_json::from_value(body).unwrap();
        assert_eq!(decoded.error.code, "InvalidURL");
        assert_eq!(decoded.error.message, "Invalid image URL.");
    }

    #[test]
    fn test_gender_display() {
        assert_eq!(Gender::Male.to_string(), "male");
        assert_eq!(Gender::Female.to_string(), "female");
    }
}
