//! Azure Face API integration: the detection client and its wire types.

mod client;
mod models;

pub use client::{
    DetectOptions, DetectionModel, FaceAttributeType, FaceClient, FaceError, RecognitionModel,
};
pub use models::{
    DetectedFace, EmotionScores, FaceAttributes, FaceRectangle, Gender, LandmarkPoint,
};
