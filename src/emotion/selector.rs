use thiserror::Error;

/// Errors that can occur during emotion selection
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmotionError {
    #[error("no emotion scores to rank")]
    EmptyScores,
}

/// The dominant emotion of a face: a label and its confidence score.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub label: String,
    pub score: f64,
}

/// Pick the highest-confidence label from `scores`.
///
/// Comparison is strict greater-than, so when several labels share the
/// maximum the first one seen wins. Callers that need reproducible output
/// must feed pairs in a fixed order ([`EmotionScores::scores`] does).
///
/// [`EmotionScores::scores`]: crate::face::EmotionScores::scores
pub fn select_max<'a, I>(scores: I) -> Result<Selection, EmotionError>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut best: Option<Selection> = None;

    for (label, score) in scores {
        if best.as_ref().map_or(true, |current| score > current.score) {
            best = Some(Selection {
                label: label.to_string(),
                score,
            });
        }
    }

    best.ok_or(EmotionError::EmptyScores)
}
