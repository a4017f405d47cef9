//! Console report for detection results.
//!
//! Rendering is separated from printing so the exact output can be tested.

use url::Url;

use crate::emotion::select_max;
use crate::face::DetectedFace;

/// Display name for an image URL: the last path segment, or the full input
/// when there is none.
pub fn image_name(image_url: &str) -> String {
    Url::parse(image_url)
        .ok()
        .and_then(|url| {
            url.path_segments().and_then(|segments| {
                segments
                    .filter(|segment| !segment.is_empty())
                    .last()
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| image_url.to_string())
}

/// Render the detection report for one image.
pub fn render(image_name: &str, faces: &[DetectedFace]) -> String {
    if faces.is_empty() {
        return format!("No faces detected in ({}).\n", image_name);
    }

    let mut report = String::new();
    report.push_str(&format!(
        "Detected {} face(s) in ({}) with ID(s):\n",
        faces.len(),
        image_name
    ));
    for face in faces {
        match face.face_id {
            Some(id) => report.push_str(&format!("  {}\n", id)),
            None => report.push_str("  <none>\n"),
        }
    }

    for face in faces {
        report.push_str("\nFace attributes:\n");
        let attributes = match face.face_attributes.as_ref() {
            Some(attributes) => attributes,
            None => {
                report.push_str("  (not requested)\n");
                continue;
            }
        };

        match attributes.age {
            Some(age) => report.push_str(&format!("  Age: {:.0}\n", age)),
            None => report.push_str("  Age: unknown\n"),
        }
        match attributes.gender {
            Some(gender) => report.push_str(&format!("  Gender: {}\n", gender)),
            None => report.push_str("  Gender: unknown\n"),
        }
        match attributes
            .emotion
            .as_ref()
            .map(|scores| select_max(scores.scores()))
        {
            Some(Ok(selection)) => report.push_str(&format!(
                "  Emotion: {} (score: {:.3})\n",
                selection.label, selection.score
            )),
            Some(Err(_)) | None => report.push_str("  Emotion: unknown\n"),
        }
    }

    report
}
