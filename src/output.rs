use crate::Summary;

/// Render the final summary followed by the thumbnail URL
pub fn render_text(summary: &Summary) -> String {
    format!("{}\n\nThumbnail: {}", summary.text, summary.thumbnail_url)
}

/// Render the whole summary, including per-chunk summaries, as pretty JSON
pub fn render_json(summary: &Summary) -> String {
    serde_json::to_string_pretty(summary).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::{Quality, extract_video_id, thumbnail_url};

    fn sample_summary() -> Summary {
        let video_id = extract_video_id("https://youtu.be/p2EGFTsXbyM").unwrap();
        Summary {
            thumbnail_url: thumbnail_url(&video_id, Quality::High),
            video_id,
            chunk_count: 2,
            chunk_summaries: vec!["첫째.".to_string(), "둘째.".to_string()],
            text: "최종 요약.".to_string(),
        }
    }

    #[test]
    fn test_render_text() {
        assert_eq!(
            render_text(&sample_summary()),
            "최종 요약.\n\nThumbnail: http://img.youtube.com/vi/p2EGFTsXbyM/hqdefault.jpg"
        );
    }

    #[test]
    fn test_render_json() {
        let json: serde_json::Value = serde_json::from_str(&render_json(&sample_summary())).unwrap();
        assert_eq!(json["video_id"], "p2EGFTsXbyM");
        assert_eq!(json["chunk_count"], 2);
        assert_eq!(json["chunk_summaries"][1], "둘째.");
        assert_eq!(json["text"], "최종 요약.");
    }
}
