use crate::error::OracleError;
use crate::oracle::types::OracleScore;

/// Remove a surrounding ``` fence (with optional language tag) if present
pub fn strip_fence(text: &str) -> &str {
    let text = text.trim();
    if !text.starts_with("```") {
        return text;
    }

    // Drop the opening fence line
    let body = match text.find('\n') {
        Some(newline) => &text[newline + 1..],
        None => return "",
    };

    // Drop the closing fence line
    let body = body.trim_end();
    match body.rfind('\n') {
        Some(newline) if body[newline + 1..].trim_start().starts_with("```") => &body[..newline],
        None if body.starts_with("```") => "",
        _ => body,
    }
}

/// Decode the oracle's ranked list of `{job_index, score, reason}` records
pub fn parse_scores(text: &str) -> Result<Vec<OracleScore>, OracleError> {
    let body = strip_fence(text);
    serde_json::from_str(body).map_err(|e| OracleError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_array() {
        let scores = parse_scores(
            r#"[{"job_index": 0, "score": 85, "reason": "Good match"},
                {"job_index": 1, "score": 70, "reason": "Okay match"}]"#,
        )
        .unwrap();

        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].score, 85.0);
        assert_eq!(scores[1].reason, "Okay match");
    }

    #[test]
    fn strips_json_fence() {
        let text = "```json\n[{\"job_index\": 2, \"score\": 91, \"reason\": \"Exact type\"}]\n```";
        let scores = parse_scores(text).unwrap();

        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].job_index, 2);
    }

    #[test]
    fn strips_plain_fence() {
        assert_eq!(strip_fence("```\n[]\n```"), "[]");
    }

    #[test]
    fn empty_array_is_a_valid_answer() {
        assert!(parse_scores("```json\n[]\n```").unwrap().is_empty());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let scores = parse_scores(r#"[{"job_index": 1}]"#).unwrap();

        assert_eq!(scores[0].score, 0.0);
        assert!(scores[0].reason.is_empty());
    }

    #[test]
    fn prose_is_malformed() {
        let err = parse_scores("I think job 1 is best").unwrap_err();
        assert!(matches!(err, OracleError::Malformed(_)));
    }
}
