//! Line-oriented codecs between config lists/maps and multiline text buffers.

use std::collections::BTreeMap;

use thiserror::Error;

/// Separates a prompt from its negative prompt within one line.
pub const NEGATIVE_DELIMITER: &str = "[NEG]";

/// Render prompt lists as one editable buffer, one prompt per line, with the
/// negative prompt (if any) appended after [`NEGATIVE_DELIMITER`].
pub fn join_prompts(positive: &[String], negative: Option<&[String]>) -> String {
    positive
        .iter()
        .enumerate()
        .map(|(index, prompt)| {
            let paired = negative.and_then(|negatives| negatives.get(index));
            match paired {
                Some(negative_prompt) if !negative_prompt.is_empty() => {
                    format!("{prompt}{NEGATIVE_DELIMITER}{negative_prompt}")
                }
                _ => prompt.clone(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse an edited prompt buffer back into positive and negative lists.
///
/// Blank lines are skipped. Each remaining line is split on the first
/// [`NEGATIVE_DELIMITER`]; both halves are trimmed. The negative list is
/// `None` when no line carries a non-empty negative half, otherwise it is
/// aligned with the positive list (missing negatives become empty strings).
pub fn split_prompts(text: &str) -> (Vec<String>, Option<Vec<String>>) {
    let mut positive = Vec::new();
    let mut negative = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match line.split_once(NEGATIVE_DELIMITER) {
            Some((prompt, negative_prompt)) => {
                positive.push(prompt.trim().to_string());
                negative.push(negative_prompt.trim().to_string());
            }
            None => {
                positive.push(line.trim().to_string());
                negative.push(String::new());
            }
        }
    }
    if negative.iter().all(String::is_empty) {
        (positive, None)
    } else {
        (positive, Some(negative))
    }
}

/// A base-embedding line that is not in `token = path` form.
#[derive(Debug, Error)]
#[error("Line {line_number} is not in 'token = path' form: {text}")]
pub struct BadEmbeddingLine {
    pub line_number: usize,
    pub text: String,
}

/// Render the embedding map as `token = path` lines, one per entry.
pub fn join_embeddings(embeddings: &BTreeMap<String, String>) -> String {
    embeddings
        .iter()
        .map(|(token, path)| format!("{token} = {path}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse `token = path` lines back into an embedding map.
///
/// Blank lines are skipped; later entries for the same token win.
pub fn split_embeddings(text: &str) -> Result<BTreeMap<String, String>, BadEmbeddingLine> {
    let mut embeddings = BTreeMap::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let Some((token, path)) = line.split_once('=') else {
            return Err(BadEmbeddingLine {
                line_number: index + 1,
                text: line.to_string(),
            });
        };
        let token = token.trim();
        let path = path.trim();
        if token.is_empty() || path.is_empty() {
            return Err(BadEmbeddingLine {
                line_number: index + 1,
                text: line.to_string(),
            });
        }
        embeddings.insert(token.to_string(), path.to_string());
    }
    Ok(embeddings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_without_negatives_join_to_plain_lines() {
        let positive = vec!["a fox".to_string(), "a crow".to_string()];
        assert_eq!(join_prompts(&positive, None), "a fox\na crow");
    }

    #[test]
    fn negatives_are_appended_after_the_delimiter() {
        let positive = vec!["a fox".to_string(), "a crow".to_string()];
        let negative = vec!["blurry".to_string(), String::new()];
        assert_eq!(
            join_prompts(&positive, Some(&negative)),
            "a fox[NEG]blurry\na crow"
        );
    }

    #[test]
    fn split_without_delimiters_yields_no_negative_list() {
        let (positive, negative) = split_prompts("a fox\n\na crow\n");
        assert_eq!(positive, vec!["a fox", "a crow"]);
        assert_eq!(negative, None);
    }

    #[test]
    fn split_aligns_negatives_with_their_prompts() {
        let (positive, negative) = split_prompts("a fox [NEG] blurry\na crow\n");
        assert_eq!(positive, vec!["a fox", "a crow"]);
        assert_eq!(
            negative,
            Some(vec!["blurry".to_string(), String::new()])
        );
    }

    #[test]
    fn split_uses_only_the_first_delimiter() {
        let (positive, negative) = split_prompts("a fox[NEG]blurry[NEG]grainy");
        assert_eq!(positive, vec!["a fox"]);
        assert_eq!(negative, Some(vec!["blurry[NEG]grainy".to_string()]));
    }

    #[test]
    fn delimiter_with_empty_negative_collapses_to_none() {
        let (positive, negative) = split_prompts("a fox[NEG]\na crow[NEG]");
        assert_eq!(positive, vec!["a fox", "a crow"]);
        assert_eq!(negative, None);
    }

    #[test]
    fn prompt_lists_survive_a_join_and_split() {
        let positive = vec!["a fox".to_string(), "a crow".to_string()];
        let negative = vec!["blurry".to_string(), "low contrast".to_string()];
        let buffer = join_prompts(&positive, Some(&negative));
        let (split_positive, split_negative) = split_prompts(&buffer);
        assert_eq!(split_positive, positive);
        assert_eq!(split_negative, Some(negative));
    }

    #[test]
    fn embeddings_render_one_entry_per_line() {
        let mut embeddings = BTreeMap::new();
        embeddings.insert("bruce".to_string(), "/emb/bruce.safetensors".to_string());
        embeddings.insert("gnome".to_string(), "/emb/gnome.safetensors".to_string());
        assert_eq!(
            join_embeddings(&embeddings),
            "bruce = /emb/bruce.safetensors\ngnome = /emb/gnome.safetensors"
        );
    }

    #[test]
    fn embedding_lines_parse_back_into_the_map() {
        let parsed = split_embeddings("bruce = /emb/bruce.safetensors\n\n").unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(
            parsed.get("bruce").map(String::as_str),
            Some("/emb/bruce.safetensors")
        );
    }

    #[test]
    fn embedding_line_without_a_path_is_an_error() {
        let err = split_embeddings("bruce =").unwrap_err();
        assert_eq!(err.line_number, 1);
    }

    #[test]
    fn embedding_line_without_equals_reports_its_line_number() {
        let err = split_embeddings("bruce = /ok.safetensors\nbad line").unwrap_err();
        assert_eq!(err.line_number, 2);
        assert_eq!(err.text, "bad line");
    }
}
