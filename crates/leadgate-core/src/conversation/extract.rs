//! Structured-payload extraction from free-text model replies.
//!
//! The model is instructed to end each reply with a JSON block carrying the
//! lead fields. This module implements the best-effort grammar: a fenced
//! block (optionally tagged "json") wins; otherwise a bare object anchored
//! at a literal `"nome"` key. Extraction failure is a typed outcome, never
//! an error -- a malformed payload only means the draft is left unchanged
//! this turn.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use leadgate_types::chat::LeadDraft;

/// Fenced block (optionally tagged "json"). The inner content is captured
/// whatever its shape: a fence is always stripped from the reply, even when
/// what is inside turns out not to be a parseable object.
static FENCED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)```(?:json)?\s*(.*?)\s*```").expect("valid regex"));

/// Bare object anchored at a literal "nome" key.
static BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)\{\s*"nome".*?\}"#).expect("valid regex"));

/// Stray occurrences of the literal marker word.
static JSON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bjson\b").expect("valid regex"));

/// Outcome of payload extraction for one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// A payload was found and parsed.
    Found(LeadDraft),
    /// The reply carried no payload at all.
    NotOffered,
    /// A payload-shaped block was found but failed to parse.
    Malformed,
}

/// A reply with its payload removed, plus the extraction outcome.
#[derive(Debug, Clone)]
pub struct CleanedReply {
    pub text: String,
    pub payload: Extraction,
}

/// Extract the trailing payload from a raw reply and strip it (and bare
/// occurrences of the word "json") from the returned text.
pub fn extract_payload(raw: &str) -> CleanedReply {
    let (remainder, block) = match FENCED.captures(raw) {
        Some(caps) => {
            let whole = caps.get(0).expect("match");
            let inner = caps.get(1).expect("group").as_str().to_string();
            (raw.replacen(whole.as_str(), "", 1), Some(inner))
        }
        None => match BARE.find(raw) {
            Some(m) => (raw.replacen(m.as_str(), "", 1), Some(m.as_str().to_string())),
            None => (raw.to_string(), None),
        },
    };

    let text = JSON_WORD.replace_all(&remainder, "").trim().to_string();

    let payload = match block {
        None => Extraction::NotOffered,
        Some(block) => match parse_draft(&block) {
            Some(draft) => Extraction::Found(draft),
            None => Extraction::Malformed,
        },
    };

    CleanedReply { text, payload }
}

/// Parse a payload block into a draft over the fixed key set.
///
/// Non-string and null values map to None; unknown keys are ignored.
fn parse_draft(block: &str) -> Option<LeadDraft> {
    let value: Value = serde_json::from_str(block).ok()?;
    let obj = value.as_object()?;

    let field = |key: &str| -> Option<String> {
        obj.get(key).and_then(Value::as_str).map(str::to_string)
    };

    Some(LeadDraft {
        nome: field("nome"),
        email: field("email"),
        telefone: field("telefone"),
        empresa: field("empresa"),
        setor: field("setor"),
        interesse: field("interesse"),
        mensagem: field("mensagem"),
        origem: field("origem"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_block_extracted() {
        let raw = "Prazer em conhecê-la, Ana!\n```json\n{\"nome\": \"Ana\", \"email\": null, \"telefone\": null, \"empresa\": null, \"setor\": null, \"interesse\": null, \"mensagem\": null, \"origem\": null}\n```";
        let cleaned = extract_payload(raw);

        assert_eq!(cleaned.text, "Prazer em conhecê-la, Ana!");
        let Extraction::Found(draft) = cleaned.payload else {
            panic!("expected Found");
        };
        assert_eq!(draft.nome.as_deref(), Some("Ana"));
        assert!(draft.email.is_none());
    }

    #[test]
    fn test_fenced_block_without_tag() {
        let raw = "Olá!\n```\n{\"nome\": \"Rui\"}\n```";
        let cleaned = extract_payload(raw);
        assert_eq!(cleaned.text, "Olá!");
        assert!(matches!(cleaned.payload, Extraction::Found(_)));
    }

    #[test]
    fn test_bare_object_fallback() {
        let raw = "Anotado! {\"nome\": \"Rui\", \"email\": \"rui@x.pt\"} até já";
        let cleaned = extract_payload(raw);
        assert_eq!(cleaned.text, "Anotado!  até já");
        let Extraction::Found(draft) = cleaned.payload else {
            panic!("expected Found");
        };
        assert_eq!(draft.email.as_deref(), Some("rui@x.pt"));
    }

    #[test]
    fn test_no_payload() {
        let cleaned = extract_payload("Só uma resposta normal.");
        assert_eq!(cleaned.payload, Extraction::NotOffered);
        assert_eq!(cleaned.text, "Só uma resposta normal.");
    }

    #[test]
    fn test_malformed_payload_still_stripped() {
        let raw = "Claro!\n```json\n{\"nome\": \"Ana\", broken\n```";
        let cleaned = extract_payload(raw);
        assert_eq!(cleaned.payload, Extraction::Malformed);
        assert_eq!(cleaned.text, "Claro!");
    }

    #[test]
    fn test_unclosed_brace_in_fence_still_stripped() {
        // No closing brace at all -- the fence must still disappear.
        let raw = "Anotei!\n```json\n{\"nome\": \"Rui\", \"email\":\n```";
        let cleaned = extract_payload(raw);
        assert_eq!(cleaned.payload, Extraction::Malformed);
        assert_eq!(cleaned.text, "Anotei!");
        assert!(!cleaned.text.contains("```"));
    }

    #[test]
    fn test_fenced_non_object_is_malformed_and_stripped() {
        let raw = "Veja:\n```\nnão é um objeto\n```";
        let cleaned = extract_payload(raw);
        assert_eq!(cleaned.payload, Extraction::Malformed);
        assert_eq!(cleaned.text, "Veja:");
    }

    #[test]
    fn test_bare_json_word_removed() {
        let raw = "Aqui está o json pedido: tudo certo. JSON à parte, seguimos.";
        let cleaned = extract_payload(raw);
        assert!(!cleaned.text.to_lowercase().contains("json"));
    }

    #[test]
    fn test_json_inside_word_untouched() {
        let cleaned = extract_payload("O jsonete não é uma palavra.");
        assert!(cleaned.text.contains("jsonete"));
    }

    #[test]
    fn test_non_string_values_map_to_none() {
        let raw = "```json\n{\"nome\": \"Ana\", \"telefone\": 912345678}\n```";
        let cleaned = extract_payload(raw);
        let Extraction::Found(draft) = cleaned.payload else {
            panic!("expected Found");
        };
        assert_eq!(draft.nome.as_deref(), Some("Ana"));
        assert!(draft.telefone.is_none());
    }

    #[test]
    fn test_fenced_wins_over_bare() {
        let raw = "{\"nome\": \"fora\"}\n```json\n{\"nome\": \"dentro\"}\n```";
        let cleaned = extract_payload(raw);
        let Extraction::Found(draft) = cleaned.payload else {
            panic!("expected Found");
        };
        assert_eq!(draft.nome.as_deref(), Some("dentro"));
    }
}
