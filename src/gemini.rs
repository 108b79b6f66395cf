// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Context as _;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::NaiveDate;
use reqwest::blocking::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::errors::{Error, Result};
use crate::models::{Category, TxCandidate, TxKind};

// A missing API key is a configuration error and is reported as such.
// Everything after that point degrades to None: the caller decides
// whether "the model could not help" aborts (imports) or just prints a
// shrug (quick add).

const GEMINI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

const VOCAB: &str = "El campo type debe ser uno de: income, expense, investment, saving.\n\
    La categoría debe ser una de: Hogar, Alimentación, Transporte, Ocio, Salud, \
    Suscripciones, Inversión, Ahorro, Otros.";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData<'a>>,
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

impl<'a> Part<'a> {
    fn text(text: &'a str) -> Self {
        Part {
            text: Some(text),
            inline_data: None,
        }
    }

    fn inline(mime_type: &'a str, data: &'a str) -> Self {
        Part {
            text: None,
            inline_data: Some(InlineData { mime_type, data }),
        }
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<ReplyCandidate>>,
}

#[derive(Deserialize)]
struct ReplyCandidate {
    content: Option<ReplyContent>,
}

#[derive(Deserialize)]
struct ReplyContent {
    parts: Option<Vec<ReplyPart>>,
}

#[derive(Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

/// What the model claims it found, before any of it is trusted.
#[derive(Deserialize)]
struct RawCandidate {
    #[serde(rename = "type")]
    kind: Option<String>,
    concept: Option<String>,
    amount: Option<Value>,
    category: Option<String>,
    date: Option<String>,
}

#[derive(Deserialize)]
struct RawBatch {
    transactions: Option<Vec<RawCandidate>>,
}

fn api_key() -> Result<String> {
    std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            Error::Service(
                "GEMINI_API_KEY is not set; export a Google AI Studio key to use this command"
                    .into(),
            )
        })
}

fn call(client: &Client, key: &str, request: &GenerateRequest) -> anyhow::Result<String> {
    let url = format!("{}?key={}", GEMINI_URL, key);
    let resp = client.post(url).json(request).send()?.error_for_status()?;
    let body: GenerateResponse = resp.json()?;
    body.candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content)
        .and_then(|c| c.parts)
        .and_then(|p| p.into_iter().next())
        .and_then(|p| p.text)
        .context("model reply had no text content")
}

/// Turn a free-form note like "200€ Mercadona" into one candidate.
/// Returns None when the model cannot be reached or replies with
/// something unusable.
pub fn extract_from_text(client: &Client, text: &str) -> Result<Option<TxCandidate>> {
    let key = api_key()?;
    let prompt = format!(
        "Analiza este texto y extrae los datos de la transacción: \"{}\"\n\n\
         Responde SOLO con un JSON válido, sin markdown y sin explicaciones, \
         con esta estructura exacta:\n\
         {{\"type\": \"expense\", \"concept\": \"...\", \"amount\": 0, \"category\": \"...\"}}\n\n\
         {}",
        text, VOCAB
    );
    let request = GenerateRequest {
        contents: vec![Content {
            parts: vec![Part::text(&prompt)],
        }],
    };
    match call(client, &key, &request) {
        Ok(reply) => Ok(parse_candidate(&reply)),
        Err(e) => {
            warn!(error = %e, "text analysis call failed");
            Ok(None)
        }
    }
}

/// Pull every transaction out of a statement image or PDF.
///
/// The tri-state matters to the importer: `None` means the call or the
/// reply failed and nothing may be written, `Some(vec![])` means the
/// model looked and found nothing.
pub fn extract_from_document(
    client: &Client,
    bytes: &[u8],
    mime: &str,
) -> Result<Option<Vec<TxCandidate>>> {
    let key = api_key()?;
    let prompt = format!(
        "Analiza este extracto bancario y extrae todas las transacciones que encuentres.\n\n\
         Responde SOLO con un JSON válido, sin markdown y sin explicaciones, \
         con esta estructura exacta:\n\
         {{\"transactions\": [{{\"type\": \"expense\", \"concept\": \"...\", \"amount\": 0, \
         \"category\": \"...\", \"date\": \"YYYY-MM-DD\"}}]}}\n\n\
         {}\n\
         Si no encuentras ninguna transacción, devuelve {{\"transactions\": []}}.",
        VOCAB
    );
    let encoded = STANDARD.encode(bytes);
    let request = GenerateRequest {
        contents: vec![Content {
            parts: vec![Part::text(&prompt), Part::inline(mime, &encoded)],
        }],
    };
    match call(client, &key, &request) {
        Ok(reply) => Ok(parse_batch(&reply)),
        Err(e) => {
            warn!(error = %e, "statement analysis call failed");
            Ok(None)
        }
    }
}

// Models love to wrap JSON in markdown fences no matter how firmly the
// prompt forbids it.
fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

fn decimal_from_value(v: Value) -> Option<Decimal> {
    match v {
        Value::Number(n) => n.as_f64().and_then(Decimal::from_f64),
        // "45,30" shows up when the model echoes Spanish formatting.
        Value::String(s) => s.trim().replace(',', ".").parse::<Decimal>().ok(),
        _ => None,
    }
}

/// Unknown kinds drop the candidate, unknown categories fold into Otros:
/// a miscategorized expense is still worth importing, a transaction whose
/// direction is unclear is not.
fn refine(raw: RawCandidate) -> Option<TxCandidate> {
    let kind = match raw.kind.as_deref().map(str::parse::<TxKind>) {
        Some(Ok(k)) => k,
        _ => {
            warn!(
                concept = raw.concept.as_deref().unwrap_or("?"),
                "dropping candidate with unknown kind"
            );
            return None;
        }
    };
    let concept = raw
        .concept
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())?;
    let amount = raw.amount.and_then(decimal_from_value)?;
    if amount <= Decimal::ZERO {
        warn!(concept = concept.as_str(), "dropping candidate with non-positive amount");
        return None;
    }
    let category = raw
        .category
        .and_then(|c| c.parse::<Category>().ok())
        .unwrap_or(Category::Otros);
    let date = raw
        .date
        .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok());
    Some(TxCandidate {
        kind,
        concept,
        amount,
        category,
        date,
    })
}

fn parse_candidate(raw: &str) -> Option<TxCandidate> {
    let cleaned = strip_fences(raw);
    let parsed: RawCandidate = serde_json::from_str(&cleaned).ok()?;
    refine(parsed)
}

fn parse_batch(raw: &str) -> Option<Vec<TxCandidate>> {
    let cleaned = strip_fences(raw);
    let parsed: RawBatch = serde_json::from_str(&cleaned).ok()?;
    let raw_list = parsed.transactions?;
    Some(raw_list.into_iter().filter_map(refine).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn parses_a_fenced_reply() {
        let raw = "```json\n{\"type\": \"expense\", \"concept\": \"Mercadona\", \
                   \"amount\": 45.30, \"category\": \"Alimentación\"}\n```";
        let c = parse_candidate(raw).unwrap();
        assert_eq!(c.kind, TxKind::Expense);
        assert_eq!(c.concept, "Mercadona");
        assert_eq!(c.amount, dec("45.30"));
        assert_eq!(c.category, Category::Alimentacion);
        assert!(c.date.is_none());
    }

    #[test]
    fn unknown_kind_drops_the_candidate() {
        let raw = r#"{"type": "transfer", "concept": "Bizum", "amount": 20, "category": "Otros"}"#;
        assert!(parse_candidate(raw).is_none());
    }

    #[test]
    fn unknown_category_folds_into_otros() {
        let raw = r#"{"type": "expense", "concept": "Gasolina", "amount": 60, "category": "Coche"}"#;
        let c = parse_candidate(raw).unwrap();
        assert_eq!(c.category, Category::Otros);
    }

    #[test]
    fn amount_may_arrive_as_a_spanish_string() {
        let raw = r#"{"type": "expense", "concept": "Luz", "amount": "60,12", "category": "Hogar"}"#;
        let c = parse_candidate(raw).unwrap();
        assert_eq!(c.amount, dec("60.12"));
    }

    #[test]
    fn non_positive_amounts_are_dropped() {
        let raw = r#"{"type": "expense", "concept": "Luz", "amount": 0, "category": "Hogar"}"#;
        assert!(parse_candidate(raw).is_none());
        let raw = r#"{"type": "expense", "concept": "Luz", "amount": -3, "category": "Hogar"}"#;
        assert!(parse_candidate(raw).is_none());
    }

    #[test]
    fn unreadable_date_becomes_none() {
        let raw = r#"{"type": "expense", "concept": "Luz", "amount": 60,
                      "category": "Hogar", "date": "el 12 de marzo"}"#;
        let c = parse_candidate(raw).unwrap();
        assert!(c.date.is_none());
    }

    #[test]
    fn empty_batch_is_not_a_failed_batch() {
        let batch = parse_batch(r#"{"transactions": []}"#).unwrap();
        assert!(batch.is_empty());
        assert!(parse_batch("the statement was blurry, sorry").is_none());
    }

    #[test]
    fn batch_keeps_good_candidates_and_drops_bad_ones() {
        let raw = r#"```json
        {"transactions": [
            {"type": "expense", "concept": "Mercadona", "amount": 45.30,
             "category": "Alimentación", "date": "2024-03-14"},
            {"type": "transfer", "concept": "Bizum", "amount": 20, "category": "Otros"},
            {"type": "income", "concept": "Nómina", "amount": 1800, "category": "Otros",
             "date": "2024-03-01"}
        ]}
        ```"#;
        let batch = parse_batch(raw).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].concept, "Mercadona");
        assert_eq!(
            batch[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 14)
        );
        assert_eq!(batch[1].kind, TxKind::Income);
    }
}
