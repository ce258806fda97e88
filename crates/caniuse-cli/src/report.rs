//! Plain-text and JSON rendering of lookup outcomes.
use caniuse_css::{Outcome, UNSUPPORTED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

pub fn render(outcome: &Outcome, format: Format) -> Result<String, serde_json::Error> {
    match format {
        Format::Json => serde_json::to_string(outcome),
        Format::Text => Ok(render_text(outcome)),
    }
}

fn render_text(outcome: &Outcome) -> String {
    match outcome {
        Outcome::EmptyInput => "No input".to_string(),
        Outcome::Resolved { attribute, title, record } => {
            let mut out = match title {
                Some(title) => format!("{attribute} ({title})"),
                None => attribute.clone(),
            };
            for (browser, version) in record.iter() {
                let version = if version == UNSUPPORTED { "-".to_string() } else { version.to_string() };
                out.push_str(&format!("\n  {:<9} {}", browser.id(), version));
            }
            out
        }
        Outcome::Missed { attribute, suggestions } => {
            if suggestions.is_empty() {
                format!("Not found: {attribute}")
            } else {
                format!("Not found: {attribute}\nDid you mean: {}?", suggestions.join(", "))
            }
        }
    }
}
