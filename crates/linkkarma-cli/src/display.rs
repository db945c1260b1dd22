//! Terminal cards for verdicts, extracted pages and generated showcases.

use linkkarma_core::{ExtractedPage, GeneratedShowcase, SecurityCheckResult};

const LABEL_WIDTH: usize = 22;
const MAX_TEXT_CHARS: usize = 400;

// ── Public API ──

pub fn print_security_card(url: &str, check: &SecurityCheckResult) {
    println!("=== Verificação de segurança ===");
    println!("{url}");
    println!();

    field("status", check.status.as_str());
    field("confidence", &format!("{}%", check.confidence));
    field("checked_at", &check.checked_at.to_rfc3339());
    list("sources_checked", &check.sources_checked);
    list("findings", &check.findings);
    field("recommendation", &check.recommendation);

    if let Some(details) = &check.details {
        println!();
        println!("Detalhes");
        field("positive_mentions", &details.positive_mentions.to_string());
        field("negative_mentions", &details.negative_mentions.to_string());
        field("trustworthiness", &format!("{}%", details.trustworthiness_score));
        list("scam_indicators", &details.scam_indicators);
    }
    println!();
}

pub fn print_page_card(page: &ExtractedPage) {
    println!("=== {} ===", page.title);
    println!("{}", page.url);
    if page.degraded {
        println!("(página indisponível, dados sintetizados a partir do domínio)");
    }
    println!();

    field("description", &page.description);
    field("text_chars", &page.text.chars().count().to_string());
    if !page.text.is_empty() {
        println!();
        println!("{}", preview(&page.text, MAX_TEXT_CHARS));
    }
    println!();
}

pub fn print_showcase_card(showcase: &GeneratedShowcase) {
    println!("=== {} ===", showcase.title);
    println!("{}", showcase.short_description);
    println!();

    field("service_name", &showcase.service_name);
    field("what_is", &showcase.content.what_is);
    numbered("advantages", &showcase.content.advantages);
    numbered("steps", &showcase.content.steps);

    if !showcase.content.faq.is_empty() {
        println!("  faq ({}):", showcase.content.faq.len());
        for item in &showcase.content.faq {
            println!("    P: {}", item.question);
            println!("    R: {}", item.answer);
        }
    }
    println!();
}

// ── Rows ──

fn field(label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    println!("  {label:<LABEL_WIDTH$} {value}");
}

fn list(label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("  {label:<LABEL_WIDTH$} {}", items.join(", "));
}

fn numbered(label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("  {label} ({}):", items.len());
    for (i, item) in items.iter().enumerate() {
        println!("    {}. {item}", i + 1);
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_cuts_on_char_boundary() {
        assert_eq!(preview("ação rápida", 4), "ação…");
        assert_eq!(preview("curto", 10), "curto");
    }
}
