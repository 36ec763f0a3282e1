//! Section typing and labeling

use scraper::ElementRef;

use super::schema::SectionType;
use crate::utils::first_words;

/// Words taken from section text when nothing better names it
pub const LABEL_WORDS: usize = 7;

pub const FALLBACK_LABEL: &str = "Content";

/// Keywords looked for in class and id tokens
#[derive(Debug, Clone, Copy)]
pub struct TypeRule {
    pub keywords: &'static [&'static str],
    pub section_type: SectionType,
}

/// Ordered keyword table; the first rule with a matching token wins
pub const TYPE_RULES: &[TypeRule] = &[
    TypeRule {
        keywords: &["hero", "banner", "jumbotron"],
        section_type: SectionType::Hero,
    },
    TypeRule {
        keywords: &["nav", "menu", "navigation"],
        section_type: SectionType::Nav,
    },
    TypeRule {
        keywords: &["footer"],
        section_type: SectionType::Footer,
    },
    TypeRule {
        keywords: &["pricing", "price"],
        section_type: SectionType::Pricing,
    },
    TypeRule {
        keywords: &["faq", "question"],
        section_type: SectionType::Faq,
    },
    TypeRule {
        keywords: &["grid", "cards"],
        section_type: SectionType::Grid,
    },
    TypeRule {
        keywords: &["list"],
        section_type: SectionType::List,
    },
];

/// Type implied by the tag alone
#[must_use]
pub fn type_for_tag(tag: &str) -> Option<SectionType> {
    match tag {
        "nav" => Some(SectionType::Nav),
        "header" => Some(SectionType::Hero),
        "footer" => Some(SectionType::Footer),
        _ => None,
    }
}

/// Lowercased class and id tokens, split on whitespace, `-`, `_` and
/// camelCase humps (`primaryNavContainer` gives `primary`, `nav`, `container`)
fn attribute_tokens(element: ElementRef<'_>) -> Vec<String> {
    let value = element.value();
    let combined = format!(
        "{} {}",
        value.attr("class").unwrap_or_default(),
        value.id().unwrap_or_default()
    );

    let mut tokens = Vec::new();
    for word in combined
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|w| !w.is_empty())
    {
        let mut current = String::new();
        let mut prev_lower = false;
        for c in word.chars() {
            if c.is_uppercase() && prev_lower && !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
            current.extend(c.to_lowercase());
        }
        if !current.is_empty() {
            tokens.push(current);
        }
    }
    tokens
}

/// Type from class/id keywords.
///
/// A keyword matches a token that starts or ends with it, so `navbar`,
/// `site-nav` and `primaryNavContainer` are navigation, while `unavailable`
/// is not navigation and `enlisted` is not a list.
#[must_use]
pub fn type_for_attributes(element: ElementRef<'_>) -> Option<SectionType> {
    let tokens = attribute_tokens(element);
    TYPE_RULES
        .iter()
        .find(|rule| {
            rule.keywords.iter().any(|kw| {
                tokens
                    .iter()
                    .any(|t| t.starts_with(kw) || t.ends_with(kw))
            })
        })
        .map(|rule| rule.section_type)
}

/// Tag rule, then keyword table, then the tier's default.
#[must_use]
pub fn classify(element: ElementRef<'_>, default: SectionType) -> SectionType {
    type_for_tag(element.value().name())
        .or_else(|| type_for_attributes(element))
        .unwrap_or(default)
}

/// First non-empty of: first heading, `aria-label`, `title`, leading words of `text`, `"Content"`.
#[must_use]
pub fn derive_label(element: ElementRef<'_>, headings: &[String], text: &str) -> String {
    if let Some(heading) = headings.iter().find(|h| !h.trim().is_empty()) {
        return heading.trim().to_string();
    }

    let value = element.value();
    for attr in ["aria-label", "title"] {
        if let Some(v) = value.attr(attr).map(str::trim)
            && !v.is_empty()
        {
            return v.to_string();
        }
    }

    let words = first_words(text, LABEL_WORDS);
    if words.is_empty() {
        FALLBACK_LABEL.to_string()
    } else {
        words
    }
}
