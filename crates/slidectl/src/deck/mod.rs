pub mod splitter;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// The deck shown when no file is given.
pub const SAMPLE_DECK: &str = include_str!("../../../../demos/sample-deck.md");

/// An ordered, fixed-length set of slides. Never empty and never mutated after
/// construction.
#[derive(Debug, Clone)]
pub struct Deck {
    meta: DeckMeta,
    slides: Vec<Slide>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeckMeta {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub footer: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub transition: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Slide {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub paragraphs: Vec<String>,
    /// Bullet items, drawn as cards.
    pub cards: Vec<String>,
}

impl Deck {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read deck {}", path.display()))?;
        Self::from_markdown(&content).with_context(|| format!("Invalid deck {}", path.display()))
    }

    pub fn sample() -> Result<Self> {
        Self::from_markdown(SAMPLE_DECK)
    }

    pub fn from_markdown(content: &str) -> Result<Self> {
        let (meta, body) = extract_frontmatter(content)?;
        let slides: Vec<Slide> = splitter::split(body)
            .into_iter()
            .map(|raw| Slide::parse(&raw))
            .collect();
        if slides.is_empty() {
            anyhow::bail!("No slides found");
        }
        Ok(Self { meta, slides })
    }

    pub fn meta(&self) -> &DeckMeta {
        &self.meta
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Slide at 1-based `position`.
    pub fn get(&self, position: usize) -> Option<&Slide> {
        position.checked_sub(1).and_then(|i| self.slides.get(i))
    }
}

impl Slide {
    pub fn parse(raw: &str) -> Self {
        let mut slide = Slide::default();
        let mut paragraph: Vec<&str> = Vec::new();

        for line in raw.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                push_paragraph(&mut paragraph, &mut slide.paragraphs);
                continue;
            }
            if let Some(text) = trimmed.strip_prefix("# ") {
                push_paragraph(&mut paragraph, &mut slide.paragraphs);
                if slide.title.is_none() {
                    slide.title = Some(text.trim().to_string());
                    continue;
                }
            } else if let Some(text) = trimmed.strip_prefix("## ") {
                push_paragraph(&mut paragraph, &mut slide.paragraphs);
                if slide.subtitle.is_none() {
                    slide.subtitle = Some(text.trim().to_string());
                    continue;
                }
            } else if let Some(text) = trimmed
                .strip_prefix("- ")
                .or_else(|| trimmed.strip_prefix("* "))
            {
                push_paragraph(&mut paragraph, &mut slide.paragraphs);
                slide.cards.push(text.trim().to_string());
                continue;
            }
            paragraph.push(trimmed);
        }
        push_paragraph(&mut paragraph, &mut slide.paragraphs);
        slide
    }
}

fn push_paragraph(lines: &mut Vec<&str>, paragraphs: &mut Vec<String>) {
    if !lines.is_empty() {
        paragraphs.push(lines.join(" "));
        lines.clear();
    }
}

/// Split YAML frontmatter (between leading `---` lines) from the body.
fn extract_frontmatter(content: &str) -> Result<(DeckMeta, &str)> {
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return Ok((DeckMeta::default(), content));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            let meta: DeckMeta = if yaml.trim().is_empty() {
                DeckMeta::default()
            } else {
                serde_yaml::from_str(yaml).context("Invalid frontmatter")?
            };
            return Ok((meta, body));
        }
        offset += line.len();
    }

    // No closing fence: treat the whole file as slides
    Ok((DeckMeta::default(), content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_deck_has_thirteen_slides() {
        let deck = Deck::sample().unwrap();
        assert_eq!(deck.slide_count(), 13);
        assert!(deck.meta().title.is_some());
        for position in 1..=13 {
            let slide = deck.get(position).unwrap();
            assert!(slide.title.is_some(), "slide {position} has no title");
        }
    }

    #[test]
    fn test_get_is_one_based() {
        let deck = Deck::from_markdown("# A\n\n---\n\n# B").unwrap();
        assert!(deck.get(0).is_none());
        assert_eq!(deck.get(1).unwrap().title.as_deref(), Some("A"));
        assert_eq!(deck.get(2).unwrap().title.as_deref(), Some("B"));
        assert!(deck.get(3).is_none());
    }

    #[test]
    fn test_empty_deck_is_an_error() {
        assert!(Deck::from_markdown("").is_err());
        assert!(Deck::from_markdown("---\ntitle: Nothing\n---\n\n\n").is_err());
    }

    #[test]
    fn test_frontmatter() {
        let deck = Deck::from_markdown(
            "---\ntitle: Quarterly\nfooter: Internal\ntransition: fade\n---\n\n# Hello",
        )
        .unwrap();
        assert_eq!(deck.meta().title.as_deref(), Some("Quarterly"));
        assert_eq!(deck.meta().footer.as_deref(), Some("Internal"));
        assert_eq!(deck.meta().transition.as_deref(), Some("fade"));
        assert_eq!(deck.slide_count(), 1);
    }

    #[test]
    fn test_bad_frontmatter_is_an_error() {
        assert!(Deck::from_markdown("---\ntitle: [unclosed\n---\n\n# Hi").is_err());
    }

    #[test]
    fn test_slide_parts() {
        let slide = Slide::parse(
            "# Market\n## Where we stand\n\nTraffic grew\nacross regions.\n\n- Search\n- Social\n* Direct",
        );
        assert_eq!(slide.title.as_deref(), Some("Market"));
        assert_eq!(slide.subtitle.as_deref(), Some("Where we stand"));
        assert_eq!(slide.paragraphs, vec!["Traffic grew across regions."]);
        assert_eq!(slide.cards, vec!["Search", "Social", "Direct"]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Deck::load(Path::new("/definitely/not/here.md")).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read deck"));
    }
}
