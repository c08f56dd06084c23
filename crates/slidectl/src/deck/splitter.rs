/// Split a deck body (frontmatter already removed) into raw slide sources.
///
/// A new slide starts at:
/// 1. a `---` line with blank lines on both sides
/// 2. three or more consecutive blank lines
/// 3. a `# ` heading when the current slide already has content
///
/// Fenced code blocks are opaque to all three rules.
pub fn split(body: &str) -> Vec<String> {
    let body = body.replace("\r\n", "\n");
    let lines: Vec<&str> = body.split('\n').collect();

    let mut slides: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut blank_run = 0;
    let mut fence: Option<(char, usize)> = None;

    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();

        if let Some((ch, len)) = fence {
            if is_fence_close(trimmed, ch, len) {
                fence = None;
            }
            current.push(line);
            blank_run = 0;
            continue;
        }

        if trimmed.is_empty() {
            blank_run += 1;
            if blank_run == 3 {
                flush(&mut current, &mut slides);
            } else if blank_run < 3 {
                current.push(line);
            }
            continue;
        }

        let prev_blank = blank_run > 0 || current.iter().all(|l| l.trim().is_empty());
        blank_run = 0;

        if is_dash_separator(trimmed) {
            let next_blank = lines.get(i + 1).is_none_or(|l| l.trim().is_empty());
            if prev_blank && next_blank {
                flush(&mut current, &mut slides);
                continue;
            }
        }

        if line.starts_with("# ") && has_content(&current) {
            flush(&mut current, &mut slides);
        }

        if let Some(opened) = fence_open(trimmed) {
            fence = Some(opened);
        }
        current.push(line);
    }
    flush(&mut current, &mut slides);

    slides
}

fn flush(current: &mut Vec<&str>, slides: &mut Vec<String>) {
    let text = current.join("\n").trim().to_string();
    if !text.is_empty() {
        slides.push(text);
    }
    current.clear();
}

fn has_content(lines: &[&str]) -> bool {
    lines.iter().any(|l| !l.trim().is_empty())
}

fn is_dash_separator(line: &str) -> bool {
    line.len() >= 3 && line.chars().all(|c| c == '-')
}

fn fence_open(line: &str) -> Option<(char, usize)> {
    let ch = line.chars().next()?;
    if ch != '`' && ch != '~' {
        return None;
    }
    let len = line.chars().take_while(|&c| c == ch).count();
    (len >= 3).then_some((ch, len))
}

fn is_fence_close(line: &str, ch: char, len: usize) -> bool {
    let count = line.chars().take_while(|&c| c == ch).count();
    count >= len && line.chars().skip(count).all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_split() {
        let slides = split("Slide one\n\n\n\nSlide two");
        assert_eq!(slides, vec!["Slide one", "Slide two"]);
    }

    #[test]
    fn test_two_blank_lines_do_not_split() {
        let slides = split("Slide one\n\n\nStill one");
        assert_eq!(slides.len(), 1);
    }

    #[test]
    fn test_dash_separator() {
        let slides = split("Slide one\n\n---\n\nSlide two");
        assert_eq!(slides, vec!["Slide one", "Slide two"]);
    }

    #[test]
    fn test_dash_without_blank_lines_is_content() {
        let slides = split("Slide one\n---\nStill one");
        assert_eq!(slides.len(), 1);
    }

    #[test]
    fn test_heading_inference() {
        let slides = split("# First\n\nContent\n\n# Second\n\nMore content");
        assert_eq!(slides.len(), 2);
        assert!(slides[0].starts_with("# First"));
        assert!(slides[1].starts_with("# Second"));
    }

    #[test]
    fn test_h2_does_not_split() {
        let slides = split("# Title\n\n## Subtitle\n\nContent");
        assert_eq!(slides.len(), 1);
    }

    #[test]
    fn test_combined_separators_make_one_break() {
        let slides = split("Slide one\n\n\n\n---\n\n\n\nSlide two");
        assert_eq!(slides.len(), 2);
    }

    #[test]
    fn test_heading_in_code_block_no_split() {
        let slides = split("# Title\n\n```python\n# a comment\n\n\n\nprint('hi')\n```");
        assert_eq!(slides.len(), 1, "code fence must be opaque: {slides:?}");
    }

    #[test]
    fn test_crlf_input() {
        let slides = split("One\r\n\r\n---\r\n\r\nTwo");
        assert_eq!(slides, vec!["One", "Two"]);
    }
}
