//! Parsers for the convention files under `.openmods/`.

use std::sync::OnceLock;

use regex::Regex;

use crate::upstream::DirectoryEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLink {
    pub label: String,
    pub icon: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFaq {
    pub question: String,
    pub answer: String,
}

const GALLERY_EXTENSIONS: [&str; 4] = [".png", ".jpg", ".jpeg", ".webp"];
const THUMBNAIL_HINTS: [&str; 4] = ["icon", "logo", "thumbnail", "cover"];
const FAQ_HEADER: &str = "### ";

fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:\[icon:([^\]]+)\]\s*)?\[([^\]]+)\]\(([^)]+)\)")
            .expect("link pattern is valid")
    })
}

/// One link per line: `[icon:NAME] [Label](Url)`, icon optional.
/// Lines without a Markdown link are skipped.
pub fn parse_links(content: &str) -> Vec<ParsedLink> {
    lines(content)
        .filter(|line| !line.is_empty())
        .filter_map(|line| link_pattern().captures(line))
        .map(|caps| ParsedLink {
            icon: caps.get(1).map(|m| m.as_str().trim().to_string()),
            label: caps[2].trim().to_string(),
            url: caps[3].trim().to_string(),
        })
        .collect()
}

/// Splits on `\r\n`, `\n` or a lone `\r`.
fn lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .split("\r\n")
        .flat_map(|line| line.split(['\r', '\n']))
}

/// `### Question` headers, each followed by its answer up to the next
/// header. Pairs with an empty question or answer are dropped.
pub fn parse_faqs(content: &str) -> Vec<ParsedFaq> {
    let mut faqs = Vec::new();
    let mut current: Option<(&str, Vec<&str>)> = None;

    for line in lines(content) {
        if let Some(question) = line.strip_prefix(FAQ_HEADER) {
            if let Some((question, answer)) = current.take() {
                push_faq(&mut faqs, question, &answer);
            }
            current = Some((question, Vec::new()));
        } else if let Some((_, answer)) = current.as_mut() {
            answer.push(line);
        }
    }
    if let Some((question, answer)) = current {
        push_faq(&mut faqs, question, &answer);
    }
    faqs
}

fn push_faq(faqs: &mut Vec<ParsedFaq>, question: &str, answer: &[&str]) {
    let question = question.trim();
    let answer = answer.join("\n");
    let answer = answer.trim();
    if !question.is_empty() && !answer.is_empty() {
        faqs.push(ParsedFaq {
            question: question.to_string(),
            answer: answer.to_string(),
        });
    }
}

/// Download URLs of the image files in a listing, in listing order.
pub fn gallery_images(entries: &[DirectoryEntry]) -> Vec<String> {
    entries
        .iter()
        .filter(|entry| entry.is_file())
        .filter(|entry| GALLERY_EXTENSIONS.iter().any(|ext| entry.name.ends_with(ext)))
        .filter_map(|entry| entry.download_url.clone())
        .collect()
}

/// First file whose name hints at being a thumbnail. Listing order wins over
/// hint order.
pub fn thumbnail_candidate(entries: &[DirectoryEntry]) -> Option<&DirectoryEntry> {
    entries.iter().filter(|entry| entry.is_file()).find(|entry| {
        let name = entry.name.to_lowercase();
        THUMBNAIL_HINTS.iter().any(|hint| name.contains(hint))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::EntryKind;

    fn file(name: &str) -> DirectoryEntry {
        DirectoryEntry {
            name: name.to_string(),
            path: format!(".openmods/img/{}", name),
            kind: EntryKind::File,
            download_url: Some(format!("https://raw.example/{}", name)),
        }
    }

    #[test]
    fn parses_icon_link_and_skips_malformed_line() {
        let links = parse_links("[icon:github] [Repo](https://x)\nthis is not a link\n");
        assert_eq!(
            links,
            vec![ParsedLink {
                label: "Repo".to_string(),
                icon: Some("github".to_string()),
                url: "https://x".to_string(),
            }]
        );
    }

    #[test]
    fn parses_plain_links_with_mixed_line_endings() {
        let links = parse_links("[Discord](https://discord.gg/abc)\r\n- [ Wiki ]( https://wiki )\r[broken](");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].icon, None);
        assert_eq!(links[1].label, "Wiki");
        assert_eq!(links[1].url, "https://wiki");
    }

    #[test]
    fn parses_two_faqs_trimmed() {
        let content = "Intro text that is ignored\n\
                       ### How do I install?  \n\
                       \n\
                       Drop it in the plugins folder.\n\
                       It needs BepInEx.\n\
                       ### Is it multiplayer safe?\n\
                       Yes.   \n";
        let faqs = parse_faqs(content);
        assert_eq!(faqs.len(), 2);
        assert_eq!(faqs[0].question, "How do I install?");
        assert_eq!(
            faqs[0].answer,
            "Drop it in the plugins folder.\nIt needs BepInEx."
        );
        assert_eq!(faqs[1].question, "Is it multiplayer safe?");
        assert_eq!(faqs[1].answer, "Yes.");
    }

    #[test]
    fn faqs_split_on_any_line_ending() {
        let expected = vec![
            ParsedFaq {
                question: "Windows?".to_string(),
                answer: "Yes.\nAlso Proton.".to_string(),
            },
            ParsedFaq {
                question: "Mac?".to_string(),
                answer: "No.".to_string(),
            },
        ];
        assert_eq!(
            parse_faqs("### Windows?\r\nYes.\r\nAlso Proton.\r\n### Mac?\r\nNo.\r\n"),
            expected
        );
        assert_eq!(
            parse_faqs("### Windows?\rYes.\rAlso Proton.\r### Mac?\rNo."),
            expected
        );
    }

    #[test]
    fn drops_faqs_with_empty_side() {
        let faqs = parse_faqs("### Unanswered\n### \nOrphan answer\n### Real\nAnswer");
        assert_eq!(
            faqs,
            vec![ParsedFaq {
                question: "Real".to_string(),
                answer: "Answer".to_string(),
            }]
        );
    }

    #[test]
    fn deeper_headers_are_answer_text() {
        let faqs = parse_faqs("### Q\n#### not a question\nbody");
        assert_eq!(faqs.len(), 1);
        assert_eq!(faqs[0].answer, "#### not a question\nbody");
    }

    #[test]
    fn gallery_keeps_images_in_listing_order() {
        let mut dir = file("nested.png");
        dir.kind = EntryKind::Dir;
        let mut no_url = file("orphan.webp");
        no_url.download_url = None;
        let entries = vec![
            file("icon.png"),
            file("readme.md"),
            file("cover.jpg"),
            file("SHOT.PNG"),
            dir,
            no_url,
            file("wide.webp"),
        ];
        assert_eq!(
            gallery_images(&entries),
            vec![
                "https://raw.example/icon.png",
                "https://raw.example/cover.jpg",
                "https://raw.example/wide.webp",
            ]
        );
    }

    #[test]
    fn thumbnail_is_first_hinted_file_in_listing_order() {
        let entries = vec![file("screenshot.png"), file("Cover.jpg"), file("icon.png")];
        assert_eq!(
            thumbnail_candidate(&entries).map(|e| e.name.as_str()),
            Some("Cover.jpg")
        );
        assert!(thumbnail_candidate(&[file("screenshot.png")]).is_none());
    }
}
