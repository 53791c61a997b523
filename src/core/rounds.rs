use crate::core::category::text_of;
use crate::utils::error::{EtlError, Result};
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.sportdata.org/wkf/set-online/";

static CATEGORY_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.datalink2").expect("static selector must parse"));

/// The navigation list always ends with three entries that are not
/// categories (overviews and the like).
const TRAILING_NON_CATEGORY_LINKS: usize = 3;

const KATA_TITLES: [&str; 2] = ["Male Kata", "Female Kata"];

/// Individual kata round URLs listed on an event's draws index, in page order.
///
/// Kumite and team kata categories are left out.
pub fn collect_round_urls(content: &[u8], base_url: &Url) -> Result<Vec<String>> {
    let document = Html::parse_document(&String::from_utf8_lossy(content));
    let links: Vec<_> = document.select(&CATEGORY_LINK).collect();
    let kept = links.len().saturating_sub(TRAILING_NON_CATEGORY_LINKS);

    let mut urls = Vec::new();
    for link in &links[..kept] {
        let title = link.value().attr("title").ok_or_else(|| {
            EtlError::malformed(format!("category link {:?} has no title", text_of(*link).trim()))
        })?;
        if !KATA_TITLES.iter().any(|kata| title.contains(*kata)) {
            continue;
        }

        let href = link
            .value()
            .attr("href")
            .ok_or_else(|| EtlError::malformed(format!("category link {:?} has no href", title)))?;
        urls.push(base_url.join(href)?.to_string());
    }

    tracing::debug!(links = links.len(), rounds = urls.len(), "Collected kata round links");
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(title: &str, href: &str) -> String {
        format!(r#"<a class="datalink2" title="{}" href="{}">{}</a>"#, title, href, title)
    }

    fn index(links: &[String]) -> Vec<u8> {
        format!("<html><body><div>{}</div></body></html>", links.join("<br>")).into_bytes()
    }

    fn trailing() -> Vec<String> {
        vec![
            link("Female Kata - Overview", "overview.php?f=1"),
            link("Male Kumite - Overview", "overview.php?m=1"),
            link("Results", "results.php"),
        ]
    }

    #[test]
    fn test_keeps_individual_kata_in_order() {
        let mut links = vec![
            link("Female Kata - R1-G1", "popup.php?catid=1&amp;verid=381"),
            link("Male Kumite -60 kg", "popup.php?catid=2&amp;verid=381"),
            link("Male Kata - R1-G1", "popup.php?catid=3&amp;verid=381"),
            link("Team Kata Female", "popup.php?catid=4&amp;verid=381"),
        ];
        links.extend(trailing());

        let base = Url::parse(DEFAULT_BASE_URL).unwrap();
        let urls = collect_round_urls(&index(&links), &base).unwrap();

        assert_eq!(
            urls,
            vec![
                "https://www.sportdata.org/wkf/set-online/popup.php?catid=1&verid=381",
                "https://www.sportdata.org/wkf/set-online/popup.php?catid=3&verid=381",
            ]
        );
    }

    #[test]
    fn test_last_three_links_are_always_dropped() {
        let links = vec![
            link("Male Kata - R1-G1", "popup.php?catid=3"),
            link("Male Kata - R1-G2", "popup.php?catid=5"),
            link("Female Kata - R1-G1", "popup.php?catid=7"),
        ];
        let base = Url::parse(DEFAULT_BASE_URL).unwrap();

        assert!(collect_round_urls(&index(&links), &base).unwrap().is_empty());
        assert!(collect_round_urls(&index(&links[..1]), &base).unwrap().is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut links = vec![
            link("Male Kata - Final", "popup.php?catid=9"),
            link("Male Kata - Final", "popup.php?catid=9"),
        ];
        links.extend(trailing());

        let base = Url::parse(DEFAULT_BASE_URL).unwrap();
        assert_eq!(collect_round_urls(&index(&links), &base).unwrap().len(), 2);
    }

    #[test]
    fn test_link_without_title_is_malformed() {
        let mut links = vec![r#"<a class="datalink2" href="popup.php?catid=1">?</a>"#.to_string()];
        links.extend(trailing());

        let base = Url::parse(DEFAULT_BASE_URL).unwrap();
        let err = collect_round_urls(&index(&links), &base).unwrap_err();
        assert!(matches!(err, EtlError::MalformedPage { .. }));
    }

    #[test]
    fn test_kata_link_without_href_is_malformed() {
        let mut links = vec![r#"<a class="datalink2" title="Male Kata - R1-G1">R1</a>"#.to_string()];
        links.extend(trailing());

        let base = Url::parse(DEFAULT_BASE_URL).unwrap();
        let err = collect_round_urls(&index(&links), &base).unwrap_err();
        assert!(matches!(
            err,
            EtlError::MalformedPage { ref message } if message.contains("has no href")
        ));
    }

    #[test]
    fn test_other_links_without_href_are_ignored() {
        let mut links = vec![
            r#"<a class="datalink2" title="Male Kumite -60 kg">K</a>"#.to_string(),
            link("Male Kata - R1-G1", "popup.php?catid=3"),
        ];
        links.extend(trailing());

        let base = Url::parse(DEFAULT_BASE_URL).unwrap();
        let urls = collect_round_urls(&index(&links), &base).unwrap();
        assert_eq!(urls, vec!["https://www.sportdata.org/wkf/set-online/popup.php?catid=3"]);
    }
}
