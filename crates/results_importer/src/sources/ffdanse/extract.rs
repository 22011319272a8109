use super::PROVIDER_TAG;
use super::config::{ID_PLACEHOLDER, ProviderConfig};
use crate::canonical::{ClubGroup, Competition, Contest};
use crate::normalize::{NAME_BREAK, clean_names, clean_title, title_case};
use crate::season::is_within_season;
use crate::{ImporterError, Result};
use chrono::NaiveDate;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use url::Url;

const LISTING_ROW: &str = "table tr";
const CELL: &str = "td";
const LINK: &str = "a[href]";
const CONTEST_TITLE: &str = "#resultats h1";
const HEAT_TABLE: &str = "#resultats table.classement";
const RESULT_ROW: &str = "tr";
const COUPLE_ROW: &str = "table.couples tr";
const CLUB_OPTION: &str = "select[name=\"club\"] option[value]";

const MANIFESTATION_PARAM: &str = "NumManif";
const RANKING_LINK_MARKER: &str = "classement";

/// Error placeholders on ranking pages are closed twice, which ends the
/// `#resultats` container before the heat tables.
const MALFORMED_ERROR_BLOCK: &str = "<div class=\"erreur\"></div></div>";
const REPAIRED_ERROR_BLOCK: &str = "<div class=\"erreur\"></div>";

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ImporterError::MalformedInput(format!("invalid selector '{}': {}", css, e)))
}

fn squash_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn element_text(element: ElementRef) -> String {
    squash_whitespace(&element.text().collect::<String>())
}

/// Text of a cell with each `<br>` kept as [`NAME_BREAK`].
fn text_with_breaks(cell: ElementRef) -> String {
    let mut out = String::new();
    for node in cell.descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) if element.name() == "br" => out.push_str(NAME_BREAK),
            _ => {}
        }
    }
    out
}

/// Venue name: title-cased, trailing `(region)` removed.
pub fn clean_place(raw: &str) -> String {
    let squashed = squash_whitespace(raw);
    let without_region = match (squashed.ends_with(')'), squashed.rfind('(')) {
        (true, Some(open)) => squashed[..open].trim_end(),
        _ => squashed.as_str(),
    };
    title_case(&without_region.to_lowercase())
}

fn manifestation_id(href: &str, base: &Url) -> Option<u64> {
    let url = base.join(href).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == MANIFESTATION_PARAM)
        .and_then(|(_, value)| value.trim().parse().ok())
}

fn parse_rank(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Reads one listing row into a competition candidate.
///
/// Returns `Ok(None)` for rows without a usable manifestation id and for
/// dates outside season `season_year`.
pub fn extract_header(
    row: ElementRef,
    config: &ProviderConfig,
    season_year: i32,
) -> Result<Option<Competition>> {
    let base = Url::parse(&config.url)
        .map_err(|e| ImporterError::Configuration(format!("invalid base URL: {}", e)))?;
    let link_selector = selector(LINK)?;
    let cell_selector = selector(CELL)?;

    let Some(id) = row
        .select(&link_selector)
        .filter_map(|link| link.value().attr("href"))
        .find_map(|href| manifestation_id(href, &base))
    else {
        return Ok(None);
    };

    let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
    if cells.len() < 2 {
        return Err(ImporterError::malformed(
            format!("listing row for manifestation {}", id),
            format!("expected date and place cells, found {}", cells.len()),
        ));
    }

    let raw_date = element_text(cells[0]);
    let date = NaiveDate::parse_from_str(&raw_date, &config.date_format).map_err(|e| {
        ImporterError::malformed(
            format!("listing row for manifestation {}", id),
            format!("invalid date '{}': {}", raw_date, e),
        )
    })?;

    if !is_within_season(season_year, date) {
        tracing::debug!(
            "Skipping manifestation {} dated {}, outside season {}",
            id,
            date,
            season_year
        );
        return Ok(None);
    }

    let place = clean_place(&element_text(cells[1]));
    let details_url = config.endpoint(&config.details.replace(ID_PLACEHOLDER, &id.to_string()));

    Ok(Some(Competition::new(PROVIDER_TAG, place, date, details_url)))
}

/// Runs [`extract_header`] over every row of a listing page.
pub fn extract_headers(
    body: &str,
    config: &ProviderConfig,
    season_year: i32,
) -> Result<Vec<Option<Competition>>> {
    let document = Html::parse_document(body);
    let row_selector = selector(LISTING_ROW)?;

    document
        .select(&row_selector)
        .map(|row| extract_header(row, config, season_year))
        .collect()
}

/// Ranking page links on a competition detail page, resolved against
/// `page_url`, deduplicated in document order.
pub fn extract_ranking_links(body: &str, page_url: &str) -> Result<Vec<String>> {
    let base = Url::parse(page_url)
        .map_err(|e| ImporterError::malformed(format!("detail page '{}'", page_url), e))?;
    let document = Html::parse_document(body);
    let link_selector = selector(LINK)?;

    let mut links: Vec<String> = Vec::new();
    for href in document
        .select(&link_selector)
        .filter_map(|link| link.value().attr("href"))
    {
        if !href.to_lowercase().contains(RANKING_LINK_MARKER) {
            continue;
        }
        let Ok(url) = base.join(href.trim()) else {
            continue;
        };
        let url = url.to_string();
        if !links.contains(&url) {
            links.push(url);
        }
    }

    Ok(links)
}

pub fn repair_markup(raw: &str) -> String {
    raw.replace(MALFORMED_ERROR_BLOCK, REPAIRED_ERROR_BLOCK)
}

/// Parses a ranking page into a contest.
///
/// Heats are read in document order, which puts the final first; a couple
/// keeps the rank of the first heat it appears in.
pub fn extract_ranking(body: &str) -> Result<Contest> {
    let document = Html::parse_document(&repair_markup(body));
    let title_selector = selector(CONTEST_TITLE)?;
    let heat_selector = selector(HEAT_TABLE)?;
    let row_selector = selector(RESULT_ROW)?;
    let cell_selector = selector(CELL)?;

    let title = document
        .select(&title_selector)
        .next()
        .map(|title| clean_title(&element_text(title)))
        .ok_or_else(|| ImporterError::MalformedInput("ranking page has no contest title".into()))?;

    let mut contest = Contest::new(title.clone());

    for (heat, table) in document.select(&heat_selector).enumerate() {
        let context = || format!("contest '{}' heat {}", title, heat);

        for row in table.select(&row_selector) {
            let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
            if cells.is_empty() {
                continue;
            }
            if cells.len() < 2 {
                return Err(ImporterError::malformed(
                    context(),
                    format!("expected rank and couple cells in '{}'", row.html()),
                ));
            }

            let raw_rank = element_text(cells[0]);
            let rank = parse_rank(&raw_rank).ok_or_else(|| {
                ImporterError::malformed(context(), format!("invalid rank '{}'", raw_rank))
            })?;
            let couple = clean_names(&text_with_breaks(cells[1]))
                .map_err(|e| ImporterError::malformed(context(), e))?;

            if contest.results.contains_key(&couple) {
                tracing::debug!(
                    "'{}' already ranked in '{}', ignoring heat {} rank {}",
                    couple,
                    title,
                    heat,
                    rank
                );
                continue;
            }
            contest.record(couple, rank);
        }
    }

    Ok(contest)
}

/// Couple names from a club roster or name search page.
pub fn extract_names(body: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(body);
    let row_selector = selector(COUPLE_ROW)?;
    let cell_selector = selector(CELL)?;

    let mut names = Vec::new();
    for row in document.select(&row_selector) {
        let Some(cell) = row.select(&cell_selector).next() else {
            continue;
        };
        let name = clean_names(&text_with_breaks(cell))
            .map_err(|e| ImporterError::malformed(format!("row '{}'", row.html()), e))?;
        names.push(name);
    }

    Ok(names)
}

/// Club directory entries from the club listing page.
pub fn extract_clubs(body: &str) -> Result<Vec<ClubGroup>> {
    let document = Html::parse_document(body);
    let option_selector = selector(CLUB_OPTION)?;

    Ok(document
        .select(&option_selector)
        .filter_map(|option| {
            let id = option.value().attr("value")?.trim();
            let name = element_text(option);
            (!id.is_empty() && !name.is_empty()).then(|| ClubGroup {
                id: id.to_string(),
                name,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::UNKNOWN_COUPLE;

    fn config() -> ProviderConfig {
        ProviderConfig {
            url: "https://example.org".to_string(),
            ..ProviderConfig::default()
        }
    }

    const LISTING: &str = r#"
        <table>
          <tr><th>Date</th><th>Lieu</th><th></th></tr>
          <tr><td>04/11/2023</td><td>LYON (69)</td><td><a href="resultats.php?NumManif=101">Voir</a></td></tr>
          <tr><td>04/11/2023</td><td>LYON (69)</td><td><a href="resultats.php?NumManif=102">Voir</a></td></tr>
          <tr><td>10/08/2023</td><td>NICE (06)</td><td><a href="resultats.php?NumManif=90">Voir</a></td></tr>
          <tr><td>12/05/2024</td><td>SAINT-ÉTIENNE (42)</td><td><a href="resultats.php?NumManif=150">Voir</a></td></tr>
          <tr><td>20/05/2024</td><td>PARIS</td><td><a href="autre.php">Info</a></td></tr>
        </table>"#;

    #[test]
    fn test_clean_place() {
        assert_eq!(clean_place("SAINT-ÉTIENNE (42)"), "Saint-Étienne");
        assert_eq!(clean_place("  aix  en provence  "), "Aix En Provence");
        assert_eq!(clean_place("PARIS"), "Paris");
    }

    #[test]
    fn test_extract_headers_filters_season_and_unusable_links() {
        let headers = extract_headers(LISTING, &config(), 2023).unwrap();
        let kept: Vec<Competition> = headers.into_iter().flatten().collect();

        assert_eq!(kept.len(), 3);
        assert_eq!(kept[0].place, "Lyon");
        assert_eq!(kept[0].date, NaiveDate::from_ymd_opt(2023, 11, 4).unwrap());
        assert_eq!(kept[0].provider, PROVIDER_TAG);
        assert_eq!(
            kept[0].data_urls,
            vec!["https://example.org/competitions/resultats.php?NumManif=101"]
        );
        assert_eq!(kept[0].id, kept[1].id);
        assert_eq!(kept[2].place, "Saint-Étienne");
    }

    #[test]
    fn test_extract_header_rejects_bad_date() {
        let body = r#"<table><tr><td>2023-11-04</td><td>LYON</td>
            <td><a href="?NumManif=7">Voir</a></td></tr></table>"#;
        let err = extract_headers(body, &config(), 2023).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("manifestation 7"));
        assert!(message.contains("2023-11-04"));
    }

    #[test]
    fn test_extract_header_drops_non_numeric_id() {
        let body = r#"<table><tr><td>04/11/2023</td><td>LYON</td>
            <td><a href="?NumManif=abc">Voir</a></td></tr></table>"#;
        let headers = extract_headers(body, &config(), 2023).unwrap();
        assert_eq!(headers, vec![None]);
    }

    #[test]
    fn test_extract_ranking_links() {
        let body = r#"
            <ul>
              <li><a href="classement.php?NumEpreuve=1">Latines</a></li>
              <li><a href="/competitions/Classement.php?NumEpreuve=2">Standard</a></li>
              <li><a href="classement.php?NumEpreuve=1">Latines (bis)</a></li>
              <li><a href="programme.pdf">Programme</a></li>
            </ul>"#;
        let links =
            extract_ranking_links(body, "https://example.org/competitions/resultats.php?NumManif=1")
                .unwrap();
        assert_eq!(
            links,
            vec![
                "https://example.org/competitions/classement.php?NumEpreuve=1",
                "https://example.org/competitions/Classement.php?NumEpreuve=2",
            ]
        );
    }

    const RANKING: &str = r#"
        <div id="resultats">
          <h1>Adultes Latines C Compétition à points</h1>
          <div class="erreur"></div></div>
          <table class="classement">
            <tr><th>Place</th><th>Couple</th></tr>
            <tr><td>1</td><td>DUPONT Jean<br>MARTIN Marie</td></tr>
            <tr><td>2</td><td>LE-GALL Paul<br>CÔTÉ Hélène</td></tr>
          </table>
          <table class="classement">
            <tr><th>Place</th><th>Couple</th></tr>
            <tr><td>3-4</td><td>DUPONT Jean<br>MARTIN Marie</td></tr>
            <tr><td>5</td><td>Couple inconnu</td></tr>
            <tr><td>7e</td><td>DE LA FONTAINE Luc<br>ROUX Léa</td></tr>
          </table>
        </div>"#;

    #[test]
    fn test_extract_ranking_first_heat_wins() {
        let contest = extract_ranking(RANKING).unwrap();

        assert_eq!(contest.title, "Adultes Latines C");
        assert_eq!(contest.results.len(), 4);
        assert_eq!(contest.results["Jean Dupont - Marie Martin"], 1);
        assert_eq!(contest.results["Paul Le-Gall - Helene Cote"], 2);
        assert_eq!(contest.results[UNKNOWN_COUPLE], 5);
        assert_eq!(contest.results["Luc De La Fontaine - Lea Roux"], 7);
    }

    #[test]
    fn test_repair_keeps_heats_inside_container() {
        assert!(!repair_markup(RANKING).contains(MALFORMED_ERROR_BLOCK));

        let document = Html::parse_document(RANKING);
        let heats = selector(HEAT_TABLE).unwrap();
        assert_eq!(document.select(&heats).count(), 0);
    }

    #[test]
    fn test_extract_ranking_reports_heat_and_title() {
        let body = r#"
            <div id="resultats">
              <h1>Juniors Standard</h1>
              <table class="classement"><tr><td>1</td><td>DUPONT Jean<br>MARTIN Marie</td></tr></table>
              <table class="classement"><tr><td>2</td><td>SEUL Danseur</td></tr></table>
            </div>"#;
        let err = extract_ranking(body).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("contest 'Juniors Standard' heat 1"));
        assert!(message.contains("SEUL Danseur"));
    }

    #[test]
    fn test_extract_ranking_rejects_bad_rank() {
        let body = r#"
            <div id="resultats"><h1>Open</h1>
              <table class="classement"><tr><td>abandon</td><td>DUPONT Jean<br>MARTIN Marie</td></tr></table>
            </div>"#;
        assert!(extract_ranking(body).unwrap_err().to_string().contains("invalid rank 'abandon'"));
    }

    #[test]
    fn test_extract_ranking_without_title() {
        assert!(extract_ranking("<p>Aucun résultat</p>").is_err());
    }

    #[test]
    fn test_extract_names() {
        let body = r#"
            <table class="couples">
              <tr><th>Couple</th><th>Club</th></tr>
              <tr><td>DUPONT Jean<br/>MARTIN Marie</td><td>Lyon Danse</td></tr>
              <tr><td><a href="fiche.php?id=3">ROUX Luc<br>BLANC Léa</a></td><td>Lyon Danse</td></tr>
            </table>"#;
        assert_eq!(
            extract_names(body).unwrap(),
            vec!["Jean Dupont - Marie Martin", "Luc Roux - Lea Blanc"]
        );
    }

    #[test]
    fn test_extract_names_reports_row() {
        let body = r#"<table class="couples"><tr><td>DUPONT Jean</td></tr></table>"#;
        let message = extract_names(body).unwrap_err().to_string();
        assert!(message.contains("<tr><td>DUPONT Jean</td></tr>"));
    }

    #[test]
    fn test_extract_clubs() {
        let body = r#"
            <select name="club">
              <option value="">-- Choisir --</option>
              <option value="12">  Lyon   Danse Club </option>
              <option value="34">Rock Nantes</option>
            </select>"#;
        assert_eq!(
            extract_clubs(body).unwrap(),
            vec![
                ClubGroup { id: "12".to_string(), name: "Lyon Danse Club".to_string() },
                ClubGroup { id: "34".to_string(), name: "Rock Nantes".to_string() },
            ]
        );
    }
}
