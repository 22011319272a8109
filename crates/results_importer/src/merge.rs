use crate::canonical::Competition;
use std::collections::HashMap;

/// Collapses candidates sharing an `id` into one record.
///
/// Missing candidates are dropped. The first candidate of each group keeps
/// its scalar fields and receives every other member's detail URLs; output
/// order follows first occurrence.
pub fn merge_competitions<I>(candidates: I) -> Vec<Competition>
where
    I: IntoIterator<Item = Option<Competition>>,
{
    let mut merged: Vec<Competition> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for candidate in candidates.into_iter().flatten() {
        match positions.get(&candidate.id) {
            Some(&idx) => {
                for url in &candidate.data_urls {
                    merged[idx].add_data_url(url);
                }
            }
            None => {
                positions.insert(candidate.id.clone(), merged.len());
                merged.push(candidate);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn competition(place: &str, day: u32, url: &str) -> Competition {
        Competition::new(
            "ffdanse",
            place,
            NaiveDate::from_ymd_opt(2023, 11, day).unwrap(),
            url,
        )
    }

    #[test]
    fn test_same_place_and_date_merge() {
        let merged = merge_competitions(vec![
            Some(competition("Lyon", 4, "d/1")),
            Some(competition("Lyon", 4, "d/2")),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].data_urls, vec!["d/1", "d/2"]);
    }

    #[test]
    fn test_merge_regardless_of_order() {
        let merged = merge_competitions(vec![
            Some(competition("Lyon", 4, "d/2")),
            Some(competition("Lyon", 4, "d/1")),
        ]);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].data_urls.contains(&"d/1".to_string()));
        assert!(merged[0].data_urls.contains(&"d/2".to_string()));
    }

    #[test]
    fn test_drops_missing_and_keeps_first_occurrence_order() {
        let merged = merge_competitions(vec![
            None,
            Some(competition("Nantes", 5, "d/3")),
            Some(competition("Lyon", 4, "d/1")),
            None,
            Some(competition("Nantes", 5, "d/3")),
            Some(competition("Lyon", 4, "d/4")),
        ]);
        let places: Vec<&str> = merged.iter().map(|c| c.place.as_str()).collect();
        assert_eq!(places, vec!["Nantes", "Lyon"]);
        assert_eq!(merged[0].data_urls, vec!["d/3"]);
        assert_eq!(merged[1].data_urls, vec!["d/1", "d/4"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_competitions(Vec::<Option<Competition>>::new()).is_empty());
    }
}
