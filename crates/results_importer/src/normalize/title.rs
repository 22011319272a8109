const BOILERPLATE: &[&str] = &["Compétition à points", "Compétition sans points"];

/// Removes the point-scoring labels the federation appends to contest titles.
pub fn clean_title(raw: &str) -> String {
    let mut title = raw.to_string();
    for label in BOILERPLATE {
        title = title.replace(label, "");
    }
    title.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_point_labels() {
        assert_eq!(
            clean_title("  Adultes Latines C Compétition à points "),
            "Adultes Latines C"
        );
        assert_eq!(
            clean_title("Juniors Standard Compétition sans points"),
            "Juniors Standard"
        );
    }

    #[test]
    fn test_is_idempotent() {
        let once = clean_title("Seniors II Standard A Compétition à points");
        assert_eq!(clean_title(&once), once);
    }

    #[test]
    fn test_leaves_other_titles_alone() {
        assert_eq!(clean_title("Open Rock"), "Open Rock");
    }
}
