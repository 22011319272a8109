use super::text::{fold_diacritics, title_case};
use crate::canonical::UNKNOWN_COUPLE;
use crate::{ImporterError, Result};
use std::fmt;

/// Marker placed between the two dancers of a couple cell.
pub const NAME_BREAK: &str = "<br>";

/// A dancer name recovered from the `SURNAME Forename` display convention.
///
/// The surname/forename boundary is found purely from uppercase runs, so a
/// forename reduced to a single capital letter ends up in the surname and a
/// lowercase particle ("de", "von") ends up in the forename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DancerName {
    forename: String,
    surname: String,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Upper,
    Separator,
    Other,
}

fn classify(c: char) -> CharClass {
    match c {
        'A'..='Z' | 'À'..='Ö' | 'Ø'..='Ý' => CharClass::Upper,
        ' ' | '\'' | '-' => CharClass::Separator,
        _ => CharClass::Other,
    }
}

impl DancerName {
    pub fn parse(display: &str) -> Self {
        let mut surname = String::new();
        let mut forename = String::new();
        let mut prev_upper = false;

        for c in display.trim().chars() {
            match classify(c) {
                CharClass::Upper => {
                    surname.push(c);
                    prev_upper = true;
                }
                CharClass::Separator => {
                    if prev_upper {
                        surname.push(c);
                    } else {
                        forename.push(c);
                    }
                    prev_upper = false;
                }
                CharClass::Other => {
                    if prev_upper {
                        // The capital belonged to the forename, not the surname.
                        if let Some(initial) = surname.pop() {
                            forename.push(initial);
                        }
                    }
                    forename.push(c);
                    prev_upper = false;
                }
            }
        }

        Self {
            forename: title_case(&fold_diacritics(forename.trim())),
            surname: title_case(&fold_diacritics(surname.trim())),
        }
    }

    pub fn forename(&self) -> &str {
        &self.forename
    }

    pub fn surname(&self) -> &str {
        &self.surname
    }

    pub fn is_empty(&self) -> bool {
        self.forename.is_empty() && self.surname.is_empty()
    }
}

impl fmt::Display for DancerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.forename.is_empty(), self.surname.is_empty()) {
            (false, false) => write!(f, "{} {}", self.forename, self.surname),
            (true, _) => write!(f, "{}", self.surname),
            (false, true) => write!(f, "{}", self.forename),
        }
    }
}

/// Turns a raw couple cell (`SURNAME Forename<br>SURNAME Forename`) into
/// `Forename Surname - Forename Surname`.
pub fn clean_names(raw: &str) -> Result<String> {
    if raw.to_lowercase().contains(UNKNOWN_COUPLE) {
        return Ok(UNKNOWN_COUPLE.to_string());
    }

    let unified = raw
        .replace("<br />", NAME_BREAK)
        .replace("<br/>", NAME_BREAK)
        .replace("<BR>", NAME_BREAK);
    let parts: Vec<&str> = unified
        .split(NAME_BREAK)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if parts.len() != 2 {
        return Err(ImporterError::NameParse {
            fragment: raw.to_string(),
        });
    }

    let mut dancers = Vec::with_capacity(2);
    for part in parts {
        let dancer = DancerName::parse(part);
        if dancer.is_empty() {
            return Err(ImporterError::NameParse {
                fragment: raw.to_string(),
            });
        }
        dancers.push(dancer.to_string());
    }

    Ok(dancers.join(" - "))
}
