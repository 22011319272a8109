pub mod names;
pub mod text;
pub mod title;

pub use names::{DancerName, NAME_BREAK, clean_names};
pub use text::{fold_diacritics, slugify, title_case};
pub use title::clean_title;
