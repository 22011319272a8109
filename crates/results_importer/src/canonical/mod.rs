pub mod models;

pub use models::{ClubGroup, Competition, Contest, UNKNOWN_COUPLE, competition_id};
