pub mod ffdanse;
