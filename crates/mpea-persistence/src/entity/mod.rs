//! SeaORM entity definitions, one module per table.

pub mod admins;
pub mod board_chair;
pub mod cases;
pub mod certificates;
pub mod contact_messages;
pub mod events;
pub mod kindergartens;
pub mod lecturers;
pub mod news;
pub mod pages;
pub mod partners;
pub mod prelude;
pub mod translations;
