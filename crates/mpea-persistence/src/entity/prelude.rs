pub use super::admins::Entity as Admins;
pub use super::board_chair::Entity as BoardChair;
pub use super::cases::Entity as Cases;
pub use super::certificates::Entity as Certificates;
pub use super::contact_messages::Entity as ContactMessages;
pub use super::events::Entity as Events;
pub use super::kindergartens::Entity as Kindergartens;
pub use super::lecturers::Entity as Lecturers;
pub use super::news::Entity as News;
pub use super::pages::Entity as Pages;
pub use super::partners::Entity as Partners;
pub use super::translations::Entity as Translations;
