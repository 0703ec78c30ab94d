//! Schema migrations, applied in declaration order.

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_admins;
mod m20250101_000002_create_translations;
mod m20250101_000003_create_pages;
mod m20250101_000004_create_news;
mod m20250101_000005_create_contact_messages;
mod m20250101_000006_create_cases;
mod m20250101_000007_create_lecturers;
mod m20250101_000008_create_partners;
mod m20250101_000009_create_kindergartens;
mod m20250101_000010_create_events;
mod m20250101_000011_create_board_chair;
mod m20250101_000012_create_certificates;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_admins::Migration),
            Box::new(m20250101_000002_create_translations::Migration),
            Box::new(m20250101_000003_create_pages::Migration),
            Box::new(m20250101_000004_create_news::Migration),
            Box::new(m20250101_000005_create_contact_messages::Migration),
            Box::new(m20250101_000006_create_cases::Migration),
            Box::new(m20250101_000007_create_lecturers::Migration),
            Box::new(m20250101_000008_create_partners::Migration),
            Box::new(m20250101_000009_create_kindergartens::Migration),
            Box::new(m20250101_000010_create_events::Migration),
            Box::new(m20250101_000011_create_board_chair::Migration),
            Box::new(m20250101_000012_create_certificates::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered_and_unique() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        assert_eq!(names.len(), 12);
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, names);
    }
}
