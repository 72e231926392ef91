pub mod document;
pub mod section;

// re-export for cleaner imports
pub use self::document::StatsDocument;
pub use self::section::Section;
