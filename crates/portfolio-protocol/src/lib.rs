pub mod section;
pub mod theme;
pub mod types;
pub mod visibility;

pub use section::SectionId;
pub use theme::ThemeMode;
pub use types::Rect;
pub use visibility::VisibilityEntry;
