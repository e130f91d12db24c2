pub mod resume;

pub use resume::{ContactKind, EntryId, ResumeData, ResumePatch};
