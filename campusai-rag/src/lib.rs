//! Retrieval-augmented query pipeline for CampusAI
//!
//! Orchestrates passage retrieval, live course-catalog lookup, context
//! assembly, persona prompt construction and answer generation.

pub mod catalog;
pub mod completion;
pub mod context;
pub mod pipeline;
pub mod prompt;

pub use catalog::{parse_course_code, CatalogError, CourseCatalog, CourseRecord};
pub use completion::{ChatCompletion, OpenAiChatClient};
pub use context::assemble;
pub use pipeline::{CourseSource, PassageSource, QueryPipeline};
pub use prompt::{build_messages, PromptMessage};
