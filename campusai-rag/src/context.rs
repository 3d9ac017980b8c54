//! Context assembly
//!
//! Merges retrieved passages and course records into the single context
//! string handed to the language model, enforcing the configured size cap.

use crate::catalog::CourseRecord;
use campusai_index::RetrievedPassage;
use tracing::debug;

const PASSAGE_SEPARATOR: &str = "\n\n---\n\n";
const COURSE_HEADER: &str = "Relevant Course Information:";

/// Assemble the model context from retrieval output.
///
/// Passages appear in retrieval order separated by `---` rules; course
/// records follow under a header. When the combined text exceeds
/// `max_chars`, the course section is kept whole and the lowest-ranked
/// passages are dropped first. The result is never cut mid-passage.
pub fn assemble(
    passages: &[RetrievedPassage],
    courses: &[CourseRecord],
    max_chars: usize,
) -> String {
    let course_section = render_courses(courses);
    let mut budget = max_chars.saturating_sub(course_section.len());
    if !course_section.is_empty() {
        budget = budget.saturating_sub(PASSAGE_SEPARATOR.len());
    }

    let mut parts: Vec<&str> = Vec::with_capacity(passages.len());
    let mut used = 0;
    for passage in passages {
        let cost = passage.text.len()
            + if parts.is_empty() { 0 } else { PASSAGE_SEPARATOR.len() };
        if used + cost > budget {
            debug!(
                kept = parts.len(),
                dropped = passages.len() - parts.len(),
                "context budget reached, dropping lowest-ranked passages"
            );
            break;
        }
        parts.push(&passage.text);
        used += cost;
    }

    let mut context = parts.join(PASSAGE_SEPARATOR);
    if !course_section.is_empty() {
        if !context.is_empty() {
            context.push_str(PASSAGE_SEPARATOR);
        }
        context.push_str(&course_section);
    }
    context
}

/// Render course records under a header. Empty input renders nothing, so an
/// empty catalog result never leaves a dangling header in the context.
fn render_courses(courses: &[CourseRecord]) -> String {
    if courses.is_empty() {
        return String::new();
    }

    let mut out = String::from(COURSE_HEADER);
    for course in courses {
        out.push_str("\n\n");
        out.push_str(&render_course(course));
    }
    out
}

/// Fixed multi-field template. Every line renders for every record, absent
/// fields showing their documented default, so records are uniform in shape.
fn render_course(course: &CourseRecord) -> String {
    let identifier = course.identifier();
    let title = course.title.as_deref().unwrap_or("Untitled course");
    let heading = if identifier.is_empty() {
        title.to_string()
    } else {
        format!("{} - {}", identifier, title)
    };

    [
        heading,
        format!(
            "Description: {}",
            course.description.as_deref().unwrap_or("N/A")
        ),
        format!(
            "Prerequisites: {}",
            course.prerequisites.as_deref().unwrap_or("None")
        ),
        format!("Credits: {}", course.credits.as_deref().unwrap_or("N/A")),
        format!(
            "Department: {}",
            course.department.as_deref().unwrap_or("N/A")
        ),
        format!("Terms offered: {}", course.terms_offered.join(", ")),
    ]
    .join("\n")
}
