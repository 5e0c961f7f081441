//! Course progress arithmetic.

use learnhub_core::{CourseId, DomainError, DomainResult, UserId};

use crate::records::EnrollmentRecord;

/// `part / whole` as a rounded percentage (half up), capped at 100.
///
/// An empty `whole` yields 0.
pub fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u64;
    let whole = whole as u64;
    ((part * 200 + whole) / (whole * 2)) as u8
}

/// Progress of a course with `total` modules after `completed` of them.
pub fn module_progress(completed: usize, total: usize) -> u8 {
    percent(completed, total)
}

/// Mark `module_index` as completed and recompute the enrollment's progress.
///
/// Returns `Ok(false)` when the module was already recorded; the progress is
/// still recomputed against `total_modules`, which may have changed.
pub fn complete_module(
    enrollment: &mut EnrollmentRecord,
    module_index: usize,
    total_modules: usize,
) -> DomainResult<bool> {
    if module_index >= total_modules {
        return Err(DomainError::validation(format!(
            "module {module_index} out of range (course has {total_modules} modules)"
        )));
    }

    let newly_completed = !enrollment.completed_modules.contains(&module_index);
    if newly_completed {
        enrollment.completed_modules.push(module_index);
    }

    let counted = enrollment
        .completed_modules
        .iter()
        .filter(|&&idx| idx < total_modules)
        .count();
    enrollment.progress = module_progress(counted, total_modules);

    tracing::debug!(
        enrollment_id = %enrollment.id,
        module_index,
        progress = enrollment.progress,
        "module completed"
    );

    Ok(newly_completed)
}

/// Reject a second enrollment of `user_id` in `course_id`.
pub fn ensure_not_enrolled(
    enrollments: &[EnrollmentRecord],
    user_id: &UserId,
    course_id: &CourseId,
) -> DomainResult<()> {
    if enrollments
        .iter()
        .any(|e| &e.user_id == user_id && &e.course_id == course_id)
    {
        return Err(DomainError::conflict(format!(
            "user {user_id} is already enrolled in course {course_id}"
        )));
    }
    Ok(())
}
