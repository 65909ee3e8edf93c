use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::{Course, CourseId, LearnerId, LessonId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("lesson {lesson_id} is not part of course {course_id}")]
    LessonNotFound {
        course_id: CourseId,
        lesson_id: LessonId,
    },

    #[error("progress tracks course {expected}, cannot be measured against course {found}")]
    CourseMismatch { expected: CourseId, found: CourseId },
}

//
// ─── PROGRESS STATE ────────────────────────────────────────────────────────────
//

/// Where a learner stands on a course.
///
/// `NotStarted` is the absence of a progress record; the other two are
/// derived from an existing record. A record with an empty completion set
/// still means the learner has started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    NotStarted,
    InProgress,
    Completed,
}

//
// ─── COMPLETION EVENT ──────────────────────────────────────────────────────────
//

/// Outcome of recording a lesson completion.
///
/// Every successful call produces one of these. `newly_recorded` is true
/// only when the call actually grew the completion set, so re-recording an
/// already-finished lesson is observable without being an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionEvent {
    pub learner_id: LearnerId,
    pub course_id: CourseId,
    pub lesson_id: LessonId,
    pub resulting_percent: u8,
    pub newly_recorded: bool,
}

impl CompletionEvent {
    /// True exactly when this call moved the course to 100 percent.
    ///
    /// Re-recording a lesson after completion keeps the percentage at 100
    /// but returns `false` here, so a course-completed signal driven by
    /// this method fires once per transition.
    #[must_use]
    pub fn completed_course(&self) -> bool {
        self.newly_recorded && self.resulting_percent == 100
    }
}

//
// ─── LEARNER PROGRESS ──────────────────────────────────────────────────────────
//

/// A learner's completion record for one course.
///
/// The record stores only the set of completed lesson ids and the start
/// time. Everything else, the percentage included, is derived against the
/// course's current lesson sequence at read time, so the numbers stay
/// honest when the course grows after the learner finished.
///
/// The completion set never shrinks. Lessons completed and later detached
/// from the course (possible only for records rehydrated from storage)
/// stay in the set but stop counting toward the percentage.
///
/// # Examples
///
/// ```
/// # use lms_core::model::{ContentDraft, CourseDraft, CourseId, LearnerId, LessonDraft, LessonId};
/// # use lms_core::progress::LearnerProgress;
/// # use lms_core::time::fixed_now;
/// let mut course = CourseDraft::new("Rust Basics", "", 4)
///     .validate(fixed_now(), "Dana")?
///     .assign_id(CourseId::new(1));
/// let lesson = LessonDraft::new("Intro", 10, ContentDraft::text("hello"))
///     .validate()?
///     .assign(LessonId::new(1), 1);
/// course.attach_lesson(lesson)?;
///
/// let mut progress = LearnerProgress::start(LearnerId::new(7), course.id(), fixed_now());
/// let event = progress.record_completion(&course, LessonId::new(1))?;
///
/// assert_eq!(event.resulting_percent, 100);
/// assert!(event.completed_course());
/// # Ok::<(), lms_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnerProgress {
    learner_id: LearnerId,
    course_id: CourseId,
    completed_lessons: BTreeSet<LessonId>,
    started_at: DateTime<Utc>,
}

impl LearnerProgress {
    /// Opens a fresh record at the learner's first interaction with the
    /// course.
    #[must_use]
    pub fn start(learner_id: LearnerId, course_id: CourseId, started_at: DateTime<Utc>) -> Self {
        Self {
            learner_id,
            course_id,
            completed_lessons: BTreeSet::new(),
            started_at,
        }
    }

    /// Rebuilds a record from persisted parts.
    #[must_use]
    pub fn from_persisted(
        learner_id: LearnerId,
        course_id: CourseId,
        completed_lessons: BTreeSet<LessonId>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            learner_id,
            course_id,
            completed_lessons,
            started_at,
        }
    }

    // Accessors
    #[must_use]
    pub fn learner_id(&self) -> LearnerId {
        self.learner_id
    }

    #[must_use]
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    #[must_use]
    pub fn completed_lessons(&self) -> &BTreeSet<LessonId> {
        &self.completed_lessons
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Marks a lesson as completed.
    ///
    /// Idempotent and order-independent: recording the same lesson again
    /// succeeds without growing the set, and any completion order reaches
    /// the same state. A failed call leaves the record untouched.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::LessonNotFound` if the lesson is not in the
    /// course, `ProgressError::CourseMismatch` if the given course is not
    /// the one this record tracks.
    pub fn record_completion(
        &mut self,
        course: &Course,
        lesson_id: LessonId,
    ) -> Result<CompletionEvent, ProgressError> {
        if course.id() != self.course_id {
            return Err(ProgressError::CourseMismatch {
                expected: self.course_id,
                found: course.id(),
            });
        }
        if !course.contains_lesson(lesson_id) {
            return Err(ProgressError::LessonNotFound {
                course_id: self.course_id,
                lesson_id,
            });
        }

        let newly_recorded = self.completed_lessons.insert(lesson_id);

        Ok(CompletionEvent {
            learner_id: self.learner_id,
            course_id: self.course_id,
            lesson_id,
            resulting_percent: self.percent(course),
            newly_recorded,
        })
    }

    /// How many of the course's current lessons are completed.
    ///
    /// Counts the intersection with the current sequence, so stale ids in
    /// the set do not inflate the number.
    #[must_use]
    pub fn completed_count(&self, course: &Course) -> usize {
        course
            .lesson_ids()
            .filter(|id| self.completed_lessons.contains(id))
            .count()
    }

    /// Completion percentage as an integer in `0..=100`, rounded half-up.
    ///
    /// A course without lessons reads as 0 percent.
    ///
    /// # Examples
    ///
    /// 3 of 7 lessons is 42.857 percent and reads as 43; 1 of 8 is 12.5
    /// and reads as 13; 2 of 4 is exactly 50.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn percent(&self, course: &Course) -> u8 {
        let total = course.total_lessons();
        if total == 0 {
            return 0;
        }
        let done = self.completed_count(course);
        // integer round-half-up of 100 * done / total
        ((200 * done + total) / (2 * total)) as u8
    }

    /// True when every current lesson is completed and the course has at
    /// least one lesson.
    #[must_use]
    pub fn is_complete(&self, course: &Course) -> bool {
        self.percent(course) == 100
    }

    /// Derives the state for this record. `NotStarted` cannot come from
    /// here; it is the absence of the record itself.
    #[must_use]
    pub fn state(&self, course: &Course) -> ProgressState {
        if self.is_complete(course) {
            ProgressState::Completed
        } else {
            ProgressState::InProgress
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentDraft, CourseDraft, LessonDraft};
    use crate::time::fixed_now;

    fn build_course(id: u64, lessons: u32) -> Course {
        let mut course = CourseDraft::new("Rust Basics", "", 4)
            .validate(fixed_now(), "Dana")
            .unwrap()
            .assign_id(CourseId::new(id));
        for n in 1..=lessons {
            let lesson = LessonDraft::new(format!("Lesson {n}"), 10, ContentDraft::text("hi"))
                .validate()
                .unwrap()
                .assign(LessonId::new(u64::from(n)), n);
            course.attach_lesson(lesson).unwrap();
        }
        course
    }

    fn start_on(course: &Course) -> LearnerProgress {
        LearnerProgress::start(LearnerId::new(7), course.id(), fixed_now())
    }

    #[test]
    fn two_of_four_is_fifty() {
        let course = build_course(1, 4);
        let mut progress = start_on(&course);
        progress.record_completion(&course, LessonId::new(1)).unwrap();
        progress.record_completion(&course, LessonId::new(2)).unwrap();

        assert_eq!(progress.percent(&course), 50);
        assert!(!progress.is_complete(&course));
    }

    #[test]
    fn three_of_seven_rounds_half_up_to_43() {
        let course = build_course(1, 7);
        let mut progress = start_on(&course);
        for id in [1, 2, 3] {
            progress.record_completion(&course, LessonId::new(id)).unwrap();
        }
        assert_eq!(progress.percent(&course), 43);
    }

    #[test]
    fn exact_halves_round_up() {
        let course = build_course(1, 8);
        let mut progress = start_on(&course);
        progress.record_completion(&course, LessonId::new(1)).unwrap();
        // 1/8 = 12.5
        assert_eq!(progress.percent(&course), 13);
    }

    #[test]
    fn two_of_three_rounds_to_67() {
        let course = build_course(1, 3);
        let mut progress = start_on(&course);
        progress.record_completion(&course, LessonId::new(1)).unwrap();
        progress.record_completion(&course, LessonId::new(2)).unwrap();
        assert_eq!(progress.percent(&course), 67);
    }

    #[test]
    fn recording_is_idempotent() {
        let course = build_course(1, 2);
        let mut progress = start_on(&course);

        let first = progress.record_completion(&course, LessonId::new(1)).unwrap();
        let second = progress.record_completion(&course, LessonId::new(1)).unwrap();

        assert!(first.newly_recorded);
        assert!(!second.newly_recorded);
        assert_eq!(first.resulting_percent, second.resulting_percent);
        assert_eq!(progress.completed_lessons().len(), 1);
    }

    #[test]
    fn completion_order_does_not_matter() {
        let course = build_course(1, 3);

        let mut forward = start_on(&course);
        for id in [1, 2, 3] {
            forward.record_completion(&course, LessonId::new(id)).unwrap();
        }

        let mut backward = start_on(&course);
        for id in [3, 2, 1] {
            backward.record_completion(&course, LessonId::new(id)).unwrap();
        }

        assert_eq!(forward.percent(&course), 100);
        assert_eq!(forward.completed_lessons(), backward.completed_lessons());
    }

    #[test]
    fn percent_never_decreases_while_recording() {
        let course = build_course(1, 5);
        let mut progress = start_on(&course);

        let mut last = progress.percent(&course);
        for id in [3, 1, 5, 2, 4] {
            progress.record_completion(&course, LessonId::new(id)).unwrap();
            let now = progress.percent(&course);
            assert!(now >= last);
            last = now;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn unknown_lesson_is_rejected_and_nothing_changes() {
        let course = build_course(1, 2);
        let mut progress = start_on(&course);
        progress.record_completion(&course, LessonId::new(1)).unwrap();

        let err = progress
            .record_completion(&course, LessonId::new(99))
            .unwrap_err();
        assert_eq!(
            err,
            ProgressError::LessonNotFound {
                course_id: CourseId::new(1),
                lesson_id: LessonId::new(99)
            }
        );
        assert_eq!(progress.completed_lessons().len(), 1);
        assert_eq!(progress.percent(&course), 50);
    }

    #[test]
    fn mismatched_course_is_rejected() {
        let course = build_course(1, 1);
        let other = build_course(2, 1);
        let mut progress = start_on(&course);

        let err = progress
            .record_completion(&other, LessonId::new(1))
            .unwrap_err();
        assert!(matches!(err, ProgressError::CourseMismatch { .. }));
    }

    #[test]
    fn zero_lesson_course_reads_as_zero_and_never_completes() {
        let course = build_course(1, 0);
        let progress = start_on(&course);

        assert_eq!(progress.percent(&course), 0);
        assert!(!progress.is_complete(&course));
        assert_eq!(progress.state(&course), ProgressState::InProgress);
    }

    #[test]
    fn completion_signal_fires_exactly_once() {
        let course = build_course(1, 2);
        let mut progress = start_on(&course);

        let first = progress.record_completion(&course, LessonId::new(1)).unwrap();
        assert_eq!(first.resulting_percent, 50);
        assert!(!first.completed_course());

        let second = progress.record_completion(&course, LessonId::new(2)).unwrap();
        assert_eq!(second.resulting_percent, 100);
        assert!(second.completed_course());

        let replay = progress.record_completion(&course, LessonId::new(2)).unwrap();
        assert_eq!(replay.resulting_percent, 100);
        assert!(!replay.completed_course());
    }

    #[test]
    fn a_lesson_added_later_demotes_a_completed_course() {
        let mut course = build_course(1, 1);
        let mut progress = start_on(&course);
        progress.record_completion(&course, LessonId::new(1)).unwrap();
        assert!(progress.is_complete(&course));

        let late = LessonDraft::new("Lesson 2", 10, ContentDraft::text("more"))
            .validate()
            .unwrap()
            .assign(LessonId::new(2), 2);
        course.attach_lesson(late).unwrap();

        assert_eq!(progress.percent(&course), 50);
        assert_eq!(progress.state(&course), ProgressState::InProgress);
    }

    #[test]
    fn stale_completed_ids_do_not_count() {
        let course = build_course(1, 2);
        let stale: BTreeSet<LessonId> =
            [LessonId::new(1), LessonId::new(99)].into_iter().collect();
        let progress = LearnerProgress::from_persisted(
            LearnerId::new(7),
            CourseId::new(1),
            stale,
            fixed_now(),
        );

        assert_eq!(progress.completed_count(&course), 1);
        assert_eq!(progress.percent(&course), 50);
    }
}
