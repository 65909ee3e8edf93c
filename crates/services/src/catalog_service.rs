use std::sync::Arc;

use lms_core::model::content::AssetRef;
use lms_core::model::{Course, CourseId};
use storage::repository::CourseRepository;

use crate::error::CatalogError;
use crate::session::Session;

/// One course as shown on the learner-facing catalog page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseSummary {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub cover_image: Option<AssetRef>,
    pub duration_hours: u32,
    pub lessons_count: usize,
}

impl CourseSummary {
    fn from_course(course: &Course) -> Self {
        Self {
            id: course.id(),
            title: course.title().to_owned(),
            description: course.description().to_owned(),
            cover_image: course.cover_image().cloned(),
            duration_hours: course.duration_hours(),
            lessons_count: course.total_lessons(),
        }
    }
}

/// One row on the admin course list: the catalog summary fields plus the
/// publication flag. Unpublished courses appear here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminCourseSummary {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub cover_image: Option<AssetRef>,
    pub duration_hours: u32,
    pub is_published: bool,
    pub lessons_count: usize,
}

impl AdminCourseSummary {
    fn from_course(course: &Course) -> Self {
        Self {
            id: course.id(),
            title: course.title().to_owned(),
            description: course.description().to_owned(),
            cover_image: course.cover_image().cloned(),
            duration_hours: course.duration_hours(),
            is_published: course.is_published(),
            lessons_count: course.total_lessons(),
        }
    }
}

/// Read side of the course catalog.
#[derive(Clone)]
pub struct CatalogService {
    courses: Arc<dyn CourseRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    /// List published courses for the catalog page, newest first, up to the
    /// given limit. The catalog is public; no session required.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if repository access fails.
    pub async fn list_published(&self, limit: u32) -> Result<Vec<CourseSummary>, CatalogError> {
        let courses = self.courses.list_published(limit).await?;
        Ok(courses.iter().map(CourseSummary::from_course).collect())
    }

    /// List every course, published or not, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Access` for a non-admin session.
    /// Returns `CatalogError::Storage` if repository access fails.
    pub async fn list_all(
        &self,
        session: &Session,
        limit: u32,
    ) -> Result<Vec<AdminCourseSummary>, CatalogError> {
        session.require_admin()?;
        let courses = self.courses.list_courses(limit).await?;
        Ok(courses.iter().map(AdminCourseSummary::from_course).collect())
    }

    /// Fetch a full course with its lesson sequence.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::CourseNotFound` if no such course exists.
    /// Returns `CatalogError::Storage` if repository access fails.
    pub async fn get_course(&self, course_id: CourseId) -> Result<Course, CatalogError> {
        let course = self
            .courses
            .get_course(course_id)
            .await?
            .ok_or(CatalogError::CourseNotFound(course_id))?;
        Ok(course)
    }
}
