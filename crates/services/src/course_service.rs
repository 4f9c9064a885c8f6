use std::sync::Arc;

use campus_core::model::{Course, CourseId};

use crate::error::CourseServiceError;
use crate::gateway::ApiGateway;

/// Read-only course listing for the signed-in user.
pub struct CourseService {
    gateway: Arc<ApiGateway>,
}

impl CourseService {
    #[must_use]
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// # Errors
    ///
    /// Returns `CourseServiceError` for backend failures.
    pub async fn list_courses(&self) -> Result<Vec<Course>, CourseServiceError> {
        Ok(self.gateway.list_courses().await?)
    }

    /// # Errors
    ///
    /// Returns `CourseServiceError` for backend failures.
    pub async fn get_course(&self, id: CourseId) -> Result<Course, CourseServiceError> {
        Ok(self.gateway.get_course(id).await?)
    }
}
