//! Request bodies shared by the form routes and the JSON API.

use garde::Validate;
use serde::Deserialize;

use crate::models::job::{JobUpdate, NewJob};

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[garde(length(max = 64))]
    pub username: String,

    #[garde(length(max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddJobRequest {
    #[garde(length(max = 100))]
    pub reference: String,

    #[garde(length(max = 100))]
    pub importer_name: String,

    /// ISO-8601 timestamp; blank or invalid means "now"
    #[garde(skip)]
    pub received_time: Option<String>,

    #[garde(length(max = 64))]
    pub assigned_username: Option<String>,

    #[garde(length(max = 50))]
    pub status: Option<String>,
}

impl From<AddJobRequest> for NewJob {
    fn from(req: AddJobRequest) -> Self {
        NewJob {
            reference: req.reference,
            importer_name: req.importer_name,
            received_time: req.received_time,
            assigned_username: req.assigned_username,
            status: req.status,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateJobRequest {
    #[garde(length(max = 100))]
    pub importer_name: Option<String>,

    #[garde(length(max = 50))]
    pub status: Option<String>,

    /// Blank clears the assignment
    #[garde(length(max = 64))]
    pub assigned_username: Option<String>,
}

impl From<UpdateJobRequest> for JobUpdate {
    fn from(req: UpdateJobRequest) -> Self {
        JobUpdate {
            importer_name: req.importer_name,
            status: req.status,
            assigned_username: req.assigned_username,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddUserRequest {
    #[garde(length(max = 64))]
    pub username: String,

    #[garde(length(max = 100))]
    pub full_name: Option<String>,

    #[garde(length(max = 128))]
    pub password: String,

    /// `admin` or `staff`; blank means staff
    #[garde(skip)]
    pub role: Option<String>,
}
