//! Sample jobs used across registry tests.

pub struct JobFixture {
    pub reference: &'static str,
    pub importer_name: &'static str,
    pub status: Option<&'static str>,
    pub assignee: Option<&'static str>,
}

pub const SAMPLE_JOBS: &[JobFixture] = &[
    JobFixture {
        reference: "SHP-1001",
        importer_name: "Acme Imports",
        status: None,
        assignee: Some("user01"),
    },
    JobFixture {
        reference: "SHP-1002",
        importer_name: "Globex Trading",
        status: Some("Cleared"),
        assignee: None,
    },
    JobFixture {
        reference: "AIR-2001",
        importer_name: "ACME Logistics",
        status: Some("In Progress"),
        assignee: Some("user01"),
    },
    JobFixture {
        reference: "SEA-3001",
        importer_name: "Initech",
        status: Some("Cleared"),
        assignee: Some("admin"),
    },
    JobFixture {
        reference: "SEA-3002",
        importer_name: "Umbrella Freight",
        status: Some("cleared"),
        assignee: None,
    },
];
