use sitescout_core::models::IssueKind;

/// A demo session definition
pub struct DemoSession {
    pub name: &'static str,
    /// Saved search, if the session is configured
    pub search: Option<DemoSearch>,
    pub results: Vec<DemoResult>,
}

pub struct DemoSearch {
    pub query: &'static str,
    pub issues: &'static [IssueKind],
    pub max_results: i64,
    pub checked: i64,
    pub completed: bool,
}

pub struct DemoResult {
    pub domain: &'static str,
    pub page_count: i64,
    pub tier: i64,
    pub issues: &'static [IssueKind],
    pub status: &'static str,
    pub contact_email: Option<&'static str>,
}

/// Sessions seeded in demo mode, oldest first
pub fn default_sessions() -> Vec<DemoSession> {
    vec![
        DemoSession {
            name: "bakeries in lyon",
            search: Some(DemoSearch {
                query: "bakeries in lyon",
                issues: &[IssueKind::MissingTitle, IssueKind::MissingMetaDescription],
                max_results: 20,
                checked: 20,
                completed: true,
            }),
            results: vec![
                DemoResult {
                    domain: "boulangerie-saint-jean.fr",
                    page_count: 6,
                    tier: 1,
                    issues: &[IssueKind::MissingMetaDescription],
                    status: "completed",
                    contact_email: Some("contact@boulangerie-saint-jean.fr"),
                },
                DemoResult {
                    domain: "painsdeslyonnais.fr",
                    page_count: 14,
                    tier: 3,
                    issues: &[IssueKind::MissingTitle, IssueKind::MissingMetaDescription],
                    status: "completed",
                    contact_email: None,
                },
                DemoResult {
                    domain: "croissant-croix-rousse.com",
                    page_count: 3,
                    tier: 2,
                    issues: &[IssueKind::MissingTitle],
                    status: "completed",
                    contact_email: Some("hello@croissant-croix-rousse.com"),
                },
            ],
        },
        DemoSession {
            name: "roofers near austin",
            search: Some(DemoSearch {
                query: "roofing contractor austin tx",
                issues: &[IssueKind::SlowPerformance, IssueKind::MissingH1],
                max_results: 50,
                checked: 8,
                completed: false,
            }),
            results: vec![],
        },
        DemoSession {
            name: "",
            search: None,
            results: vec![],
        },
    ]
}
