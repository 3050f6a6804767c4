mod types;

pub use types::{
    IssueKind, Page, ResultRow, SearchConfiguration, SearchUpsert, Session, SessionId,
    UnknownIssueKind,
};
