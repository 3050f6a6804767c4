mod draft;
mod machine;

pub use draft::{
    validate, Draft, DraftEdit, DraftField, ValidationErrors, ISSUES_REQUIRED,
    MAX_RESULTS_POSITIVE, QUERY_REQUIRED,
};
pub use machine::{
    EditorError, EditorForm, EditorPhase, LoadApplied, SaveApplied, SessionEditor, SubmitTicket,
};
