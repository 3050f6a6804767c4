mod help_popup;
mod notice_banner;
mod results_table;
mod search_form;
mod session_list;
mod status_bar;

pub use help_popup::HelpPopup;
pub use notice_banner::NoticeBanner;
pub use results_table::ResultsTable;
pub use search_form::SearchForm;
pub use session_list::SessionList;
pub use status_bar::StatusBar;
