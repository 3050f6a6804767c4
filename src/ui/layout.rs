use ratatui::layout::{Constraint, Direction, Rect};

/// Rows taken by the search form, borders included
const FORM_HEIGHT: u16 = 15;

/// Layout configuration for the UI
pub struct Layout {
    /// Width percentage for the session list (left panel)
    pub session_list_width_pct: u16,
    /// Height of the search form (top of the right panel)
    pub form_height: u16,
}

impl Layout {
    /// Create a new layout with default settings
    pub fn new() -> Self {
        Self {
            session_list_width_pct: 30,
            form_height: FORM_HEIGHT,
        }
    }

    /// Calculate the main areas
    /// Layout: [           Notice (optional)           ]
    ///         [Session List] [Search form            ]
    ///         [            ] [Results                 ]
    ///         [         Status Bar (full width)       ]
    pub fn calculate(&self, area: Rect, show_notice: bool) -> LayoutAreas {
        let rows = ratatui::layout::Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(u16::from(show_notice)),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(area);

        let notice = show_notice.then_some(rows[0]);
        let main_area = rows[1];
        let status_bar = rows[2];

        let horizontal = ratatui::layout::Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(self.session_list_width_pct),
                Constraint::Percentage(100 - self.session_list_width_pct),
            ])
            .split(main_area);

        let right_panel = ratatui::layout::Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(self.form_height), Constraint::Min(3)])
            .split(horizontal[1]);

        LayoutAreas {
            notice,
            session_list: horizontal[0],
            form: right_panel[0],
            results: right_panel[1],
            status_bar,
        }
    }

    /// Calculate areas for a popup (centered)
    pub fn popup_area(&self, area: Rect, width_pct: u16, height_pct: u16) -> Rect {
        let popup_layout = ratatui::layout::Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - height_pct) / 2),
                Constraint::Percentage(height_pct),
                Constraint::Percentage((100 - height_pct) / 2),
            ])
            .split(area);

        ratatui::layout::Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - width_pct) / 2),
                Constraint::Percentage(width_pct),
                Constraint::Percentage((100 - width_pct) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

/// Calculated layout areas
pub struct LayoutAreas {
    /// Notice banner, when a notice is pending
    pub notice: Option<Rect>,
    pub session_list: Rect,
    pub form: Rect,
    pub results: Rect,
    pub status_bar: Rect,
}
