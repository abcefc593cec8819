use tui::layout::{Constraint, Layout, Rect, Size};
pub const TAB_BAR_HEIGHT: u16 = 3;
pub const STATUS_BAR_HEIGHT: u16 = 1;
pub const LOG_PANE_HEIGHT: u16 = 8;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    pub logs: Option<Rect>,
    pub status: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let [body, status] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .areas(area);

        let (body, logs) = if show_logs {
            let [top, bottom] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(LOG_PANE_HEIGHT)]).areas(body);
            (top, Some(bottom))
        } else {
            (body, None)
        };

        if full_screen {
            return LayoutAreas {
                tab_bar: [Rect::ZERO, Rect::ZERO],
                main: body,
                logs,
                status,
            };
        }

        let [tab, main] = Layout::vertical([
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Fill(1),
        ])
        .areas(body);

        LayoutAreas {
            tab_bar: Self::split_tab_bar(tab),
            main,
            logs,
            status,
        }
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_pane_only_when_requested() {
        let area = Rect::new(0, 0, 100, 40);
        let plain = LayoutAreas::from_rect(area, false, false);
        assert!(plain.logs.is_none());
        assert_eq!(plain.status.height, STATUS_BAR_HEIGHT);
        assert_eq!(plain.main.height, 40 - TAB_BAR_HEIGHT - STATUS_BAR_HEIGHT);

        let with_logs = LayoutAreas::from_rect(area, false, true);
        assert_eq!(with_logs.logs.map(|r| r.height), Some(LOG_PANE_HEIGHT));
    }

    #[test]
    fn full_screen_drops_tab_bar() {
        let full = LayoutAreas::from_rect(Rect::new(0, 0, 80, 24), true, false);
        assert_eq!(full.tab_bar, [Rect::ZERO, Rect::ZERO]);
        assert_eq!(full.main.height, 23);
    }
}
