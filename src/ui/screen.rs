use pawtrack::clock::Clock;
use ratatui::{layout::Rect, Frame};

use super::{
    community::CommunityScreen, diary::DiaryScreen, facilities::FacilitiesScreen,
    walk::WalkScreen,
};
use crate::{App, Page};

/// A UI Screen boundary: renders one page into the body area
pub trait Screen<C: Clock> {
    fn render(&self, app: &App<C>, f: &mut Frame, area: Rect);

    /// Key hints shown above the tab bar
    fn hints(&self) -> &'static str;
}

/// Helper to construct the screen for the current page
pub fn current_screen<C: Clock>(page: Page) -> Box<dyn Screen<C>> {
    match page {
        Page::Diary => Box::new(DiaryScreen),
        Page::Walk => Box::new(WalkScreen),
        Page::Facilities => Box::new(FacilitiesScreen),
        Page::Community => Box::new(CommunityScreen),
    }
}
