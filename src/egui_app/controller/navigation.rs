use super::*;
use crate::egui_app::state::Page;
use crate::result_view::ResultPhase;

impl AppController {
    pub fn page(&self) -> Page {
        self.ui.page
    }

    /// Switch views, tearing down the one being left.
    ///
    /// Replies still in flight for the old view are discarded when they land.
    pub fn navigate(&mut self, page: Page) {
        let previous = self.ui.page;
        if previous == page {
            return;
        }
        self.leave_page(previous);
        self.ui.page = page;
        tracing::debug!(from = ?previous, to = ?page, "navigate");
        self.enter_page(page);
    }

    fn leave_page(&mut self, page: Page) {
        match page {
            Page::Landing => self.ui.weather.invalidate(),
            Page::Form => {
                self.ui.form.submit.invalidate();
                self.ui.form.sensor.invalidate();
                self.ui.form.sensor_prompt = None;
            }
            Page::Result => self.ui.result.unmount(),
            Page::History => self.ui.history.invalidate(),
            Page::Dashboard => self.ui.dashboard.leave(),
        }
        if let Some(host) = page.translation_host() {
            self.translation.unmount(host);
        }
    }

    fn enter_page(&mut self, page: Page) {
        if let Some(host) = page.translation_host() {
            self.translation.mount(host);
        }
        match page {
            Page::Result => self.mount_result(),
            Page::History => self.reload_history(),
            Page::Landing | Page::Form | Page::Dashboard => {}
        }
    }

    fn mount_result(&mut self) {
        if let Some(job) = self.ui.result.mount(&self.handoff) {
            self.start_suggestions(job);
            return;
        }
        if *self.ui.result.phase() == ResultPhase::Redirected {
            tracing::info!("no recommendation to show; back to the form");
            self.ui.result.unmount();
            self.ui.page = Page::Form;
            self.enter_page(Page::Form);
        }
    }
}
