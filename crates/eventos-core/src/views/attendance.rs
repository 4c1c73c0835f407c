use eventos_api::Attendance;

use crate::context::AppContext;
use crate::lifecycle::Listing;

/// Who attends which session.
#[derive(Debug)]
pub struct AttendanceView {
    ctx: AppContext,
    entries: Listing<Attendance>,
}

impl AttendanceView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            entries: Listing::new(),
        }
    }

    pub fn entries(&self) -> &[Attendance] {
        self.entries.items()
    }

    pub fn listing(&self) -> &Listing<Attendance> {
        &self.entries
    }

    pub async fn load(&mut self) -> bool {
        let api = self.ctx.api().clone();
        self.entries
            .load(|| async move { api.attendance().await })
            .await
    }
}
