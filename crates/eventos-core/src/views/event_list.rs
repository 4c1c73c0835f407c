use eventos_api::{Event, EventPage, EventQuery};

use crate::context::AppContext;
use crate::lifecycle::Listing;
use crate::routes::Route;

/// Paging details from the last page load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub total: u64,
    pub page: Option<u32>,
    pub total_pages: Option<u32>,
}

/// Home screen: paged event list with a name filter.
#[derive(Debug)]
pub struct EventListView {
    ctx: AppContext,
    query: EventQuery,
    listing: Listing<Event>,
    page: PageInfo,
}

impl EventListView {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            query: EventQuery::default(),
            listing: Listing::new(),
            page: PageInfo::default(),
        }
    }

    pub fn query(&self) -> &EventQuery {
        &self.query
    }

    pub fn set_query(&mut self, query: EventQuery) {
        self.query = query;
    }

    pub fn listing(&self) -> &Listing<Event> {
        &self.listing
    }

    pub fn events(&self) -> &[Event] {
        self.listing.items()
    }

    pub fn page_info(&self) -> PageInfo {
        self.page
    }

    pub async fn load(&mut self) -> bool {
        let api = self.ctx.api().clone();
        let query = self.query.clone();
        let page = self
            .listing
            .load_page(
                || async move { api.list_events(&query).await },
                |page: &mut EventPage| std::mem::take(&mut page.events),
            )
            .await;

        match page {
            Some(page) => {
                self.page = PageInfo {
                    total: page.total,
                    page: page.page,
                    total_pages: page.total_pages,
                };
                true
            }
            None => {
                self.page = PageInfo::default();
                false
            }
        }
    }

    /// Unpaged name search (`/eventos/buscar`).
    pub async fn search(&mut self, name: &str) -> bool {
        let api = self.ctx.api().clone();
        let name = name.to_owned();
        let found = self
            .listing
            .load(|| async move { api.search_events(&name).await })
            .await;

        let count = u64::try_from(self.listing.items().len()).unwrap_or(u64::MAX);
        self.page = PageInfo {
            total: if found { count } else { 0 },
            ..PageInfo::default()
        };
        found
    }

    pub fn open(&self, id: i64) -> Route {
        self.ctx.navigate(Route::EventDetail { id })
    }
}
