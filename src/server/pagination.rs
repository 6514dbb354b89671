//! Page-number pagination: `?page=N`, 1-based, with links to the neighbours.

use super::responses::{detail, internal_error};
use super::state::ServerState;
use crate::store::{Page, PageWindow};

use axum::{
    extract::{FromRequestParts, OriginalUri, Query},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Default)]
struct PageQuery {
    page: Option<String>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct PageLinks {
    pub next: Option<String>,
    pub previous: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct Paginated<T> {
    pub links: PageLinks,
    pub count: usize,
    pub total_pages: usize,
    pub results: Vec<T>,
}

pub fn invalid_page() -> Response {
    detail(StatusCode::NOT_FOUND, "Invalid page.")
}

/// An empty listing still has one page.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

fn parse_page(raw: Option<&str>) -> Option<usize> {
    match raw {
        None => Some(1),
        Some(raw) => raw.trim().parse::<usize>().ok().filter(|p| *p > 0),
    }
}

/// The requested window plus the path used to build the neighbour links.
pub struct Pagination {
    pub window: PageWindow,
    path: String,
}

impl Pagination {
    fn link(&self, page: usize) -> String {
        // Like the first page itself, the link to it carries no parameter.
        if page == 1 {
            self.path.clone()
        } else {
            format!("{}?page={}", self.path, page)
        }
    }

    /// `None` when the window lies past the last page.
    pub fn wrap<T>(&self, page: Page<T>) -> Option<Paginated<T>> {
        let total_pages = total_pages(page.total, self.window.page_size);
        let current = self.window.page;
        if current > total_pages {
            return None;
        }
        Some(Paginated {
            links: PageLinks {
                next: (current < total_pages).then(|| self.link(current + 1)),
                previous: (current > 1).then(|| self.link(current - 1)),
            },
            count: page.total,
            total_pages,
            results: page.items,
        })
    }

    pub fn respond<T: Serialize>(&self, result: anyhow::Result<Page<T>>) -> Response {
        match result {
            Ok(page) => match self.wrap(page) {
                Some(paginated) => Json(paginated).into_response(),
                None => invalid_page(),
            },
            Err(err) => internal_error(err),
        }
    }
}

impl FromRequestParts<ServerState> for Pagination {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid_page())?;
        let page = parse_page(query.page.as_deref()).ok_or_else(invalid_page)?;
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map(|uri| uri.path().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());
        Ok(Pagination {
            window: PageWindow::new(page, state.config.page_size),
            path,
        })
    }
}
