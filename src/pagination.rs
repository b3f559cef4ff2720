use crate::entities::post;
use sea_orm::{DatabaseConnection, DbErr, PaginatorTrait, Select};
use serde::Deserialize;
use utoipa::IntoParams;

pub const POSTS_PER_PAGE: u64 = 10;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number; anything unparsable means the first page.
    pub page: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub object_list: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> u64 {
        self.number + 1
    }

    pub fn previous_page_number(&self) -> u64 {
        self.number.saturating_sub(1)
    }

    pub fn len(&self) -> usize {
        self.object_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_list.is_empty()
    }

    pub fn with_items<U>(self, object_list: Vec<U>) -> Page<U> {
        Page {
            object_list,
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
        }
    }
}

pub fn page_count(count: u64, per_page: u64) -> u64 {
    count.div_ceil(per_page).max(1)
}

/// Picks the page to show: non-numeric input gives the first page, an
/// out-of-range number gives the last one.
pub fn resolve_page_number(raw: Option<&str>, num_pages: u64) -> u64 {
    let Some(raw) = raw else {
        return 1;
    };
    match raw.trim().parse::<i64>() {
        Ok(number) if number >= 1 && (number as u64) <= num_pages => number as u64,
        Ok(_) => num_pages,
        Err(_) => 1,
    }
}

pub async fn paginate(
    db: &DatabaseConnection,
    select: Select<post::Entity>,
    raw_page: Option<&str>,
) -> Result<Page<post::Model>, DbErr> {
    let paginator = select.paginate(db, POSTS_PER_PAGE);
    let count = paginator.num_items().await?;
    let num_pages = page_count(count, POSTS_PER_PAGE);
    let number = resolve_page_number(raw_page, num_pages);
    let object_list = paginator.fetch_page(number - 1).await?;

    Ok(Page {
        object_list,
        number,
        num_pages,
        count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirteen_items_make_two_pages() {
        assert_eq!(page_count(13, POSTS_PER_PAGE), 2);
        assert_eq!(page_count(10, POSTS_PER_PAGE), 1);
        assert_eq!(page_count(0, POSTS_PER_PAGE), 1);
    }

    #[test]
    fn page_number_falls_back_like_a_paginator() {
        assert_eq!(resolve_page_number(None, 2), 1);
        assert_eq!(resolve_page_number(Some("2"), 2), 2);
        assert_eq!(resolve_page_number(Some("abc"), 2), 1);
        assert_eq!(resolve_page_number(Some(""), 2), 1);
        assert_eq!(resolve_page_number(Some("9"), 2), 2);
        assert_eq!(resolve_page_number(Some("0"), 3), 3);
        assert_eq!(resolve_page_number(Some("-1"), 3), 3);
    }

    #[test]
    fn navigation_flags() {
        let page = Page {
            object_list: vec![1, 2, 3],
            number: 2,
            num_pages: 2,
            count: 13,
        };
        assert!(page.has_previous());
        assert!(!page.has_next());
        assert_eq!(page.previous_page_number(), 1);
        assert_eq!(page.len(), 3);
    }
}
