//! View derivation: filter by search term, sort, then cut out the current page.
//!
//! Everything here is a pure function of [`UsersState`]; the UI re-derives the
//! view on every frame.
//!
use std::cmp::Reverse;
use std::ops::RangeInclusive;

use crate::api::User;
use crate::app::state::{SortField, SortOrder, UsersState};

/// Number of page buttons shown in the pagination bar.
pub const PAGE_WINDOW: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsersView<'a> {
    pub visible: Vec<&'a User>,
    pub total_pages: usize,
    /// Records left after filtering.
    pub result_count: usize,
    /// Records before filtering.
    pub total_count: usize,
    pub current_page: i64,
    pub items_per_page: usize,
}

impl UsersView<'_> {
    /// 1-based index of the first visible record, or 0 when nothing is visible.
    pub fn first_shown(&self) -> usize {
        if self.visible.is_empty() {
            0
        } else {
            page_start(self.current_page, self.items_per_page).map_or(0, |s| s + 1)
        }
    }

    /// 1-based index of the last visible record, clamped to the result count.
    pub fn last_shown(&self) -> usize {
        if self.visible.is_empty() {
            return 0;
        }
        self.first_shown() + self.visible.len() - 1
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page <= 1
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page >= self.total_pages as i64
    }
}

/// Keep records whose name, email, username or company name contains `term`, ignoring case.
pub fn filter_users<'a>(users: &'a [User], term: &str) -> Vec<&'a User> {
    if term.is_empty() {
        return users.iter().collect();
    }
    let q = term.to_lowercase();
    users
        .iter()
        .filter(|u| {
            u.name.to_lowercase().contains(&q)
                || u.email.to_lowercase().contains(&q)
                || u.username.to_lowercase().contains(&q)
                || u.company.name.to_lowercase().contains(&q)
        })
        .collect()
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Number(u32),
    Text(String),
}

fn sort_key(user: &User, field: SortField) -> SortKey {
    let text = match field {
        SortField::Id => return SortKey::Number(user.id),
        SortField::Name => &user.name,
        SortField::Username => &user.username,
        SortField::Email => &user.email,
        SortField::Phone => &user.phone,
        SortField::Website => &user.website,
        SortField::Company => &user.company.name,
        SortField::Address => &user.address.city,
    };
    SortKey::Text(text.to_lowercase())
}

/// Stable sort; records with equal keys keep their incoming order in both directions.
pub fn sort_users(users: &mut [&User], field: Option<SortField>, order: SortOrder) {
    let Some(field) = field else { return };
    match order {
        SortOrder::Ascending => users.sort_by_cached_key(|u| sort_key(u, field)),
        SortOrder::Descending => users.sort_by_cached_key(|u| Reverse(sort_key(u, field))),
    }
}

pub fn total_pages(count: usize, items_per_page: usize) -> usize {
    if items_per_page == 0 {
        return 0;
    }
    count.div_ceil(items_per_page)
}

fn page_start(page: i64, items_per_page: usize) -> Option<usize> {
    let index = usize::try_from(page.checked_sub(1)?).ok()?;
    index.checked_mul(items_per_page)
}

/// Slice for a 1-based page; out-of-range pages give an empty slice.
pub fn page_slice<T>(items: &[T], page: i64, items_per_page: usize) -> &[T] {
    let Some(start) = page_start(page, items_per_page) else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(items_per_page).min(items.len());
    &items[start..end]
}

pub fn derive_view(state: &UsersState) -> UsersView<'_> {
    let mut rows = filter_users(state.users(), state.search_term());
    sort_users(&mut rows, state.sort_field(), state.sort_order());
    let result_count = rows.len();
    let visible = page_slice(&rows, state.current_page(), state.items_per_page()).to_vec();
    UsersView {
        visible,
        total_pages: total_pages(result_count, state.items_per_page()),
        result_count,
        total_count: state.users().len(),
        current_page: state.current_page(),
        items_per_page: state.items_per_page(),
    }
}

/// Page numbers for the pagination bar: up to `max_visible` pages centred on
/// `current`, shifted to stay within `1..=total_pages`. A `current` outside
/// that range is treated as the nearest bound.
pub fn page_window(current: i64, total_pages: usize, max_visible: usize) -> RangeInclusive<usize> {
    if total_pages == 0 || max_visible == 0 {
        return 1..=0;
    }
    let current = usize::try_from(current.max(1))
        .unwrap_or(1)
        .min(total_pages);
    let mut start = current.saturating_sub(max_visible / 2).max(1);
    let end = (start + max_visible - 1).min(total_pages);
    if end + 1 - start < max_visible {
        start = (end + 1).saturating_sub(max_visible).max(1);
    }
    start..=end
}
