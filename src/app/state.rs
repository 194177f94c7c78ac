//! Users state container.
//!
//! [`UsersState`] is the single owner of fetched records and the UI-derived
//! state around them (search term, page, page size, sort). It is mutated only
//! through the named transitions below, each of which is total and applies
//! all of its field changes together.
//!
use crate::api::User;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 5;
/// Page sizes offered by the page-size menu.
pub const ITEMS_PER_PAGE_OPTIONS: [usize; 3] = [5, 10, 25];
/// Stored when a fetch fails without a usable message.
pub const FETCH_FAILED_FALLBACK: &str = "Failed to fetch users";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Ascending => "▲",
            SortOrder::Descending => "▼",
        }
    }
}

/// Column selectors. `Company` sorts on `company.name`, `Address` on `address.city`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    Name,
    Username,
    Email,
    Phone,
    Website,
    Company,
    Address,
}

impl SortField {
    pub const ALL: [SortField; 8] = [
        SortField::Id,
        SortField::Name,
        SortField::Username,
        SortField::Email,
        SortField::Phone,
        SortField::Website,
        SortField::Company,
        SortField::Address,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Username => "username",
            SortField::Email => "email",
            SortField::Phone => "phone",
            SortField::Website => "website",
            SortField::Company => "company",
            SortField::Address => "address",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(s))
    }
}

/// Named transitions, for callers that prefer dispatching values over calling methods.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UsersAction {
    SetSearchTerm(String),
    SetCurrentPage(i64),
    SetItemsPerPage(usize),
    SetSortField(Option<SortField>),
    ClearError,
    FetchStarted,
    FetchSucceeded(Vec<User>),
    FetchFailed(Option<String>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsersState {
    users: Vec<User>,
    loading: bool,
    error: Option<String>,
    search_term: String,
    current_page: i64,
    items_per_page: usize,
    sort_field: Option<SortField>,
    sort_order: SortOrder,
}

impl Default for UsersState {
    fn default() -> Self {
        Self::new()
    }
}

impl UsersState {
    pub fn new() -> Self {
        Self::with_items_per_page(DEFAULT_ITEMS_PER_PAGE)
    }

    /// Initial state with a configured page size; every other field takes its default.
    pub fn with_items_per_page(items_per_page: usize) -> Self {
        Self {
            users: Vec::new(),
            loading: false,
            error: None,
            search_term: String::new(),
            current_page: 1,
            items_per_page,
            sort_field: None,
            sort_order: SortOrder::Ascending,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn current_page(&self) -> i64 {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn sort_field(&self) -> Option<SortField> {
        self.sort_field
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.current_page = 1;
    }

    /// No clamping here: out-of-range pages derive to an empty slice.
    pub fn set_current_page(&mut self, page: i64) {
        self.current_page = page;
    }

    pub fn set_items_per_page(&mut self, n: usize) {
        self.items_per_page = n;
        self.current_page = 1;
    }

    /// Same field toggles the order; another field (or `None`) replaces it and resets to ascending.
    pub fn set_sort_field(&mut self, field: Option<SortField>) {
        if self.sort_field == field {
            self.sort_order = self.sort_order.toggled();
        } else {
            self.sort_field = field;
            self.sort_order = SortOrder::Ascending;
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn fetch_started(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn fetch_succeeded(&mut self, users: Vec<User>) {
        self.loading = false;
        self.users = users;
        self.error = None;
    }

    pub fn fetch_failed(&mut self, message: Option<String>) {
        self.loading = false;
        self.error = Some(
            message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FETCH_FAILED_FALLBACK.to_string()),
        );
    }

    pub fn dispatch(&mut self, action: UsersAction) {
        tracing::debug!(action = action_name(&action), "users transition");
        match action {
            UsersAction::SetSearchTerm(term) => self.set_search_term(term),
            UsersAction::SetCurrentPage(page) => self.set_current_page(page),
            UsersAction::SetItemsPerPage(n) => self.set_items_per_page(n),
            UsersAction::SetSortField(field) => self.set_sort_field(field),
            UsersAction::ClearError => self.clear_error(),
            UsersAction::FetchStarted => self.fetch_started(),
            UsersAction::FetchSucceeded(users) => self.fetch_succeeded(users),
            UsersAction::FetchFailed(message) => self.fetch_failed(message),
        }
    }
}

fn action_name(action: &UsersAction) -> &'static str {
    match action {
        UsersAction::SetSearchTerm(_) => "set_search_term",
        UsersAction::SetCurrentPage(_) => "set_current_page",
        UsersAction::SetItemsPerPage(_) => "set_items_per_page",
        UsersAction::SetSortField(_) => "set_sort_field",
        UsersAction::ClearError => "clear_error",
        UsersAction::FetchStarted => "fetch_started",
        UsersAction::FetchSucceeded(_) => "fetch_succeeded",
        UsersAction::FetchFailed(_) => "fetch_failed",
    }
}
