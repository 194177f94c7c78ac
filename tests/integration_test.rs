// Integration tests for user-dashboard

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use user_dashboard::api::{Address, Company, User};
use user_dashboard::app::state::SortOrder;
use user_dashboard::app::update::{Command, enter_page, handle_key};
use user_dashboard::app::{AppState, InputMode, ModalState, Page};

fn temp_path(tag: &str) -> PathBuf {
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("ud_{}_{}_{}.conf", tag, std::process::id(), nonce))
}

fn user(id: u32, name: &str, company: &str) -> User {
    User {
        id,
        name: name.into(),
        username: name.to_lowercase(),
        email: format!("{}@mail.test", name.to_lowercase()),
        phone: "555-0100".into(),
        website: "site.test".into(),
        address: Address {
            street: "Main".into(),
            suite: "1".into(),
            city: "Gwenborough".into(),
            zipcode: "00000".into(),
        },
        company: Company {
            name: company.into(),
            catch_phrase: String::new(),
            bs: String::new(),
        },
    }
}

fn twelve_users() -> Vec<User> {
    numbered_users(12)
}

fn numbered_users(n: u32) -> Vec<User> {
    (1..=n)
        .map(|i| user(i, &format!("Person{:02}", i), "Initech"))
        .collect()
}

fn three_companies() -> Vec<User> {
    vec![
        user(1, "Alice Co", "Acme"),
        user(2, "Bob Corp", "Acme"),
        user(3, "Carol Inc", "Zeta"),
    ]
}

fn press(app: &mut AppState, code: KeyCode) -> Option<Command> {
    handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
}

// 1) Theme and keymap config roundtrip and init
#[test]
fn theme_roundtrip_and_init() {
    use user_dashboard::app::Theme;

    let path = temp_path("theme");
    let t = Theme::mocha();
    t.write_file(&path).expect("write theme");
    let t2 = Theme::from_file(&path).expect("read theme");
    assert_eq!(t, t2);

    // load_or_init creates file if missing
    let p2 = temp_path("theme_init");
    let _ = std::fs::remove_file(&p2);
    let created = Theme::load_or_init(&p2);
    assert!(p2.exists());
    assert_eq!(created, Theme::mocha());

    // Partial file overrides only the named keys
    std::fs::write(&p2, "error_fg = #112233\nbogus = #000000\ntext = nothex\n").unwrap();
    let partial = Theme::load_or_init(&p2);
    assert_eq!(partial.error_fg, ratatui::style::Color::Rgb(0x11, 0x22, 0x33));
    assert_eq!(partial.text, Theme::mocha().text);

    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(&p2);
}

#[test]
fn keymap_roundtrip_and_init() {
    use user_dashboard::app::keymap::{KeyAction, Keymap};

    let path = temp_path("keys");
    let _ = std::fs::remove_file(&path);
    let km = Keymap::load_or_init(&path);
    assert!(path.exists());

    let reread = Keymap::from_file(&path).expect("read keymap");
    for ((mods, code), action) in km.all_bindings() {
        if action == KeyAction::Ignore {
            continue;
        }
        assert_eq!(
            reread.resolve(&KeyEvent::new(code, mods)),
            Some(action),
            "binding for {:?} {:?} lost",
            mods,
            code
        );
    }
    let _ = std::fs::remove_file(&path);
}

// 2) Search, sort and paginate scenarios over the users state
#[test]
fn search_counts_company_matches() {
    use user_dashboard::app::state::UsersState;
    use user_dashboard::view::derive_view;

    let mut s = UsersState::new();
    s.fetch_succeeded(three_companies());
    s.set_search_term("acme");
    let view = derive_view(&s);
    assert_eq!(view.result_count, 2);
    let names: Vec<&str> = view.visible.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Alice Co", "Bob Corp"]);
}

#[test]
fn sort_company_twice_is_descending_with_stable_ties() {
    use user_dashboard::app::state::{SortField, UsersState};
    use user_dashboard::view::derive_view;

    let mut s = UsersState::new();
    s.fetch_succeeded(three_companies());
    s.set_sort_field(Some(SortField::Company));
    let asc: Vec<u32> = derive_view(&s).visible.iter().map(|u| u.id).collect();
    assert_eq!(asc, vec![1, 2, 3]);

    s.set_sort_field(Some(SortField::Company));
    assert_eq!(s.sort_order(), SortOrder::Descending);
    let desc: Vec<u32> = derive_view(&s).visible.iter().map(|u| u.id).collect();
    assert_eq!(desc, vec![3, 1, 2]);
}

#[test]
fn twelve_users_make_three_pages() {
    use user_dashboard::app::state::UsersState;
    use user_dashboard::ui::users::results_summary;
    use user_dashboard::view::{PAGE_WINDOW, derive_view, page_window};

    let mut s = UsersState::new();
    s.fetch_succeeded(twelve_users());
    let view = derive_view(&s);
    assert_eq!(view.total_pages, 3);
    let ids: Vec<u32> = view.visible.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    assert_eq!(results_summary(&view, ""), "Showing 1 to 5 of 12 results");
    assert_eq!(page_window(1, view.total_pages, PAGE_WINDOW), 1..=3);

    s.set_current_page(3);
    let view = derive_view(&s);
    assert_eq!((view.first_shown(), view.last_shown()), (11, 12));
    assert!(view.is_last_page());

    s.set_search_term("person1");
    let view = derive_view(&s);
    assert_eq!(
        results_summary(&view, s.search_term()),
        "Showing 1 to 3 of 3 results (filtered from 12 total)"
    );
}

#[test]
fn page_window_slides_with_current_page() {
    use user_dashboard::view::page_window;

    assert_eq!(page_window(1, 10, 5), 1..=5);
    assert_eq!(page_window(6, 10, 5), 4..=8);
    assert_eq!(page_window(10, 10, 5), 6..=10);
    assert!(page_window(1, 0, 5).is_empty());
}

// 3) Key handling flows
#[test]
fn opening_data_page_requests_fetch_once() {
    let mut app = AppState::default();
    assert_eq!(app.page, Page::Home);

    assert_eq!(press(&mut app, KeyCode::Enter), Some(Command::Fetch));
    assert_eq!(app.page, Page::Data);

    // already loading: switching back and forth does not fetch again
    app.users.fetch_started();
    assert_eq!(press(&mut app, KeyCode::Tab), None);
    assert_eq!(press(&mut app, KeyCode::Tab), None);

    app.users.fetch_succeeded(twelve_users());
    assert_eq!(enter_page(&mut app, Page::Data), None);
    assert_eq!(press(&mut app, KeyCode::Char('r')), Some(Command::Fetch));
    assert_eq!(press(&mut app, KeyCode::Char('q')), Some(Command::Quit));
}

#[test]
fn search_mode_filters_live_and_esc_clears() {
    let mut app = AppState::default();
    app.users.fetch_succeeded(twelve_users());
    enter_page(&mut app, Page::Data);
    app.users.set_current_page(2);

    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.input_mode, InputMode::Search);
    for c in "Person0".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    assert_eq!(app.users.search_term(), "Person0");
    assert_eq!(app.users.current_page(), 1);

    // typed letters do not trigger bindings while searching
    assert_eq!(press(&mut app, KeyCode::Char('q')), None);
    press(&mut app, KeyCode::Backspace);
    assert_eq!(app.users.search_term(), "Person0");

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(app.users.search_term(), "Person0");

    press(&mut app, KeyCode::Char('/'));
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.users.search_term(), "");
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn paging_keys_stay_within_bounds() {
    let mut app = AppState::default();
    app.users.fetch_succeeded(twelve_users());
    enter_page(&mut app, Page::Data);

    press(&mut app, KeyCode::Left);
    assert_eq!(app.users.current_page(), 1);
    press(&mut app, KeyCode::Right);
    assert_eq!(app.users.current_page(), 2);
    handle_key(&mut app, KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT));
    assert_eq!(app.users.current_page(), 3);
    press(&mut app, KeyCode::Right);
    assert_eq!(app.users.current_page(), 3);
    press(&mut app, KeyCode::Char('g'));
    assert_eq!(app.users.current_page(), 1);

    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Down);
    assert_eq!(app.selected_row, 2);
    press(&mut app, KeyCode::PageDown);
    assert_eq!(app.selected_row, 0);
}

#[test]
fn prev_page_returns_from_past_the_end() {
    let mut app = AppState::default();
    app.users.fetch_succeeded(numbered_users(30));
    enter_page(&mut app, Page::Data);
    app.users.set_current_page(6);

    app.users.fetch_succeeded(numbered_users(8));
    press(&mut app, KeyCode::Right);
    assert_eq!(app.users.current_page(), 6);
    press(&mut app, KeyCode::Left);
    assert_eq!(app.users.current_page(), 2);
    press(&mut app, KeyCode::Left);
    assert_eq!(app.users.current_page(), 1);
}

#[test]
fn sort_and_page_size_keys() {
    use user_dashboard::app::state::SortField;

    let mut app = AppState::default();
    app.users.fetch_succeeded(twelve_users());

    // sort keys do nothing on Home
    press(&mut app, KeyCode::Char('c'));
    assert_eq!(app.users.sort_field(), None);

    enter_page(&mut app, Page::Data);
    press(&mut app, KeyCode::Char('c'));
    press(&mut app, KeyCode::Char('c'));
    assert_eq!(app.users.sort_field(), Some(SortField::Company));
    assert_eq!(app.users.sort_order(), SortOrder::Descending);
    press(&mut app, KeyCode::Char('s'));
    assert_eq!(app.users.sort_field(), None);

    app.users.set_current_page(3);
    press(&mut app, KeyCode::Char('o'));
    assert_eq!(app.input_mode, InputMode::Modal);
    assert_eq!(app.modal, Some(ModalState::PageSize { selected: 0 }));
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.users.items_per_page(), 10);
    assert_eq!(app.users.current_page(), 1);
    assert_eq!(app.modal, None);
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn dismiss_error_key_clears_banner() {
    let mut app = AppState::default();
    enter_page(&mut app, Page::Data);
    app.users.fetch_failed(Some("Server Error: 500 - Internal Server Error".into()));
    press(&mut app, KeyCode::Char('x'));
    assert_eq!(app.users.error(), None);
}

// 4) Rendering smoke tests against an in-memory backend
fn render_to_string(app: &AppState) -> String {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    let mut terminal = Terminal::new(TestBackend::new(110, 40)).unwrap();
    terminal
        .draw(|f| user_dashboard::ui::render(f, app))
        .unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

#[test]
fn renders_empty_loaded_and_error_states() {
    let mut app = AppState::default();
    let home = render_to_string(&app);
    assert!(home.contains("Welcome to the User Dashboard"));

    enter_page(&mut app, Page::Data);
    assert!(render_to_string(&app).contains("No Data Available"));

    app.users.fetch_started();
    assert!(render_to_string(&app).contains("Loading user data..."));

    app.users.fetch_succeeded(twelve_users());
    let out = render_to_string(&app);
    assert!(out.contains("Showing 1 to 5 of 12 results"));
    assert!(out.contains("Person01"));
    assert!(!out.contains("Person06"));

    app.users.set_search_term("nobody");
    assert!(render_to_string(&app).contains("No users found matching your search criteria"));

    app.users
        .fetch_failed(Some(user_dashboard::error::CONNECTIVITY_MESSAGE.to_string()));
    assert!(render_to_string(&app).contains("No response from server"));

    // a refetch that returns fewer records leaves the page past the end
    app.users.clear_error();
    app.users.set_search_term("");
    app.users.fetch_succeeded(numbered_users(30));
    app.users.set_current_page(6);
    app.users.fetch_succeeded(numbered_users(8));
    let out = render_to_string(&app);
    assert!(out.contains("No users found matching your search criteria"));
    assert!(out.contains("page 6 of 2"));
}

#[test]
fn renders_help_and_keybinds_panel() {
    let mut app = AppState::default();
    press(&mut app, KeyCode::Char('?'));
    assert!(render_to_string(&app).contains("Switch page: Tab"));
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.modal, None);

    handle_key(&mut app, KeyEvent::new(KeyCode::Char('K'), KeyModifiers::SHIFT));
    assert!(app.show_keybinds);
    assert!(render_to_string(&app).contains("Keybindings"));
}

// 5) HTTP fetch boundary against a mock server
mod fetch_tests {
    use super::*;
    use serde_json::json;
    use user_dashboard::api::ApiClient;
    use user_dashboard::app::fetch::FetchDispatcher;
    use user_dashboard::app::state::UsersState;
    use user_dashboard::error::{CONNECTIVITY_MESSAGE, FetchErrorKind};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn users_json(names: &[&str]) -> serde_json::Value {
        let records: Vec<serde_json::Value> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                json!({
                    "id": i + 1,
                    "name": name,
                    "username": name.to_lowercase(),
                    "email": format!("{}@april.biz", name.to_lowercase()),
                    "address": {
                        "street": "Kulas Light",
                        "suite": "Apt. 556",
                        "city": "Gwenborough",
                        "zipcode": "92998-3874",
                        "geo": { "lat": "-37.3159", "lng": "81.1496" }
                    },
                    "phone": "1-770-736-8031 x56442",
                    "website": "hildegard.org",
                    "company": {
                        "name": "Romaguera-Crona",
                        "catchPhrase": "Multi-layered client-server neural-net",
                        "bs": "harness real-time e-markets"
                    }
                })
            })
            .collect();
        serde_json::Value::Array(records)
    }

    #[tokio::test]
    async fn fetch_returns_users_in_server_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(users_json(&["Leanne", "Ervin"])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        let users = client.fetch_all_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].name, "Leanne");
        assert_eq!(users[1].id, 2);
        assert_eq!(users[0].company.catch_phrase, "Multi-layered client-server neural-net");
    }

    #[tokio::test]
    async fn server_error_maps_to_status_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        let err = client.fetch_all_users().await.unwrap_err();
        assert_eq!(err.message, "Server Error: 500 - Internal Server Error");
        assert_eq!(err.code.as_deref(), Some("bad_response"));
        assert!(matches!(err.kind, FetchErrorKind::Server { status: 500, .. }));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        let err = client.fetch_all_users().await.unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::Other);
        assert_eq!(err.code.as_deref(), Some("decode"));
        assert!(!err.message.is_empty());
    }

    #[tokio::test]
    async fn slow_server_times_out_as_connectivity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(users_json(&["Late"]))
                    .set_delay(Duration::from_millis(800)),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), Duration::from_millis(100)).unwrap();
        let err = client.fetch_all_users().await.unwrap_err();
        assert!(err.is_connectivity());
        assert_eq!(err.message, CONNECTIVITY_MESSAGE);
        assert_eq!(err.code.as_deref(), Some("timeout"));
    }

    #[tokio::test]
    async fn refused_connection_is_connectivity() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let client = ApiClient::new(format!("http://{}", addr), Duration::from_secs(2)).unwrap();
        let err = client.fetch_all_users().await.unwrap_err();
        assert!(err.is_connectivity());
        assert_eq!(err.message, CONNECTIVITY_MESSAGE);
    }

    #[tokio::test]
    async fn connection_failure_keeps_previous_users() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let client = ApiClient::new(format!("http://{}", addr), Duration::from_secs(2)).unwrap();
        let mut fetcher = FetchDispatcher::new(tokio::runtime::Handle::current(), client);
        let mut state = UsersState::new();
        state.fetch_succeeded(three_companies());

        fetcher.start(&mut state);
        assert!(state.loading());
        fetcher.next_resolved(&mut state).await;
        assert!(!state.loading());
        assert_eq!(state.error(), Some(CONNECTIVITY_MESSAGE));
        assert_eq!(state.users(), three_companies().as_slice());
    }

    #[tokio::test]
    async fn dispatcher_applies_success_and_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(users_json(&["Leanne"])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        let mut fetcher = FetchDispatcher::new(tokio::runtime::Handle::current(), client);
        let mut state = UsersState::new();

        let id = fetcher.start(&mut state);
        assert!(state.loading());
        assert_eq!(fetcher.in_flight(), 1);
        assert_eq!(fetcher.next_resolved(&mut state).await, Some(id));
        assert!(!state.loading());
        assert_eq!(state.users().len(), 1);
        assert_eq!(fetcher.in_flight(), 0);

        fetcher.start(&mut state);
        fetcher.next_resolved(&mut state).await;
        assert!(!state.loading());
        assert_eq!(state.error(), Some("Server Error: 503 - Service Unavailable"));
        // failure keeps what was loaded before
        assert_eq!(state.users().len(), 1);
        assert_eq!(fetcher.drain(&mut state), 0);
    }

    #[tokio::test]
    async fn overlapping_fetches_last_resolved_wins() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(users_json(&["Slow", "Slower"]))
                    .set_delay(Duration::from_millis(600)),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(users_json(&["Fast"])))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        let mut fetcher = FetchDispatcher::new(tokio::runtime::Handle::current(), client);
        let mut state = UsersState::new();

        let first = fetcher.start(&mut state);
        // let the first request reach the server before the second one
        tokio::time::sleep(Duration::from_millis(150)).await;
        let second = fetcher.start(&mut state);

        assert_eq!(fetcher.next_resolved(&mut state).await, Some(second));
        assert_eq!(state.users()[0].name, "Fast");
        assert_eq!(fetcher.next_resolved(&mut state).await, Some(first));
        assert_eq!(state.users().len(), 2);
        assert_eq!(state.users()[0].name, "Slow");
        assert!(!state.loading());
    }
}
