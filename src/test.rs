use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use axum_extra::extract::cookie::Key;
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::{
    error::ErrorVerbosity,
    password::PasswordHasher,
    route::{
        auth::{
            login::INVALID_CREDENTIALS,
            register::{PASSWORDS_DO_NOT_MATCH, USER_ALREADY_EXISTS},
        },
        books::edit_book::UNKNOWN_OWNER,
    },
    server::{self, ServerConfig},
    state::ApiState,
    store::{Book, Store},
};

#[tokio::test]
async fn example_config_is_valid() {
    ServerConfig::from_config_file("config.example.yaml")
        .await
        .expect("Example config is not parsable");
}

struct TestApp {
    app: Router,
    store: Store,
}

impl TestApp {
    async fn new() -> Self {
        let store = Store::in_memory().await.expect("Failed to open store");

        let state = ApiState::new(
            ErrorVerbosity::Full,
            store.clone(),
            PasswordHasher::new(4),
            Key::generate(),
        );

        Self {
            app: server::app(state),
            store,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        form: Option<&str>,
        cookie: Option<&str>,
    ) -> Response {
        let mut request = Request::builder().method(method).uri(uri);

        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let body = match form {
            Some(form) => {
                request = request.header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                );

                Body::from(form.to_string())
            }
            None => Body::empty(),
        };

        self.app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        self.send(Method::GET, uri, None, cookie).await
    }

    async fn post(&self, uri: &str, form: &str, cookie: Option<&str>) -> Response {
        self.send(Method::POST, uri, Some(form), cookie).await
    }

    async fn register(&self, email: &str, password: &str) -> Response {
        let form = format!(
            "email={email}&password={password}&password_again={password}&name=Reader&surname=Test"
        );

        self.post("/register", &form, None).await
    }

    /// Registers and logs in, returning the session cookie.
    async fn sign_up(&self, email: &str) -> String {
        let response = self.register(email, "secret").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = self
            .post("/login", &format!("email={email}&password=secret"), None)
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        session_cookie(&response)
    }

    async fn add_book(&self, title: &str, cookie: &str) -> i64 {
        let response = self
            .post(
                "/books",
                &format!("title={title}&author=Someone&genre=Novel"),
                Some(cookie),
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        Book::all(self.store.pool())
            .await
            .unwrap()
            .into_iter()
            .rev()
            .find(|book| book.title == title)
            .expect("Book was not stored")
            .id
    }

    async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(self.store.pool())
            .await
            .unwrap()
    }
}

fn session_cookie(response: &Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("No session cookie set")
        .to_str()
        .unwrap();

    set_cookie
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    String::from_utf8(bytes.to_vec()).unwrap()
}

/// The html of the `<section>` with the given id, empty if there is none.
fn section<'a>(page: &'a str, id: &str) -> &'a str {
    let start = match page.find(&format!(r#"<section id="{id}">"#)) {
        Some(start) => start,
        None => return "",
    };
    let end = page[start..]
        .find("</section>")
        .map(|end| start + end)
        .unwrap_or(page.len());

    &page[start..end]
}

/// Registers the admin first, so that the users of a test are regular users.
async fn app_with_admin() -> (TestApp, String) {
    let app = TestApp::new().await;
    let admin = app.sign_up("admin@example.com").await;

    (app, admin)
}

#[tokio::test]
async fn registering_a_taken_email_fails_without_a_new_row() {
    let app = TestApp::new().await;

    let first = app.register("ada@example.com", "secret").await;
    assert_eq!(first.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&first), "/login");

    let second = app.register("ada@example.com", "other").await;
    assert_eq!(second.status(), StatusCode::OK);
    assert!(body_text(second).await.contains(USER_ALREADY_EXISTS));

    assert_eq!(app.count("users").await, 1);
}

#[tokio::test]
async fn registration_losing_a_race_for_the_email_fails() {
    let app = TestApp::new().await;

    // Registers the same email right before the handler's insert, after its lookup.
    sqlx::query(
        "CREATE TRIGGER concurrent_registration BEFORE INSERT ON users
         WHEN NEW.name <> 'Other'
         BEGIN
             INSERT INTO users (name, surname, email, hashed_password)
             VALUES ('Other', 'Reader', NEW.email, 'hashed');
         END",
    )
    .execute(app.store.pool())
    .await
    .unwrap();

    let response = app.register("ada@example.com", "secret").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(USER_ALREADY_EXISTS));
    assert_eq!(app.count("users").await, 0);
}

#[tokio::test]
async fn registering_with_mismatched_passwords_fails() {
    let app = TestApp::new().await;

    let response = app
        .post(
            "/register",
            "email=ada@example.com&password=one&password_again=two&name=Ada&surname=Lovelace",
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);

    let page = body_text(response).await;
    assert!(page.contains(PASSWORDS_DO_NOT_MATCH));
    assert!(page.contains(r#"value="ada@example.com""#));
    assert_eq!(app.count("users").await, 0);
}

#[tokio::test]
async fn registering_with_missing_fields_reports_them() {
    let app = TestApp::new().await;

    let response = app
        .post("/register", "email=ada@example.com&password=one", None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("This field is required"));
    assert_eq!(app.count("users").await, 0);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_fail_alike() {
    let app = TestApp::new().await;
    app.register("ada@example.com", "secret").await;

    let wrong_password = app
        .post("/login", "email=ada@example.com&password=nope", None)
        .await;
    assert_eq!(wrong_password.status(), StatusCode::OK);
    assert!(wrong_password.headers().get(header::SET_COOKIE).is_none());
    let wrong_password = body_text(wrong_password).await;

    let unknown_email = app
        .post("/login", "email=bob@example.com&password=secret", None)
        .await;
    assert_eq!(unknown_email.status(), StatusCode::OK);
    let unknown_email = body_text(unknown_email).await;

    assert!(wrong_password.contains(INVALID_CREDENTIALS));
    assert!(unknown_email.contains(INVALID_CREDENTIALS));
}

#[tokio::test]
async fn remember_me_makes_the_session_persistent() {
    let app = TestApp::new().await;
    app.register("ada@example.com", "secret").await;

    let remembered = app
        .post(
            "/login",
            "email=ada@example.com&password=secret&remember_me=true",
            None,
        )
        .await;
    let set_cookie = remembered.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("Max-Age=31536000"));

    let plain = app
        .post("/login", "email=ada@example.com&password=secret", None)
        .await;
    let set_cookie = plain.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(!set_cookie.contains("Max-Age"));
}

#[tokio::test]
async fn added_book_is_only_on_the_owners_shelf() {
    let (app, _) = app_with_admin().await;
    let alice = app.sign_up("alice@example.com").await;
    let bob = app.sign_up("bob@example.com").await;

    app.add_book("Dune", &alice).await;

    let alice_page = body_text(app.get("/", Some(&alice)).await).await;
    assert!(section(&alice_page, "my-books").contains("Dune"));
    assert!(!section(&alice_page, "other-books").contains("Dune"));

    let bob_page = body_text(app.get("/", Some(&bob)).await).await;
    assert!(!section(&bob_page, "my-books").contains("Dune"));
    assert!(section(&bob_page, "other-books").contains("Dune"));

    let anonymous_page = body_text(app.get("/", None).await).await;
    assert!(section(&anonymous_page, "my-books").is_empty());
    assert!(section(&anonymous_page, "other-books").contains("Dune"));
}

#[tokio::test]
async fn admin_has_no_personal_shelf() {
    let (app, admin) = app_with_admin().await;
    let alice = app.sign_up("alice@example.com").await;

    app.add_book("Dune", &alice).await;
    app.add_book("Emma", &admin).await;

    let page = body_text(app.get("/", Some(&admin)).await).await;
    let my_books = section(&page, "my-books");
    let other_books = section(&page, "other-books");

    assert!(!my_books.contains("Dune"));
    assert!(!my_books.contains("Emma"));
    assert!(other_books.contains("Dune"));
    assert!(other_books.contains("Emma"));
}

#[tokio::test]
async fn invalid_book_form_is_re_rendered() {
    let (app, _) = app_with_admin().await;
    let alice = app.sign_up("alice@example.com").await;

    let response = app
        .post("/books", "title=&author=Herbert", Some(&alice))
        .await;

    assert_eq!(response.status(), StatusCode::OK);

    let page = body_text(response).await;
    assert!(page.contains("This field is required"));
    assert!(page.contains(r#"value="Herbert""#));
    assert_eq!(app.count("books").await, 0);
}

#[tokio::test]
async fn deleting_someone_elses_book_is_not_found() {
    let (app, _) = app_with_admin().await;
    let alice = app.sign_up("alice@example.com").await;
    let bob = app.sign_up("bob@example.com").await;

    let id = app.add_book("Emma", &bob).await;

    let response = app.get(&format!("/books_delete/{id}"), Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(Book::find(app.store.pool(), id).await.unwrap().is_some());

    let response = app.get(&format!("/books_delete/{id}"), Some(&bob)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(Book::find(app.store.pool(), id).await.unwrap().is_none());

    let response = app.get(&format!("/books_delete/{id}"), Some(&bob)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn any_authenticated_user_can_edit_any_book() {
    let (app, _) = app_with_admin().await;
    let alice = app.sign_up("alice@example.com").await;
    let bob = app.sign_up("bob@example.com").await;

    let id = app.add_book("Emma", &bob).await;
    let bob_id = Book::find(app.store.pool(), id)
        .await
        .unwrap()
        .unwrap()
        .user_id
        .unwrap();

    let form_page = body_text(app.get(&format!("/books/{id}"), Some(&alice)).await).await;
    assert!(form_page.contains(r#"value="Emma""#));
    assert!(form_page.contains(&format!(r#"value="{bob_id}""#)));

    let response = app
        .post(
            &format!("/books/{id}"),
            &format!("title=Persuasion&author=Austen&genre=&user_id={bob_id}"),
            Some(&alice),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let book = Book::find(app.store.pool(), id).await.unwrap().unwrap();
    assert_eq!(book.title, "Persuasion");
    assert_eq!(book.author.as_deref(), Some("Austen"));
    assert_eq!(book.genre, None);
    assert_eq!(book.user_id, Some(bob_id));
}

#[tokio::test]
async fn editing_can_hand_a_book_over_or_orphan_it() {
    let (app, _) = app_with_admin().await;
    let alice = app.sign_up("alice@example.com").await;

    let id = app.add_book("Dune", &alice).await;

    let response = app
        .post(&format!("/books/{id}"), "title=Dune&user_id=1", Some(&alice))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let book = Book::find(app.store.pool(), id).await.unwrap().unwrap();
    assert_eq!(book.user_id, Some(1));

    let response = app
        .post(&format!("/books/{id}"), "title=Dune&user_id=", Some(&alice))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let book = Book::find(app.store.pool(), id).await.unwrap().unwrap();
    assert_eq!(book.user_id, None);
}

#[tokio::test]
async fn editing_to_an_unknown_owner_is_rejected() {
    let (app, _) = app_with_admin().await;
    let alice = app.sign_up("alice@example.com").await;

    let id = app.add_book("Dune", &alice).await;

    let response = app
        .post(&format!("/books/{id}"), "title=Arrakis&user_id=99", Some(&alice))
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(UNKNOWN_OWNER));

    let book = Book::find(app.store.pool(), id).await.unwrap().unwrap();
    assert_eq!(book.title, "Dune");
}

#[tokio::test]
async fn editing_a_missing_book_is_not_found() {
    let (app, _) = app_with_admin().await;
    let alice = app.sign_up("alice@example.com").await;

    let response = app.get("/books/42", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.post("/books/42", "title=Dune", Some(&alice)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.count("books").await, 0);
}

#[tokio::test]
async fn protected_routes_redirect_anonymous_visitors_to_login() {
    let (app, admin) = app_with_admin().await;
    let id = app.add_book("Dune", &admin).await;

    let requests = [
        (Method::GET, "/books".to_string(), None),
        (Method::POST, "/books".to_string(), Some("title=Emma")),
        (Method::GET, format!("/books/{id}"), None),
        (Method::POST, format!("/books/{id}"), Some("title=Emma")),
        (Method::GET, format!("/books_delete/{id}"), None),
        (Method::POST, format!("/books_delete/{id}"), None),
        (Method::GET, "/logout".to_string(), None),
    ];

    for (method, uri, form) in requests {
        let response = app.send(method.clone(), &uri, form, None).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{method} {uri}");
        assert_eq!(location(&response), "/login", "{method} {uri}");
    }

    let books = Book::all(app.store.pool()).await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Dune");
}

#[tokio::test]
async fn forged_session_cookie_is_not_a_session() {
    let (app, _) = app_with_admin().await;

    let response = app.get("/books", Some("library_session=1")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn logout_removes_the_session_cookie() {
    let (app, admin) = app_with_admin().await;

    let response = app.get("/logout", Some(&admin)).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with("library_session="));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn malformed_requests_are_rejected() {
    let (app, admin) = app_with_admin().await;

    let response = app.get("/books/not-a-number", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.get("/no/such/page", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.send(Method::PUT, "/login", None, None).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = app
        .post("/login", "email=a@example.com&password=x&remember_me=maybe", None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
