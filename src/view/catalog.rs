use axum::response::Html;

use crate::store::{Book, User};

use super::{escape, layout};

fn book_row(book: &Book, actions: bool) -> String {
    let owner = book
        .user_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());

    let actions = if actions {
        format!(
            r#"<td><a href="/books/{id}">Edit</a> <a href="/books_delete/{id}">Delete</a></td>"#,
            id = book.id
        )
    } else {
        String::new()
    };

    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>{}</tr>",
        escape(&book.title),
        escape(book.author.as_deref().unwrap_or_default()),
        escape(book.genre.as_deref().unwrap_or_default()),
        owner,
        actions,
    )
}

fn book_table(id: &str, heading: &str, books: &[Book], actions: bool) -> String {
    let rows: String = if books.is_empty() {
        r#"<tr><td colspan="4">No books yet</td></tr>"#.to_string()
    } else {
        books.iter().map(|book| book_row(book, actions)).collect()
    };

    format!(
        r#"<section id="{id}">
<h2>{heading}</h2>
<table>
<tr><th>Title</th><th>Author</th><th>Genre</th><th>Owner</th></tr>
{rows}
</table>
</section>"#
    )
}

pub fn index_page(user: Option<&User>, my_books: &[Book], other_books: &[Book]) -> Html<String> {
    let mut content = String::new();

    if user.is_some() {
        content.push_str(&book_table("my-books", "My books", my_books, true));
    }

    content.push_str(&book_table("other-books", "Other books", other_books, false));

    layout("Library", user, &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: i64, title: &str, user_id: Option<i64>) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: None,
            genre: Some("Sci-fi".to_string()),
            user_id,
        }
    }

    #[test]
    fn anonymous_page_has_no_personal_shelf() {
        let Html(page) = index_page(None, &[], &[book(1, "Dune", Some(2))]);

        assert!(!page.contains(r#"id="my-books""#));
        assert!(page.contains("Dune"));
        assert!(!page.contains("/books_delete/1"));
    }

    #[test]
    fn own_books_get_edit_and_delete_links() {
        let user = User {
            id: 2,
            name: "Ada".to_string(),
            surname: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            hashed_password: String::new(),
        };

        let Html(page) = index_page(
            Some(&user),
            &[book(1, "Dune", Some(2))],
            &[book(2, "Emma", None)],
        );

        assert!(page.contains(r#"href="/books/1""#));
        assert!(page.contains(r#"href="/books_delete/1""#));
        assert!(!page.contains(r#"href="/books_delete/2""#));
    }
}
