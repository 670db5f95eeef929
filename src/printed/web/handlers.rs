use crate::commands::add::NewPrint;
use crate::commands::update::PrintUpdate;
use crate::commands::{add, history, links, remove, update};
use crate::error::PrintedError;
use crate::web::form::FormData;
use crate::web::views::{IndexPage, ListQuery, MaterialPage, PrintPage};
use crate::web::{AppState, WebError};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{Html, Redirect};
use tracing::info;

type Page = Result<Html<String>, WebError>;
type Mutation = Result<Redirect, WebError>;

/// GET /
pub async fn index(
    State(app): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Page {
    let page = {
        let state = app.read()?;
        IndexPage::build(&state, &app.root_path, &query)?
    };
    app.render("index", &headers, &page)
}

/// GET /material
pub async fn materials(
    State(app): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Page {
    let page = {
        let state = app.read()?;
        MaterialPage::build(&state, &app.root_path, &query)?
    };
    app.render("material", &headers, &page)
}

/// GET /print/:name
pub async fn print(
    State(app): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Page {
    let page = {
        let state = app.read()?;
        PrintPage::build(&state, &app.root_path, &name)?
    };
    app.render("print", &headers, &page)
}

/// POST /print
pub async fn add_print(State(app): State<AppState>, body: String) -> Mutation {
    let form = FormData::parse(&body)?;
    let title = form.first("title").unwrap_or_default().trim().to_string();
    if title.is_empty() {
        return Err(PrintedError::InvalidInput("A print needs a title".to_string()).into());
    }

    let name = {
        let mut state = app.write()?;
        let result = add::run(&mut state, NewPrint::titled(title))?;
        result
            .affected_prints
            .first()
            .map(|p| p.name.clone())
            .unwrap_or_default()
    };
    info!(print = %name, "added print from web");
    Ok(app.redirect_to_print(&name))
}

/// PUT /print/:name
pub async fn update_print(
    State(app): State<AppState>,
    Path(name): Path<String>,
    body: String,
) -> Mutation {
    let form = FormData::parse(&body)?;
    let urls = form.all("source_link_url[]");
    let titles = form.all("source_link_title[]");
    let changes = PrintUpdate {
        reference_cost: form.number("reference_cost", 0.0)?,
        duration: form.first("duration").unwrap_or_default().to_string(),
        source_links: urls
            .into_iter()
            .zip(titles)
            .map(|(url, title)| (url.to_string(), title.to_string()))
            .collect(),
    };

    {
        let mut state = app.write()?;
        update::run(&mut state, &name, changes)?;
    }
    Ok(app.redirect_to_print(&name))
}

/// DELETE /print/:name
pub async fn delete_print(State(app): State<AppState>, Path(name): Path<String>) -> Mutation {
    {
        let mut state = app.write()?;
        remove::run(&mut state, &name)?;
    }
    Ok(app.redirect_to_print(&name))
}

/// POST /print/:name/history
pub async fn append_history(State(app): State<AppState>, Path(name): Path<String>) -> Mutation {
    {
        let mut state = app.write()?;
        history::append(&mut state, &name)?;
    }
    Ok(app.redirect_to_print(&name))
}

/// DELETE /print/:name/history/:number
pub async fn delete_history(
    State(app): State<AppState>,
    Path((name, number)): Path<(String, usize)>,
) -> Mutation {
    {
        let mut state = app.write()?;
        history::delete(&mut state, &name, number)?;
    }
    Ok(app.redirect_to_print(&name))
}

/// POST /print/:name/source_link
pub async fn append_source_link(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Mutation {
    {
        let mut state = app.write()?;
        links::append(&mut state, &name)?;
    }
    Ok(app.redirect_to_print(&name))
}

/// DELETE /print/:name/source_link/:number
pub async fn delete_source_link(
    State(app): State<AppState>,
    Path((name, number)): Path<(String, usize)>,
) -> Mutation {
    {
        let mut state = app.write()?;
        links::delete(&mut state, &name, number)?;
    }
    Ok(app.redirect_to_print(&name))
}
