use jobboard_core::{FilterChange, FilterField, ListViewModel, Msg};

/// How the job list is laid out. Held by the app, not by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Table,
    Grid,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Dispatch(Msg),
    SetView(ViewMode),
    Help,
    Quit,
    Invalid(String),
}

pub const HELP: &str = "\
Commands:
  search <text>       filter by free text (empty clears)
  type <kind>         full-time | part-time | contract | hybrid
  location <text>     filter by location
  skills <a,b,...>    filter by skills
  reset               clear all filters
  page <n>            go to page n
  next | prev         step through pages
  refresh             reload the current query
  open <n|id>         show row n of this page, or a job id
  back                close the job detail
  view table|grid     switch list layout
  help                show this text
  quit                exit";

/// Parses one input line against what is currently on screen.
pub fn parse(line: &str, list: &ListViewModel) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "" => Command::Dispatch(Msg::NoOp),
        "search" => filter(FilterField::SearchTerm, rest),
        "type" => filter(FilterField::JobType, rest),
        "location" => filter(FilterField::Location, rest),
        "skills" => filter(FilterField::Skills, rest),
        "reset" => Command::Dispatch(Msg::FiltersReset),
        "refresh" => Command::Dispatch(Msg::RefreshRequested),
        "next" => Command::Dispatch(Msg::NextPage),
        "prev" => Command::Dispatch(Msg::PreviousPage),
        "page" => match rest.parse::<usize>() {
            Ok(page) => Command::Dispatch(Msg::PageSelected(page)),
            Err(_) => Command::Invalid(format!("not a page number: {rest:?}")),
        },
        "open" => open(rest, list),
        "back" => Command::Dispatch(Msg::DetailClosed),
        "view" => match rest.to_ascii_lowercase().as_str() {
            "table" => Command::SetView(ViewMode::Table),
            "grid" => Command::SetView(ViewMode::Grid),
            _ => Command::Invalid("usage: view table|grid".to_string()),
        },
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Invalid(format!("unknown command {other:?}; type help")),
    }
}

fn filter(field: FilterField, raw: &str) -> Command {
    match FilterChange::parse(field, raw) {
        Ok(change) => Command::Dispatch(Msg::FilterChanged(change)),
        Err(err) => Command::Invalid(err.to_string()),
    }
}

/// A small number picks a row on the current page; anything else is an id.
fn open(arg: &str, list: &ListViewModel) -> Command {
    if arg.is_empty() {
        return Command::Invalid("usage: open <row|id>".to_string());
    }
    let job_id = match arg.parse::<usize>() {
        Ok(row) if (1..=list.rows.len()).contains(&row) => list.rows[row - 1].job_id.clone(),
        _ => arg.to_string(),
    };
    Command::Dispatch(Msg::JobSelected { job_id })
}
