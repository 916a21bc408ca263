use std::collections::BTreeSet;

use clap::ArgMatches;
use serde::Serialize;
use tracing::{error, info};

use runwatch_core::{Facet, FacetLists, FilterCriteria, ListController, ListView, Row, events};

use super::{load_config, open_backend, runtime};

const FACET_ARGS: [(Facet, &str); 4] = [
    (Facet::Statuses, "status"),
    (Facet::Tags, "tag"),
    (Facet::Labels, "label"),
    (Facet::Features, "feature"),
];

#[derive(Serialize)]
struct ListOutput<'a> {
    criteria: &'a FilterCriteria,
    is_filtered: bool,
    total_count: u64,
    rows: &'a [Row],
    facets: &'a FacetLists,
    empty_state: Option<&'static str>,
}

pub(crate) fn handle_list_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    info!(event = "cli.list_started", json_output = json_output);

    let mut config = load_config(matches)?;
    if let Some(page_size) = matches.get_one::<u32>("page-size") {
        config.list.page_size = Some(*page_size);
    }
    let backend = open_backend(&config)?;

    let (view, facets) = runtime()?.block_on(async {
        let controller = ListController::activate(backend, &config);

        if let Some(text) = matches.get_one::<String>("search") {
            controller.set_search_text(text.as_str());
        }
        for (facet, arg) in FACET_ARGS {
            // Repeated values would toggle back off
            let values: BTreeSet<&String> = matches
                .get_many::<String>(arg)
                .into_iter()
                .flatten()
                .collect();
            for value in values {
                controller.toggle_facet_value(facet, value);
            }
        }
        if let Some(page) = matches.get_one::<i64>("page") {
            controller.set_offset(*page);
        }

        let settled = controller.settled().await;
        controller.deactivate();
        settled
    });

    if let Some(message) = &view.last_error {
        eprintln!("Failed to list entities: {}", message);
        error!(event = "cli.list_failed", error = %message);
        let err: Box<dyn std::error::Error> = message.clone().into();
        events::log_app_error(err.as_ref());
        return Err(err);
    }

    let empty_state = view.empty_state().map(|state| state.message());

    if json_output {
        let output = ListOutput {
            criteria: &view.criteria,
            is_filtered: view.is_filtered,
            total_count: view.total_count,
            rows: &view.rows,
            facets: &facets.lists,
            empty_state,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_view(&view, empty_state);
        print_facets(&facets.lists);
    }

    info!(
        event = "cli.list_completed",
        rows = view.rows.len(),
        total_count = view.total_count,
        is_filtered = view.is_filtered
    );

    Ok(())
}

fn print_view(view: &ListView, empty_state: Option<&str>) {
    if let Some(message) = empty_state {
        println!("{}", message);
        return;
    }

    let page = view.criteria.offset();
    let page_size = u64::from(view.criteria.page_size().get());
    let pages = view.total_count.div_ceil(page_size).max(1);

    println!(
        "Entities ({} of {} total, page {}/{}):",
        view.rows.len(),
        view.total_count,
        page + 1,
        pages
    );
    let formatter = crate::table::TableFormatter::new(&view.rows);
    formatter.print_table(&view.rows);
}

fn print_facets(lists: &FacetLists) {
    let tags: Vec<&str> = lists.tags.iter().map(|s| s.name.as_str()).collect();
    for (title, values) in [
        ("Tags", tags.join(", ")),
        ("Labels", lists.labels.join(", ")),
        ("Features", lists.features.join(", ")),
    ] {
        if !values.is_empty() {
            println!("{}: {}", title, values);
        }
    }
}
