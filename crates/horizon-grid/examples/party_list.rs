//! Horizon Grid Party List Example
//!
//! Drives a party grid from the console:
//! - Free-text search and category chips
//! - Paging with a pagination bar
//! - Page-level "select all" and bulk delete
//!
//! Run with: RUST_LOG=horizon_grid=debug cargo run -p horizon-grid --example party_list

use horizon_grid::model::PageLink;
use horizon_grid::prelude::*;
use tracing_subscriber::EnvFilter;

fn parties() -> Vec<Record> {
    let names = [
        ("Acme Corporation", "Customer", "New York"),
        ("Global Supplies Inc", "Vendor", "Chicago"),
        ("Globex", "Prospect", "Springfield"),
        ("Initech", "Customer", "Austin"),
        ("Umbrella Logistics", "Vendor", "Raccoon City"),
        ("Stark Industries", "Customer", "New York"),
        ("Wayne Enterprises", "Prospect", "Gotham"),
        ("Hooli", "Customer", "Palo Alto"),
        ("Vandelay Industries", "Vendor", "New York"),
        ("Soylent Foods", "Prospect", "Chicago"),
        ("Tyrell Systems", "Customer", "Los Angeles"),
        ("Cyberdyne", "Vendor", "Sunnyvale"),
    ];
    names
        .iter()
        .enumerate()
        .map(|(i, (name, party_type, city))| {
            Record::new(format!("P{:03}", i + 1))
                .with("name", *name)
                .with("partyType", *party_type)
                .with("city", *city)
                .with("isActive", i % 3 != 0)
        })
        .collect()
}

fn draw(snapshot: &ViewSnapshot) {
    let header = match snapshot.selection_state {
        SelectionState::All => "[x]",
        SelectionState::Partial => "[-]",
        SelectionState::None => "[ ]",
    };
    println!("{header} id    name                  type      city");
    if snapshot.is_empty() {
        println!("    (no results)");
    }
    for row in &snapshot.rows {
        let mark = if row.selected { "[x]" } else { "[ ]" };
        println!(
            "{mark} {:<5} {:<21} {:<9} {}",
            row.record.id(),
            row.record.value("name"),
            row.record.value("partyType"),
            row.record.value("city"),
        );
    }

    let bar: Vec<String> = snapshot
        .page
        .window(5)
        .into_iter()
        .map(|link| match link {
            PageLink::Page { number, current: true } => format!("({number})"),
            PageLink::Page { number, .. } => number.to_string(),
            PageLink::Gap => "...".to_string(),
        })
        .collect();
    println!(
        "{}  |  {}  |  {} selected\n",
        snapshot.page.range_label(),
        bar.join(" "),
        snapshot.selected_count
    );
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ListViewConfig {
        page_size: 5,
        search_fields: vec!["name".to_string(), "city".to_string()],
        ..ListViewConfig::default()
    };
    let mut controller = ListController::with_config(parties(), config, draw)?;

    controller.signals().filters_changed.connect(|kinds| {
        println!("-- active filters: {kinds:?}");
    });

    println!("== page 2");
    controller.go_to_page(2);

    println!("== customers and vendors");
    controller.set_filter(
        "category",
        FilterSpec::one_of("partyType", ["Customer", "Vendor"]),
    )?;

    println!("== search \"new york\"");
    controller.set_search("new york")?;

    println!("== select page, then delete");
    controller.toggle_page(true);
    let removed = controller.remove_selected()?;
    println!("-- removed {} records", removed.len());

    println!("== clear filters");
    controller.clear_filters();

    let summary = controller.summary();
    for (party_type, count) in summary.count_by("partyType") {
        println!("{party_type:<9} {count}");
    }
    Ok(())
}
