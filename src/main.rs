//! Headless console listing CRM contacts through the REST API.
//!
//! `ccc-console [search term]`

use std::env;

use dotenvy::dotenv;

use ccc_console::domain::contact::Contact;
use ccc_console::domain::entity::Entity;
use ccc_console::domain::filter::FilterState;
use ccc_console::models::config::ClientConfig;
use ccc_console::repository::HttpRepository;
use ccc_console::services::contacts_page::{CAMPAIGN_FILTER, GROUP_FILTER};
use ccc_console::services::list::{ListView, SEARCH_FIELD};
use ccc_console::services::notify::LogNotifier;
use ccc_console::services::storage::{JsonFileStore, take_template_save_signal};

const PAGE_SIZE: usize = 10;

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let config = match ClientConfig::load(&app_env) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Error loading client config: {err}");
            std::process::exit(1);
        }
    };

    let repo = match HttpRepository::from_config(&config) {
        Ok(repo) => repo,
        Err(err) => {
            log::error!("Failed to build REST client: {err}");
            std::process::exit(1);
        }
    };

    let store = JsonFileStore::new(&config.storage_path);
    match take_template_save_signal(&store) {
        Ok(true) => log::info!("A template was saved since the last run"),
        Ok(false) => {}
        Err(err) => log::warn!("Ignoring unreadable storage {}: {err}", store.path().display()),
    }

    let ui = LogNotifier::new(false);
    let mut contacts: ListView<Contact> = ListView::new(
        Contact::ENDPOINT,
        FilterState::with_fields([GROUP_FILTER, CAMPAIGN_FILTER, SEARCH_FIELD]),
    );

    let loaded = match env::args().nth(1) {
        Some(term) => contacts.search(&repo, &ui, &term),
        None => contacts.load(&repo, &ui, None),
    };
    if loaded.is_err() {
        std::process::exit(1);
    }

    for contact in contacts.results() {
        println!(
            "{:>6}  {:<30}  {}",
            contact.id,
            format!(
                "{} {}",
                contact.first_name,
                contact.last_name.as_deref().unwrap_or_default()
            )
            .trim(),
            contact.dialable_phone().unwrap_or("-")
        );
    }

    let pages: Vec<String> = contacts
        .data()
        .page_links(contacts.page(), PAGE_SIZE)
        .into_iter()
        .map(|page| page.map_or_else(|| "...".to_string(), |n| n.to_string()))
        .collect();
    log::info!(
        "{} contacts, pages: {}",
        contacts.count(),
        pages.join(" ")
    );
}
