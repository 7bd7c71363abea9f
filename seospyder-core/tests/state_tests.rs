// Tests for the dashboard state store

use seospyder_client::models::{PageIdMapping, Profile, Rendered, WebsiteEntry};
use seospyder_client::{ReportRow, WpPage};
use seospyder_core::state::{Action, AppState, InfoMessage, PromptSlot};
use std::time::{Duration, Instant};

fn row(url: &str) -> ReportRow {
    ReportRow {
        page_url: url.to_string(),
        clicks: 3.0,
        ..Default::default()
    }
}

fn page(id: &str) -> WpPage {
    WpPage {
        id: Some(id.to_string()),
        link: format!("https://example.com/{}", id),
        title: Rendered {
            rendered: id.to_uppercase(),
        },
        content: Rendered::default(),
    }
}

fn fill_outputs(state: &mut AppState) {
    for slot in PromptSlot::ALL {
        state.apply(Action::PromptGenerated {
            slot,
            text: format!("{:?} output", slot),
        });
    }
    state.apply(Action::ImagesGenerated(vec!["https://img/1.png".to_string()]));
}

// ============================================================================
// Selection clears outputs
// ============================================================================

#[test]
fn test_selecting_another_report_clears_all_outputs() {
    let mut state = AppState::default();
    state.apply(Action::SelectReport(row("https://example.com/a")));
    state.apply(Action::PageFetched(page("a")));
    fill_outputs(&mut state);
    assert!(!state.prompts.is_empty());

    state.apply(Action::SelectReport(row("https://example.com/b")));

    assert_eq!(state.selected_report.as_ref().unwrap().page_url, "https://example.com/b");
    assert!(state.current_page.is_none());
    assert!(state.prompts.is_empty());
    assert!(state.images.is_empty());
}

#[test]
fn test_selecting_domain_clears_rows_and_selection() {
    let mut state = AppState::default();
    state.apply(Action::ReportLoaded(vec![row("https://example.com/a")]));
    state.apply(Action::SelectReport(row("https://example.com/a")));
    fill_outputs(&mut state);

    state.apply(Action::SelectDomain("https://other.com/".to_string()));

    assert_eq!(state.selected_domain.as_deref(), Some("https://other.com/"));
    assert!(state.report_rows.is_empty());
    assert!(state.selected_report.is_none());
    assert!(state.prompts.is_empty());
}

#[test]
fn test_generated_output_lands_in_its_slot_only() {
    let mut state = AppState::default();
    state.apply(Action::PromptGenerated {
        slot: PromptSlot::TableOfContents,
        text: "toc".to_string(),
    });
    for slot in PromptSlot::ALL {
        let expected = if slot == PromptSlot::TableOfContents { "toc" } else { "" };
        assert_eq!(state.prompts.get(slot), expected);
    }
}

// ============================================================================
// Sign-in and sites
// ============================================================================

#[test]
fn test_profile_clears_auth_url() {
    let mut state = AppState::default();
    state.apply(Action::AuthRequired("https://accounts.google.com/o".to_string()));
    assert!(!state.is_signed_in());
    assert!(state.auth_url.is_some());

    state.apply(Action::SetProfile(Some(Profile {
        name: "Ada".to_string(),
        picture: String::new(),
    })));
    assert!(state.is_signed_in());
    assert!(state.auth_url.is_none());
}

#[test]
fn test_sites_message_status_tracks_empty_list() {
    let mut state = AppState::default();
    state.apply(Action::SitesLoaded {
        sites: vec![],
        message: Some("No sites connected".to_string()),
    });
    assert_eq!(
        state.message,
        Some(InfoMessage {
            message: "No sites connected".to_string(),
            status: true,
        })
    );

    state.apply(Action::SitesLoaded {
        sites: vec![WebsiteEntry {
            site_url: "https://example.com/".to_string(),
            permission_level: "siteOwner".to_string(),
        }],
        message: None,
    });
    assert!(state.message.is_none());
    assert_eq!(state.website_list.len(), 1);
}

#[test]
fn test_page_ids_attach_by_url() {
    let mut state = AppState::default();
    state.apply(Action::ReportLoaded(vec![
        row("https://example.com/a"),
        row("https://example.com/b"),
    ]));
    state.apply(Action::PageIdsResolved(vec![PageIdMapping {
        url: "https://example.com/b".to_string(),
        id: "42".to_string(),
    }]));
    assert_eq!(state.report_rows[0].id, None);
    assert_eq!(state.report_rows[1].id.as_deref(), Some("42"));
}

// ============================================================================
// Error banner
// ============================================================================

#[test]
fn test_tick_drops_expired_banner() {
    let mut state = AppState::default();
    let at = Instant::now();
    state.apply(Action::RaiseError {
        message: "boom".to_string(),
        at,
    });

    state.apply(Action::Tick(at + Duration::from_millis(500)));
    assert_eq!(state.visible_error(at + Duration::from_millis(500)), Some("boom"));

    state.apply(Action::Tick(at + Duration::from_secs(3)));
    assert!(state.error.is_none());
}
