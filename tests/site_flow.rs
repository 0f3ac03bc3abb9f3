//! End-to-end page flows: bootstrap, modal interaction, theme persistence
//! and thumbnail resolution through a stub metadata fetcher.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use scraper::{Html, Selector};

use labsite::dom::{Container, Document};
use labsite::modal::{Key, ModalState};
use labsite::models::{Detail, Experiment, ExternalPost, Link, LogEntry};
use labsite::ogp::{MetadataFetcher, OgpError, OgpResolver};
use labsite::preferences::FilePreferences;
use labsite::site::{Site, UiEvent};
use labsite::templates::render_page;
use labsite::theme::Theme;

#[derive(Default)]
struct StubFetcher {
    calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl MetadataFetcher for StubFetcher {
    async fn fetch_image(&self, target_url: &str) -> Result<String, OgpError> {
        self.calls.lock().unwrap().push(target_url.to_string());
        tokio::task::yield_now().await;
        if target_url.ends_with("/missing") {
            Err(OgpError::MissingImage)
        } else {
            Ok(format!("{}/cover.jpg", target_url))
        }
    }
}

fn stub_resolver() -> (OgpResolver, Arc<Mutex<Vec<String>>>) {
    let fetcher = StubFetcher::default();
    let calls = fetcher.calls.clone();
    (OgpResolver::new(fetcher), calls)
}

fn experiment(id: &str, title: &str, tags: &[&str], content: &str) -> Experiment {
    Experiment {
        id: id.to_string(),
        title: title.to_string(),
        date: "2025-11-25".to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        summary: "summary".to_string(),
        image: None,
        detail: Detail::content(content),
    }
}

fn external(id: &str, url: &str, thumb: Option<&str>) -> ExternalPost {
    ExternalPost {
        id: id.to_string(),
        title: format!("Post {}", id),
        url: url.to_string(),
        thumb: thumb.map(str::to_string),
        desc: None,
    }
}

fn count(html: &str, selector: &str) -> usize {
    let page = Html::parse_fragment(html);
    page.select(&Selector::parse(selector).unwrap()).count()
}

#[tokio::test]
async fn test_card_click_opens_markdown_modal() {
    let (resolver, _) = stub_resolver();
    let mut site = Site::builder(resolver)
        .experiments(Some(vec![experiment("e1", "T", &["x"], "**hi**")]))
        .build();
    let mut doc = Document::standard();
    let report = site.bootstrap(&mut doc).await.unwrap();
    assert_eq!(report.experiments, 1);

    let grid = doc.container(Container::ExperimentsGrid).unwrap().inner_html();
    assert_eq!(count(grid, r#".experiment-card[data-id="e1"]"#), 1);
    assert_eq!(count(grid, ".card-image-container"), 0);

    site.dispatch(&mut doc, UiEvent::CardClick("e1".to_string()))
        .unwrap();

    let modal = doc.modal().unwrap();
    assert!(modal.active);
    assert!(doc.is_scroll_locked());
    assert_eq!(modal.title, "T");
    assert_eq!(modal.tags_html, r#"<span class="tag">x</span>"#);
    assert!(modal.header_image.is_none());
    assert!(modal.body_html.contains("<strong>hi</strong>"));
    assert!(modal.body_html.contains("No links available"));
    assert_eq!(site.modal().shown(), Some("e1"));
}

#[tokio::test]
async fn test_modal_closes_from_every_control() {
    let (resolver, _) = stub_resolver();
    let mut site = Site::builder(resolver)
        .experiments(Some(vec![experiment("e1", "T", &[], "body")]))
        .build();
    let mut doc = Document::standard();
    site.bootstrap(&mut doc).await.unwrap();

    for close in [
        UiEvent::CloseClick,
        UiEvent::OverlayClick,
        UiEvent::KeyDown(Key::Escape),
    ] {
        site.dispatch(&mut doc, UiEvent::CardClick("e1".to_string()))
            .unwrap();
        assert_eq!(site.modal().state(), ModalState::Open);

        site.dispatch(&mut doc, close).unwrap();
        assert_eq!(site.modal().state(), ModalState::Closed);
        assert!(!doc.modal().unwrap().active);
        assert!(!doc.is_scroll_locked());
    }

    site.dispatch(&mut doc, UiEvent::KeyDown(Key::Escape)).unwrap();
    assert_eq!(site.modal().state(), ModalState::Closed);

    site.dispatch(&mut doc, UiEvent::CardClick("e1".to_string()))
        .unwrap();
    site.dispatch(&mut doc, UiEvent::KeyDown(Key::from_name("Enter")))
        .unwrap();
    assert!(site.modal().is_open());
}

#[tokio::test]
async fn test_unknown_card_is_ignored() {
    let (resolver, _) = stub_resolver();
    let mut site = Site::builder(resolver)
        .experiments(Some(vec![experiment("e1", "T", &[], "body")]))
        .build();
    let mut doc = Document::standard();
    site.bootstrap(&mut doc).await.unwrap();

    site.dispatch(&mut doc, UiEvent::CardClick("nope".to_string()))
        .unwrap();
    assert!(!site.modal().is_open());
    assert!(!doc.modal().unwrap().active);
}

#[tokio::test]
async fn test_second_card_replaces_modal_content() {
    let (resolver, _) = stub_resolver();
    let mut second = experiment("e2", "Second", &["rag"], "plain");
    second.detail.links = vec![Link {
        label: "GitHub".to_string(),
        url: "https://github.com/example".to_string(),
    }];
    second.image = Some("images/e2.png".to_string());
    let mut site = Site::builder(resolver)
        .experiments(Some(vec![experiment("e1", "First", &[], "one"), second]))
        .build();
    let mut doc = Document::standard();
    site.bootstrap(&mut doc).await.unwrap();

    site.dispatch(&mut doc, UiEvent::CardClick("e1".to_string()))
        .unwrap();
    site.dispatch(&mut doc, UiEvent::CardClick("e2".to_string()))
        .unwrap();

    let modal = doc.modal().unwrap();
    assert_eq!(modal.title, "Second");
    assert_eq!(modal.header_image.as_ref().unwrap().src, "images/e2.png");
    assert_eq!(count(&modal.body_html, "a.modal-link-btn"), 1);
    assert!(modal.body_html.contains("GitHub ↗"));
    assert_eq!(site.modal().shown(), Some("e2"));
}

#[tokio::test]
async fn test_theme_toggle_persists_across_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = dir.path().join("prefs").join("preferences.json");

    let (resolver, _) = stub_resolver();
    let mut site = Site::builder(resolver)
        .preferences(FilePreferences::open(&prefs))
        .build();
    let mut doc = Document::standard();
    let report = site.bootstrap(&mut doc).await.unwrap();
    assert_eq!(report.theme, Theme::Light);
    assert_eq!(doc.data_theme(), Some(Theme::Light));

    site.dispatch(&mut doc, UiEvent::ThemeToggleClick).unwrap();
    assert_eq!(doc.data_theme(), Some(Theme::Dark));
    assert_eq!(doc.theme_toggle().unwrap().icon, "☀️");

    let (resolver, _) = stub_resolver();
    let mut reloaded = Site::builder(resolver)
        .preferences(FilePreferences::open(&prefs))
        .build();
    let mut doc = Document::standard();
    let report = reloaded.bootstrap(&mut doc).await.unwrap();
    assert_eq!(report.theme, Theme::Dark);

    reloaded
        .dispatch(&mut doc, UiEvent::ThemeToggleClick)
        .unwrap();
    assert_eq!(doc.theme_toggle().unwrap().icon, "🌙");
    let stored = std::fs::read_to_string(&prefs).unwrap();
    assert!(stored.contains(r#""theme": "light""#));
}

#[tokio::test]
async fn test_system_preference_applies_without_stored_theme() {
    let (resolver, _) = stub_resolver();
    let mut site = Site::builder(resolver).system_prefers_dark(true).build();
    let mut doc = Document::standard();
    let report = site.bootstrap(&mut doc).await.unwrap();
    assert_eq!(report.theme, Theme::Dark);
}

#[tokio::test]
async fn test_external_thumbnails_resolve_once_per_url() {
    let (resolver, calls) = stub_resolver();
    let posts = vec![
        external("cdle-001", "https://cdle.jp/blogs/df1093f96b54", None),
        external("cdle-002", "https://cdle.jp/blogs/df1093f96b54", None),
        external("cdle-003", "https://cdle.jp/blogs/other", Some("thumbs/3.png")),
        external("cdle-004", "https://cdle.jp/blogs/missing", None),
    ];
    let mut site = Site::builder(resolver)
        .external_posts(Some(posts))
        .placeholder("placeholder.png")
        .build();
    let mut doc = Document::standard();
    let report = site.bootstrap(&mut doc).await.unwrap();

    assert_eq!(report.external_posts, 4);
    assert_eq!(report.thumbnails_resolved, 2);

    let mut calls = calls.lock().unwrap().clone();
    calls.sort();
    assert_eq!(
        calls,
        vec![
            "https://cdle.jp/blogs/df1093f96b54",
            "https://cdle.jp/blogs/missing"
        ]
    );

    let html = doc.container(Container::ExternalGrid).unwrap().inner_html();
    assert_eq!(
        html.matches("https://cdle.jp/blogs/df1093f96b54/cover.jpg").count(),
        2
    );
    assert!(html.contains("thumbs/3.png"));
    assert!(html.contains("placeholder.png"));
    assert_eq!(count(html, r#"a.cdle-thumb-link[target="_blank"]"#), 4);
    assert_eq!(
        site.resolver().cached("https://cdle.jp/blogs/missing"),
        Some(None)
    );
}

#[tokio::test]
async fn test_partial_page_renders_what_exists() {
    let (resolver, calls) = stub_resolver();
    let mut site = Site::builder(resolver)
        .experiments(Some(vec![experiment("e1", "T", &[], "body")]))
        .logs(Some(vec![LogEntry {
            date: "2025.11.25".to_string(),
            content: "Lab site opened".to_string(),
        }]))
        .external_posts(Some(vec![external("c1", "https://cdle.jp/blogs/1", None)]))
        .build();
    let mut doc = Document::new().with_container(Container::LabLogList);
    let report = site.bootstrap(&mut doc).await.unwrap();

    assert_eq!(report.experiments, 0);
    assert_eq!(report.logs, 1);
    assert_eq!(report.external_posts, 0);
    assert!(calls.lock().unwrap().is_empty());
    assert_eq!(doc.data_theme(), Some(Theme::Light));

    site.dispatch(&mut doc, UiEvent::ThemeToggleClick).unwrap();
    site.dispatch(&mut doc, UiEvent::CardClick("e1".to_string()))
        .unwrap();
    assert!(!site.modal().is_open());

    let page = render_page("Lab", &doc);
    assert!(page.contains("Lab site opened"));
    assert!(!page.contains("experiment-modal"));
}

#[tokio::test]
async fn test_rendered_page_reflects_open_modal() {
    let (resolver, _) = stub_resolver();
    let mut site = Site::builder(resolver)
        .experiments(Some(vec![experiment("e1", "T", &["x"], "# Heading")]))
        .markdown(None)
        .build();
    let mut doc = Document::standard();
    site.bootstrap(&mut doc).await.unwrap();
    site.dispatch(&mut doc, UiEvent::CardClick("e1".to_string()))
        .unwrap();

    let page = render_page("AI Experimental Lab", &doc);
    assert_eq!(count(&page, "#experiment-modal.active"), 1);
    assert!(page.contains("# Heading"));
    assert!(!page.contains("<h1>Heading</h1>"));
}
