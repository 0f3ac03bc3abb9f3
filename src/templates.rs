//! Full HTML page around a rendered [`Document`].

use crate::dom::{ids, Container, Document, ModalElements};
use crate::utils::html_escape;

fn section(doc: &Document, container: Container, heading: &str, class: &str) -> String {
    let Some(element) = doc.container(container) else {
        return String::new();
    };
    format!(
        r#"
        <section class="section">
            <h2 class="section-title">{}</h2>
            <div id="{}" class="{}">{}
            </div>
        </section>"#,
        heading,
        container.id(),
        class,
        element.inner_html()
    )
}

fn modal(modal: &ModalElements) -> String {
    let image = modal
        .header_image
        .as_ref()
        .map(|img| {
            format!(
                r#"<img src="{}" alt="{}" class="modal-image">"#,
                html_escape(&img.src),
                html_escape(&img.alt)
            )
        })
        .unwrap_or_default();
    let close = if modal.has_close_control {
        format!(
            r#"<button id="{}" class="modal-close" aria-label="Close">&times;</button>"#,
            ids::MODAL_CLOSE
        )
    } else {
        String::new()
    };
    let overlay = if modal.has_overlay {
        format!(r#"<div id="{}" class="modal-overlay"></div>"#, ids::MODAL_OVERLAY)
    } else {
        String::new()
    };

    format!(
        r#"
    <div id="{modal_id}" class="modal{active}">
        {overlay}
        <div class="modal-content">
            {close}
            <div class="modal-header">
                {image}
                <span id="{date_id}" class="modal-date">{date}</span>
                <h2 id="{title_id}" class="modal-title">{title}</h2>
                <div id="{tags_id}" class="modal-tags">{tags}</div>
            </div>
            <div id="{body_id}" class="modal-body">{body}</div>
        </div>
    </div>"#,
        modal_id = ids::MODAL,
        active = if modal.active { " active" } else { "" },
        overlay = overlay,
        close = close,
        image = image,
        date_id = ids::MODAL_DATE,
        date = html_escape(&modal.date),
        title_id = ids::MODAL_TITLE,
        title = html_escape(&modal.title),
        tags_id = ids::MODAL_TAGS,
        tags = modal.tags_html,
        body_id = ids::MODAL_BODY,
        body = modal.body_html,
    )
}

/// Render the complete page for `doc`.
pub fn render_page(title: &str, doc: &Document) -> String {
    let theme_attr = doc
        .data_theme()
        .map(|t| format!(r#" data-theme="{}""#, t))
        .unwrap_or_default();
    let body_style = if doc.is_scroll_locked() {
        r#" style="overflow: hidden""#
    } else {
        ""
    };
    let toggle = doc
        .theme_toggle()
        .map(|t| {
            format!(
                r#"<button id="{}" class="theme-toggle" aria-label="Toggle theme"><span class="toggle-icon">{}</span></button>"#,
                ids::THEME_TOGGLE,
                t.icon
            )
        })
        .unwrap_or_default();
    let title = html_escape(title);

    format!(
        r#"<!DOCTYPE html>
<html lang="ja"{theme_attr}>
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="style.css">
</head>
<body{body_style}>
    <header class="site-header">
        <h1 class="site-title">{title}</h1>
        {toggle}
    </header>
    <main>{experiments}{logs}{external}
    </main>{modal}
</body>
</html>
"#,
        theme_attr = theme_attr,
        title = title,
        body_style = body_style,
        toggle = toggle,
        experiments = section(doc, Container::ExperimentsGrid, "Experiments", "experiments-grid"),
        logs = section(doc, Container::LabLogList, "Lab Log", "log-list"),
        external = section(doc, Container::ExternalGrid, "CDLE Blog", "experiments-grid cdle-grid"),
        modal = doc.modal().map(modal).unwrap_or_default(),
    )
}
