//! HTML rendering of popup trees.
//!
//! The front-end styles these class names and binds the carousel controls
//! through their `data-` attributes.

use maud::{html, Markup};

use crate::assets::ImageRef;
use crate::carousel::CarouselView;
use crate::popup::{ObservationPopup, PopupContent, PopupRow, TableSection};

/// Render a popup to an HTML fragment. All text is escaped.
pub fn render_popup_html(content: &PopupContent) -> String {
    render_popup(content).into_string()
}

pub fn render_popup(content: &PopupContent) -> Markup {
    match content {
        PopupContent::Error { message } => html! {
            div class="material-popup" {
                p { "Error: " (message) }
            }
        },
        PopupContent::Observation(popup) => observation(popup),
    }
}

fn observation(popup: &ObservationPopup) -> Markup {
    let header = &popup.header;
    html! {
        div class="material-popup" {
            div class="popup-header" {
                div class="header-img" style=(format!("background-color: {}", popup.color)) {
                    h3 { (header.storm_name) }
                    p { (header.storm_type) }
                    p { (header.mission) }
                    p { (header.observation) }
                }
                div class="header-info" {
                    @for row in &header.rows {
                        (popup_row(row))
                    }
                }
            }

            (render_carousel(&popup.carousel))

            div class="popup-section" {
                h4 { "Surface Information" }
                @for row in &popup.surface {
                    (popup_row(row))
                }
            }

            @for section in &popup.sections {
                (table_section(section))
            }

            div class="popup-section downloads" {
                a class="download-btn" href="#" data-download="json" data-filename=(popup.downloads.json_name) {
                    "Save JSON"
                }
                @for image in &popup.downloads.images {
                    a class="download-btn" href=(image.src) download=(image.download_name) {
                        "Save " (image.header)
                    }
                }
            }
        }
    }
}

fn popup_row(row: &PopupRow) -> Markup {
    html! {
        div class="popup-row" {
            span { (row.label) }
            span { (row.value) }
        }
    }
}

fn table_section(section: &TableSection) -> Markup {
    html! {
        div class="popup-section collapsible" {
            h4 class="collapsible-header" { (section.heading()) }
            div class="collapsible-content" {
                table {
                    thead {
                        tr {
                            @for column in &section.columns {
                                th { (column) }
                            }
                        }
                    }
                    tbody {
                        @for row in &section.rows {
                            tr title=[row.tooltip.as_deref()] {
                                @for c in &row.cells {
                                    td { (c) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// One carousel page with its arrows and page buttons.
pub fn render_carousel(view: &CarouselView<ImageRef>) -> Markup {
    html! {
        div class="thumbnail-carousel" data-policy=(view.policy.as_str()) {
            div class="thumbnail-row" data-index=(view.page) {
                @for image in &view.items {
                    div class="thumbnail-cell" {
                        img class="thumbnail" src=(image.src) alt=(image.alt);
                        div class="thumbnail-header" { (image.header) }
                    }
                }
            }
            div class="carousel-controls" {
                button class="carousel-arrow left-arrow" data-offset="-1" disabled[!view.prev_enabled] { "◄" }
                @for page in &view.pages {
                    button
                        class=(if *page == view.page { "carousel-page-btn active" } else { "carousel-page-btn" })
                        data-page=(page) {
                        (page + 1)
                    }
                }
                button class="carousel-arrow right-arrow" data-offset="1" disabled[!view.next_enabled] { "►" }
            }
        }
    }
}

/// Arrow glyph for a marker, rotated by `rotation_deg` and drawn in `color`.
pub fn render_marker_icon(rotation_deg: f64, color: &str) -> String {
    html! {
        div style=(format!("transform: rotate({}deg); font-size: 24px; color: {};", rotation_deg, color)) { "➤" }
    }
    .into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::{Carousel, EdgePolicy};

    #[test]
    fn test_error_placeholder() {
        let html = render_popup_html(&PopupContent::Error {
            message: "Invalid data".into(),
        });
        assert_eq!(
            html,
            r#"<div class="material-popup"><p>Error: Invalid data</p></div>"#
        );
    }

    #[test]
    fn test_stop_carousel_disables_prev_on_first_page() {
        let images: Vec<ImageRef> = (0..4)
            .map(|i| ImageRef {
                src: format!("{}.png", i),
                alt: String::new(),
                header: format!("h{}", i),
                download_name: String::new(),
            })
            .collect();
        let view = Carousel::new(images.len(), EdgePolicy::Stop).view(&images);
        let html = render_carousel(&view).into_string();
        assert!(html.contains(r#"data-offset="-1" disabled"#));
        assert!(!html.contains(r#"data-offset="1" disabled"#));
        assert!(html.contains(r#"<button class="carousel-page-btn active" data-page="0">1</button>"#));
    }

    #[test]
    fn test_marker_icon() {
        assert_eq!(
            render_marker_icon(90.0, "#ed098e"),
            r#"<div style="transform: rotate(90deg); font-size: 24px; color: #ed098e;">➤</div>"#
        );
    }
}
