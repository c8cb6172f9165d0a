//! Presentation logic for the storm recon map.
//!
//! Turns observation records into the things the map shows:
//! - marker colors via threshold [`ColorScheme`]s ([`classify`])
//! - legends for the active [`ClassificationMode`]
//! - popup content trees ([`popup::format_popup`]) and their HTML
//! - paginated image carousels ([`carousel::Carousel`])

pub mod assets;
pub mod calculations;
pub mod carousel;
pub mod classify;
pub mod html;
pub mod legend;
pub mod popup;

pub use assets::{ImageRef, MissionImage, MissionKey, ObservationImage, ObservationKey};
pub use calculations::{format_calc_value, CalculationRow};
pub use carousel::{Carousel, CarouselView, EdgePolicy, PAGE_SIZE};
pub use classify::{Band, ClassificationMode, ColorScheme, ColorSchemeSet, SchemeError, SchemeKind};
pub use html::{render_marker_icon, render_popup_html};
pub use legend::Legend;
pub use popup::{format_popup, PopupContent};
