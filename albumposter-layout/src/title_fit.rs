//! Shrink-to-fit sizing of the album title.

use crate::backend::TextMeasure;
use crate::model::PosterData;
use crate::ops::FontHandle;
use crate::template::LayoutTemplate;
use crate::units::to_points;

/// Outcome of title sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleFit {
    /// Final title size in canonical pixels.
    pub size_px: u32,
    /// True when the size came from auto-fit rather than the poster data.
    pub auto_fitted: bool,
    /// Number of 1px shrink steps taken.
    pub iterations: u32,
}

impl TitleFit {
    /// Persist the result so later runs skip auto-fit.
    pub fn apply_to(&self, data: &mut PosterData) {
        if self.auto_fitted {
            data.title_size = Some(self.size_px);
            data.initial_title_size_set = true;
        }
    }
}

/// Size the title of `data`.
///
/// Auto-fit runs only while neither `userAdjustedTitleSize` nor
/// `initialTitleSizeSet` is set. It starts from the requested (or default)
/// size, capped at the page height, and shrinks by one pixel until the title
/// fits between the side margins or the floor is reached.
pub fn fit_title<M: TextMeasure + ?Sized>(
    data: &PosterData,
    template: &LayoutTemplate,
    font: FontHandle,
    measure: &mut M,
) -> TitleFit {
    let start = data.title_size_px();
    if !data.needs_title_fit() {
        return TitleFit {
            size_px: start,
            auto_fitted: false,
            iterations: 0,
        };
    }

    let max_width = to_points(template.page_width - 2.0 * data.margin_side as f64);
    let floor = template.title_fit_floor;
    // Start no higher than the page height
    let mut size = start.min(template.page_height as u32);
    let mut iterations = 0;
    let mut width = measure.text_width(font, &data.album_name, to_points(size as f64));
    while width > max_width && size > floor {
        size -= 1;
        iterations += 1;
        width = measure.text_width(font, &data.album_name, to_points(size as f64));
    }
    log::debug!(
        "title fitted at {size}px after {iterations} steps (width {width:.1}pt of {max_width:.1}pt)"
    );
    TitleFit {
        size_px: size,
        auto_fitted: true,
        iterations,
    }
}
