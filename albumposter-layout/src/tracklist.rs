//! Greedy multi-column flow of the track list.

use crate::backend::TextMeasure;
use crate::color::Rgb;
use crate::model::PosterData;
use crate::ops::{FontHandle, TextRun};
use crate::template::LayoutTemplate;
use crate::units::{to_pixels, to_points};

/// Rectangle the tracklist flows into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracklistZone {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl TracklistZone {
    /// Zone below the artist line for the given poster.
    pub fn for_poster(data: &PosterData, template: &LayoutTemplate) -> Self {
        let margin_top = data.margin_top as f64;
        let artist_drop = match data.artists_size {
            Some(size) => size as f64 * template.artist_offset_factor,
            None => {
                crate::model::DEFAULT_ARTISTS_SIZE as f64 * template.tracklist_default_artist_factor
            }
        };
        let margin_side = data.margin_side as f64;
        Self {
            x: margin_side,
            y: template.title_top_with_tracklist + margin_top + artist_drop + template.tracklist_gap,
            width: template.page_width - 2.0 * margin_side,
            height: template.tracklist_zone_height,
        }
    }
}

/// Parameters of one flow run.
#[derive(Debug, Clone, PartialEq)]
pub struct TracklistStyle {
    pub size_px: f64,
    pub font: FontHandle,
    pub color: Rgb,
    pub margin_side: f64,
    pub margin_top: f64,
    pub line_height_factor: f64,
    pub column_gap_factor: f64,
    pub first_column_inset: f64,
    pub bottom_clearance: f64,
}

impl TracklistStyle {
    pub fn for_poster(
        data: &PosterData,
        template: &LayoutTemplate,
        font: FontHandle,
        color: Rgb,
    ) -> Self {
        Self {
            size_px: data.tracks_size_px() as f64,
            font,
            color,
            margin_side: data.margin_side as f64,
            margin_top: data.margin_top as f64,
            line_height_factor: template.tracklist_line_height_factor,
            column_gap_factor: template.tracklist_column_gap_factor,
            first_column_inset: template.tracklist_first_column_inset,
            bottom_clearance: template.tracklist_bottom_clearance,
        }
    }

    pub fn line_height(&self) -> f64 {
        self.size_px * self.line_height_factor
    }
}

/// Placed tracks plus flow statistics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TracklistLayout {
    pub runs: Vec<TextRun>,
    /// Number of columns that received at least one track.
    pub columns: usize,
    /// Tracks that did not fit into the zone.
    pub dropped: usize,
}

/// Flow `tracks` into columns inside `zone`.
///
/// A column breaks when the next line would reach the bottom clearance of the
/// zone. The next column starts one gap after the widest line of the previous
/// column. Once a column would start past the right edge of the zone, the
/// remaining tracks are dropped.
pub fn flow_tracklist<M: TextMeasure + ?Sized>(
    tracks: &[&str],
    zone: &TracklistZone,
    style: &TracklistStyle,
    measure: &mut M,
) -> TracklistLayout {
    let line_height = style.line_height();
    let column_gap = line_height * style.column_gap_factor;
    let column_limit = zone.y + zone.height - style.bottom_clearance - style.margin_top;
    let right_edge = zone.x + zone.width;

    let mut layout = TracklistLayout::default();
    let mut padding_music = style.margin_side + style.first_column_inset;
    let mut text_height = zone.y;
    let mut max_width: f64 = 0.0;
    let mut padding_column = 0.0;

    for (index, track) in tracks.iter().enumerate() {
        if text_height + line_height >= column_limit {
            text_height = zone.y;
            padding_music = max_width + column_gap + padding_column;
            if padding_music >= right_edge {
                layout.dropped = tracks.len() - index;
                log::debug!(
                    "tracklist overflow: {} of {} tracks dropped",
                    layout.dropped,
                    tracks.len()
                );
                break;
            }
            padding_column = padding_music - column_gap;
            max_width = 0.0;
        }
        if text_height == zone.y {
            layout.columns += 1;
        }

        let width = to_pixels(measure.text_width(style.font, track, to_points(style.size_px)));
        max_width = max_width.max(width + style.margin_side);

        layout.runs.push(TextRun {
            text: track.to_string(),
            x: padding_music,
            y: text_height,
            size_px: style.size_px,
            font: style.font,
            color: style.color,
            opacity: None,
        });
        text_height += line_height;
    }
    layout
}
