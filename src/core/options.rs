//! Option sets pushed to the engine.
//!
//! All option sets are nested, partial and mergeable: `None` means "leave
//! the engine's current value alone", `Some` overrides it. Components always
//! re-apply the full merged set rather than diffing, so `merge` only has to
//! be override-correct, not minimal. Engine-specific keys this crate does
//! not model ride along in the flattened `extra` map.

use serde::{Deserialize, Serialize};

/// Vertical margins of a price scale, as fractions of the pane height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleMargins {
    pub top: f64,
    pub bottom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineStyle {
    Solid,
    Dotted,
    Dashed,
    LargeDashed,
    SparseDotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceFormat {
    Price,
    Volume,
    Percent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PriceFormatOptions {
    #[serde(rename = "type")]
    pub format: Option<PriceFormat>,
    pub precision: Option<u8>,
    pub min_move: Option<f64>,
}

impl PriceFormatOptions {
    pub fn merge(&mut self, other: &Self) {
        merge_field(&mut self.format, &other.format);
        merge_field(&mut self.precision, &other.precision);
        merge_field(&mut self.min_move, &other.min_move);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub font_size: Option<u16>,
    pub font_family: Option<String>,
}

impl LayoutOptions {
    pub fn merge(&mut self, other: &Self) {
        merge_field(&mut self.background_color, &other.background_color);
        merge_field(&mut self.text_color, &other.text_color);
        merge_field(&mut self.font_size, &other.font_size);
        merge_field(&mut self.font_family, &other.font_family);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeScaleOptions {
    pub visible: Option<bool>,
    pub time_visible: Option<bool>,
    pub seconds_visible: Option<bool>,
    pub border_visible: Option<bool>,
    pub right_offset: Option<f64>,
    pub bar_spacing: Option<f64>,
    pub fix_left_edge: Option<bool>,
}

impl TimeScaleOptions {
    pub fn merge(&mut self, other: &Self) {
        merge_field(&mut self.visible, &other.visible);
        merge_field(&mut self.time_visible, &other.time_visible);
        merge_field(&mut self.seconds_visible, &other.seconds_visible);
        merge_field(&mut self.border_visible, &other.border_visible);
        merge_field(&mut self.right_offset, &other.right_offset);
        merge_field(&mut self.bar_spacing, &other.bar_spacing);
        merge_field(&mut self.fix_left_edge, &other.fix_left_edge);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PriceScaleOptions {
    pub visible: Option<bool>,
    pub border_visible: Option<bool>,
    pub invert_scale: Option<bool>,
    pub scale_margins: Option<ScaleMargins>,
}

impl PriceScaleOptions {
    pub fn merge(&mut self, other: &Self) {
        merge_field(&mut self.visible, &other.visible);
        merge_field(&mut self.border_visible, &other.border_visible);
        merge_field(&mut self.invert_scale, &other.invert_scale);
        merge_field(&mut self.scale_margins, &other.scale_margins);
    }
}

/// Chart-level option set.
///
/// `auto_size` is controlled by the chart root component: the value pushed
/// to the engine always reflects the component's sizing-mode input, and a
/// value carried inside a caller-supplied options signal is overridden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartOptions {
    pub auto_size: bool,
    pub layout: LayoutOptions,
    pub time_scale: TimeScaleOptions,
    pub right_price_scale: PriceScaleOptions,
    pub left_price_scale: PriceScaleOptions,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            auto_size: true,
            layout: LayoutOptions::default(),
            time_scale: TimeScaleOptions::default(),
            right_price_scale: PriceScaleOptions::default(),
            left_price_scale: PriceScaleOptions::default(),
            extra: serde_json::Map::new(),
        }
    }
}

impl ChartOptions {
    /// Applies `other` on top of `self`, field by field.
    pub fn merge(&mut self, other: &Self) {
        self.auto_size = other.auto_size;
        self.layout.merge(&other.layout);
        self.time_scale.merge(&other.time_scale);
        self.right_price_scale.merge(&other.right_price_scale);
        self.left_price_scale.merge(&other.left_price_scale);
        for (key, value) in &other.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}

/// Series-level option set, shared by every built-in kind.
///
/// Kind-specific fields are simply ignored by kinds that do not use them
/// (e.g. `wick_visible` outside candlesticks), mirroring the engine's
/// partial-options contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeriesOptions {
    pub title: Option<String>,
    pub visible: Option<bool>,
    pub price_scale_id: Option<String>,
    pub last_value_visible: Option<bool>,
    pub price_line_visible: Option<bool>,
    pub color: Option<String>,
    pub line_width: Option<f64>,
    pub line_style: Option<LineStyle>,
    pub base_value: Option<f64>,
    pub up_color: Option<String>,
    pub down_color: Option<String>,
    pub border_visible: Option<bool>,
    pub wick_visible: Option<bool>,
    pub price_format: Option<PriceFormatOptions>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SeriesOptions {
    /// Applies `other` on top of `self`, field by field.
    pub fn merge(&mut self, other: &Self) {
        merge_field(&mut self.title, &other.title);
        merge_field(&mut self.visible, &other.visible);
        merge_field(&mut self.price_scale_id, &other.price_scale_id);
        merge_field(&mut self.last_value_visible, &other.last_value_visible);
        merge_field(&mut self.price_line_visible, &other.price_line_visible);
        merge_field(&mut self.color, &other.color);
        merge_field(&mut self.line_width, &other.line_width);
        merge_field(&mut self.line_style, &other.line_style);
        merge_field(&mut self.base_value, &other.base_value);
        merge_field(&mut self.up_color, &other.up_color);
        merge_field(&mut self.down_color, &other.down_color);
        merge_field(&mut self.border_visible, &other.border_visible);
        merge_field(&mut self.wick_visible, &other.wick_visible);
        if let Some(incoming) = &other.price_format {
            match self.price_format.as_mut() {
                Some(current) => current.merge(incoming),
                None => self.price_format = Some(incoming.clone()),
            }
        }
        for (key, value) in &other.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}

fn merge_field<T: Clone>(current: &mut Option<T>, incoming: &Option<T>) {
    if let Some(value) = incoming {
        *current = Some(value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartOptions, PriceFormat, PriceFormatOptions, ScaleMargins, SeriesOptions};

    #[test]
    fn chart_merge_overrides_only_set_fields() {
        let mut base = ChartOptions::default();
        base.layout.background_color = Some("#111111".to_owned());
        base.time_scale.visible = Some(true);

        let mut partial = ChartOptions::default();
        partial.time_scale.visible = Some(false);
        partial.right_price_scale.scale_margins = Some(ScaleMargins {
            top: 0.1,
            bottom: 0.2,
        });

        base.merge(&partial);
        assert_eq!(base.layout.background_color.as_deref(), Some("#111111"));
        assert_eq!(base.time_scale.visible, Some(false));
        assert_eq!(
            base.right_price_scale.scale_margins,
            Some(ScaleMargins {
                top: 0.1,
                bottom: 0.2
            })
        );
    }

    #[test]
    fn series_merge_is_recursive_for_price_format() {
        let mut base = SeriesOptions {
            price_format: Some(PriceFormatOptions {
                format: Some(PriceFormat::Price),
                precision: Some(2),
                min_move: None,
            }),
            ..SeriesOptions::default()
        };
        let partial = SeriesOptions {
            price_format: Some(PriceFormatOptions {
                format: None,
                precision: Some(4),
                min_move: Some(0.0001),
            }),
            ..SeriesOptions::default()
        };

        base.merge(&partial);
        let format = base.price_format.expect("merged format");
        assert_eq!(format.format, Some(PriceFormat::Price));
        assert_eq!(format.precision, Some(4));
        assert_eq!(format.min_move, Some(0.0001));
    }

    #[test]
    fn unknown_engine_keys_ride_in_the_flattened_tail() {
        let parsed: ChartOptions = serde_json::from_str(
            r#"{"autoSize": false, "handleScroll": {"mouseWheel": true}}"#,
        )
        .expect("parse");
        assert!(!parsed.auto_size);
        assert!(parsed.extra.contains_key("handleScroll"));

        let mut base = ChartOptions::default();
        base.merge(&parsed);
        assert!(!base.auto_size);
        assert!(base.extra.contains_key("handleScroll"));
    }

    #[test]
    fn default_chart_options_auto_size() {
        assert!(ChartOptions::default().auto_size);
    }
}
