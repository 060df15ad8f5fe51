//! Conversions between wall-clock time and vertical offsets in a day grid.
//!
//! Offsets are logical pixels measured from the top of the grid, which starts
//! at the grid start-hour. Nothing here caches a scale: callers build a
//! [`GridScale`] from the current viewport each time they need one.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::models::settings::GridSettings;

pub const MINUTES_PER_HOUR: f32 = 60.0;
pub const HOURS_PER_DAY: u32 = 24;

/// Pixel scale and snap interval in effect for one computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridScale {
    pub px_per_hour: f32,
    pub snap_minutes: u32,
}

impl GridScale {
    pub fn new(px_per_hour: f32, snap_minutes: u32) -> Self {
        Self {
            px_per_hour,
            snap_minutes,
        }
    }

    /// Pick the compact or desktop tier from the viewport width.
    pub fn for_viewport(width: f32, settings: &GridSettings) -> Self {
        let px_per_hour = if width < settings.compact_width_threshold {
            settings.compact_px_per_hour
        } else {
            settings.desktop_px_per_hour
        };
        Self::new(px_per_hour, settings.snap_minutes)
    }

    pub fn snap_px(&self) -> f32 {
        self.snap_minutes as f32 / MINUTES_PER_HOUR * self.px_per_hour
    }

    pub fn snap(&self, offset: f32) -> f32 {
        snap_offset(offset, self.px_per_hour, self.snap_minutes)
    }

    /// Largest snap multiple not past `offset`.
    pub fn snap_floor(&self, offset: f32) -> f32 {
        let step = self.snap_px();
        if step <= 0.0 {
            return offset;
        }
        // Tolerate float noise on exact multiples
        ((offset / step) + 1e-4).floor() * step
    }

    pub fn minutes_to_px(&self, minutes: f32) -> f32 {
        minutes / MINUTES_PER_HOUR * self.px_per_hour
    }

    pub fn px_to_minutes(&self, px: f32) -> i64 {
        (px / self.px_per_hour * MINUTES_PER_HOUR).round() as i64
    }
}

/// `((hour + minute/60) - start_hour) * px_per_hour`. Negative when the time
/// is before the grid start; clamping is up to the caller.
pub fn time_to_offset(hour: f32, minute: f32, start_hour: f32, px_per_hour: f32) -> f32 {
    ((hour + minute / MINUTES_PER_HOUR) - start_hour) * px_per_hour
}

/// Inverse of [`time_to_offset`], in whole minutes since midnight.
pub fn offset_to_time(offset: f32, start_hour: f32, px_per_hour: f32) -> i64 {
    ((offset / px_per_hour + start_hour) * MINUTES_PER_HOUR).round() as i64
}

/// Round to the nearest multiple of the snap interval at this scale.
pub fn snap_offset(offset: f32, px_per_hour: f32, snap_minutes: u32) -> f32 {
    let step = snap_minutes as f32 / MINUTES_PER_HOUR * px_per_hour;
    if step <= 0.0 {
        return offset;
    }
    (offset / step).round() * step
}

/// Height of the visible grid, from the start-hour to midnight.
pub fn grid_height(start_hour: u32, px_per_hour: f32) -> f32 {
    HOURS_PER_DAY.saturating_sub(start_hour) as f32 * px_per_hour
}

/// Offset of an absolute timestamp within `day`'s grid. Timestamps on a later
/// day land below the grid end.
pub fn datetime_to_offset(value: NaiveDateTime, day: NaiveDate, start_hour: u32, px_per_hour: f32) -> f32 {
    let day_shift = (value.date() - day).num_days() as f32 * HOURS_PER_DAY as f32;
    time_to_offset(
        value.hour() as f32 + day_shift,
        value.minute() as f32 + value.second() as f32 / 60.0,
        start_hour as f32,
        px_per_hour,
    )
}

/// Absolute local timestamp for an offset within `day`'s grid.
pub fn offset_to_datetime(offset: f32, day: NaiveDate, start_hour: u32, px_per_hour: f32) -> NaiveDateTime {
    let minutes = offset_to_time(offset, start_hour as f32, px_per_hour);
    day.and_time(chrono::NaiveTime::MIN) + Duration::minutes(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case(9.0, 0.0, 8.0, 160.0, 160.0; "one hour after start")]
    #[test_case(9.0, 45.0, 8.0, 160.0, 280.0; "quarter hours")]
    #[test_case(7.0, 30.0, 8.0, 160.0, -80.0; "before grid start is negative")]
    #[test_case(10.5, 0.0, 0.0, 100.0, 1050.0; "fractional hour")]
    fn test_time_to_offset(hour: f32, minute: f32, start: f32, pxh: f32, expected: f32) {
        assert!((time_to_offset(hour, minute, start, pxh) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_offset_to_time_rounds_to_minute() {
        assert_eq!(offset_to_time(280.0, 8.0, 160.0), 9 * 60 + 45);
        // 1.4 px at 160 px/h is ~0.5 minute
        assert_eq!(offset_to_time(1.4, 0.0, 160.0), 1);
        assert_eq!(offset_to_time(1.2, 0.0, 160.0), 0);
    }

    #[test_case(83.0, 160.0, 80.0; "rounds down to nearest interval")]
    #[test_case(101.0, 160.0, 120.0; "rounds up past the midpoint")]
    #[test_case(0.0, 160.0, 0.0; "zero stays zero")]
    #[test_case(30.0, 100.0, 25.0; "compact scale")]
    fn test_snap_offset(offset: f32, pxh: f32, expected: f32) {
        assert!((snap_offset(offset, pxh, 15) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_snap_floor_never_rounds_up() {
        let scale = GridScale::new(160.0, 15);
        assert_eq!(scale.snap_floor(2426.67), 2400.0);
        assert_eq!(scale.snap_floor(2400.0), 2400.0);
        assert_eq!(scale.snap_floor(39.9), 0.0);
    }

    #[test]
    fn test_scale_tier_follows_viewport_width() {
        let settings = GridSettings::default();
        assert_eq!(GridScale::for_viewport(1280.0, &settings).px_per_hour, 160.0);
        assert_eq!(GridScale::for_viewport(400.0, &settings).px_per_hour, 100.0);
        assert_eq!(GridScale::for_viewport(768.0, &settings).px_per_hour, 160.0);
        assert_eq!(GridScale::for_viewport(1280.0, &settings).snap_px(), 40.0);
    }

    #[test]
    fn test_grid_height_spans_to_midnight() {
        assert_eq!(grid_height(8, 160.0), 16.0 * 160.0);
        assert_eq!(grid_height(0, 100.0), 2400.0);
    }

    #[test]
    fn test_datetime_offsets_across_midnight() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let next_morning = NaiveDate::from_ymd_opt(2025, 3, 11)
            .unwrap()
            .and_hms_opt(0, 30, 0)
            .unwrap();
        assert_eq!(datetime_to_offset(next_morning, day, 8, 160.0), 16.5 * 160.0);
        assert_eq!(offset_to_datetime(16.5 * 160.0, day, 8, 160.0), next_morning);
    }

    proptest! {
        #[test]
        fn prop_offset_round_trip(
            hour in 0..24u32,
            minute in 0..60u32,
            start in 0..=12u32,
            compact in any::<bool>(),
        ) {
            let pxh = if compact { 100.0 } else { 160.0 };
            let offset = time_to_offset(hour as f32, minute as f32, start as f32, pxh);
            let minutes = offset_to_time(offset, start as f32, pxh);
            let expected = (hour * 60 + minute) as i64;
            prop_assert!((minutes - expected).abs() <= 1);
        }

        #[test]
        fn prop_snapped_offset_is_on_interval(offset in -500.0f32..4000.0f32) {
            let snapped = snap_offset(offset, 160.0, 15);
            let steps = snapped / 40.0;
            prop_assert!((steps - steps.round()).abs() < 1e-3);
            prop_assert!((snapped - offset).abs() <= 20.0 + 1e-3);
        }
    }
}
