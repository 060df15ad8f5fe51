//! Short-lived status messages stacked in the bottom-right corner.
//!
//! Failed saves and background refresh problems surface here without
//! interrupting a drag in progress.

use std::time::{Duration, Instant};

use egui::{Color32, Context, Pos2, RichText};

const TOAST_DURATION: Duration = Duration::from_secs(3);
const FADE_OUT: Duration = Duration::from_millis(500);
/// Older toasts are dropped once the stack grows past this.
const MAX_VISIBLE: usize = 4;
/// A repeated warning is shown at most once per window.
const REPEAT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Warning,
    Error,
}

impl ToastLevel {
    fn icon(&self) -> &'static str {
        match self {
            ToastLevel::Success => "✓",
            ToastLevel::Warning => "⚠",
            ToastLevel::Error => "✗",
        }
    }

    fn background_color(&self, is_dark_theme: bool) -> Color32 {
        match (self, is_dark_theme) {
            (ToastLevel::Success, true) => Color32::from_rgb(30, 70, 40),
            (ToastLevel::Warning, true) => Color32::from_rgb(80, 60, 20),
            (ToastLevel::Error, true) => Color32::from_rgb(80, 30, 30),
            (ToastLevel::Success, false) => Color32::from_rgb(220, 255, 220),
            (ToastLevel::Warning, false) => Color32::from_rgb(255, 245, 200),
            (ToastLevel::Error, false) => Color32::from_rgb(255, 220, 220),
        }
    }

    fn text_color(&self, is_dark_theme: bool) -> Color32 {
        match (self, is_dark_theme) {
            (ToastLevel::Success, true) => Color32::from_rgb(100, 220, 120),
            (ToastLevel::Warning, true) => Color32::from_rgb(255, 200, 80),
            (ToastLevel::Error, true) => Color32::from_rgb(255, 120, 120),
            (ToastLevel::Success, false) => Color32::from_rgb(30, 120, 50),
            (ToastLevel::Warning, false) => Color32::from_rgb(150, 100, 0),
            (ToastLevel::Error, false) => Color32::from_rgb(180, 40, 40),
        }
    }
}

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    level: ToastLevel,
    created_at: Instant,
}

impl Toast {
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= TOAST_DURATION
    }

    /// 1.0 until the last half second, then linear down to 0.
    fn opacity(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.created_at);
        let remaining = TOAST_DURATION.saturating_sub(elapsed);
        if remaining >= FADE_OUT {
            1.0
        } else {
            (remaining.as_secs_f32() / FADE_OUT.as_secs_f32()).clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Default)]
pub struct ToastManager {
    toasts: Vec<Toast>,
    last_warning: Option<(String, Instant)>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, message: impl Into<String>, level: ToastLevel, now: Instant) {
        self.toasts.push(Toast {
            message: message.into(),
            level,
            created_at: now,
        });
        if self.toasts.len() > MAX_VISIBLE {
            let overflow = self.toasts.len() - MAX_VISIBLE;
            self.toasts.drain(..overflow);
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, ToastLevel::Success, Instant::now());
    }

    /// Show a warning unless the same one was shown within the last minute.
    /// Returns whether it was shown.
    pub fn warning_throttled(&mut self, message: &str, now: Instant) -> bool {
        let repeated = self.last_warning.as_ref().is_some_and(|(last, at)| {
            last == message && now.saturating_duration_since(*at) < REPEAT_WINDOW
        });
        if repeated {
            return false;
        }
        self.last_warning = Some((message.to_string(), now));
        self.push(message, ToastLevel::Warning, now);
        true
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, ToastLevel::Error, Instant::now());
    }

    fn cleanup(&mut self, now: Instant) {
        self.toasts.retain(|t| !t.is_expired(now));
    }

    pub fn render(&mut self, ctx: &Context, is_dark_theme: bool) {
        let now = Instant::now();
        self.cleanup(now);

        if self.toasts.is_empty() {
            return;
        }

        // Keep animating the fade
        ctx.request_repaint();

        let screen_rect = ctx.screen_rect();
        let toast_width = 300.0;
        let toast_height = 40.0;
        let margin = 10.0;
        let spacing = 5.0;

        for (i, toast) in self.toasts.iter().rev().enumerate() {
            let opacity = toast.opacity(now);
            if opacity <= 0.0 {
                continue;
            }

            let y_offset = (i as f32) * (toast_height + spacing);
            // Sits above the status bar
            let pos = Pos2::new(
                screen_rect.right() - toast_width - margin,
                screen_rect.bottom() - toast_height - margin - y_offset - 30.0,
            );

            egui::Area::new(egui::Id::new(("toast", i)))
                .fixed_pos(pos)
                .order(egui::Order::Foreground)
                .interactable(false)
                .show(ctx, |ui| {
                    let bg_color = toast
                        .level
                        .background_color(is_dark_theme)
                        .gamma_multiply(0.9 * opacity);
                    let text_color = toast.level.text_color(is_dark_theme).gamma_multiply(opacity);

                    egui::Frame::none()
                        .fill(bg_color)
                        .rounding(6.0)
                        .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                        .stroke(egui::Stroke::new(1.0, text_color.gamma_multiply(0.3)))
                        .show(ui, |ui| {
                            ui.set_min_width(toast_width - 24.0);
                            ui.horizontal(|ui| {
                                ui.label(RichText::new(toast.level.icon()).color(text_color).strong());
                                ui.label(RichText::new(&toast.message).color(text_color));
                            });
                        });
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_fades_in_last_half_second() {
        let start = Instant::now();
        let toast = Toast {
            message: "Saved".into(),
            level: ToastLevel::Success,
            created_at: start,
        };

        assert_eq!(toast.opacity(start + Duration::from_secs(1)), 1.0);
        let fading = toast.opacity(start + Duration::from_millis(2750));
        assert!(fading > 0.4 && fading < 0.6);
        assert!(toast.is_expired(start + TOAST_DURATION));
    }

    #[test]
    fn test_stack_keeps_newest() {
        let mut manager = ToastManager::new();
        let now = Instant::now();
        for i in 0..6 {
            manager.push(format!("toast {}", i), ToastLevel::Success, now);
        }

        assert_eq!(manager.toasts.len(), MAX_VISIBLE);
        assert_eq!(manager.toasts[0].message, "toast 2");
    }

    #[test]
    fn test_cleanup_drops_expired() {
        let mut manager = ToastManager::new();
        let start = Instant::now();
        manager.push("old", ToastLevel::Error, start);
        manager.push("new", ToastLevel::Warning, start + Duration::from_secs(2));

        manager.cleanup(start + Duration::from_millis(3100));

        assert_eq!(manager.toasts.len(), 1);
        assert_eq!(manager.toasts[0].message, "new");
    }

    #[test]
    fn test_repeated_warning_is_throttled() {
        let mut manager = ToastManager::new();
        let start = Instant::now();

        assert!(manager.warning_throttled("Could not refresh", start));
        assert!(!manager.warning_throttled("Could not refresh", start + Duration::from_secs(5)));
        assert!(manager.warning_throttled("Backend busy", start + Duration::from_secs(6)));
        assert!(manager.warning_throttled("Could not refresh", start + Duration::from_secs(7)));
        assert!(!manager.warning_throttled("Could not refresh", start + Duration::from_secs(30)));
        assert!(manager.warning_throttled("Could not refresh", start + REPEAT_WINDOW + Duration::from_secs(8)));
        assert_eq!(manager.toasts.len(), 4);
    }
}
