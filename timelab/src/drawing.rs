//! Drawing module - clock face, hands, aids, and canvas overlays
//!
//! Renders the analog face with nannou's Draw API. The geometry comes
//! from the projection layer; everything here is presentation only.

use std::time::Instant;

use nannou::prelude::*;

use crate::projection::{FaceGeometry, HandAngles};
use crate::session::{HandKind, HandVisibility};

/// A toast notification message
pub struct Toast {
    pub text: String,
    pub created_at: Instant,
    pub duration_secs: f32,
}

impl Toast {
    pub fn new(text: String) -> Self {
        Self {
            text,
            created_at: Instant::now(),
            duration_secs: 3.0,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed().as_secs_f32() > self.duration_secs
    }
}

/// Color palette for the clock face
pub mod colors {
    use nannou::prelude::*;

    pub const BACKGROUND: Srgb<u8> = Srgb {
        red: 10,
        green: 14,
        blue: 39,
        standard: std::marker::PhantomData,
    };
    pub const FACE_FILL: Srgb<u8> = Srgb {
        red: 20,
        green: 24,
        blue: 41,
        standard: std::marker::PhantomData,
    };
    pub const FACE_EDGE: Srgb<u8> = Srgb {
        red: 79,
        green: 127,
        blue: 255,
        standard: std::marker::PhantomData,
    };
    pub const ACCENT: Srgb<u8> = Srgb {
        red: 0,
        green: 212,
        blue: 255,
        standard: std::marker::PhantomData,
    };
    pub const HAND: Srgb<u8> = Srgb {
        red: 255,
        green: 255,
        blue: 255,
        standard: std::marker::PhantomData,
    };
    pub const SECOND_HAND: Srgb<u8> = Srgb {
        red: 255,
        green: 92,
        blue: 124,
        standard: std::marker::PhantomData,
    };
    pub const TICK_MINOR: Srgb<u8> = Srgb {
        red: 110,
        green: 115,
        blue: 140,
        standard: std::marker::PhantomData,
    };
    pub const TEXT_PRIMARY: Srgb<u8> = Srgb {
        red: 240,
        green: 240,
        blue: 240,
        standard: std::marker::PhantomData,
    };
    pub const TEXT_SECONDARY: Srgb<u8> = Srgb {
        red: 160,
        green: 160,
        blue: 160,
        standard: std::marker::PhantomData,
    };
    pub const TOAST_BG: Srgb<u8> = Srgb {
        red: 50,
        green: 50,
        blue: 50,
        standard: std::marker::PhantomData,
    };
}

/// Draw a ring (circle outline) using line segments
fn draw_ring(draw: &Draw, center: Point2, radius: f32, weight: f32, color: Srgba<u8>) {
    let segments = 90;
    let points: Vec<Point2> = (0..=segments)
        .map(|i| {
            let angle = (i as f32 / segments as f32) * TAU;
            center + vec2(angle.cos(), angle.sin()) * radius
        })
        .collect();

    draw.polyline().weight(weight).color(color).points(points);
}

/// Draw a dashed ring from short arc segments
fn draw_dashed_ring(draw: &Draw, center: Point2, radius: f32, weight: f32, color: Srgba<u8>) {
    let dashes = 36;
    for i in 0..dashes {
        let start = (i as f32 / dashes as f32) * TAU;
        let end = start + TAU / dashes as f32 * 0.5;
        let points: Vec<Point2> = (0..=4)
            .map(|j| {
                let angle = start + (end - start) * (j as f32 / 4.0);
                center + vec2(angle.cos(), angle.sin()) * radius
            })
            .collect();
        draw.polyline().weight(weight).color(color).points(points);
    }
}

fn opaque(color: Srgb<u8>) -> Srgba<u8> {
    srgba(color.red, color.green, color.blue, 255)
}

/// Draw the clock face: dial, ticks, and numerals
pub fn draw_clock_face(draw: &Draw, geometry: &FaceGeometry, show_numbers: bool) {
    // Dial
    draw.ellipse()
        .xy(geometry.center)
        .radius(geometry.radius)
        .color(colors::FACE_FILL);
    draw_ring(
        draw,
        geometry.center,
        geometry.radius,
        2.0,
        opaque(colors::FACE_EDGE),
    );
    // Decorative outer ring
    draw_dashed_ring(
        draw,
        geometry.center,
        geometry.radius * 1.03,
        1.0,
        srgba(colors::ACCENT.red, colors::ACCENT.green, colors::ACCENT.blue, 80),
    );

    // Minute ticks, heavier every five minutes
    for i in 0..60 {
        let angle = (i as f32 / 60.0) * 360.0;
        let major = i % 5 == 0;
        let inner = geometry.tick_inner_radius(major);
        let start = geometry.point_at(angle, inner);
        let end = geometry.point_at(angle, geometry.tick_outer_radius());
        let (color, weight) = if major {
            (opaque(colors::HAND), 3.0)
        } else {
            (
                srgba(
                    colors::TICK_MINOR.red,
                    colors::TICK_MINOR.green,
                    colors::TICK_MINOR.blue,
                    130,
                ),
                1.0,
            )
        };
        draw.line().start(start).end(end).color(color).weight(weight);
    }

    // Numerals
    if show_numbers {
        let font_size = (geometry.radius * 0.14).max(12.0) as u32;
        for i in 1..=12 {
            let angle = (i as f32 / 12.0) * 360.0;
            let pos = geometry.point_at(angle, geometry.number_radius());
            draw.text(&i.to_string())
                .xy(pos)
                .color(colors::TEXT_PRIMARY)
                .font_size(font_size)
                .w(60.0);
        }
    }
}

/// Draw the three hands and the center cap
pub fn draw_hands(
    draw: &Draw,
    geometry: &FaceGeometry,
    angles: &HandAngles,
    visibility: &HandVisibility,
    dragging: Option<HandKind>,
) {
    for hand in [HandKind::Hour, HandKind::Minute, HandKind::Second] {
        if !visibility.shows(hand) {
            continue;
        }
        let tip = geometry.point_at(angles.get(hand), geometry.hand_length(hand));
        let weight = match hand {
            HandKind::Hour => geometry.radius * 0.042,
            HandKind::Minute => geometry.radius * 0.032,
            HandKind::Second => geometry.radius * 0.011,
        }
        .max(2.0);
        let base_color = match hand {
            HandKind::Second => colors::SECOND_HAND,
            _ => colors::HAND,
        };
        let color = if dragging == Some(hand) {
            opaque(colors::ACCENT)
        } else {
            opaque(base_color)
        };
        draw.line()
            .start(geometry.center)
            .end(tip)
            .color(color)
            .weight(weight);
    }

    // Center cap
    draw.ellipse()
        .xy(geometry.center)
        .radius((geometry.radius * 0.053).max(4.0))
        .color(colors::FACE_EDGE);
    draw.ellipse()
        .xy(geometry.center)
        .radius((geometry.radius * 0.025).max(2.0))
        .color(colors::HAND);
}

/// Rim indicator dots showing where each visible hand points,
/// at a fixed radius independent of hand length
pub fn draw_indicator_dots(
    draw: &Draw,
    geometry: &FaceGeometry,
    angles: &HandAngles,
    visibility: &HandVisibility,
) {
    for hand in [HandKind::Hour, HandKind::Minute, HandKind::Second] {
        if !visibility.shows(hand) {
            continue;
        }
        let pos = geometry.indicator_point(angles.get(hand));
        let color = match hand {
            HandKind::Hour => opaque(colors::HAND),
            HandKind::Minute => opaque(colors::ACCENT),
            HandKind::Second => opaque(colors::SECOND_HAND),
        };
        draw_dashed_ring(draw, pos, (geometry.radius * 0.05).max(6.0), 2.0, color);
    }
}

/// The spotlight aid: a dashed dot along the dragged hand
pub fn draw_spotlight(draw: &Draw, geometry: &FaceGeometry, angle_deg: f32) {
    let pos = geometry.spotlight_point(angle_deg);
    draw_dashed_ring(
        draw,
        pos,
        (geometry.radius * 0.064).max(8.0),
        3.0,
        srgba(colors::ACCENT.red, colors::ACCENT.green, colors::ACCENT.blue, 220),
    );
}

/// Dashed boundary ring shown while the clock accepts dragging
pub fn draw_interactive_ring(draw: &Draw, geometry: &FaceGeometry) {
    draw_dashed_ring(
        draw,
        geometry.center,
        geometry.radius * 1.08,
        2.0,
        srgba(colors::ACCENT.red, colors::ACCENT.green, colors::ACCENT.blue, 90),
    );
}

/// Digital readout under the clock
pub fn draw_digital(draw: &Draw, text: &str, window_rect: Rect) {
    draw.text(text)
        .x_y(window_rect.x(), window_rect.bottom() + 48.0)
        .color(colors::TEXT_PRIMARY)
        .font_size(28)
        .w(window_rect.w());
}

/// Timezone label under the digital readout
pub fn draw_timezone_label(draw: &Draw, text: &str, window_rect: Rect) {
    draw.text(text)
        .x_y(window_rect.x(), window_rect.bottom() + 22.0)
        .color(colors::TEXT_SECONDARY)
        .font_size(14)
        .w(window_rect.w());
}

/// Draw toast notifications stacked from the bottom-right
pub fn draw_toasts(draw: &Draw, toasts: &[Toast], window_rect: Rect) {
    let toast_width = 300.0;
    let toast_height = 36.0;
    let margin = 15.0;

    for (i, toast) in toasts.iter().enumerate() {
        let elapsed = toast.created_at.elapsed().as_secs_f32();
        let progress = elapsed / toast.duration_secs;

        // Fade out over the last fifth of the lifetime
        let alpha = if progress > 0.8 {
            (((1.0 - progress) / 0.2) * 255.0).clamp(0.0, 255.0) as u8
        } else {
            255u8
        };

        let y_offset = (i as f32) * (toast_height + margin);
        let pos = pt2(
            window_rect.right() - toast_width / 2.0 - margin,
            window_rect.bottom() + toast_height / 2.0 + margin + y_offset,
        );

        draw.rect().xy(pos).w_h(toast_width, toast_height).color(srgba(
            colors::TOAST_BG.red,
            colors::TOAST_BG.green,
            colors::TOAST_BG.blue,
            alpha,
        ));

        draw.text(&toast.text)
            .xy(pos)
            .color(srgba(
                colors::TEXT_PRIMARY.red,
                colors::TEXT_PRIMARY.green,
                colors::TEXT_PRIMARY.blue,
                alpha,
            ))
            .font_size(14)
            .w(toast_width - 20.0);
    }
}
