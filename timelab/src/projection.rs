//! Render projection - time to hand angles, face geometry, hit testing
//!
//! Converts a time value into the three hand rotations and derives the
//! geometry the drawing layer and the pointer handlers share: hand
//! lengths, grab widths, rim indicator dots, and the spotlight aid.

use nannou::prelude::*;

use crate::session::{DragMode, HandKind, HandVisibility, TimeValue};

/// Projected rotation of each hand, degrees clockwise from 12 o'clock,
/// normalized into `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAngles {
    pub hour: f32,
    pub minute: f32,
    pub second: f32,
}

impl HandAngles {
    pub fn get(&self, hand: HandKind) -> f32 {
        match hand {
            HandKind::Hour => self.hour,
            HandKind::Minute => self.minute,
            HandKind::Second => self.second,
        }
    }
}

/// Project a time value into hand angles.
///
/// Snapped mode sweeps the hour hand continuously with the minutes;
/// independent mode parks the hour hand exactly on `(h mod 12) * 30` so
/// a dragged hour reads unambiguously against the numerals.
pub fn project_angles(time: &TimeValue, drag_mode: DragMode) -> HandAngles {
    let second = (time.s * 6.0) as f32;
    let minute = ((time.m + time.s / 60.0) * 6.0) as f32;
    let hour = match drag_mode {
        DragMode::Snapped => {
            ((time.h.rem_euclid(12.0) + time.m / 60.0 + time.s / 3600.0) * 30.0) as f32
        }
        DragMode::Independent => (time.h.rem_euclid(12.0) * 30.0) as f32,
    };
    HandAngles {
        hour: hour.rem_euclid(360.0),
        minute: minute.rem_euclid(360.0),
        second: second.rem_euclid(360.0),
    }
}

/// Re-express `target` in the continuous frame of `current` so the
/// transition between them takes the shorter angular path.
///
/// A rendered angle easing from 350 toward 10 must travel forward +20
/// through the 12 o'clock crossing, never backward through 180.
pub fn toward_shortest(current: f32, target: f32) -> f32 {
    target + ((current - target) / 360.0).round() * 360.0
}

/// Clock-face geometry for the current window
///
/// All lengths are derived from the face radius so the layout keeps its
/// proportions as the window resizes.
#[derive(Debug, Clone, Copy)]
pub struct FaceGeometry {
    pub center: Point2,
    pub radius: f32,
}

impl FaceGeometry {
    /// Calculate geometry from window dimensions, leaving headroom for
    /// the top mode bar and bottom readout.
    pub fn calculate(window_rect: Rect) -> Self {
        let min_dim = window_rect.w().min(window_rect.h());
        Self {
            center: pt2(window_rect.x(), window_rect.y()),
            radius: 0.38 * min_dim,
        }
    }

    /// Point on the face at `angle_deg` (clockwise from 12) and distance
    /// `r` from the center.
    pub fn point_at(&self, angle_deg: f32, r: f32) -> Point2 {
        let rad = angle_deg.to_radians();
        self.center + vec2(rad.sin(), rad.cos()) * r
    }

    pub fn hand_length(&self, hand: HandKind) -> f32 {
        match hand {
            HandKind::Hour => 0.43 * self.radius,
            HandKind::Minute => 0.59 * self.radius,
            HandKind::Second => 0.69 * self.radius,
        }
    }

    /// Half-width of a hand's grab region. The hour hand gets the widest
    /// target and the second hand the narrowest, with a floor so small
    /// windows stay grabbable.
    pub fn grab_width(&self, hand: HandKind) -> f32 {
        let relative = match hand {
            HandKind::Hour => 0.095 * self.radius,
            HandKind::Minute => 0.066 * self.radius,
            HandKind::Second => 0.040 * self.radius,
        };
        relative.max(10.0)
    }

    /// Radius of the numeral ring
    pub fn number_radius(&self) -> f32 {
        0.74 * self.radius
    }

    /// Inner radius of a tick mark; major ticks are longer
    pub fn tick_inner_radius(&self, major: bool) -> f32 {
        if major {
            0.86 * self.radius
        } else {
            0.91 * self.radius
        }
    }

    pub fn tick_outer_radius(&self) -> f32 {
        0.96 * self.radius
    }

    /// Rim radius for indicator dots - fixed, independent of hand length
    pub fn indicator_radius(&self) -> f32 {
        0.96 * self.radius
    }

    /// Radius for the spotlight aid along the dragged hand
    pub fn spotlight_radius(&self) -> f32 {
        0.69 * self.radius
    }

    /// Rim indicator dot for a hand at its current angle
    pub fn indicator_point(&self, angle_deg: f32) -> Point2 {
        self.point_at(angle_deg, self.indicator_radius())
    }

    /// Spotlight dot position for the dragged hand
    pub fn spotlight_point(&self, angle_deg: f32) -> Point2 {
        self.point_at(angle_deg, self.spotlight_radius())
    }

    /// Which visible hand, if any, sits under the pointer.
    ///
    /// Hands are tested narrowest-first so an overlapping second hand
    /// can still be grabbed next to the wider minute and hour targets.
    pub fn hit_test_hand(
        &self,
        point: Point2,
        angles: &HandAngles,
        visibility: &HandVisibility,
    ) -> Option<HandKind> {
        for hand in [HandKind::Second, HandKind::Minute, HandKind::Hour] {
            if !visibility.shows(hand) {
                continue;
            }
            let tip = self.point_at(angles.get(hand), self.hand_length(hand));
            if distance_to_segment(point, self.center, tip) <= self.grab_width(hand) {
                return Some(hand);
            }
        }
        None
    }
}

/// Distance from `p` to the segment `a..b`
fn distance_to_segment(p: Point2, a: Point2, b: Point2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::DragMode;

    #[test]
    fn test_project_angles_ten_past_ten_snapped() {
        let time = TimeValue::new(10.0, 10.0, 0.0);
        let angles = project_angles(&time, DragMode::Snapped);
        assert!((angles.hour - 305.0).abs() < 1e-4);
        assert!((angles.minute - 60.0).abs() < 1e-4);
        assert_eq!(angles.second, 0.0);
    }

    #[test]
    fn test_independent_hour_invariant_under_minutes() {
        let at_zero = project_angles(&TimeValue::new(3.0, 0.0, 0.0), DragMode::Independent);
        let at_fifty_nine =
            project_angles(&TimeValue::new(3.0, 59.0, 0.0), DragMode::Independent);
        assert_eq!(at_zero.hour, 90.0);
        assert_eq!(at_fifty_nine.hour, 90.0);
    }

    #[test]
    fn test_snapped_hour_sweeps_with_minutes() {
        let at_zero = project_angles(&TimeValue::new(3.0, 0.0, 0.0), DragMode::Snapped);
        let at_thirty = project_angles(&TimeValue::new(3.0, 30.0, 0.0), DragMode::Snapped);
        assert_eq!(at_zero.hour, 90.0);
        assert!((at_thirty.hour - 105.0).abs() < 1e-4);
    }

    #[test]
    fn test_angles_normalized() {
        let time = TimeValue::new(23.0, 59.0, 59.0);
        let angles = project_angles(&time, DragMode::Snapped);
        for angle in [angles.hour, angles.minute, angles.second] {
            assert!((0.0..360.0).contains(&angle));
        }
    }

    #[test]
    fn test_toward_shortest_across_twelve() {
        // 350 -> 10 travels forward through 0, never back through 180
        let target = toward_shortest(350.0, 10.0);
        assert_eq!(target, 370.0);
        assert_eq!(target - 350.0, 20.0);

        // 10 -> 350 travels backward through 0
        let target = toward_shortest(10.0, 350.0);
        assert_eq!(target, -10.0);

        // Works in a continuous (unbounded) frame too
        let target = toward_shortest(710.0, 10.0);
        assert_eq!(target, 730.0);
    }

    #[test]
    fn test_toward_shortest_small_delta_unchanged() {
        assert_eq!(toward_shortest(90.0, 100.0), 100.0);
        assert_eq!(toward_shortest(100.0, 90.0), 90.0);
    }

    #[test]
    fn test_indicator_dot_sits_on_rim() {
        let geometry = FaceGeometry {
            center: pt2(0.0, 0.0),
            radius: 100.0,
        };
        for angle in [0.0, 90.0, 217.0] {
            let dot = geometry.indicator_point(angle);
            assert!((dot.distance(geometry.center) - geometry.indicator_radius()).abs() < 1e-3);
        }
        // 12 o'clock dot is straight up
        let top = geometry.indicator_point(0.0);
        assert!(top.x.abs() < 1e-4);
        assert!(top.y > 0.0);
    }

    #[test]
    fn test_hit_test_finds_hand_under_pointer() {
        let geometry = FaceGeometry {
            center: pt2(0.0, 0.0),
            radius: 100.0,
        };
        let angles = HandAngles {
            hour: 90.0,
            minute: 0.0,
            second: 180.0,
        };
        let visibility = HandVisibility {
            hour: true,
            minute: true,
            second: true,
        };

        // Point along the hour hand (pointing at 3 o'clock)
        let on_hour = pt2(geometry.hand_length(HandKind::Hour) * 0.8, 0.0);
        assert_eq!(
            geometry.hit_test_hand(on_hour, &angles, &visibility),
            Some(HandKind::Hour)
        );

        // Point along the minute hand (pointing at 12)
        let on_minute = pt2(0.0, geometry.hand_length(HandKind::Minute) * 0.9);
        assert_eq!(
            geometry.hit_test_hand(on_minute, &angles, &visibility),
            Some(HandKind::Minute)
        );

        // Far corner hits nothing
        assert_eq!(
            geometry.hit_test_hand(pt2(95.0, 95.0), &angles, &visibility),
            None
        );
    }

    #[test]
    fn test_hit_test_skips_hidden_hands() {
        let geometry = FaceGeometry {
            center: pt2(0.0, 0.0),
            radius: 100.0,
        };
        let angles = HandAngles {
            hour: 0.0,
            minute: 0.0,
            second: 0.0,
        };
        let visibility = HandVisibility {
            hour: false,
            minute: false,
            second: true,
        };
        // All three hands overlap at 12; only the visible second hand hits
        let on_hands = pt2(0.0, geometry.hand_length(HandKind::Hour) * 0.5);
        assert_eq!(
            geometry.hit_test_hand(on_hands, &angles, &visibility),
            Some(HandKind::Second)
        );
    }
}
