//! Pointer interaction
//!
//! Hovering a circle scores a point and sends it fleeing from the pointer.
//! Each circle has a cooldown so one pass over it scores at most once.

use glam::Vec2;

use super::shape::Shape;
use crate::direction_or;
use crate::tuning::Tuning;

/// Apply one pointer sample; returns how many circles scored
pub fn on_pointer(shapes: &mut [Shape], pointer: Vec2, now_ms: f64, tuning: &Tuning) -> u32 {
    let mut scored = 0;

    for shape in shapes.iter_mut().filter(|s| s.is_circle()) {
        let reach = shape.extent + tuning.hitbox_bonus;
        if pointer.distance(shape.pos) >= reach {
            continue;
        }
        if !shape.cooldown_elapsed(now_ms, tuning.interaction_cooldown_ms) {
            continue;
        }

        shape.vel = direction_or(pointer, shape.pos, Vec2::X) * tuning.flee_speed;
        shape.last_interaction_ms = Some(now_ms);
        scored += 1;
    }

    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hover_scores_and_flees() {
        let tuning = Tuning::default();
        let mut shapes = vec![Shape::circle(1, Vec2::new(60.0, 60.0), Vec2::new(1.0, 1.0), 30.0)];

        let scored = on_pointer(&mut shapes, Vec2::new(50.0, 50.0), 1000.0, &tuning);
        assert_eq!(scored, 1);
        // Fled up-right, away from the pointer, at flee speed
        assert!(shapes[0].vel.x > 0.0 && shapes[0].vel.y > 0.0);
        assert!((shapes[0].vel.length() - tuning.flee_speed).abs() < 1e-5);
        assert_eq!(shapes[0].last_interaction_ms, Some(1000.0));
    }

    #[test]
    fn test_cooldown_blocks_second_score() {
        let tuning = Tuning::default();
        let mut shapes = vec![Shape::circle(1, Vec2::new(60.0, 60.0), Vec2::ZERO, 30.0)];
        let p = Vec2::new(50.0, 50.0);

        assert_eq!(on_pointer(&mut shapes, p, 1000.0, &tuning), 1);
        assert_eq!(on_pointer(&mut shapes, p, 1050.0, &tuning), 0);
        assert_eq!(on_pointer(&mut shapes, p, 1199.0, &tuning), 0);
        assert_eq!(on_pointer(&mut shapes, p, 1250.0, &tuning), 1);
    }

    #[test]
    fn test_hitbox_bonus_extends_reach() {
        let tuning = Tuning::default();
        let mut shapes = vec![Shape::circle(1, Vec2::new(100.0, 100.0), Vec2::ZERO, 30.0)];
        // 44 px away: outside the radius, inside radius + 15
        assert_eq!(on_pointer(&mut shapes, Vec2::new(144.0, 100.0), 0.0, &tuning), 1);

        let mut shapes = vec![Shape::circle(1, Vec2::new(100.0, 100.0), Vec2::ZERO, 30.0)];
        assert_eq!(on_pointer(&mut shapes, Vec2::new(146.0, 100.0), 0.0, &tuning), 0);
    }

    #[test]
    fn test_triangles_ignore_pointer() {
        let tuning = Tuning::default();
        let mut shapes = vec![Shape::triangle(1, Vec2::new(60.0, 60.0), Vec2::new(1.0, 0.0), 30.0)];
        assert_eq!(on_pointer(&mut shapes, Vec2::new(60.0, 60.0), 0.0, &tuning), 0);
        assert_eq!(shapes[0].vel, Vec2::new(1.0, 0.0));
        assert!(shapes[0].last_interaction_ms.is_none());
    }

    #[test]
    fn test_pointer_on_center_flees_along_x() {
        let tuning = Tuning::default();
        let mut shapes = vec![Shape::circle(1, Vec2::new(60.0, 60.0), Vec2::ZERO, 30.0)];
        on_pointer(&mut shapes, Vec2::new(60.0, 60.0), 0.0, &tuning);
        assert_eq!(shapes[0].vel, Vec2::X * tuning.flee_speed);
    }
}
