//! Overlap tests between the character and the scrolling entities.

use crate::entity::{Character, Fruit, FruitKind, Obstacle};

/// A fruit picked up this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    pub kind: FruitKind,
    pub value: u32,
    pub x: f32,
    pub y: f32,
}

/// Box test between the character's bounding box and the obstacle.
///
/// The character is a circle, but only its bounding box is used, which makes
/// corner contacts slightly more punishing than the drawn shape suggests.
pub fn hits_obstacle(character: &Character, obstacle: &Obstacle) -> bool {
    character.bounding_box().intersects(&obstacle.bounding_box())
}

/// The first obstacle overlapping the character, if any.
pub fn first_hit<'a>(character: &Character, obstacles: &'a [Obstacle]) -> Option<&'a Obstacle> {
    obstacles
        .iter()
        .find(|obstacle| hits_obstacle(character, obstacle))
}

pub fn reaches_fruit(character: &Character, fruit: &Fruit) -> bool {
    if fruit.collected {
        return false;
    }

    let (cx, cy) = character.center();
    (cx - fruit.x).hypot(cy - fruit.y) < character.radius() + fruit.size
}

/// Marks every reachable fruit as collected and reports what was picked up.
pub fn collect_fruits(character: &Character, fruits: &mut [Fruit]) -> Vec<Pickup> {
    let mut pickups = Vec::new();

    for fruit in fruits {
        if reaches_fruit(character, fruit) {
            fruit.collected = true;
            pickups.push(Pickup {
                kind: fruit.kind,
                value: fruit.score_value,
                x: fruit.x,
                y: fruit.y,
            });
        }
    }

    pickups
}
